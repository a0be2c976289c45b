//! Composite scoring, ordering and badge assignment
//!
//! Scoring is deterministic: fixed per-kind weights over sub-scores that are
//! each normalized to 0-10 across the candidate set. Budget overruns are a
//! penalty, never a filter. Truncation to the display count happens strictly
//! after every candidate is scored.

use std::collections::HashSet;

use tracing::debug;

use roam_types::{Badge, Offer, OfferKind};

/// Weights applied to the 0-10 sub-scores; the preferred bonus uses a full
/// 10 for offers from a promoted provider
#[derive(Debug, Clone, Copy)]
pub struct RankWeights {
	pub quality: f64,
	pub value: f64,
	pub cost: f64,
	pub speed: f64,
	pub preferred: f64,
}

const FLIGHT_WEIGHTS: RankWeights = RankWeights {
	quality: 0.30,
	value: 0.25,
	cost: 0.0,
	speed: 0.30,
	preferred: 0.05,
};

const HOTEL_WEIGHTS: RankWeights = RankWeights {
	quality: 0.30,
	value: 0.20,
	cost: 0.30,
	speed: 0.0,
	preferred: 0.05,
};

const PLACE_WEIGHTS: RankWeights = RankWeights {
	quality: 0.30,
	value: 0.25,
	cost: 0.20,
	speed: 0.0,
	preferred: 0.05,
};

/// Rating assumed for offers whose provider reports none
const NEUTRAL_QUALITY: f64 = 5.0;

pub fn weights_for(kind: OfferKind) -> RankWeights {
	match kind {
		OfferKind::Flight => FLIGHT_WEIGHTS,
		OfferKind::Hotel => HOTEL_WEIGHTS,
		OfferKind::Place | OfferKind::Restaurant => PLACE_WEIGHTS,
	}
}

/// Offers shown to the caller per kind
pub fn display_count(kind: OfferKind) -> usize {
	match kind {
		OfferKind::Flight | OfferKind::Place => 5,
		OfferKind::Hotel | OfferKind::Restaurant => 3,
	}
}

/// Score, order, truncate and badge one kind's merged offers
pub fn rank(
	mut offers: Vec<Offer>,
	kind: OfferKind,
	budget: Option<f64>,
	preferred_providers: &HashSet<String>,
) -> Vec<Offer> {
	if offers.is_empty() {
		return offers;
	}

	let weights = weights_for(kind);
	let price_range = min_max(offers.iter().filter_map(|o| o.price_amount()));
	let speed_range = min_max(
		offers
			.iter()
			.filter_map(|o| o.duration_minutes().map(f64::from)),
	);

	for offer in &mut offers {
		let quality = offer.rating.unwrap_or(NEUTRAL_QUALITY);
		let value = value_score(offer.price_amount(), budget);
		let cost = inverted_min_max(offer.price_amount(), price_range);
		let speed = inverted_min_max(offer.duration_minutes().map(f64::from), speed_range);
		let preferred = if offer
			.provenance
			.providers
			.iter()
			.any(|p| preferred_providers.contains(p))
		{
			10.0
		} else {
			0.0
		};

		let score = quality * weights.quality
			+ value * weights.value
			+ cost * weights.cost
			+ speed * weights.speed
			+ preferred * weights.preferred;
		offer.score = Some((score * 100.0).round() / 100.0);
	}

	// Stable: equal scores keep merge order (cheapest-first)
	offers.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| cmp_opt_asc(a.price_amount(), b.price_amount()))
			.then_with(|| cmp_opt_desc(a.rating, b.rating))
	});

	offers.truncate(display_count(kind));
	assign_badges(&mut offers);

	debug!(kind = ?kind, shown = offers.len(), "ranked offers");
	offers
}

/// Budget-relative value on the 0-10 scale
///
/// No budget means neutral; within budget scales linearly from 10 (free)
/// down to 5 (exactly at budget); anything over budget scores zero.
fn value_score(price: Option<f64>, budget: Option<f64>) -> f64 {
	let (price, budget) = match (price, budget) {
		(Some(p), Some(b)) if b > 0.0 => (p, b),
		_ => return NEUTRAL_QUALITY,
	};
	if price > budget {
		return 0.0;
	}
	(10.0 - (price / budget) * 5.0).max(0.0)
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
	values.fold(None, |acc, v| match acc {
		None => Some((v, v)),
		Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
	})
}

/// Min-max normalization, inverted so the smallest value scores 10
///
/// Missing values score zero; a degenerate range scores everyone 10.
fn inverted_min_max(value: Option<f64>, range: Option<(f64, f64)>) -> f64 {
	let (value, (lo, hi)) = match (value, range) {
		(Some(v), Some(r)) => (v, r),
		_ => return 0.0,
	};
	if hi <= lo {
		return 10.0;
	}
	(1.0 - (value - lo) / (hi - lo)) * 10.0
}

fn cmp_opt_asc(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
	match (a, b) {
		(Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal),
		(Some(_), None) => std::cmp::Ordering::Less,
		(None, Some(_)) => std::cmp::Ordering::Greater,
		(None, None) => std::cmp::Ordering::Equal,
	}
}

fn cmp_opt_desc(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
	cmp_opt_asc(b, a)
}

/// One pass over the already-truncated list; at most one badge per offer
fn assign_badges(offers: &mut [Offer]) {
	if offers.is_empty() {
		return;
	}

	let cheapest = index_of_min(offers.iter().map(|o| o.price_amount()));
	if let Some(i) = cheapest {
		offers[i].badge = Some(Badge::Cheapest);
	}

	// Fastest goes to a distinct offer only
	let fastest = index_of_min(
		offers
			.iter()
			.map(|o| o.duration_minutes().map(f64::from)),
	);
	if let Some(i) = fastest {
		if offers[i].badge.is_none() {
			offers[i].badge = Some(Badge::Fastest);
		}
	}

	// Best Value only when a third distinct offer can carry it
	if offers.len() >= 3 {
		let best_unbadged = offers
			.iter()
			.enumerate()
			.filter(|(_, o)| o.badge.is_none())
			.max_by(|(_, a), (_, b)| {
				a.score
					.partial_cmp(&b.score)
					.unwrap_or(std::cmp::Ordering::Equal)
			})
			.map(|(i, _)| i);
		if let Some(i) = best_unbadged {
			offers[i].badge = Some(Badge::BestValue);
		}
	}

	for offer in offers.iter_mut() {
		if offer.badge.is_none() {
			offer.badge = Some(Badge::GoodOption);
		}
	}
}

fn index_of_min(values: impl Iterator<Item = Option<f64>>) -> Option<usize> {
	values
		.enumerate()
		.filter_map(|(i, v)| v.map(|v| (i, v)))
		.min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
		.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
	use super::*;
	use roam_types::{FlightDetails, HotelDetails, OfferDetails};

	fn flight(airline: &str, price: f64, duration: u32, rating: f64) -> Offer {
		Offer::new(
			airline,
			OfferDetails::Flight(FlightDetails {
				airline: airline.to_string(),
				flight_number: None,
				departure_time: "06:00".to_string(),
				arrival_time: "08:10".to_string(),
				duration_minutes: duration,
				stops: 0,
				cabin_class: None,
				booking_url: None,
			}),
			"test-provider",
			true,
		)
		.with_price(price, "INR")
		.with_rating(rating)
	}

	fn hotel(name: &str, price: f64, rating: f64) -> Offer {
		Offer::new(
			name,
			OfferDetails::Hotel(HotelDetails::default()),
			"test-provider",
			true,
		)
		.with_price(price, "INR")
		.with_rating(rating)
	}

	fn no_preference() -> HashSet<String> {
		HashSet::new()
	}

	#[test]
	fn test_every_shown_offer_is_scored_and_badged() {
		let ranked = rank(
			vec![
				flight("IndiGo", 5000.0, 130, 8.0),
				flight("Vistara", 6200.0, 115, 8.5),
				flight("SpiceJet", 4800.0, 150, 7.0),
				flight("Air India", 5500.0, 125, 7.5),
			],
			OfferKind::Flight,
			Some(7000.0),
			&no_preference(),
		);

		assert_eq!(ranked.len(), 4);
		for offer in &ranked {
			assert!(offer.score.is_some());
			assert!(offer.badge.is_some());
		}
	}

	#[test]
	fn test_cheapest_and_fastest_badges_are_distinct() {
		let ranked = rank(
			vec![
				flight("IndiGo", 5000.0, 130, 8.0),
				flight("Vistara", 6200.0, 110, 8.5),
				flight("SpiceJet", 4800.0, 150, 7.0),
			],
			OfferKind::Flight,
			Some(7000.0),
			&no_preference(),
		);

		let badge_of = |name: &str| {
			ranked
				.iter()
				.find(|o| o.name == name)
				.and_then(|o| o.badge)
		};
		assert_eq!(badge_of("SpiceJet"), Some(Badge::Cheapest));
		assert_eq!(badge_of("Vistara"), Some(Badge::Fastest));
		// Third distinct offer picks up Best Value
		assert_eq!(badge_of("IndiGo"), Some(Badge::BestValue));
	}

	#[test]
	fn test_over_budget_offer_penalized_not_excluded() {
		let ranked = rank(
			vec![hotel("Affordable Inn", 3000.0, 7.0), hotel("Luxe Palace", 9000.0, 9.5)],
			OfferKind::Hotel,
			Some(4000.0),
			&no_preference(),
		);

		assert_eq!(ranked.len(), 2);
		assert_eq!(ranked[0].name, "Affordable Inn");
		// Still present, just ranked below the in-budget option
		assert_eq!(ranked[1].name, "Luxe Palace");
	}

	#[test]
	fn test_truncates_to_display_count_after_scoring() {
		let offers: Vec<Offer> = (0..8)
			.map(|i| hotel(&format!("Hotel {}", i), 3000.0 + i as f64 * 100.0, 7.0))
			.collect();
		let ranked = rank(offers, OfferKind::Hotel, None, &no_preference());
		assert_eq!(ranked.len(), 3);
	}

	#[test]
	fn test_preferred_provider_breaks_near_ties() {
		let mut favored = hotel("Favored Stay", 3000.0, 7.0);
		favored.provenance.providers = vec!["promoted".to_string()];
		let plain = hotel("Plain Stay", 3000.0, 7.0);

		let preferred: HashSet<String> = ["promoted".to_string()].into();
		let ranked = rank(
			vec![plain, favored],
			OfferKind::Hotel,
			None,
			&preferred,
		);
		assert_eq!(ranked[0].name, "Favored Stay");
	}

	#[test]
	fn test_ranking_is_deterministic() {
		let offers = vec![
			flight("IndiGo", 5000.0, 130, 8.0),
			flight("Vistara", 6200.0, 110, 8.5),
			flight("SpiceJet", 4800.0, 150, 7.0),
		];

		let first = rank(offers.clone(), OfferKind::Flight, Some(7000.0), &no_preference());
		let second = rank(offers, OfferKind::Flight, Some(7000.0), &no_preference());

		for (a, b) in first.iter().zip(second.iter()) {
			assert_eq!(a.name, b.name);
			assert_eq!(a.score, b.score);
			assert_eq!(a.badge, b.badge);
		}
	}

	#[test]
	fn test_identical_durations_share_full_speed_score() {
		let ranked = rank(
			vec![
				flight("IndiGo", 5000.0, 130, 8.0),
				flight("Vistara", 6000.0, 130, 8.0),
			],
			OfferKind::Flight,
			None,
			&no_preference(),
		);
		// Same rating, same speed, no budget: only order differentiators are
		// score (equal) then price
		assert_eq!(ranked[0].name, "IndiGo");
	}
}
