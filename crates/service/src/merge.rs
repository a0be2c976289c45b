//! Cross-provider deduplication and merge
//!
//! Offers from different providers describing the same real-world thing are
//! collapsed into one canonical record. Grouping uses the offers' fuzzy
//! identity key; within each group the cheapest instance survives, every
//! contributing provider is recorded on its provenance, and the prices of the
//! merged-away duplicates are kept for display.

use std::collections::HashMap;

use tracing::debug;

use roam_types::Offer;

/// Collapse duplicate offers; returns canonical offers cheapest-first
pub fn merge(offers: Vec<Offer>) -> Vec<Offer> {
	let input_len = offers.len();

	// Group by identity key, preserving first-seen order of groups
	let mut order: Vec<String> = Vec::new();
	let mut groups: HashMap<String, Vec<Offer>> = HashMap::new();
	for offer in offers {
		// Keyless records are malformed beyond recognition
		let key = match offer.identity_key() {
			Some(key) => key,
			None => continue,
		};
		if !groups.contains_key(&key) {
			order.push(key.clone());
		}
		groups.entry(key).or_default().push(offer);
	}

	let mut merged: Vec<Offer> = order
		.into_iter()
		.map(|key| collapse_group(groups.remove(&key).unwrap_or_default()))
		.collect();

	debug!(input = input_len, output = merged.len(), "merged offers");

	// Cheapest first; priceless offers sink, ties break on rating then on
	// the stable first-seen order
	merged.sort_by(|a, b| {
		match (a.price_amount(), b.price_amount()) {
			(Some(pa), Some(pb)) => pa
				.partial_cmp(&pb)
				.unwrap_or(std::cmp::Ordering::Equal)
				.then_with(|| {
					b.rating
						.unwrap_or(0.0)
						.partial_cmp(&a.rating.unwrap_or(0.0))
						.unwrap_or(std::cmp::Ordering::Equal)
				}),
			(Some(_), None) => std::cmp::Ordering::Less,
			(None, Some(_)) => std::cmp::Ordering::Greater,
			(None, None) => std::cmp::Ordering::Equal,
		}
	});

	merged
}

/// Pick the representative of one duplicate group and fold the rest into it
fn collapse_group(mut group: Vec<Offer>) -> Offer {
	debug_assert!(!group.is_empty());
	if group.len() == 1 {
		return group.pop().unwrap_or_else(|| unreachable!());
	}

	// Representative: cheapest priced instance, ties to the higher rating,
	// then to the earlier arrival. Priceless instances never win over priced
	// ones.
	let mut best = 0;
	for i in 1..group.len() {
		let better = match (group[i].price_amount(), group[best].price_amount()) {
			(Some(pi), Some(pb)) => {
				pi < pb
					|| (pi == pb
						&& group[i].rating.unwrap_or(0.0) > group[best].rating.unwrap_or(0.0))
			},
			(Some(_), None) => true,
			_ => false,
		};
		if better {
			best = i;
		}
	}

	let mut winner = group.remove(best);
	if let Some(price) = winner.price_amount() {
		// The comparison map includes the winner's own price once the offer
		// was seen more than once
		winner
			.price_comparison
			.insert(winner.provenance.providers[0].clone(), price);
	}

	// Losers fold in sorted by provider id so the merged record is identical
	// no matter what order the instances arrived in
	group.sort_by(|a, b| a.provenance.providers[0].cmp(&b.provenance.providers[0]));

	for loser in group {
		let provider = loser.provenance.providers[0].clone();
		winner.provenance.add_provider(&provider);
		winner.provenance.is_authoritative |= loser.provenance.is_authoritative;
		if let Some(price) = loser.price_amount() {
			winner.price_comparison.entry(provider).or_insert(price);
		}

		// Duplicates can still contribute data the winner lacks
		if winner.rating.is_none() {
			winner.rating = loser.rating;
		}
		if winner.review_count.is_none() {
			winner.review_count = loser.review_count;
		}
		if winner.media.is_empty() {
			winner.media = loser.media;
		}
	}

	winner
}
