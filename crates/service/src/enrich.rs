//! Batch enrichment scheduler
//!
//! An itinerary arrives with bare activity names and empty meal slots. Each
//! enrichment target becomes one cascade search; targets run in fixed-size
//! batches, sequential between batches and concurrent within one, so a long
//! itinerary cannot stampede the providers. Results merge non-null into the
//! matching cards, so re-running enrichment never erases data.

use futures::future::join_all;
use tracing::debug;

use roam_types::{
	EnrichmentTarget, Itinerary, PlaceCard, Query, RestaurantCard,
};

use crate::cascade::TripEngine;

/// Default batch sizes; overridable through [`TripEngine::with_batch_sizes`]
pub const PLACE_BATCH_SIZE: usize = 3;
pub const MEAL_BATCH_SIZE: usize = 4;

impl TripEngine {
	/// Fill in place and meal cards for the given targets
	pub async fn enrich(
		&self,
		mut itinerary: Itinerary,
		targets: Vec<EnrichmentTarget>,
	) -> Itinerary {
		let mut place_names: Vec<String> = Vec::new();
		let mut meal_slots: Vec<(u32, usize)> = Vec::new();

		for target in targets {
			match target {
				EnrichmentTarget::Place { name } => {
					// The same place can appear on several days; look it up once
					if !place_names.contains(&name) {
						place_names.push(name);
					}
				},
				EnrichmentTarget::Meal { day, slot } => meal_slots.push((day, slot)),
			}
		}

		debug!(
			places = place_names.len(),
			meals = meal_slots.len(),
			destination = %itinerary.destination,
			"enriching itinerary"
		);

		for batch in place_names.chunks(self.place_batch_size) {
			let lookups = batch.iter().map(|name| {
				let query = Query::place(name.clone(), itinerary.destination.clone());
				async move { (name.clone(), self.search(&query).await) }
			});
			for (name, result) in join_all(lookups).await {
				if let Some(offer) = result.best() {
					apply_place_card(&mut itinerary, &name, &PlaceCard::from(offer));
				}
			}
		}

		for batch in meal_slots.chunks(self.meal_batch_size) {
			let lookups = batch.iter().map(|&(day, slot)| {
				let query = Query::restaurants(itinerary.destination.clone());
				async move { ((day, slot), self.search(&query).await) }
			});
			for ((day, slot), result) in join_all(lookups).await {
				if let Some(offer) = result.best() {
					apply_restaurant_card(&mut itinerary, day, slot, &RestaurantCard::from(offer));
				}
			}
		}

		itinerary
	}
}

/// Merge a place card into every non-meal slot naming that place
fn apply_place_card(itinerary: &mut Itinerary, name: &str, card: &PlaceCard) {
	for day in &mut itinerary.days {
		for slot in &mut day.schedule {
			if slot.is_meal {
				continue;
			}
			let matches = slot.activity == name
				|| slot.place.as_ref().is_some_and(|p| p.name == name);
			if matches {
				slot.place
					.get_or_insert_with(|| PlaceCard::named(name))
					.merge_from(card);
			}
		}
	}
}

/// Merge a restaurant card into one meal slot, addressed by day and index
fn apply_restaurant_card(itinerary: &mut Itinerary, day: u32, slot: usize, card: &RestaurantCard) {
	let Some(day_plan) = itinerary.days.iter_mut().find(|d| d.day == day) else {
		return;
	};
	let Some(slot) = day_plan.schedule.get_mut(slot) else {
		return;
	};
	if !slot.is_meal {
		return;
	}
	slot.restaurant
		.get_or_insert_with(|| RestaurantCard::named(&card.name))
		.merge_from(card);
}

#[cfg(test)]
mod tests {
	use super::*;
	use roam_types::{DayPlan, ScheduleSlot};

	fn itinerary() -> Itinerary {
		Itinerary {
			destination: "Kyoto".to_string(),
			start_date: None,
			end_date: None,
			days: vec![
				DayPlan {
					day: 1,
					date: None,
					title: None,
					schedule: vec![
						ScheduleSlot::activity("09:00", "Fushimi Inari"),
						ScheduleSlot::meal("12:30", "lunch"),
					],
				},
				DayPlan {
					day: 2,
					date: None,
					title: None,
					schedule: vec![ScheduleSlot::activity("10:00", "Fushimi Inari")],
				},
			],
		}
	}

	#[test]
	fn test_place_card_applied_to_every_matching_slot() {
		let mut it = itinerary();
		let mut card = PlaceCard::named("Fushimi Inari");
		card.rating = Some(9.4);
		card.address = Some("68 Fukakusa".to_string());

		apply_place_card(&mut it, "Fushimi Inari", &card);

		for (day, slot) in [(0, 0), (1, 0)] {
			let place = it.days[day].schedule[slot].place.as_ref().unwrap();
			assert_eq!(place.rating, Some(9.4));
			assert_eq!(place.address.as_deref(), Some("68 Fukakusa"));
		}
	}

	#[test]
	fn test_place_card_never_erases_populated_fields() {
		let mut it = itinerary();
		let mut existing = PlaceCard::named("Fushimi Inari");
		existing.description = Some("Thousands of vermilion torii gates.".to_string());
		it.days[0].schedule[0].place = Some(existing);

		let mut sparse = PlaceCard::named("Fushimi Inari");
		sparse.rating = Some(9.4);
		apply_place_card(&mut it, "Fushimi Inari", &sparse);

		let place = it.days[0].schedule[0].place.as_ref().unwrap();
		assert_eq!(place.rating, Some(9.4));
		assert_eq!(
			place.description.as_deref(),
			Some("Thousands of vermilion torii gates.")
		);
	}

	#[test]
	fn test_restaurant_card_only_fills_meal_slots() {
		let mut it = itinerary();
		let mut card = RestaurantCard::named("Ichiran");
		card.cuisine = Some("Ramen".to_string());

		// Slot 0 of day 1 is an activity, not a meal
		apply_restaurant_card(&mut it, 1, 0, &card);
		assert!(it.days[0].schedule[0].restaurant.is_none());

		apply_restaurant_card(&mut it, 1, 1, &card);
		let restaurant = it.days[0].schedule[1].restaurant.as_ref().unwrap();
		assert_eq!(restaurant.cuisine.as_deref(), Some("Ramen"));
	}

	#[test]
	fn test_out_of_range_meal_target_ignored() {
		let mut it = itinerary();
		let card = RestaurantCard::named("Ichiran");
		apply_restaurant_card(&mut it, 9, 0, &card);
		apply_restaurant_card(&mut it, 1, 99, &card);
		// No panic, nothing applied
		assert!(it.days[0].schedule[1].restaurant.is_none());
	}
}
