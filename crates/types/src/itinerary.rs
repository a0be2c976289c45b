//! Itinerary model consumed by the batch enrichment scheduler
//!
//! Only the shape enrichment touches is modeled here: days of schedule slots
//! whose place/restaurant cards get filled in from ranked search results.
//! Enrichment merges non-null: a field already populated is never erased by a
//! result that does not provide it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::offers::{Offer, OfferDetails};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
	pub destination: String,
	pub start_date: Option<NaiveDate>,
	pub end_date: Option<NaiveDate>,
	pub days: Vec<DayPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
	pub day: u32,
	pub date: Option<NaiveDate>,
	pub title: Option<String>,
	pub schedule: Vec<ScheduleSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlot {
	/// e.g. "09:30"
	pub time: String,
	pub activity: String,
	pub description: Option<String>,
	pub is_meal: bool,
	/// breakfast, lunch, dinner, snack
	pub meal_type: Option<String>,
	pub place: Option<PlaceCard>,
	pub restaurant: Option<RestaurantCard>,
}

impl ScheduleSlot {
	pub fn activity(time: impl Into<String>, activity: impl Into<String>) -> Self {
		Self {
			time: time.into(),
			activity: activity.into(),
			description: None,
			is_meal: false,
			meal_type: None,
			place: None,
			restaurant: None,
		}
	}

	pub fn meal(time: impl Into<String>, meal_type: impl Into<String>) -> Self {
		let meal_type = meal_type.into();
		Self {
			time: time.into(),
			activity: format!("{} break", meal_type),
			description: None,
			is_meal: true,
			meal_type: Some(meal_type),
			place: None,
			restaurant: None,
		}
	}
}

/// Enriched place data attached to a schedule slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceCard {
	pub name: String,
	pub description: Option<String>,
	pub category: Option<String>,
	/// 0-10 scale, same as the offer model
	pub rating: Option<f64>,
	pub review_count: Option<u32>,
	pub address: Option<String>,
	pub opening_hours: Option<String>,
	pub typical_visit_minutes: Option<u32>,
	pub images: Vec<String>,
}

impl PlaceCard {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	/// Overwrite only fields the newer card actually provides
	pub fn merge_from(&mut self, newer: &PlaceCard) {
		merge_opt(&mut self.description, &newer.description);
		merge_opt(&mut self.category, &newer.category);
		merge_opt(&mut self.rating, &newer.rating);
		merge_opt(&mut self.review_count, &newer.review_count);
		merge_opt(&mut self.address, &newer.address);
		merge_opt(&mut self.opening_hours, &newer.opening_hours);
		merge_opt(&mut self.typical_visit_minutes, &newer.typical_visit_minutes);
		if !newer.images.is_empty() {
			self.images = newer.images.clone();
		}
	}
}

impl From<&Offer> for PlaceCard {
	fn from(offer: &Offer) -> Self {
		let mut card = PlaceCard::named(&offer.name);
		card.rating = offer.rating;
		card.review_count = offer.review_count;
		card.images = offer.media.clone();
		if let OfferDetails::Place(p) = &offer.details {
			card.description = p.description.clone();
			card.category = p.category.clone();
			card.address = p.address.clone();
			card.opening_hours = p.opening_hours.clone();
			card.typical_visit_minutes = p.typical_visit_minutes;
		}
		card
	}
}

/// Enriched restaurant data attached to a meal slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantCard {
	pub name: String,
	pub cuisine: Option<String>,
	pub description: Option<String>,
	pub rating: Option<f64>,
	pub review_count: Option<u32>,
	pub price_level: Option<String>,
	pub address: Option<String>,
	pub phone: Option<String>,
	pub opening_hours: Option<String>,
	pub images: Vec<String>,
}

impl RestaurantCard {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	pub fn merge_from(&mut self, newer: &RestaurantCard) {
		merge_opt(&mut self.cuisine, &newer.cuisine);
		merge_opt(&mut self.description, &newer.description);
		merge_opt(&mut self.rating, &newer.rating);
		merge_opt(&mut self.review_count, &newer.review_count);
		merge_opt(&mut self.price_level, &newer.price_level);
		merge_opt(&mut self.address, &newer.address);
		merge_opt(&mut self.phone, &newer.phone);
		merge_opt(&mut self.opening_hours, &newer.opening_hours);
		if !newer.images.is_empty() {
			self.images = newer.images.clone();
		}
	}
}

impl From<&Offer> for RestaurantCard {
	fn from(offer: &Offer) -> Self {
		let mut card = RestaurantCard::named(&offer.name);
		card.rating = offer.rating;
		card.review_count = offer.review_count;
		card.images = offer.media.clone();
		if let OfferDetails::Restaurant(r) = &offer.details {
			card.cuisine = r.cuisine.clone();
			card.description = r.description.clone();
			card.price_level = r.price_level.clone();
			card.address = r.address.clone();
			card.phone = r.phone.clone();
			card.opening_hours = r.opening_hours.clone();
		}
		card
	}
}

/// One item of an enrichment batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnrichmentTarget {
	/// A named place appearing anywhere in the itinerary
	Place { name: String },
	/// One meal slot, addressed by day number and schedule index
	Meal { day: u32, slot: usize },
}

fn merge_opt<T: Clone>(current: &mut Option<T>, newer: &Option<T>) {
	if newer.is_some() {
		*current = newer.clone();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_keeps_populated_fields() {
		let mut card = PlaceCard::named("Senso-ji");
		card.rating = Some(9.2);
		card.address = Some("2 Chome-3-1 Asakusa".to_string());
		card.images = vec!["https://img.example/1.jpg".to_string()];

		let sparse = PlaceCard::named("Senso-ji");
		card.merge_from(&sparse);

		assert_eq!(card.rating, Some(9.2));
		assert_eq!(card.address.as_deref(), Some("2 Chome-3-1 Asakusa"));
		assert_eq!(card.images.len(), 1);
	}

	#[test]
	fn test_merge_takes_new_values() {
		let mut card = PlaceCard::named("Senso-ji");
		card.rating = Some(8.0);

		let mut newer = PlaceCard::named("Senso-ji");
		newer.rating = Some(9.0);
		newer.opening_hours = Some("06:00-17:00".to_string());
		card.merge_from(&newer);

		assert_eq!(card.rating, Some(9.0));
		assert_eq!(card.opening_hours.as_deref(), Some("06:00-17:00"));
	}

	#[test]
	fn test_merge_is_idempotent() {
		let mut newer = RestaurantCard::named("Ichiran");
		newer.cuisine = Some("Ramen".to_string());
		newer.rating = Some(9.0);

		let mut once = RestaurantCard::named("Ichiran");
		once.merge_from(&newer);
		let mut twice = once.clone();
		twice.merge_from(&newer);

		assert_eq!(once.cuisine, twice.cuisine);
		assert_eq!(once.rating, twice.rating);
	}
}
