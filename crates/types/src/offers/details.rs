//! Variant-specific offer attributes

use serde::{Deserialize, Serialize};

/// Attributes specific to one offer category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum OfferDetails {
	Flight(FlightDetails),
	Hotel(HotelDetails),
	Place(PlaceDetails),
	Restaurant(RestaurantDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDetails {
	pub airline: String,
	pub flight_number: Option<String>,
	/// Local departure time, HH:MM
	pub departure_time: String,
	/// Local arrival time, HH:MM
	pub arrival_time: String,
	/// Zero when the provider did not report a duration
	pub duration_minutes: u32,
	pub stops: u32,
	pub cabin_class: Option<String>,
	pub booking_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelDetails {
	pub price_per_night: Option<f64>,
	pub nights: Option<u32>,
	pub star_rating: Option<u32>,
	pub address: Option<String>,
	pub booking_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
	/// temple, beach, museum, ...
	pub category: Option<String>,
	pub address: Option<String>,
	pub opening_hours: Option<String>,
	pub typical_visit_minutes: Option<u32>,
	pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantDetails {
	pub cuisine: Option<String>,
	pub address: Option<String>,
	pub opening_hours: Option<String>,
	/// Provider price tier, e.g. "$$" or "moderate"
	pub price_level: Option<String>,
	pub phone: Option<String>,
	pub description: Option<String>,
}
