//! Canonical offer model
//!
//! Every provider response is normalized into [`Offer`] before it enters the
//! merge/rank pipeline. Offers are created fresh per request by adapters,
//! mutated only during merge (provenance accumulation) and ranking
//! (score/badge annotation), and discarded at the end of the request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod details;

pub use details::{FlightDetails, HotelDetails, OfferDetails, PlaceDetails, RestaurantDetails};

/// Hotels, places and restaurants are recognized across providers by the
/// first 30 characters of their normalized name.
const IDENTITY_NAME_LEN: usize = 30;

/// Offer categories handled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
	Flight,
	Hotel,
	Place,
	Restaurant,
}

/// One stage of the fallback cascade, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
	Primary,
	Secondary,
	Generative,
}

impl std::fmt::Display for SourceTier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SourceTier::Primary => write!(f, "primary"),
			SourceTier::Secondary => write!(f, "secondary"),
			SourceTier::Generative => write!(f, "generative"),
		}
	}
}

/// User-facing label assigned post-ranking, at most one per offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
	Cheapest,
	Fastest,
	BestValue,
	GoodOption,
}

/// Display price for an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
	pub amount: f64,
	pub currency: String,
}

impl Price {
	pub fn new(amount: f64, currency: impl Into<String>) -> Self {
		Self {
			amount,
			currency: currency.into(),
		}
	}
}

/// Record of which providers contributed to an offer
///
/// After the merger runs, `providers` holds every provider the offer was
/// found in, not just the one whose instance survived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
	pub providers: Vec<String>,
	pub tier: SourceTier,
	pub is_authoritative: bool,
}

impl Provenance {
	pub fn new(provider: impl Into<String>, is_authoritative: bool) -> Self {
		Self {
			providers: vec![provider.into()],
			tier: SourceTier::Primary,
			is_authoritative,
		}
	}

	/// Record an additional contributing provider, preserving insertion order
	pub fn add_provider(&mut self, provider: &str) {
		if !self.providers.iter().any(|p| p == provider) {
			self.providers.push(provider.to_string());
		}
	}
}

/// One candidate answer to a query, from one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
	/// Unique identifier for this offer instance
	pub offer_id: String,

	/// Display name (airline for flights, property/venue name otherwise)
	pub name: String,

	/// Display price; optional for place records
	pub price: Option<Price>,

	/// Rating normalized to the 0-10 scale by the producing adapter
	pub rating: Option<f64>,

	pub review_count: Option<u32>,

	/// Star or price tier label when the provider reports one
	pub tier_label: Option<String>,

	/// Image URLs, possibly empty
	pub media: Vec<String>,

	/// Variant-specific attributes
	pub details: OfferDetails,

	pub provenance: Provenance,

	/// Prices of merged-away duplicates, keyed by provider
	pub price_comparison: HashMap<String, f64>,

	/// Composite score, annotated by the ranker
	pub score: Option<f64>,

	/// Badge, annotated by the ranker
	pub badge: Option<Badge>,
}

impl Offer {
	pub fn new(
		name: impl Into<String>,
		details: OfferDetails,
		provider: impl Into<String>,
		is_authoritative: bool,
	) -> Self {
		Self {
			offer_id: Uuid::new_v4().to_string(),
			name: name.into(),
			price: None,
			rating: None,
			review_count: None,
			tier_label: None,
			media: Vec::new(),
			details,
			provenance: Provenance::new(provider, is_authoritative),
			price_comparison: HashMap::new(),
			score: None,
			badge: None,
		}
	}

	pub fn kind(&self) -> OfferKind {
		match self.details {
			OfferDetails::Flight(_) => OfferKind::Flight,
			OfferDetails::Hotel(_) => OfferKind::Hotel,
			OfferDetails::Place(_) => OfferKind::Place,
			OfferDetails::Restaurant(_) => OfferKind::Restaurant,
		}
	}

	pub fn with_price(mut self, amount: f64, currency: impl Into<String>) -> Self {
		self.price = Some(Price::new(amount, currency));
		self
	}

	pub fn with_rating(mut self, rating: f64) -> Self {
		self.rating = Some(rating);
		self
	}

	pub fn with_review_count(mut self, count: u32) -> Self {
		self.review_count = Some(count);
		self
	}

	pub fn with_tier_label(mut self, label: impl Into<String>) -> Self {
		self.tier_label = Some(label.into());
		self
	}

	pub fn with_media(mut self, media: Vec<String>) -> Self {
		self.media = media;
		self
	}

	/// Price amount regardless of currency, for ordering
	pub fn price_amount(&self) -> Option<f64> {
		self.price.as_ref().map(|p| p.amount)
	}

	/// Duration in minutes where the variant carries one
	pub fn duration_minutes(&self) -> Option<u32> {
		match &self.details {
			OfferDetails::Flight(f) if f.duration_minutes > 0 => Some(f.duration_minutes),
			OfferDetails::Place(p) => p.typical_visit_minutes,
			_ => None,
		}
	}

	/// Fuzzy key used to recognize the same real-world offer across providers
	///
	/// Flights: normalized airline + departure + arrival + stop count.
	/// Everything else: normalized name truncated to a fixed length.
	/// Returns `None` for malformed records, which the merger drops before
	/// grouping.
	pub fn identity_key(&self) -> Option<String> {
		match &self.details {
			OfferDetails::Flight(f) => {
				let airline = normalize_name(&f.airline);
				if airline.is_empty() {
					return None;
				}
				Some(format!(
					"{}|{}|{}|{}",
					airline, f.departure_time, f.arrival_time, f.stops
				))
			},
			_ => {
				let name = normalize_name(&self.name);
				if name.is_empty() {
					return None;
				}
				Some(name.chars().take(IDENTITY_NAME_LEN).collect())
			},
		}
	}
}

/// Lowercase and strip separators so minor formatting differences between
/// providers collapse to the same key
fn normalize_name(name: &str) -> String {
	name.chars()
		.filter(|c| !c.is_whitespace() && *c != '-')
		.flat_map(|c| c.to_lowercase())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn flight(airline: &str, dep: &str, arr: &str, stops: u32) -> Offer {
		Offer::new(
			airline,
			OfferDetails::Flight(FlightDetails {
				airline: airline.to_string(),
				flight_number: Some("XX123".to_string()),
				departure_time: dep.to_string(),
				arrival_time: arr.to_string(),
				duration_minutes: 120,
				stops,
				cabin_class: None,
				booking_url: None,
			}),
			"test-provider",
			true,
		)
	}

	#[test]
	fn test_flight_identity_key_ignores_case_and_spacing() {
		let a = flight("IndiGo", "06:00", "08:00", 0);
		let b = flight("indigo", "06:00", "08:00", 0);
		assert_eq!(a.identity_key(), b.identity_key());
	}

	#[test]
	fn test_flight_identity_key_distinguishes_stops() {
		let a = flight("IndiGo", "06:00", "08:00", 0);
		let b = flight("IndiGo", "06:00", "08:00", 1);
		assert_ne!(a.identity_key(), b.identity_key());
	}

	#[test]
	fn test_hotel_identity_key_truncates_normalized_name() {
		let hotel = Offer::new(
			"The Grand-Imperial Palace Hotel And Residences Downtown",
			OfferDetails::Hotel(HotelDetails::default()),
			"booking",
			true,
		);
		let key = hotel.identity_key().unwrap();
		assert_eq!(key.chars().count(), 30);
		assert!(!key.contains(' '));
		assert!(!key.contains('-'));
	}

	#[test]
	fn test_identity_key_missing_for_unnamed_offer() {
		let offer = Offer::new(
			"  ",
			OfferDetails::Place(PlaceDetails::default()),
			"serper",
			true,
		);
		assert_eq!(offer.identity_key(), None);
	}

	#[test]
	fn test_provenance_accumulation_deduplicates() {
		let mut offer = flight("IndiGo", "06:00", "08:00", 0);
		offer.provenance.add_provider("booking");
		offer.provenance.add_provider("booking");
		offer.provenance.add_provider("amadeus");
		assert_eq!(
			offer.provenance.providers,
			vec!["test-provider", "booking", "amadeus"]
		);
	}

	#[test]
	fn test_tier_ordering() {
		assert!(SourceTier::Primary < SourceTier::Secondary);
		assert!(SourceTier::Secondary < SourceTier::Generative);
	}
}
