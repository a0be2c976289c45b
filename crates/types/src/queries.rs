//! Logical query model
//!
//! One [`Query`] describes a single logical search. The engine fans it out to
//! every applicable provider adapter; the engine itself holds no state between
//! queries, so anything request-scoped travels on this struct.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::offers::OfferKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
	/// Correlates log lines and results for one logical query
	pub request_id: String,

	pub kind: OfferKind,

	/// Origin city, flights only
	pub origin: Option<String>,

	/// Destination city, or the place/venue name being looked up
	pub destination: String,

	/// Extra location hint for place/restaurant lookups (the city the
	/// venue is in, when `destination` is the venue name)
	pub location: Option<String>,

	pub start_date: Option<NaiveDate>,
	pub end_date: Option<NaiveDate>,

	pub party_size: u32,
	pub rooms: u32,

	/// Budget ceiling per person (flights) or per night (hotels). Offers over
	/// budget are penalized in scoring, never excluded.
	pub budget: Option<f64>,
}

impl Query {
	fn base(kind: OfferKind, destination: impl Into<String>) -> Self {
		Self {
			request_id: Uuid::new_v4().to_string(),
			kind,
			origin: None,
			destination: destination.into(),
			location: None,
			start_date: None,
			end_date: None,
			party_size: 1,
			rooms: 1,
			budget: None,
		}
	}

	pub fn flights(
		origin: impl Into<String>,
		destination: impl Into<String>,
		date: NaiveDate,
		party_size: u32,
	) -> Self {
		let mut q = Self::base(OfferKind::Flight, destination);
		q.origin = Some(origin.into());
		q.start_date = Some(date);
		q.party_size = party_size;
		q
	}

	pub fn hotels(
		destination: impl Into<String>,
		check_in: NaiveDate,
		check_out: NaiveDate,
		guests: u32,
		rooms: u32,
	) -> Self {
		let mut q = Self::base(OfferKind::Hotel, destination);
		q.start_date = Some(check_in);
		q.end_date = Some(check_out);
		q.party_size = guests;
		q.rooms = rooms;
		q
	}

	pub fn places(destination: impl Into<String>) -> Self {
		Self::base(OfferKind::Place, destination)
	}

	/// Look up one named place in a destination city
	pub fn place(name: impl Into<String>, city: impl Into<String>) -> Self {
		let mut q = Self::base(OfferKind::Place, name);
		q.location = Some(city.into());
		q
	}

	pub fn restaurants(destination: impl Into<String>) -> Self {
		Self::base(OfferKind::Restaurant, destination)
	}

	pub fn with_budget(mut self, budget: f64) -> Self {
		self.budget = Some(budget);
		self
	}

	pub fn with_location(mut self, location: impl Into<String>) -> Self {
		self.location = Some(location.into());
		self
	}

	/// Stay length in nights; zero when dates are absent or inverted
	pub fn nights(&self) -> u32 {
		match (self.start_date, self.end_date) {
			(Some(start), Some(end)) => (end - start).num_days().max(0) as u32,
			_ => 0,
		}
	}

	/// The query string sent to search-style providers
	pub fn search_term(&self) -> String {
		match &self.location {
			Some(location) => format!("{} {}", self.destination, location),
			None => self.destination.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_nights_from_date_range() {
		let q = Query::hotels(
			"Tokyo",
			NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
			NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
			2,
			1,
		);
		assert_eq!(q.nights(), 6);
	}

	#[test]
	fn test_nights_zero_without_dates() {
		assert_eq!(Query::places("Kyoto").nights(), 0);
	}

	#[test]
	fn test_search_term_includes_location_hint() {
		let q = Query::place("Senso-ji", "Tokyo");
		assert_eq!(q.search_term(), "Senso-ji Tokyo");
	}
}
