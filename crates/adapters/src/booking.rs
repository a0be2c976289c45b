//! Booking.com inventory adapter
//!
//! Serves both flights and hotels through the RapidAPI gateway. Every search
//! is two-step: resolve the free-text city to an internal destination id,
//! then run the actual search against that id. Per-night hotel prices are
//! derived from the tax-inclusive gross total divided by the stay length.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use roam_types::{
	AdapterError, AdapterResult, FlightDetails, HotelDetails, Offer, OfferDetails, OfferKind,
	ProviderAdapter, ProviderInfo, Query,
};

use crate::util::{format_hhmm, minutes_between};

/// Itineraries longer than this with at least one stop are not worth showing
const MAX_STOPPED_DURATION_MINUTES: u32 = 480;

#[derive(Debug)]
pub struct BookingAdapter {
	info: ProviderInfo,
	endpoint: String,
	api_key: String,
	client: Client,
}

impl BookingAdapter {
	pub fn new(info: ProviderInfo, endpoint: String, api_key: String) -> Self {
		Self {
			info,
			endpoint,
			api_key,
			client: Client::new(),
		}
	}

	fn rapidapi_host(&self) -> String {
		self.endpoint
			.trim_start_matches("https://")
			.trim_start_matches("http://")
			.trim_end_matches('/')
			.to_string()
	}

	async fn get_json(&self, path: &str, params: &[(&str, String)]) -> AdapterResult<Value> {
		let response = self
			.client
			.get(format!("{}{}", self.endpoint, path))
			.header("x-rapidapi-host", self.rapidapi_host())
			.header("x-rapidapi-key", &self.api_key)
			.query(params)
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		Ok(response.json().await?)
	}

	/// Resolve a city name to the provider's flight-search airport id
	async fn flight_destination_id(&self, city: &str) -> AdapterResult<String> {
		let body = self
			.get_json(
				"/api/v1/flights/searchDestination",
				&[("query", city.to_string())],
			)
			.await?;

		body["data"]
			.as_array()
			.and_then(|entries| entries.first())
			.and_then(|entry| entry["id"].as_str())
			.map(str::to_string)
			.ok_or_else(|| {
				AdapterError::malformed(format!("no flight destination id for '{}'", city))
			})
	}

	/// Resolve a city name to the provider's stay-search destination id
	async fn stay_destination_id(&self, city: &str) -> AdapterResult<String> {
		let body = self
			.get_json(
				"/api/v1/hotels/searchDestination",
				&[("query", city.to_string())],
			)
			.await?;

		body["data"]
			.as_array()
			.and_then(|entries| entries.first())
			.and_then(|entry| entry["dest_id"].as_str())
			.map(str::to_string)
			.ok_or_else(|| {
				AdapterError::malformed(format!("no stay destination id for '{}'", city))
			})
	}

	async fn fetch_flights(&self, query: &Query) -> AdapterResult<Vec<Offer>> {
		let origin = query.origin.as_deref().unwrap_or_default();
		let (from_id, to_id) = (
			self.flight_destination_id(origin).await?,
			self.flight_destination_id(&query.destination).await?,
		);

		let date = query
			.start_date
			.map(|d| d.to_string())
			.unwrap_or_default();

		debug!(provider = self.id(), %from_id, %to_id, "searching flights");

		let body = self
			.get_json(
				"/api/v1/flights/searchFlights",
				&[
					("fromId", from_id),
					("toId", to_id),
					("departDate", date),
					("adults", query.party_size.to_string()),
					("currency_code", "INR".to_string()),
				],
			)
			.await?;

		let response: FlightSearchData = serde_json::from_value(body["data"].clone())?;
		Ok(self.parse_flights(response))
	}

	fn parse_flights(&self, data: FlightSearchData) -> Vec<Offer> {
		let mut offers = Vec::new();
		for raw in data.flight_offers.into_iter().take(self.info.max_results) {
			let leg = match raw.segments.into_iter().next() {
				Some(leg) => leg,
				None => continue,
			};
			if leg.legs.is_empty() {
				continue;
			}

			let carrier = match leg.legs[0].carriers_data.first() {
				Some(c) if c.name.as_deref().is_some_and(|n| !n.trim().is_empty()) => c,
				_ => continue,
			};
			let airline = carrier.name.clone().unwrap_or_default();

			// priceBreakdown nests units + nanos; units alone is close enough
			// for ranking and display
			let amount = match raw.price_breakdown.and_then(|p| p.total).map(|t| t.units) {
				Some(units) if units > 0.0 => units,
				_ => continue,
			};

			let departure = leg.departure_time.unwrap_or_default();
			let arrival = leg.arrival_time.unwrap_or_default();
			let duration = minutes_between(&departure, &arrival).unwrap_or(0);
			let stops = (leg.legs.len() - 1) as u32;

			// Long multi-stop itineraries are noise for short-haul trips
			if stops > 0 && duration > MAX_STOPPED_DURATION_MINUTES {
				continue;
			}

			let details = FlightDetails {
				airline: airline.clone(),
				flight_number: leg.legs[0]
					.flight_info
					.as_ref()
					.and_then(|fi| fi.flight_number)
					.map(|n| format!("{}{}", carrier.code.as_deref().unwrap_or(""), n)),
				departure_time: format_hhmm(&departure),
				arrival_time: format_hhmm(&arrival),
				duration_minutes: duration,
				stops,
				cabin_class: Some("Economy".to_string()),
				booking_url: Some("https://flights.booking.com".to_string()),
			};

			let media = carrier
				.logo
				.clone()
				.map(|url| vec![url])
				.unwrap_or_default();

			offers.push(
				Offer::new(airline, OfferDetails::Flight(details), self.id(), true)
					.with_price(amount, "INR")
					.with_media(media),
			);
		}

		offers
	}

	async fn fetch_hotels(&self, query: &Query) -> AdapterResult<Vec<Offer>> {
		let dest_id = self.stay_destination_id(&query.destination).await?;
		let check_in = query
			.start_date
			.map(|d| d.to_string())
			.unwrap_or_default();
		let check_out = query
			.end_date
			.map(|d| d.to_string())
			.unwrap_or_default();

		debug!(provider = self.id(), %dest_id, "searching stays");

		let body = self
			.get_json(
				"/api/v1/hotels/searchHotels",
				&[
					("dest_id", dest_id),
					("search_type", "CITY".to_string()),
					("arrival_date", check_in),
					("departure_date", check_out),
					("adults", query.party_size.to_string()),
					("room_qty", query.rooms.to_string()),
					("currency_code", "INR".to_string()),
				],
			)
			.await?;

		let data: HotelSearchData = serde_json::from_value(body["data"].clone())?;
		Ok(self.parse_hotels(data, query.nights().max(1)))
	}

	fn parse_hotels(&self, data: HotelSearchData, nights: u32) -> Vec<Offer> {
		let mut offers = Vec::new();
		for raw in data.hotels.into_iter().take(self.info.max_results) {
			let property = match raw.property {
				Some(p) => p,
				None => continue,
			};
			let name = match property.name {
				Some(n) if !n.trim().is_empty() => n,
				_ => continue,
			};
			let gross = match property
				.price_breakdown
				.and_then(|p| p.gross_price)
				.map(|g| g.value)
			{
				Some(v) if v > 0.0 => v,
				_ => continue,
			};

			let per_night = gross / nights as f64;
			let stars = property.property_class.unwrap_or(0);

			let details = HotelDetails {
				price_per_night: Some(per_night),
				nights: Some(nights),
				star_rating: (stars > 0).then_some(stars),
				address: property.wishlist_name.clone(),
				booking_url: Some("https://www.booking.com".to_string()),
			};

			let mut offer = Offer::new(name, OfferDetails::Hotel(details), self.id(), true)
				.with_price(per_night, "INR")
				.with_media(property.photo_urls);

			// reviewScore is already on the 0-10 scale
			if let Some(score) = property.review_score {
				offer = offer.with_rating(score);
			}
			if let Some(count) = property.review_count {
				offer = offer.with_review_count(count);
			}
			if stars > 0 {
				offer = offer.with_tier_label(format!("{}-star", stars));
			}

			offers.push(offer);
		}

		offers
	}
}

#[async_trait]
impl ProviderAdapter for BookingAdapter {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn fetch(&self, query: &Query) -> AdapterResult<Vec<Offer>> {
		match query.kind {
			OfferKind::Flight => self.fetch_flights(query).await,
			OfferKind::Hotel => self.fetch_hotels(query).await,
			_ => Ok(Vec::new()),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightSearchData {
	#[serde(default)]
	flight_offers: Vec<RawFlightOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlightOffer {
	#[serde(default)]
	segments: Vec<RawFlightSegment>,
	price_breakdown: Option<RawPriceBreakdown>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlightSegment {
	departure_time: Option<String>,
	arrival_time: Option<String>,
	#[serde(default)]
	legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeg {
	#[serde(default)]
	carriers_data: Vec<RawCarrier>,
	flight_info: Option<RawFlightInfo>,
}

#[derive(Debug, Deserialize)]
struct RawCarrier {
	name: Option<String>,
	code: Option<String>,
	logo: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlightInfo {
	flight_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawPriceBreakdown {
	total: Option<RawMoney>,
}

#[derive(Debug, Deserialize)]
struct RawMoney {
	units: f64,
}

#[derive(Debug, Default, Deserialize)]
struct HotelSearchData {
	#[serde(default)]
	hotels: Vec<RawHotel>,
}

#[derive(Debug, Deserialize)]
struct RawHotel {
	property: Option<RawProperty>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
	name: Option<String>,
	review_score: Option<f64>,
	review_count: Option<u32>,
	property_class: Option<u32>,
	wishlist_name: Option<String>,
	#[serde(default)]
	photo_urls: Vec<String>,
	price_breakdown: Option<RawHotelPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHotelPrice {
	gross_price: Option<RawGross>,
}

#[derive(Debug, Deserialize)]
struct RawGross {
	value: f64,
}
