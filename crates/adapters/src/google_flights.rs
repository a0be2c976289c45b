//! Google Flights inventory adapter
//!
//! One-way flight searches against the Google Flights data gateway. The
//! response splits candidates into `topFlights` and `otherFlights`; both are
//! parsed, capped, and normalized into canonical offers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use roam_types::{
	AdapterError, AdapterResult, FlightDetails, Offer, OfferDetails, OfferKind, ProviderAdapter,
	ProviderInfo, Query,
};

use crate::codes::airport_code;
use crate::util::format_hhmm;

const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug)]
pub struct GoogleFlightsAdapter {
	info: ProviderInfo,
	endpoint: String,
	api_key: String,
	client: Client,
}

impl GoogleFlightsAdapter {
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

	fn parse_offers(&self, data: GoogleFlightsData) -> Vec<Offer> {
		let cap = self.info.max_results;
		let raw: Vec<RawGoogleFlight> = data
			.top_flights
			.into_iter()
			.chain(data.other_flights)
			.take(cap)
			.collect();

		let mut offers = Vec::with_capacity(raw.len());
		for flight in raw {
			// Name and price are mandatory; skip, don't fail
			let airline = match flight.airline_name {
				Some(name) if !name.trim().is_empty() => name,
				_ => continue,
			};
			let price = match flight.price {
				Some(p) if p > 0.0 => p,
				_ => continue,
			};

			let code = flight.airline_code.unwrap_or_else(|| "XX".to_string());
			let first_segment = flight.segments.into_iter().next().unwrap_or_default();
			let stops = flight.stops.unwrap_or(0);

			let details = FlightDetails {
				airline: airline.clone(),
				flight_number: first_segment
					.flight_number
					.map(|n| format!("{}{}", code, n)),
				departure_time: format_hhmm(&flight.departure_time.unwrap_or_default()),
				arrival_time: format_hhmm(&flight.arrival_time.unwrap_or_default()),
				duration_minutes: flight.duration_minutes.unwrap_or(0),
				stops,
				cabin_class: Some("Economy".to_string()),
				booking_url: Some("https://www.google.com/travel/flights".to_string()),
			};

			let media = vec![format!(
				"https://www.gstatic.com/flights/airline_logos/70px/{}.png",
				code
			)];

			// Prices stay per person; party totals are presentation concerns
			offers.push(
				Offer::new(airline, OfferDetails::Flight(details), self.id(), true)
					.with_price(price, DEFAULT_CURRENCY)
					.with_media(media),
			);
		}

		offers
	}
}

#[async_trait]
impl ProviderAdapter for GoogleFlightsAdapter {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn fetch(&self, query: &Query) -> AdapterResult<Vec<Offer>> {
		if query.kind != OfferKind::Flight {
			return Ok(Vec::new());
		}

		let origin = query.origin.as_deref().unwrap_or_default();
		let date = query
			.start_date
			.map(|d| d.to_string())
			.unwrap_or_default();

		debug!(
			provider = self.id(),
			origin, destination = %query.destination, "searching one-way flights"
		);

		let response = self
			.client
			.get(format!("{}/flights/search-oneway", self.endpoint))
			.header("x-rapidapi-host", self.rapidapi_host())
			.header("x-rapidapi-key", &self.api_key)
			.query(&[
				("departureId", airport_code(origin)),
				("arrivalId", airport_code(&query.destination)),
				("departureDate", date),
				("adults", query.party_size.to_string()),
				("currency", DEFAULT_CURRENCY.to_string()),
			])
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		let body: GoogleFlightsResponse = response.json().await?;
		let data = body
			.data
			.ok_or_else(|| AdapterError::malformed("missing data field in flights response"))?;

		Ok(self.parse_offers(data))
	}
}

#[derive(Debug, Deserialize)]
struct GoogleFlightsResponse {
	#[serde(default)]
	#[allow(dead_code)]
	status: Option<bool>,
	data: Option<GoogleFlightsData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleFlightsData {
	#[serde(default)]
	top_flights: Vec<RawGoogleFlight>,
	#[serde(default)]
	other_flights: Vec<RawGoogleFlight>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGoogleFlight {
	price: Option<f64>,
	duration_minutes: Option<u32>,
	stops: Option<u32>,
	airline_name: Option<String>,
	airline_code: Option<String>,
	departure_time: Option<String>,
	arrival_time: Option<String>,
	#[serde(default)]
	segments: Vec<RawSegment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
	flight_number: Option<String>,
}
