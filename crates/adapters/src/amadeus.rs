//! Amadeus flight inventory adapter
//!
//! Two-step flow: an OAuth client-credentials token request, then the
//! flight-offers search. Durations arrive as ISO-8601 (`PT2H30M`) and nested
//! price objects are flattened to a single display price.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use roam_types::{
	AdapterError, AdapterResult, FlightDetails, Offer, OfferDetails, OfferKind, ProviderAdapter,
	ProviderInfo, Query,
};

use crate::codes::airport_code;
use crate::util::format_hhmm;

#[derive(Debug)]
pub struct AmadeusAdapter {
	info: ProviderInfo,
	endpoint: String,
	client_id: String,
	client_secret: String,
	client: Client,
}

impl AmadeusAdapter {
	pub fn new(
		info: ProviderInfo,
		endpoint: String,
		client_id: String,
		client_secret: String,
	) -> Self {
		Self {
			info,
			endpoint,
			client_id,
			client_secret,
			client: Client::new(),
		}
	}

	async fn oauth_token(&self) -> AdapterResult<String> {
		let response = self
			.client
			.post(format!("{}/v1/security/oauth2/token", self.endpoint))
			.form(&[
				("grant_type", "client_credentials"),
				("client_id", self.client_id.as_str()),
				("client_secret", self.client_secret.as_str()),
			])
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		let token: TokenResponse = response.json().await?;
		token
			.access_token
			.ok_or_else(|| AdapterError::malformed("token response missing access_token"))
	}

	fn parse_offers(&self, body: FlightOffersResponse) -> Vec<Offer> {
		let carriers = body
			.dictionaries
			.map(|d| d.carriers)
			.unwrap_or_default();

		let mut offers = Vec::new();
		for raw in body.data.into_iter().take(self.info.max_results) {
			let itinerary = match raw.itineraries.into_iter().next() {
				Some(it) => it,
				None => continue,
			};
			if itinerary.segments.is_empty() {
				continue;
			}

			// Flatten the nested price object to one display amount
			let (amount, currency) = match raw.price {
				Some(p) => {
					let amount = match p.total.and_then(|t| t.parse::<f64>().ok()) {
						Some(a) if a > 0.0 => a,
						_ => continue,
					};
					(amount, p.currency.unwrap_or_else(|| "INR".to_string()))
				},
				None => continue,
			};

			let stops = (itinerary.segments.len() - 1) as u32;
			let first = &itinerary.segments[0];
			let last = &itinerary.segments[itinerary.segments.len() - 1];

			let carrier_code = first
				.carrier_code
				.clone()
				.unwrap_or_else(|| "XX".to_string());
			let airline = carriers
				.get(&carrier_code)
				.cloned()
				.unwrap_or_else(|| carrier_code.clone());

			let details = FlightDetails {
				airline: airline.clone(),
				flight_number: first
					.number
					.as_ref()
					.map(|n| format!("{}{}", carrier_code, n)),
				departure_time: format_hhmm(
					first
						.departure
						.as_ref()
						.and_then(|d| d.at.as_deref())
						.unwrap_or_default(),
				),
				arrival_time: format_hhmm(
					last.arrival
						.as_ref()
						.and_then(|a| a.at.as_deref())
						.unwrap_or_default(),
				),
				duration_minutes: itinerary
					.duration
					.as_deref()
					.map(parse_iso_duration)
					.unwrap_or(0),
				stops,
				cabin_class: Some("Economy".to_string()),
				booking_url: Some("https://www.amadeus.com".to_string()),
			};

			offers.push(
				Offer::new(airline, OfferDetails::Flight(details), self.id(), true)
					.with_price(amount, currency),
			);
		}

		offers
	}
}

#[async_trait]
impl ProviderAdapter for AmadeusAdapter {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn fetch(&self, query: &Query) -> AdapterResult<Vec<Offer>> {
		if query.kind != OfferKind::Flight {
			return Ok(Vec::new());
		}

		let token = self.oauth_token().await?;
		let origin = query.origin.as_deref().unwrap_or_default();
		let date = query
			.start_date
			.map(|d| d.to_string())
			.unwrap_or_default();

		debug!(provider = self.id(), origin, destination = %query.destination, "searching flight offers");

		let response = self
			.client
			.get(format!("{}/v2/shopping/flight-offers", self.endpoint))
			.bearer_auth(token)
			.query(&[
				("originLocationCode", airport_code(origin)),
				("destinationLocationCode", airport_code(&query.destination)),
				("departureDate", date),
				("adults", query.party_size.to_string()),
				("currencyCode", "INR".to_string()),
				("max", self.info.max_results.to_string()),
			])
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		let body: FlightOffersResponse = response.json().await?;
		Ok(self.parse_offers(body))
	}
}

/// Parse an ISO-8601 duration like `PT2H30M` to minutes; 0 when unparseable
fn parse_iso_duration(duration: &str) -> u32 {
	let mut rest = duration.trim_start_matches("PT");
	let mut hours = 0u32;
	let mut minutes = 0u32;

	if let Some((h, tail)) = rest.split_once('H') {
		hours = h.parse().unwrap_or(0);
		rest = tail;
	}
	if let Some((m, _)) = rest.split_once('M') {
		minutes = m.parse().unwrap_or(0);
	}

	hours * 60 + minutes
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlightOffersResponse {
	#[serde(default)]
	data: Vec<RawOffer>,
	dictionaries: Option<Dictionaries>,
}

#[derive(Debug, Default, Deserialize)]
struct Dictionaries {
	#[serde(default)]
	carriers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawOffer {
	#[serde(default)]
	itineraries: Vec<RawItinerary>,
	price: Option<RawPrice>,
}

#[derive(Debug, Deserialize)]
struct RawItinerary {
	duration: Option<String>,
	#[serde(default)]
	segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
	carrier_code: Option<String>,
	number: Option<String>,
	departure: Option<RawEndpoint>,
	arrival: Option<RawEndpoint>,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
	at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
	total: Option<String>,
	currency: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_iso_duration() {
		assert_eq!(parse_iso_duration("PT2H30M"), 150);
		assert_eq!(parse_iso_duration("PT45M"), 45);
		assert_eq!(parse_iso_duration("PT3H"), 180);
		assert_eq!(parse_iso_duration("garbage"), 0);
	}

	#[test]
	fn test_parse_offers_flattens_price_and_resolves_carrier() {
		let info = ProviderInfo::new("amadeus", "Amadeus").with_kinds(vec![OfferKind::Flight]);
		let adapter = AmadeusAdapter::new(
			info,
			"https://test.api.amadeus.example".to_string(),
			"id".to_string(),
			"secret".to_string(),
		);

		let body: FlightOffersResponse = serde_json::from_str(
			r#"{
				"data": [{
					"itineraries": [{
						"duration": "PT2H10M",
						"segments": [
							{"carrierCode": "AI", "number": "863",
							 "departure": {"at": "2026-03-01T06:00:00"},
							 "arrival": {"at": "2026-03-01T07:05:00"}},
							{"carrierCode": "AI", "number": "101",
							 "departure": {"at": "2026-03-01T07:40:00"},
							 "arrival": {"at": "2026-03-01T08:10:00"}}
						]
					}],
					"price": {"total": "5450.00", "currency": "INR"}
				}],
				"dictionaries": {"carriers": {"AI": "Air India"}}
			}"#,
		)
		.unwrap();

		let offers = adapter.parse_offers(body);
		assert_eq!(offers.len(), 1);
		assert_eq!(offers[0].name, "Air India");
		assert_eq!(offers[0].price_amount(), Some(5450.0));
		match &offers[0].details {
			OfferDetails::Flight(f) => {
				assert_eq!(f.stops, 1);
				assert_eq!(f.duration_minutes, 130);
				assert_eq!(f.departure_time, "06:00");
				assert_eq!(f.arrival_time, "08:10");
			},
			_ => panic!("expected flight details"),
		}
	}
}
