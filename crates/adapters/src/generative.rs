//! Generative fallback adapter
//!
//! Last resort when no inventory provider returns anything. A text-completion
//! service is prompted for plausible offers in a strict JSON shape, the reply
//! is run through the extraction contract, and whatever survives becomes
//! non-authoritative offers. The backend sits behind a trait so tests can
//! inject canned completions.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use roam_types::{
	AdapterError, AdapterResult, FlightDetails, HotelDetails, Offer, OfferDetails, OfferKind,
	PlaceDetails, ProviderAdapter, ProviderInfo, Query, RestaurantDetails,
};

use crate::extract::extract_json;

const COMPLETION_MODEL: &str = "llama-3.3-70b-versatile";
const GENERATIVE_OFFER_CAP: usize = 3;

/// Text-completion service boundary
#[async_trait]
pub trait CompletionBackend: Send + Sync + std::fmt::Debug {
	async fn complete(&self, prompt: &str) -> AdapterResult<String>;
}

/// OpenAI-compatible chat-completions backend
#[derive(Debug)]
pub struct HttpCompletionBackend {
	endpoint: String,
	api_key: String,
	client: Client,
}

impl HttpCompletionBackend {
	pub fn new(endpoint: String, api_key: String) -> Self {
		Self {
			endpoint,
			api_key,
			client: Client::new(),
		}
	}
}

#[async_trait]
impl CompletionBackend for HttpCompletionBackend {
	async fn complete(&self, prompt: &str) -> AdapterResult<String> {
		let response = self
			.client
			.post(format!("{}/chat/completions", self.endpoint))
			.bearer_auth(&self.api_key)
			.json(&json!({
				"model": COMPLETION_MODEL,
				"temperature": 0.3,
				"messages": [{"role": "user", "content": prompt}],
			}))
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		let body: CompletionResponse = response.json().await?;
		body.choices
			.into_iter()
			.next()
			.and_then(|c| c.message)
			.and_then(|m| m.content)
			.ok_or_else(|| AdapterError::malformed("completion response has no content"))
	}
}

#[derive(Debug)]
pub struct GenerativeAdapter {
	info: ProviderInfo,
	backend: Box<dyn CompletionBackend>,
}

impl GenerativeAdapter {
	pub fn new(info: ProviderInfo, backend: Box<dyn CompletionBackend>) -> Self {
		Self { info, backend }
	}

	/// Embed a concrete example so the model copies the shape instead of
	/// inventing one
	fn prompt_for(query: &Query) -> String {
		let date = query
			.start_date
			.map(|d| d.to_string())
			.unwrap_or_else(|| "an upcoming date".to_string());

		match query.kind {
			OfferKind::Flight => format!(
				"List {cap} realistic one-way flight options from {origin} to {dest} on {date}. \
				Respond with ONLY a JSON array, no commentary, in exactly this shape:\n\
				[{{\"airline\": \"IndiGo\", \"flight_number\": \"6E204\", \"departure_time\": \"06:00\", \
				\"arrival_time\": \"08:10\", \"duration_minutes\": 130, \"stops\": 0, \"price\": 5200}}]",
				cap = GENERATIVE_OFFER_CAP,
				origin = query.origin.as_deref().unwrap_or("the origin city"),
				dest = query.destination,
				date = date,
			),
			OfferKind::Hotel => format!(
				"List {cap} realistic hotel options in {dest} for a stay starting {date}. \
				Respond with ONLY a JSON array, no commentary, in exactly this shape:\n\
				[{{\"name\": \"Grand Palace Hotel\", \"price_per_night\": 4500, \"rating\": 8.2, \
				\"star_rating\": 4, \"address\": \"Main Street\"}}]",
				cap = GENERATIVE_OFFER_CAP,
				dest = query.destination,
				date = date,
			),
			OfferKind::Place => format!(
				"List {cap} well-known attractions in {dest}. \
				Respond with ONLY a JSON array, no commentary, in exactly this shape:\n\
				[{{\"name\": \"City Museum\", \"category\": \"Museum\", \"rating\": 9.0, \
				\"address\": \"Old Town\", \"description\": \"One sentence.\"}}]",
				cap = GENERATIVE_OFFER_CAP,
				dest = query.destination,
			),
			OfferKind::Restaurant => format!(
				"List {cap} well-regarded restaurants in {dest}. \
				Respond with ONLY a JSON array, no commentary, in exactly this shape:\n\
				[{{\"name\": \"Spice Route\", \"cuisine\": \"Indian\", \"rating\": 8.8, \
				\"price_level\": \"$$\", \"address\": \"Market Road\"}}]",
				cap = GENERATIVE_OFFER_CAP,
				dest = query.destination,
			),
		}
	}

	fn to_offers(&self, text: &str, kind: OfferKind) -> AdapterResult<Vec<Offer>> {
		let value = extract_json(text)?;
		let records: Vec<GenOffer> = serde_json::from_value(value)
			.map_err(|e| AdapterError::malformed(format!("completion shape mismatch: {}", e)))?;

		let offers = records
			.into_iter()
			.take(GENERATIVE_OFFER_CAP)
			.filter_map(|record| self.to_offer(record, kind))
			.collect();

		Ok(offers)
	}

	fn to_offer(&self, record: GenOffer, kind: OfferKind) -> Option<Offer> {
		let name = match kind {
			OfferKind::Flight => record.airline.clone(),
			_ => record.name.clone(),
		}
		.filter(|n| !n.trim().is_empty())?;

		let details = match kind {
			OfferKind::Flight => OfferDetails::Flight(FlightDetails {
				airline: name.clone(),
				flight_number: record.flight_number,
				departure_time: record.departure_time.unwrap_or_default(),
				arrival_time: record.arrival_time.unwrap_or_default(),
				duration_minutes: record.duration_minutes.unwrap_or(0),
				stops: record.stops.unwrap_or(0),
				cabin_class: Some("Economy".to_string()),
				booking_url: None,
			}),
			OfferKind::Hotel => OfferDetails::Hotel(HotelDetails {
				price_per_night: record.price_per_night,
				nights: None,
				star_rating: record.star_rating,
				address: record.address.clone(),
				booking_url: None,
			}),
			OfferKind::Place => OfferDetails::Place(PlaceDetails {
				category: record.category.clone(),
				address: record.address.clone(),
				opening_hours: None,
				typical_visit_minutes: None,
				description: record.description.clone(),
			}),
			OfferKind::Restaurant => OfferDetails::Restaurant(RestaurantDetails {
				cuisine: record.cuisine.clone(),
				address: record.address.clone(),
				opening_hours: None,
				price_level: record.price_level.clone(),
				phone: None,
				description: record.description.clone(),
			}),
		};

		let mut offer = Offer::new(name, details, self.id(), false);
		if let Some(price) = record.price.or(record.price_per_night) {
			if price > 0.0 {
				offer = offer.with_price(price, "INR");
			}
		}
		if let Some(rating) = record.rating {
			offer = offer.with_rating(rating.clamp(0.0, 10.0));
		}
		Some(offer)
	}
}

#[async_trait]
impl ProviderAdapter for GenerativeAdapter {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn fetch(&self, query: &Query) -> AdapterResult<Vec<Offer>> {
		let prompt = Self::prompt_for(query);
		debug!(provider = self.id(), kind = ?query.kind, "requesting generative offers");

		let text = self.backend.complete(&prompt).await?;
		self.to_offers(&text, query.kind)
	}
}

/// Union of the fields any kind's prompt asks for; completions are loosely
/// typed so every field is optional
#[derive(Debug, Default, Deserialize)]
struct GenOffer {
	name: Option<String>,
	airline: Option<String>,
	flight_number: Option<String>,
	departure_time: Option<String>,
	arrival_time: Option<String>,
	duration_minutes: Option<u32>,
	stops: Option<u32>,
	price: Option<f64>,
	price_per_night: Option<f64>,
	rating: Option<f64>,
	star_rating: Option<u32>,
	category: Option<String>,
	cuisine: Option<String>,
	price_level: Option<String>,
	address: Option<String>,
	description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
	#[serde(default)]
	choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
	message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
	content: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug)]
	struct CannedBackend(String);

	#[async_trait]
	impl CompletionBackend for CannedBackend {
		async fn complete(&self, _prompt: &str) -> AdapterResult<String> {
			Ok(self.0.clone())
		}
	}

	fn adapter(completion: &str) -> GenerativeAdapter {
		let info = ProviderInfo::new("generative", "Generative Fallback")
			.with_kinds(vec![
				OfferKind::Flight,
				OfferKind::Hotel,
				OfferKind::Place,
				OfferKind::Restaurant,
			])
			.non_authoritative();
		GenerativeAdapter::new(info, Box::new(CannedBackend(completion.to_string())))
	}

	#[tokio::test]
	async fn test_parses_fenced_completion_into_offers() {
		let completion = "Here you go!\n```json\n[\
			{\"airline\": \"IndiGo\", \"flight_number\": \"6E204\", \"departure_time\": \"06:00\", \
			 \"arrival_time\": \"08:10\", \"duration_minutes\": 130, \"stops\": 0, \"price\": 5200},\
			{\"airline\": \"Vistara\", \"price\": 6100}\
			]\n```";

		let query = Query::flights(
			"Mumbai",
			"Delhi",
			roam_types::chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
			1,
		);
		let offers = adapter(completion).fetch(&query).await.unwrap();

		assert_eq!(offers.len(), 2);
		assert_eq!(offers[0].name, "IndiGo");
		assert_eq!(offers[0].price_amount(), Some(5200.0));
		assert!(!offers[0].provenance.is_authoritative);
	}

	#[tokio::test]
	async fn test_unparseable_completion_is_an_error() {
		let query = Query::places("Kyoto");
		let result = adapter("I can't help with that.").fetch(&query).await;
		assert!(result.is_err());
	}

	#[tokio::test]
	async fn test_caps_completion_offers() {
		let records: Vec<String> = (0..6)
			.map(|i| format!(r#"{{"name": "Place {}", "rating": 8.0}}"#, i))
			.collect();
		let completion = format!("[{}]", records.join(","));

		let offers = adapter(&completion)
			.fetch(&Query::places("Kyoto"))
			.await
			.unwrap();
		assert_eq!(offers.len(), 3);
	}
}
