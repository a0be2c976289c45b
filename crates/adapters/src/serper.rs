//! Serper places adapter
//!
//! Search-engine place results for attractions and restaurants. City-wide
//! discovery queries and single-venue lookups use different phrasings; named
//! lookups also fetch an image for the venue card. Serper ratings arrive on a
//! 0-5 scale and are normalized to 0-10 here, at the boundary.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use roam_types::{
	AdapterError, AdapterResult, Offer, OfferDetails, OfferKind, PlaceDetails, ProviderAdapter,
	ProviderInfo, Query, RestaurantDetails,
};

const PLACE_RESULT_CAP: usize = 15;

#[derive(Debug)]
pub struct SerperPlacesAdapter {
	info: ProviderInfo,
	endpoint: String,
	api_key: String,
	client: Client,
}

impl SerperPlacesAdapter {
	pub fn new(info: ProviderInfo, endpoint: String, api_key: String) -> Self {
		Self {
			info,
			endpoint,
			api_key,
			client: Client::new(),
		}
	}

	/// Discovery queries ask for the best of a city; named lookups search the
	/// venue directly
	fn search_phrase(query: &Query) -> String {
		if query.location.is_some() {
			return query.search_term();
		}
		match query.kind {
			OfferKind::Restaurant => format!("best restaurants in {}", query.destination),
			_ => format!("top attractions in {}", query.destination),
		}
	}

	async fn search_places(&self, phrase: &str, num: usize) -> AdapterResult<Vec<RawPlace>> {
		let response = self
			.client
			.post(format!("{}/places", self.endpoint))
			.header("X-API-KEY", &self.api_key)
			.json(&json!({"q": phrase, "num": num}))
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		let body: PlacesResponse = response.json().await?;
		Ok(body.places)
	}

	async fn first_image(&self, phrase: &str) -> AdapterResult<Option<String>> {
		let response = self
			.client
			.post(format!("{}/images", self.endpoint))
			.header("X-API-KEY", &self.api_key)
			.json(&json!({"q": phrase, "num": 1}))
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		let body: ImagesResponse = response.json().await?;
		Ok(body.images.into_iter().next().and_then(|i| i.image_url))
	}

	fn to_offer(&self, raw: RawPlace, kind: OfferKind) -> Option<Offer> {
		let name = raw.title.filter(|t| !t.trim().is_empty())?;

		let details = match kind {
			OfferKind::Restaurant => OfferDetails::Restaurant(RestaurantDetails {
				cuisine: raw.category.clone(),
				address: raw.address.clone(),
				opening_hours: raw.opening_hours.clone(),
				price_level: raw.price_level.clone(),
				phone: raw.phone_number.clone(),
				description: None,
			}),
			_ => OfferDetails::Place(PlaceDetails {
				category: raw.category.clone(),
				address: raw.address.clone(),
				opening_hours: raw.opening_hours.clone(),
				typical_visit_minutes: None,
				description: None,
			}),
		};

		let mut offer = Offer::new(name, details, self.id(), true);
		if let Some(rating) = raw.rating {
			// 0-5 scale from the provider
			offer = offer.with_rating((rating * 2.0).min(10.0));
		}
		if let Some(count) = raw.rating_count {
			offer = offer.with_review_count(count);
		}
		if let Some(level) = raw.price_level {
			offer = offer.with_tier_label(level);
		}
		Some(offer)
	}
}

#[async_trait]
impl ProviderAdapter for SerperPlacesAdapter {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn fetch(&self, query: &Query) -> AdapterResult<Vec<Offer>> {
		if !matches!(query.kind, OfferKind::Place | OfferKind::Restaurant) {
			return Ok(Vec::new());
		}

		let phrase = Self::search_phrase(query);
		let cap = self.info.max_results.min(PLACE_RESULT_CAP);
		debug!(provider = self.id(), %phrase, "searching places");

		// Named lookups want a card image alongside the place record
		if query.location.is_some() {
			let (places, image) = tokio::join!(
				self.search_places(&phrase, cap),
				self.first_image(&phrase)
			);
			let mut offers: Vec<Offer> = places?
				.into_iter()
				.take(1)
				.filter_map(|raw| self.to_offer(raw, query.kind))
				.collect();
			if let (Some(offer), Ok(Some(url))) = (offers.first_mut(), image) {
				offer.media = vec![url];
			}
			return Ok(offers);
		}

		let places = self.search_places(&phrase, cap).await?;
		Ok(places
			.into_iter()
			.take(cap)
			.filter_map(|raw| self.to_offer(raw, query.kind))
			.collect())
	}
}

#[derive(Debug, Default, Deserialize)]
struct PlacesResponse {
	#[serde(default)]
	places: Vec<RawPlace>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
	title: Option<String>,
	category: Option<String>,
	address: Option<String>,
	rating: Option<f64>,
	rating_count: Option<u32>,
	price_level: Option<String>,
	opening_hours: Option<String>,
	phone_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImagesResponse {
	#[serde(default)]
	images: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawImage {
	image_url: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn adapter() -> SerperPlacesAdapter {
		let info = ProviderInfo::new("serper", "Serper Places")
			.with_kinds(vec![OfferKind::Place, OfferKind::Restaurant]);
		SerperPlacesAdapter::new(
			info,
			"https://google.serper.example".to_string(),
			"test-key".to_string(),
		)
	}

	#[test]
	fn test_search_phrase_by_kind() {
		assert_eq!(
			SerperPlacesAdapter::search_phrase(&Query::places("Kyoto")),
			"top attractions in Kyoto"
		);
		assert_eq!(
			SerperPlacesAdapter::search_phrase(&Query::restaurants("Kyoto")),
			"best restaurants in Kyoto"
		);
		assert_eq!(
			SerperPlacesAdapter::search_phrase(&Query::place("Senso-ji", "Tokyo")),
			"Senso-ji Tokyo"
		);
	}

	#[test]
	fn test_rating_normalized_to_ten_point_scale() {
		let raw = RawPlace {
			title: Some("Fushimi Inari".to_string()),
			category: Some("Shinto shrine".to_string()),
			rating: Some(4.7),
			rating_count: Some(88000),
			..Default::default()
		};

		let offer = adapter().to_offer(raw, OfferKind::Place).unwrap();
		assert_eq!(offer.rating, Some(9.4));
		assert_eq!(offer.review_count, Some(88000));
	}

	#[test]
	fn test_untitled_place_dropped() {
		let raw = RawPlace {
			rating: Some(4.0),
			..Default::default()
		};
		assert!(adapter().to_offer(raw, OfferKind::Place).is_none());
	}

	#[test]
	fn test_restaurant_details_carry_price_level() {
		let raw = RawPlace {
			title: Some("Ichiran".to_string()),
			category: Some("Ramen restaurant".to_string()),
			price_level: Some("$$".to_string()),
			..Default::default()
		};

		let offer = adapter().to_offer(raw, OfferKind::Restaurant).unwrap();
		assert_eq!(offer.tier_label.as_deref(), Some("$$"));
		match &offer.details {
			OfferDetails::Restaurant(r) => {
				assert_eq!(r.cuisine.as_deref(), Some("Ramen restaurant"));
			},
			_ => panic!("expected restaurant details"),
		}
	}
}
