//! Provider adapter implementations
//!
//! Each adapter normalizes one upstream inventory or search service into the
//! canonical offer model. The [`AdapterFactory`] instantiates adapters from
//! configuration by adapter id; the [`AdapterRegistry`] holds the live
//! instances the engine fans out to.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use roam_types::{EngineError, EngineResult, ProviderAdapter, ProviderInfo};

pub mod booking;
pub mod codes;
pub mod extract;
pub mod generative;
pub mod google_flights;
pub mod serper;
pub mod weather;

mod amadeus;
mod util;

pub use amadeus::AmadeusAdapter;
pub use booking::BookingAdapter;
pub use extract::extract_json;
pub use generative::{CompletionBackend, GenerativeAdapter, HttpCompletionBackend};
pub use google_flights::GoogleFlightsAdapter;
pub use serper::SerperPlacesAdapter;
pub use weather::WeatherClient;

/// Live adapter instances keyed by provider id
#[derive(Debug, Default)]
pub struct AdapterRegistry {
	adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
		let id = adapter.id().to_string();
		info!(provider = %id, "registered adapter");
		self.adapters.insert(id, adapter);
	}

	pub fn get(&self, provider_id: &str) -> Option<Arc<dyn ProviderAdapter>> {
		self.adapters.get(provider_id).cloned()
	}

	pub fn all(&self) -> Vec<Arc<dyn ProviderAdapter>> {
		self.adapters.values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}

/// Instantiates adapters from configuration
pub struct AdapterFactory;

impl AdapterFactory {
	/// Build the adapter implementation named by `adapter_id`
	///
	/// Fails fast on unknown ids and missing credentials so misconfiguration
	/// surfaces at startup rather than mid-request.
	pub fn create(
		adapter_id: &str,
		info: ProviderInfo,
		endpoint: String,
		api_key: Option<String>,
	) -> EngineResult<Arc<dyn ProviderAdapter>> {
		let provider_id = info.provider_id.clone();
		let key = |api_key: Option<String>| {
			api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
				EngineError::InvalidProviderConfig {
					reason: format!("provider '{}' requires an api key", provider_id),
				}
			})
		};

		match adapter_id {
			"google-flights-v1" => Ok(Arc::new(GoogleFlightsAdapter::new(
				info,
				endpoint,
				key(api_key)?,
			))),
			"amadeus-v2" => {
				// Amadeus credentials are configured as "client_id:client_secret"
				let raw = key(api_key)?;
				let (client_id, client_secret) = raw.split_once(':').ok_or_else(|| {
					EngineError::InvalidProviderConfig {
						reason: "amadeus api key must be 'client_id:client_secret'".to_string(),
					}
				})?;
				Ok(Arc::new(AmadeusAdapter::new(
					info,
					endpoint,
					client_id.to_string(),
					client_secret.to_string(),
				)))
			},
			"booking-v1" => Ok(Arc::new(BookingAdapter::new(info, endpoint, key(api_key)?))),
			"serper-v1" => Ok(Arc::new(SerperPlacesAdapter::new(
				info,
				endpoint,
				key(api_key)?,
			))),
			"generative-v1" => {
				let backend = HttpCompletionBackend::new(endpoint, key(api_key)?);
				Ok(Arc::new(GenerativeAdapter::new(info, Box::new(backend))))
			},
			other => Err(EngineError::UnknownAdapter {
				provider_id: provider_id.clone(),
				adapter_id: other.to_string(),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use roam_types::OfferKind;

	fn info(id: &str) -> ProviderInfo {
		ProviderInfo::new(id, id).with_kinds(vec![OfferKind::Flight])
	}

	#[test]
	fn test_factory_creates_known_adapters() {
		for (adapter_id, api_key) in [
			("google-flights-v1", "k"),
			("amadeus-v2", "id:secret"),
			("booking-v1", "k"),
			("serper-v1", "k"),
			("generative-v1", "k"),
		] {
			let adapter = AdapterFactory::create(
				adapter_id,
				info("p1"),
				"https://example.com".to_string(),
				Some(api_key.to_string()),
			);
			assert!(adapter.is_ok(), "{} should construct", adapter_id);
		}
	}

	#[test]
	fn test_factory_rejects_unknown_adapter_id() {
		let err = AdapterFactory::create(
			"nope-v9",
			info("p1"),
			"https://example.com".to_string(),
			Some("k".to_string()),
		)
		.unwrap_err();
		assert!(matches!(err, EngineError::UnknownAdapter { .. }));
	}

	#[test]
	fn test_factory_rejects_missing_credentials() {
		let err = AdapterFactory::create(
			"booking-v1",
			info("p1"),
			"https://example.com".to_string(),
			None,
		)
		.unwrap_err();
		assert!(matches!(err, EngineError::InvalidProviderConfig { .. }));
	}

	#[test]
	fn test_factory_rejects_malformed_amadeus_credentials() {
		let err = AdapterFactory::create(
			"amadeus-v2",
			info("p1"),
			"https://example.com".to_string(),
			Some("no-separator".to_string()),
		)
		.unwrap_err();
		assert!(matches!(err, EngineError::InvalidProviderConfig { .. }));
	}

	#[test]
	fn test_registry_round_trip() {
		let adapter = AdapterFactory::create(
			"serper-v1",
			info("serper"),
			"https://example.com".to_string(),
			Some("k".to_string()),
		)
		.unwrap();

		let mut registry = AdapterRegistry::new();
		registry.register(adapter);

		assert_eq!(registry.len(), 1);
		assert!(registry.get("serper").is_some());
		assert!(registry.get("missing").is_none());
	}
}
