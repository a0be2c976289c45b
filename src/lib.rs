//! Roam Aggregator
//!
//! Multi-source trip aggregation and ranking engine. Queries fan out to
//! provider adapters, duplicates merge across providers, survivors are scored
//! and badged, and a tiered fallback cascade guarantees a structured answer
//! even when every live provider is down.
//!
//! ```no_run
//! use roam_aggregator::EngineBuilder;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = roam_config::load()?;
//! roam_aggregator::init_logging(&settings.logging.level);
//!
//! let engine = EngineBuilder::from_settings(&settings)?.build();
//! let query = roam_types::Query::places("Kyoto");
//! let result = engine.search(&query).await;
//! println!("{} offers", result.offers.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::info;

use roam_adapters::{AdapterFactory, WeatherClient};
use roam_config::Settings;
use roam_types::{EngineError, EngineResult, ProviderAdapter};

pub mod mocks;

pub use roam_adapters as adapters;
pub use roam_config as config;
pub use roam_service as service;
pub use roam_types as types;

pub use roam_service::{TierPlan, TripEngine};
pub use roam_types::{Offer, OfferKind, Query, RankedResult, SourceTier};

/// Wires settings through the adapter factory into a ready engine
///
/// Construction fails fast: an unknown adapter id or missing credentials in
/// any enabled provider entry is a startup error, not a per-request one.
#[derive(Debug)]
pub struct EngineBuilder {
	plan: TierPlan,
	place_batch_size: usize,
	meal_batch_size: usize,
}

impl EngineBuilder {
	pub fn new() -> Self {
		Self {
			plan: TierPlan::default(),
			place_batch_size: roam_service::PLACE_BATCH_SIZE,
			meal_batch_size: roam_service::MEAL_BATCH_SIZE,
		}
	}

	/// Instantiate every enabled provider entry into its tier
	pub fn from_settings(settings: &Settings) -> EngineResult<Self> {
		let mut builder = Self::new();
		builder.place_batch_size = settings.enrichment.place_batch_size;
		builder.meal_batch_size = settings.enrichment.meal_batch_size;

		for tier in [
			SourceTier::Primary,
			SourceTier::Secondary,
			SourceTier::Generative,
		] {
			for (provider_id, provider) in settings.providers_in_tier(tier) {
				let adapter = AdapterFactory::create(
					&provider.adapter_id,
					provider.to_provider_info(provider_id),
					provider.endpoint.clone(),
					provider.api_key.clone(),
				)?;
				info!(provider = %provider_id, %tier, "configured provider");
				builder = builder.with_adapter(tier, adapter);
			}
		}

		// A cascade with no adapter at all for some kind can only ever answer
		// empty; refuse at startup instead
		for kind in [
			OfferKind::Flight,
			OfferKind::Hotel,
			OfferKind::Place,
			OfferKind::Restaurant,
		] {
			let served = builder
				.plan
				.primary
				.iter()
				.chain(builder.plan.secondary.iter())
				.chain(builder.plan.generative.iter())
				.any(|a| a.supports(kind));
			if !served {
				return Err(EngineError::NoProvidersConfigured { kind });
			}
		}

		Ok(builder)
	}

	pub fn with_adapter(mut self, tier: SourceTier, adapter: Arc<dyn ProviderAdapter>) -> Self {
		match tier {
			SourceTier::Primary => self.plan.primary.push(adapter),
			SourceTier::Secondary => self.plan.secondary.push(adapter),
			// One generative adapter; the last configured wins
			SourceTier::Generative => self.plan.generative = Some(adapter),
		}
		self
	}

	pub fn with_primary(self, adapter: Arc<dyn ProviderAdapter>) -> Self {
		self.with_adapter(SourceTier::Primary, adapter)
	}

	pub fn with_secondary(self, adapter: Arc<dyn ProviderAdapter>) -> Self {
		self.with_adapter(SourceTier::Secondary, adapter)
	}

	pub fn with_generative(self, adapter: Arc<dyn ProviderAdapter>) -> Self {
		self.with_adapter(SourceTier::Generative, adapter)
	}

	pub fn build(self) -> TripEngine {
		TripEngine::new(self.plan)
			.with_batch_sizes(self.place_batch_size, self.meal_batch_size)
	}
}

impl Default for EngineBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Forecast client when the weather section is configured
pub fn weather_client(settings: &Settings) -> Option<WeatherClient> {
	settings
		.weather
		.as_ref()
		.map(|w| WeatherClient::new(w.endpoint.clone(), w.api_key.clone()))
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level. Safe to call more than once;
/// later calls are no-ops.
pub fn init_logging(level: &str) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
	use super::*;
	use roam_config::ProviderSettings;

	fn provider(adapter_id: &str, tier: SourceTier, kinds: Vec<OfferKind>) -> ProviderSettings {
		ProviderSettings {
			adapter_id: adapter_id.to_string(),
			endpoint: "https://example.com".to_string(),
			api_key: Some("k".to_string()),
			name: None,
			timeout_ms: 30_000,
			enabled: true,
			max_results: 20,
			preferred: false,
			tier,
			kinds,
		}
	}

	#[test]
	fn test_from_settings_rejects_uncovered_offer_kinds() {
		let mut settings = Settings::default();
		settings.providers.insert(
			"serper".to_string(),
			provider(
				"serper-v1",
				SourceTier::Primary,
				vec![OfferKind::Place, OfferKind::Restaurant],
			),
		);

		let err = EngineBuilder::from_settings(&settings).unwrap_err();
		assert!(matches!(
			err,
			EngineError::NoProvidersConfigured {
				kind: OfferKind::Flight
			}
		));
	}

	#[test]
	fn test_from_settings_rejects_empty_provider_map() {
		let err = EngineBuilder::from_settings(&Settings::default()).unwrap_err();
		assert!(matches!(err, EngineError::NoProvidersConfigured { .. }));
	}

	#[test]
	fn test_from_settings_accepts_full_coverage() {
		let mut settings = Settings::default();
		settings.providers.insert(
			"flights".to_string(),
			provider(
				"google-flights-v1",
				SourceTier::Primary,
				vec![OfferKind::Flight],
			),
		);
		settings.providers.insert(
			"stays".to_string(),
			provider("booking-v1", SourceTier::Primary, vec![OfferKind::Hotel]),
		);
		settings.providers.insert(
			"places".to_string(),
			provider(
				"serper-v1",
				SourceTier::Primary,
				vec![OfferKind::Place, OfferKind::Restaurant],
			),
		);

		assert!(EngineBuilder::from_settings(&settings).is_ok());
	}

	#[test]
	fn test_generative_tier_alone_covers_its_kinds() {
		let mut settings = Settings::default();
		settings.providers.insert(
			"fallback".to_string(),
			provider(
				"generative-v1",
				SourceTier::Generative,
				vec![
					OfferKind::Flight,
					OfferKind::Hotel,
					OfferKind::Place,
					OfferKind::Restaurant,
				],
			),
		);

		assert!(EngineBuilder::from_settings(&settings).is_ok());
	}
}
