//! Settings structures
//!
//! Everything deserializes with serde defaults so a minimal config file is
//! valid. Provider entries are keyed by provider id; the `adapter_id` selects
//! the implementation and is validated against the factory at startup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use roam_types::{OfferKind, ProviderInfo, SourceTier};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
	/// Provider entries keyed by provider id
	#[serde(default)]
	pub providers: HashMap<String, ProviderSettings>,

	#[serde(default)]
	pub enrichment: EnrichmentSettings,

	#[serde(default)]
	pub logging: LoggingSettings,

	/// Forecast lookups are optional; absent means enrichment skips weather
	#[serde(default)]
	pub weather: Option<WeatherSettings>,
}

impl Settings {
	/// Enabled providers of one tier, deterministic order
	pub fn providers_in_tier(&self, tier: SourceTier) -> Vec<(&String, &ProviderSettings)> {
		let mut entries: Vec<_> = self
			.providers
			.iter()
			.filter(|(_, p)| p.enabled && p.tier == tier)
			.collect();
		entries.sort_by(|(a, _), (b, _)| a.cmp(b));
		entries
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
	/// Which adapter implementation serves this provider
	pub adapter_id: String,

	pub endpoint: String,

	#[serde(default)]
	pub api_key: Option<String>,

	/// Human-readable name; falls back to the provider id
	#[serde(default)]
	pub name: Option<String>,

	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,

	#[serde(default = "default_enabled")]
	pub enabled: bool,

	#[serde(default = "default_max_results")]
	pub max_results: usize,

	#[serde(default)]
	pub preferred: bool,

	#[serde(default = "default_tier")]
	pub tier: SourceTier,

	#[serde(default)]
	pub kinds: Vec<OfferKind>,
}

impl ProviderSettings {
	pub fn to_provider_info(&self, provider_id: &str) -> ProviderInfo {
		let mut info = ProviderInfo::new(
			provider_id,
			self.name.clone().unwrap_or_else(|| provider_id.to_string()),
		)
		.with_kinds(self.kinds.clone())
		.with_max_results(self.max_results)
		.with_timeout_ms(self.timeout_ms);

		if self.preferred {
			info = info.preferred();
		}
		if self.tier == SourceTier::Generative {
			info = info.non_authoritative();
		}
		info
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
	#[serde(default = "default_place_batch_size")]
	pub place_batch_size: usize,

	#[serde(default = "default_meal_batch_size")]
	pub meal_batch_size: usize,
}

impl Default for EnrichmentSettings {
	fn default() -> Self {
		Self {
			place_batch_size: default_place_batch_size(),
			meal_batch_size: default_meal_batch_size(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
	#[serde(default = "default_log_level")]
	pub level: String,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: default_log_level(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
	pub endpoint: String,
	pub api_key: String,
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_enabled() -> bool {
	true
}

fn default_max_results() -> usize {
	20
}

fn default_tier() -> SourceTier {
	SourceTier::Primary
}

fn default_place_batch_size() -> usize {
	3
}

fn default_meal_batch_size() -> usize {
	4
}

fn default_log_level() -> String {
	"info".to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_minimal_provider_entry_gets_defaults() {
		let settings: ProviderSettings = serde_json::from_str(
			r#"{
				"adapter_id": "booking-v1",
				"endpoint": "https://booking.example.com",
				"api_key": "k",
				"kinds": ["hotel"]
			}"#,
		)
		.unwrap();

		assert!(settings.enabled);
		assert!(!settings.preferred);
		assert_eq!(settings.timeout_ms, 30_000);
		assert_eq!(settings.max_results, 20);
		assert_eq!(settings.tier, SourceTier::Primary);
	}

	#[test]
	fn test_to_provider_info_carries_flags() {
		let settings: ProviderSettings = serde_json::from_str(
			r#"{
				"adapter_id": "serper-v1",
				"endpoint": "https://serper.example.com",
				"preferred": true,
				"max_results": 15,
				"kinds": ["place", "restaurant"]
			}"#,
		)
		.unwrap();

		let info = settings.to_provider_info("serper");
		assert_eq!(info.provider_id, "serper");
		assert!(info.preferred);
		assert!(info.is_authoritative);
		assert_eq!(info.max_results, 15);
		assert_eq!(info.kinds, vec![OfferKind::Place, OfferKind::Restaurant]);
	}

	#[test]
	fn test_generative_tier_is_non_authoritative() {
		let settings: ProviderSettings = serde_json::from_str(
			r#"{
				"adapter_id": "generative-v1",
				"endpoint": "https://completions.example.com",
				"tier": "generative",
				"kinds": ["flight", "hotel", "place", "restaurant"]
			}"#,
		)
		.unwrap();

		let info = settings.to_provider_info("generative");
		assert!(!info.is_authoritative);
	}

	#[test]
	fn test_providers_in_tier_filters_and_orders() {
		let settings: Settings = serde_json::from_str(
			r#"{
				"providers": {
					"b-provider": {"adapter_id": "booking-v1", "endpoint": "https://e", "kinds": []},
					"a-provider": {"adapter_id": "serper-v1", "endpoint": "https://e", "kinds": []},
					"disabled": {"adapter_id": "serper-v1", "endpoint": "https://e", "enabled": false, "kinds": []},
					"backup": {"adapter_id": "booking-v1", "endpoint": "https://e", "tier": "secondary", "kinds": []}
				}
			}"#,
		)
		.unwrap();

		let primary = settings.providers_in_tier(SourceTier::Primary);
		let ids: Vec<&str> = primary.iter().map(|(id, _)| id.as_str()).collect();
		assert_eq!(ids, vec!["a-provider", "b-provider"]);

		assert_eq!(settings.providers_in_tier(SourceTier::Secondary).len(), 1);
	}
}
