//! Settings loader
//!
//! Layered sources, later ones override earlier: an optional config file,
//! then `ROAM__`-prefixed environment variables (`ROAM__LOGGING__LEVEL=debug`,
//! `ROAM__PROVIDERS__BOOKING__API_KEY=...`).

use config::{Config, Environment, File};
use thiserror::Error;

use crate::settings::Settings;

const DEFAULT_CONFIG_PATH: &str = "config/config";
const ENV_PREFIX: &str = "ROAM";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
	#[error("failed to load configuration: {0}")]
	Load(#[from] config::ConfigError),
}

/// Load settings from the default file location plus environment overrides
pub fn load() -> Result<Settings, ConfigLoadError> {
	load_from(DEFAULT_CONFIG_PATH)
}

/// Load settings from an explicit file path plus environment overrides
pub fn load_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let settings = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.separator("__")
				.try_parsing(true),
		)
		.build()?
		.try_deserialize()?;

	Ok(settings)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_file_yields_defaults() {
		let settings = load_from("does/not/exist").unwrap();
		assert!(settings.providers.is_empty());
		assert_eq!(settings.logging.level, "info");
		assert_eq!(settings.enrichment.place_batch_size, 3);
		assert_eq!(settings.enrichment.meal_batch_size, 4);
		assert!(settings.weather.is_none());
	}
}
