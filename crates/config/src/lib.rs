//! Configuration for the trip aggregation engine

pub mod loader;
pub mod settings;

pub use loader::{load, load_from, ConfigLoadError};
pub use settings::{
	EnrichmentSettings, LoggingSettings, ProviderSettings, Settings, WeatherSettings,
};
