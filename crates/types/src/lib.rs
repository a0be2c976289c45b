//! Roam Types
//!
//! Shared models and traits for the trip aggregation engine. This crate
//! contains all domain models organized by business entity.

pub mod errors;
pub mod itinerary;
pub mod offers;
pub mod providers;
pub mod queries;
pub mod results;
pub mod weather;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use errors::{AdapterError, AdapterResult, EngineError, EngineResult};

pub use offers::{
	Badge, FlightDetails, HotelDetails, Offer, OfferDetails, OfferKind, PlaceDetails, Price,
	Provenance, RestaurantDetails, SourceTier,
};

pub use itinerary::{
	DayPlan, EnrichmentTarget, Itinerary, PlaceCard, RestaurantCard, ScheduleSlot,
};

pub use providers::{ProviderAdapter, ProviderInfo};
pub use queries::Query;
pub use results::RankedResult;
pub use weather::{WeatherDay, WeatherForecast};
