//! Weather collaborator output
//!
//! Consumed read-only by callers; never enters the aggregation/ranking
//! pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherDay {
	pub date: NaiveDate,
	pub summary: String,
	pub icon_url: Option<String>,
	pub temp_min_c: f64,
	pub temp_max_c: f64,
}

/// Multi-day forecast for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherForecast {
	pub location: String,
	pub days: Vec<WeatherDay>,
}
