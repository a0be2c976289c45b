//! Weather forecast client
//!
//! Not an offer provider; itinerary enrichment asks it for a daily outlook.
//! The upstream serves a 5-day forecast in 3-hour slices, which are grouped
//! here into per-day min/max summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use roam_types::{AdapterError, AdapterResult, WeatherDay, WeatherForecast};

const MAX_FORECAST_DAYS: usize = 7;

#[derive(Debug)]
pub struct WeatherClient {
	endpoint: String,
	api_key: String,
	client: Client,
}

impl WeatherClient {
	pub fn new(endpoint: String, api_key: String) -> Self {
		Self {
			endpoint,
			api_key,
			client: Client::new(),
		}
	}

	async fn geocode(&self, location: &str) -> AdapterResult<(f64, f64)> {
		let response = self
			.client
			.get(format!("{}/geo/1.0/direct", self.endpoint))
			.query(&[
				("q", location),
				("limit", "1"),
				("appid", self.api_key.as_str()),
			])
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		let matches: Vec<GeocodeEntry> = response.json().await?;
		matches
			.into_iter()
			.next()
			.map(|entry| (entry.lat, entry.lon))
			.ok_or_else(|| AdapterError::malformed(format!("no geocode match for '{}'", location)))
	}

	pub async fn forecast(&self, location: &str) -> AdapterResult<WeatherForecast> {
		let (lat, lon) = self.geocode(location).await?;
		debug!(%location, lat, lon, "fetching forecast");

		let response = self
			.client
			.get(format!("{}/data/2.5/forecast", self.endpoint))
			.query(&[
				("lat", lat.to_string()),
				("lon", lon.to_string()),
				("units", "metric".to_string()),
				("appid", self.api_key.clone()),
			])
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(AdapterError::from_status(response.status().as_u16()));
		}

		let body: ForecastResponse = response.json().await?;
		Ok(WeatherForecast {
			location: location.to_string(),
			days: group_by_day(body.list),
		})
	}
}

/// Collapse 3-hour slices into per-day entries, chronologically ordered
fn group_by_day(slices: Vec<ForecastSlice>) -> Vec<WeatherDay> {
	let mut days: BTreeMap<NaiveDate, WeatherDay> = BTreeMap::new();

	for slice in slices {
		let date = match DateTime::from_timestamp(slice.dt, 0) {
			Some(dt) => dt.date_naive(),
			None => continue,
		};
		let main = match slice.main {
			Some(m) => m,
			None => continue,
		};

		let entry = days.entry(date).or_insert_with(|| {
			let (summary, icon_url) = slice
				.weather
				.first()
				.map(|w| {
					(
						title_case(&w.description),
						Some(format!(
							"https://openweathermap.org/img/wn/{}@2x.png",
							w.icon
						)),
					)
				})
				.unwrap_or((String::new(), None));
			WeatherDay {
				date,
				summary,
				icon_url,
				temp_min_c: main.temp_min,
				temp_max_c: main.temp_max,
			}
		});
		entry.temp_min_c = entry.temp_min_c.min(main.temp_min);
		entry.temp_max_c = entry.temp_max_c.max(main.temp_max);
	}

	days.into_values().take(MAX_FORECAST_DAYS).collect()
}

fn title_case(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
	lat: f64,
	lon: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
	#[serde(default)]
	list: Vec<ForecastSlice>,
}

#[derive(Debug, Deserialize)]
struct ForecastSlice {
	dt: i64,
	main: Option<SliceMain>,
	#[serde(default)]
	weather: Vec<SliceWeather>,
}

#[derive(Debug, Deserialize)]
struct SliceMain {
	temp_min: f64,
	temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct SliceWeather {
	description: String,
	icon: String,
}
