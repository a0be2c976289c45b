//! Mock provider adapters for tests and examples
//!
//! Mocks are timing-controlled: each one can delay, fail, or count its calls,
//! which is what the integration tests use to prove isolation, cascade
//! monotonicity and the enrichment concurrency bound.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use roam_types::{
	AdapterError, AdapterResult, FlightDetails, HotelDetails, Offer, OfferDetails, OfferKind,
	PlaceDetails, ProviderAdapter, ProviderInfo, Query, RestaurantDetails,
};

/// Shared call counter handed out by mocks
#[derive(Debug, Default, Clone)]
pub struct CallTracker {
	calls: Arc<AtomicUsize>,
}

impl CallTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&self) {
		self.calls.fetch_add(1, Ordering::SeqCst);
	}

	pub fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

/// Configurable mock adapter
#[derive(Debug)]
pub struct MockAdapter {
	info: ProviderInfo,
	offers: Vec<Offer>,
	delay: Option<Duration>,
	should_fail: bool,
	garbled: bool,
	panics: bool,
	tracker: CallTracker,
}

impl MockAdapter {
	pub fn new(provider_id: &str, kinds: Vec<OfferKind>) -> Self {
		Self {
			info: ProviderInfo::new(provider_id, provider_id).with_kinds(kinds),
			offers: Vec::new(),
			delay: None,
			should_fail: false,
			garbled: false,
			panics: false,
			tracker: CallTracker::new(),
		}
	}

	/// Responds immediately with the given offers
	pub fn fast(provider_id: &str, kinds: Vec<OfferKind>, offers: Vec<Offer>) -> Self {
		Self::new(provider_id, kinds).with_offers(offers)
	}

	/// Responds after a delay, still within its own timeout
	pub fn slow(
		provider_id: &str,
		kinds: Vec<OfferKind>,
		offers: Vec<Offer>,
		delay_ms: u64,
	) -> Self {
		Self::new(provider_id, kinds)
			.with_offers(offers)
			.with_delay_ms(delay_ms)
	}

	/// Sleeps past its own timeout so the fan-out deadline always fires
	pub fn timing_out(provider_id: &str, kinds: Vec<OfferKind>, timeout_ms: u64) -> Self {
		let mut mock = Self::new(provider_id, kinds).with_delay_ms(timeout_ms * 10);
		mock.info = mock.info.with_timeout_ms(timeout_ms);
		mock
	}

	/// Always returns an adapter error
	pub fn failing(provider_id: &str, kinds: Vec<OfferKind>) -> Self {
		let mut mock = Self::new(provider_id, kinds);
		mock.should_fail = true;
		mock
	}

	/// Returns a response that cannot be parsed into offers
	pub fn garbled(provider_id: &str, kinds: Vec<OfferKind>) -> Self {
		let mut mock = Self::new(provider_id, kinds);
		mock.garbled = true;
		mock
	}

	/// Panics on every call
	pub fn panicking(provider_id: &str, kinds: Vec<OfferKind>) -> Self {
		let mut mock = Self::new(provider_id, kinds);
		mock.panics = true;
		mock
	}

	pub fn with_offers(mut self, offers: Vec<Offer>) -> Self {
		self.offers = offers;
		self
	}

	pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
		self.delay = Some(Duration::from_millis(delay_ms));
		self
	}

	pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.info = self.info.with_timeout_ms(timeout_ms);
		self
	}

	pub fn preferred(mut self) -> Self {
		self.info = self.info.preferred();
		self
	}

	pub fn tracker(&self) -> CallTracker {
		self.tracker.clone()
	}
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn fetch(&self, _query: &Query) -> AdapterResult<Vec<Offer>> {
		self.tracker.record();

		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		if self.panics {
			panic!("mock provider panicked");
		}
		if self.should_fail {
			return Err(AdapterError::from_status(503));
		}
		if self.garbled {
			return Err(AdapterError::malformed("response was not valid JSON"));
		}

		// Fresh provenance per call so merge tests see this provider's id
		let mut offers = self.offers.clone();
		for offer in &mut offers {
			offer.provenance.providers = vec![self.id().to_string()];
		}
		Ok(offers)
	}
}

/// Mock that reports the highest number of in-flight calls it ever saw
#[derive(Debug)]
pub struct ConcurrencyProbe {
	info: ProviderInfo,
	offers: Vec<Offer>,
	delay: Duration,
	current: Arc<AtomicUsize>,
	max_seen: Arc<AtomicUsize>,
	tracker: CallTracker,
}

impl ConcurrencyProbe {
	pub fn new(provider_id: &str, kinds: Vec<OfferKind>, offers: Vec<Offer>, delay_ms: u64) -> Self {
		Self {
			info: ProviderInfo::new(provider_id, provider_id).with_kinds(kinds),
			offers,
			delay: Duration::from_millis(delay_ms),
			current: Arc::new(AtomicUsize::new(0)),
			max_seen: Arc::new(AtomicUsize::new(0)),
			tracker: CallTracker::new(),
		}
	}

	pub fn max_in_flight(&self) -> usize {
		self.max_seen.load(Ordering::SeqCst)
	}

	pub fn tracker(&self) -> CallTracker {
		self.tracker.clone()
	}
}

#[async_trait]
impl ProviderAdapter for ConcurrencyProbe {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn fetch(&self, _query: &Query) -> AdapterResult<Vec<Offer>> {
		self.tracker.record();
		let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_seen.fetch_max(now, Ordering::SeqCst);

		tokio::time::sleep(self.delay).await;

		self.current.fetch_sub(1, Ordering::SeqCst);
		Ok(self.offers.clone())
	}
}

pub fn mock_flight(airline: &str, price: f64, duration_minutes: u32) -> Offer {
	Offer::new(
		airline,
		OfferDetails::Flight(FlightDetails {
			airline: airline.to_string(),
			flight_number: None,
			departure_time: "06:00".to_string(),
			arrival_time: "08:10".to_string(),
			duration_minutes,
			stops: 0,
			cabin_class: Some("Economy".to_string()),
			booking_url: None,
		}),
		"mock",
		true,
	)
	.with_price(price, "INR")
	.with_rating(8.0)
}

pub fn mock_hotel(name: &str, price_per_night: f64, rating: f64) -> Offer {
	Offer::new(
		name,
		OfferDetails::Hotel(HotelDetails {
			price_per_night: Some(price_per_night),
			nights: Some(2),
			star_rating: Some(4),
			address: None,
			booking_url: None,
		}),
		"mock",
		true,
	)
	.with_price(price_per_night, "INR")
	.with_rating(rating)
}

pub fn mock_place(name: &str, rating: f64) -> Offer {
	Offer::new(
		name,
		OfferDetails::Place(PlaceDetails {
			category: Some("Attraction".to_string()),
			address: Some(format!("{} Street 1", name)),
			opening_hours: Some("09:00-17:00".to_string()),
			typical_visit_minutes: Some(90),
			description: None,
		}),
		"mock",
		true,
	)
	.with_rating(rating)
}

pub fn mock_restaurant(name: &str, rating: f64) -> Offer {
	Offer::new(
		name,
		OfferDetails::Restaurant(RestaurantDetails {
			cuisine: Some("Local".to_string()),
			address: Some(format!("{} Road 2", name)),
			opening_hours: Some("11:00-22:00".to_string()),
			price_level: Some("$$".to_string()),
			phone: None,
			description: None,
		}),
		"mock",
		true,
	)
	.with_rating(rating)
}
