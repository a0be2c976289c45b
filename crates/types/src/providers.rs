//! Provider adapter contract
//!
//! One adapter per external data source. An adapter knows that source's
//! request/response shape only: it translates a [`Query`] into the provider's
//! request, parses the response into canonical [`Offer`]s, and silently skips
//! records missing mandatory fields. Network errors, non-2xx responses and
//! malformed payloads surface as [`AdapterError`]s; the fan-out controller is
//! the layer that downgrades those to empty results.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AdapterResult;
use crate::offers::{Offer, OfferKind};
use crate::queries::Query;

/// Static description of a provider adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
	pub provider_id: String,
	pub name: String,

	/// Offer kinds this adapter can serve
	pub kinds: Vec<OfferKind>,

	/// False for generated/estimated data sources
	pub is_authoritative: bool,

	/// Promoted provider, earns the preference bonus during ranking
	pub preferred: bool,

	/// Hard cap on raw candidates returned per query
	pub max_results: usize,

	/// Per-call timeout applied by the fan-out controller
	pub timeout_ms: u64,
}

impl ProviderInfo {
	pub fn new(provider_id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			provider_id: provider_id.into(),
			name: name.into(),
			kinds: Vec::new(),
			is_authoritative: true,
			preferred: false,
			max_results: 20,
			timeout_ms: 30_000,
		}
	}

	pub fn with_kinds(mut self, kinds: Vec<OfferKind>) -> Self {
		self.kinds = kinds;
		self
	}

	pub fn with_max_results(mut self, max_results: usize) -> Self {
		self.max_results = max_results;
		self
	}

	pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.timeout_ms = timeout_ms;
		self
	}

	pub fn preferred(mut self) -> Self {
		self.preferred = true;
		self
	}

	pub fn non_authoritative(mut self) -> Self {
		self.is_authoritative = false;
		self
	}
}

/// Core trait for provider adapter implementations
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
	/// Static adapter metadata; the only required accessor
	fn info(&self) -> &ProviderInfo;

	fn id(&self) -> &str {
		&self.info().provider_id
	}

	fn supports(&self, kind: OfferKind) -> bool {
		self.info().kinds.contains(&kind)
	}

	/// Fetch zero or more canonical offers for the query
	///
	/// Implementations perform network I/O only and share no mutable state
	/// between invocations. Records missing mandatory fields are skipped,
	/// not treated as errors.
	async fn fetch(&self, query: &Query) -> AdapterResult<Vec<Offer>>;
}
