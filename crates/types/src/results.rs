//! Terminal output of one logical query

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::offers::{Offer, OfferKind, SourceTier};

/// Ordered, badged offers plus enough metadata for the caller to report a
/// meaningful message when nothing was found
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
	pub request_id: String,
	pub kind: OfferKind,

	/// Offers in rank order, already truncated to the display count
	pub offers: Vec<Offer>,

	/// Raw result count per provider across every attempted tier, including
	/// providers that returned zero
	pub provider_counts: HashMap<String, usize>,

	/// Every cascade tier that ran for this query, in order
	pub tiers_attempted: Vec<SourceTier>,

	/// Set only on the exhausted-all-tiers terminal state
	pub error: Option<String>,
}

impl RankedResult {
	pub fn empty(request_id: impl Into<String>, kind: OfferKind) -> Self {
		Self {
			request_id: request_id.into(),
			kind,
			offers: Vec::new(),
			provider_counts: HashMap::new(),
			tiers_attempted: Vec::new(),
			error: None,
		}
	}

	pub fn with_error(mut self, error: impl Into<String>) -> Self {
		self.error = Some(error.into());
		self
	}

	/// The engine's only visible failure mode
	pub fn is_empty(&self) -> bool {
		self.offers.is_empty()
	}

	/// True when every offer came from live provider data
	pub fn is_authoritative(&self) -> bool {
		!self.offers.is_empty()
			&& self
				.offers
				.iter()
				.all(|o| o.provenance.is_authoritative)
	}

	pub fn best(&self) -> Option<&Offer> {
		self.offers.first()
	}
}
