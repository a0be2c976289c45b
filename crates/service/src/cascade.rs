//! Fallback cascade and engine surface
//!
//! Providers are arranged in tiers: primary inventory, secondary inventory,
//! and the generative last resort. Each tier only runs when every tier before
//! it produced nothing; the first tier with offers wins and stamps its name
//! on them. Exhausting all tiers is not an error, it is an empty result that
//! says what was tried.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use roam_types::{
	AdapterError, EngineError, Offer, ProviderAdapter, Query, RankedResult, SourceTier,
};

use crate::fanout::fan_out;
use crate::merge::merge;
use crate::rank::rank;

/// Adapters grouped by cascade tier
#[derive(Debug, Default)]
pub struct TierPlan {
	pub primary: Vec<Arc<dyn ProviderAdapter>>,
	pub secondary: Vec<Arc<dyn ProviderAdapter>>,
	pub generative: Option<Arc<dyn ProviderAdapter>>,
}

/// The aggregation engine: stateless between calls, cheap to share
#[derive(Debug)]
pub struct TripEngine {
	plan: TierPlan,
	preferred_providers: HashSet<String>,
	pub(crate) place_batch_size: usize,
	pub(crate) meal_batch_size: usize,
}

impl TripEngine {
	pub fn new(plan: TierPlan) -> Self {
		let preferred_providers = plan
			.primary
			.iter()
			.chain(plan.secondary.iter())
			.filter(|a| a.info().preferred)
			.map(|a| a.id().to_string())
			.collect();
		Self {
			plan,
			preferred_providers,
			place_batch_size: crate::enrich::PLACE_BATCH_SIZE,
			meal_batch_size: crate::enrich::MEAL_BATCH_SIZE,
		}
	}

	pub fn with_batch_sizes(mut self, place: usize, meal: usize) -> Self {
		self.place_batch_size = place.max(1);
		self.meal_batch_size = meal.max(1);
		self
	}

	/// Run one logical query through the cascade
	pub async fn search(&self, query: &Query) -> RankedResult {
		let mut result = RankedResult::empty(&query.request_id, query.kind);

		let inventory_tiers = [
			(SourceTier::Primary, &self.plan.primary),
			(SourceTier::Secondary, &self.plan.secondary),
		];

		for (tier, adapters) in inventory_tiers {
			if !adapters.iter().any(|a| a.supports(query.kind)) {
				continue;
			}

			result.tiers_attempted.push(tier);
			let outcome = fan_out(adapters, query).await;
			result.provider_counts.extend(outcome.provider_counts);

			let merged = merge(outcome.offers);
			if !merged.is_empty() {
				info!(
					request_id = %query.request_id,
					tier = %tier,
					candidates = merged.len(),
					"tier produced offers"
				);
				result.offers = self.finish(merged, query, tier);
				return result;
			}
		}

		self.generative_pass(query, result).await
	}

	/// Last resort: one direct call to the generative adapter
	async fn generative_pass(&self, query: &Query, mut result: RankedResult) -> RankedResult {
		let adapter = match &self.plan.generative {
			Some(a) if a.supports(query.kind) => a,
			_ => return result.with_error("no provider produced offers"),
		};

		result.tiers_attempted.push(SourceTier::Generative);
		let timeout = Duration::from_millis(adapter.info().timeout_ms);

		let offers = match tokio::time::timeout(timeout, adapter.fetch(query)).await {
			Ok(Ok(offers)) => offers,
			Ok(Err(e)) => {
				warn!(request_id = %query.request_id, error = %e, "generative call failed");
				// Unparseable generative output is its own failure class so
				// callers can tell a broken prompt from a dead upstream
				let annotation = match &e {
					AdapterError::MalformedResponse { .. } | AdapterError::Serialization(_) => {
						EngineError::GenerativeParseFailure {
							reason: e.to_string(),
						}
						.to_string()
					},
					_ => format!("generative fallback failed: {}", e),
				};
				return result.with_error(annotation);
			},
			Err(_) => {
				warn!(request_id = %query.request_id, "generative call timed out");
				return result.with_error("generative fallback timed out");
			},
		};

		result
			.provider_counts
			.insert(adapter.id().to_string(), offers.len());

		if offers.is_empty() {
			return result.with_error("no provider produced offers, generative output empty");
		}

		let merged = merge(offers);
		result.offers = self.finish(merged, query, SourceTier::Generative);
		result
	}

	/// Stamp the winning tier and rank
	fn finish(&self, mut offers: Vec<Offer>, query: &Query, tier: SourceTier) -> Vec<Offer> {
		for offer in &mut offers {
			offer.provenance.tier = tier;
			if tier == SourceTier::Generative {
				offer.provenance.is_authoritative = false;
			}
		}
		rank(offers, query.kind, query.budget, &self.preferred_providers)
	}
}
