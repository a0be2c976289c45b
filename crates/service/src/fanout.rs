//! Concurrent provider fan-out
//!
//! One logical query goes to every applicable adapter at once. Each call runs
//! on its own task under its own deadline; a provider that fails, times out or
//! panics contributes zero offers and a logged warning, never an error. The
//! union is handed to the merger only after every call has settled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use roam_types::{Offer, ProviderAdapter, Query};

/// Union of one tier's provider responses
#[derive(Debug, Default)]
pub struct FanOutOutcome {
	pub offers: Vec<Offer>,

	/// Raw result count per attempted provider, zero entries included
	pub provider_counts: HashMap<String, usize>,
}

/// Query every adapter that supports the query's kind and collect the union
pub async fn fan_out(adapters: &[Arc<dyn ProviderAdapter>], query: &Query) -> FanOutOutcome {
	let applicable: Vec<Arc<dyn ProviderAdapter>> = adapters
		.iter()
		.filter(|a| a.supports(query.kind))
		.cloned()
		.collect();

	debug!(
		request_id = %query.request_id,
		providers = applicable.len(),
		kind = ?query.kind,
		"fanning out query"
	);

	// Provider ids are captured before spawning so a panicked task can still
	// be attributed and counted
	let tasks: Vec<_> = applicable
		.into_iter()
		.map(|adapter| {
			let query = query.clone();
			let provider_id = adapter.id().to_string();
			let task_id = provider_id.clone();
			let handle = tokio::spawn(async move {
				let provider_id = task_id;
				let timeout_ms = adapter.info().timeout_ms;

				let outcome = tokio::time::timeout(
					Duration::from_millis(timeout_ms),
					adapter.fetch(&query),
				)
				.await;

				match outcome {
					Ok(Ok(offers)) => offers,
					Ok(Err(e)) => {
						warn!(
							request_id = %query.request_id,
							provider = %provider_id,
							error = %e,
							"provider call failed"
						);
						Vec::new()
					},
					Err(_) => {
						warn!(
							request_id = %query.request_id,
							provider = %provider_id,
							timeout_ms,
							"provider call timed out"
						);
						Vec::new()
					},
				}
			});
			(provider_id, handle)
		})
		.collect();

	let (ids, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();

	let mut outcome = FanOutOutcome::default();
	for (provider_id, settled) in ids.into_iter().zip(join_all(handles).await) {
		match settled {
			Ok(offers) => {
				outcome.provider_counts.insert(provider_id, offers.len());
				outcome.offers.extend(offers);
			},
			Err(e) => {
				warn!(
					request_id = %query.request_id,
					provider = %provider_id,
					error = %e,
					"provider task panicked"
				);
				outcome.provider_counts.insert(provider_id, 0);
			},
		}
	}

	outcome
}
