//! Aggregation engine
//!
//! The pipeline for one logical query: fan out to a tier's providers, merge
//! duplicates across them, rank and badge the survivors, and fall through the
//! tier cascade until something answers. The batch enrichment scheduler reuses
//! the same cascade for itinerary lookups.

pub mod cascade;
pub mod enrich;
pub mod fanout;
pub mod merge;
pub mod rank;

pub use cascade::{TierPlan, TripEngine};
pub use enrich::{MEAL_BATCH_SIZE, PLACE_BATCH_SIZE};
pub use fanout::{fan_out, FanOutOutcome};
pub use merge::merge;
pub use rank::{display_count, rank, weights_for, RankWeights};
