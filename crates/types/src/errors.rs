//! Error taxonomy for the aggregation engine
//!
//! Provider-level and parse-level errors never cross the engine boundary as
//! errors; the fan-out controller converts every [`AdapterError`] into "zero
//! offers, logged warning". [`EngineError`] is reserved for programmer errors
//! surfaced at startup.

use thiserror::Error;

use crate::offers::OfferKind;

/// Errors an adapter can produce while talking to its provider
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatus { status_code: u16, reason: String },

	#[error("timed out after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("malformed provider response: {reason}")]
	MalformedResponse { reason: String },

	#[error("missing credentials for provider {provider}")]
	MissingCredentials { provider: String },

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl AdapterError {
	/// Build an HTTP failure from a non-2xx status with a stock reason
	pub fn from_status(status_code: u16) -> Self {
		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			408 => "Request Timeout".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			504 => "Gateway Timeout".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		Self::HttpStatus {
			status_code,
			reason,
		}
	}

	pub fn malformed(reason: impl Into<String>) -> Self {
		Self::MalformedResponse {
			reason: reason.into(),
		}
	}
}

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Programmer/configuration errors; fail fast at startup, never per-request
#[derive(Error, Debug)]
pub enum EngineError {
	#[error("generative output could not be parsed: {reason}")]
	GenerativeParseFailure { reason: String },

	#[error("no providers configured for offer kind {kind:?}")]
	NoProvidersConfigured { kind: OfferKind },

	#[error("provider '{provider_id}' references unknown adapter '{adapter_id}'")]
	UnknownAdapter {
		provider_id: String,
		adapter_id: String,
	},

	#[error("invalid provider configuration: {reason}")]
	InvalidProviderConfig { reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_status_maps_stock_reasons() {
		let err = AdapterError::from_status(429);
		assert!(err.to_string().contains("429"));
		assert!(err.to_string().contains("Too Many Requests"));

		let err = AdapterError::from_status(418);
		assert!(err.to_string().contains("HTTP Error 418"));
	}
}
