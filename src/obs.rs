//! Optional observability helpers for token acquisition.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap every exchange in a span named `oauth2_token_client.exchange`
//!   with the `grant` and `stage` fields, and to emit events for cache hits and exchange
//!   outcomes. Secrets are never recorded.
//! - Enable `metrics` to increment the `oauth2_token_client_exchange_total` counter for every
//!   cache hit/attempt/success/failure, labeled by `grant` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each `get_access_token` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeOutcome {
	/// The cached token was reused without network I/O.
	CacheHit,
	/// An exchange against the authorization service started.
	Attempt,
	/// The exchange produced a new token.
	Success,
	/// The exchange failed and the error was returned to the caller.
	Failure,
}
impl ExchangeOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeOutcome::CacheHit => "cache_hit",
			ExchangeOutcome::Attempt => "attempt",
			ExchangeOutcome::Success => "success",
			ExchangeOutcome::Failure => "failure",
		}
	}
}
impl Display for ExchangeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
