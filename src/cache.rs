//! Cached access token state and its validity window.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Share of the server-reported lifetime during which a cached token is reused.
///
/// The remaining 20% absorbs clock skew and in-flight request latency.
pub const VALIDITY_MARGIN_PERCENT: i32 = 80;

/// Lifecycle of the cached token at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// No exchange has succeeded yet.
	Empty,
	/// A token is cached and may be reused.
	Valid,
	/// A token is cached but its validity window has elapsed.
	Expired,
}

/// The cached token and the instant until which it may be reused.
///
/// The two fields only change together: a successful exchange replaces the whole value.
#[derive(Clone)]
pub struct CachedToken {
	token: Option<TokenSecret>,
	valid_until: OffsetDateTime,
}
impl CachedToken {
	/// Builds the cache entry for a token issued at `issued_at` with the server-reported
	/// `expires_in` lifetime.
	pub fn issued(token: TokenSecret, expires_in: Duration, issued_at: OffsetDateTime) -> Self {
		Self { token: Some(token), valid_until: issued_at + validity_window(expires_in) }
	}

	/// Cached token, if any.
	pub fn token(&self) -> Option<&TokenSecret> {
		self.token.as_ref()
	}

	/// Instant until which the token may be reused.
	pub fn valid_until(&self) -> OffsetDateTime {
		self.valid_until
	}

	/// Computes the lifecycle status at `now`.
	pub fn status_at(&self, now: OffsetDateTime) -> TokenStatus {
		match &self.token {
			None => TokenStatus::Empty,
			Some(token) if token.is_empty() => TokenStatus::Empty,
			Some(_) if now < self.valid_until => TokenStatus::Valid,
			Some(_) => TokenStatus::Expired,
		}
	}

	/// Returns the token when it may be reused at `now`.
	pub fn usable_at(&self, now: OffsetDateTime) -> Option<&TokenSecret> {
		match self.status_at(now) {
			TokenStatus::Valid => self.token.as_ref(),
			TokenStatus::Empty | TokenStatus::Expired => None,
		}
	}
}
impl Default for CachedToken {
	fn default() -> Self {
		Self { token: None, valid_until: OffsetDateTime::UNIX_EPOCH }
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("token", &self.token.as_ref().map(|_| "<redacted>"))
			.field("valid_until", &self.valid_until)
			.finish()
	}
}

/// Reuse window for a token with the server-reported `expires_in` lifetime.
pub fn validity_window(expires_in: Duration) -> Duration {
	expires_in * VALIDITY_MARGIN_PERCENT / 100
}
