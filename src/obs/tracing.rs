// self
use crate::{_prelude::*, request::GrantType};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedExchange<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedExchange<F> = F;

/// Span wrapping a single token exchange.
#[derive(Clone, Debug)]
pub struct ExchangeSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ExchangeSpan {
	/// Creates a new span tagged with the grant + stage.
	pub fn new(grant: GrantType, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth2_token_client.exchange", grant = grant.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (grant, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedExchange<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a reused cached token.
pub fn trace_cache_hit(grant: GrantType, valid_until: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(grant = grant.as_str(), %valid_until, "reusing cached access token");

	#[cfg(not(feature = "tracing"))]
	let _ = (grant, valid_until);
}

/// Emits a debug event for a freshly cached token.
pub fn trace_exchange_success(grant: GrantType, valid_until: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(grant = grant.as_str(), %valid_until, "cached new access token");

	#[cfg(not(feature = "tracing"))]
	let _ = (grant, valid_until);
}

/// Emits a warning for a failed exchange; the cache is left untouched.
pub fn trace_exchange_failure(grant: GrantType, error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(grant = grant.as_str(), status = error.status(), %error, "token exchange failed");

	#[cfg(not(feature = "tracing"))]
	let _ = (grant, error);
}
