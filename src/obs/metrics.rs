// self
use crate::{obs::ExchangeOutcome, request::GrantType};

/// Records an exchange outcome via the global metrics recorder (when enabled).
pub fn record_exchange_outcome(grant: GrantType, outcome: ExchangeOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_token_client_exchange_total",
			"grant" => grant.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (grant, outcome);
	}
}
