//! Client-level error taxonomy shared by the exchange, the cache controller, and configuration.

// self
use crate::{_prelude::*, auth::CredentialsError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed cause carried by wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant raised by an exchange leaves the cached token exactly as it was before the
/// attempt.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected while constructing the client.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network failure; no usable response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// A response arrived but the token exchange was unsuccessful.
	#[error("Unsuccessful token exchange.")]
	TokenExchange {
		/// HTTP status code, when one was received.
		status: Option<u16>,
		/// Transport failure that interrupted delivery, if any.
		#[source]
		source: Option<BoxError>,
	},
	/// The success body could not be turned into a token.
	#[error(transparent)]
	ResponseParse(#[from] ResponseParseError),
	/// Any other failure while acquiring a token.
	#[error("Error getting access token.")]
	TokenAcquisition {
		/// Original failure.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps an unexpected failure inside [`Error::TokenAcquisition`].
	pub fn acquisition(src: impl Into<BoxError>) -> Self {
		Self::TokenAcquisition { source: src.into() }
	}

	/// Returns the HTTP status attached to the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::TokenExchange { status, .. } => *status,
			_ => None,
		}
	}
}

/// Configuration failures raised while constructing credentials or transports.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Authorization credentials are incomplete or inconsistent.
	#[error(transparent)]
	Credentials(#[from] CredentialsError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures turning a successful token endpoint body into a token.
#[derive(Debug, ThisError)]
pub enum ResponseParseError {
	/// Body is not JSON or lacks a required field.
	#[error("Token endpoint returned malformed JSON.")]
	Malformed {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// `expires_in` is not an integer.
	#[error("The expires_in value `{value}` is not a valid integer.")]
	InvalidExpiresIn {
		/// Raw value received from the token endpoint.
		value: String,
	},
	/// `expires_in` does not fit the supported range.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// `expires_in` is zero or negative.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// `access_token` is an empty string.
	#[error("Token endpoint returned an empty access token.")]
	EmptyAccessToken,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn acquisition_keeps_original_cause() {
		let err = Error::acquisition(std::io::Error::other("boom"));
		let source = err.source().expect("Acquisition errors must carry a source.");

		assert_eq!(err.to_string(), "Error getting access token.");
		assert_eq!(source.to_string(), "boom");
	}

	#[test]
	fn token_exchange_exposes_status() {
		let err = Error::TokenExchange { status: Some(503), source: None };

		assert_eq!(err.status(), Some(503));
		assert_eq!(err.to_string(), "Unsuccessful token exchange.");
		assert!(err.source().is_none());
		assert_eq!(Error::from(ResponseParseError::EmptyAccessToken).status(), None);
	}
}
