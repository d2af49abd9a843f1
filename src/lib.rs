//! Cached OAuth 2.0 access-token client: exchange a refresh token (or client credentials) for
//! short-lived bearer tokens, reuse each token for 80% of its reported lifetime, and refresh it
//! on demand from any number of concurrent callers.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod clock;
pub mod error;
pub mod exchange;
pub mod http;
pub mod obs;
pub mod request;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::AuthorizationCredentials,
		client::{ReqwestTokenClient, TokenClient},
		clock::{Clock, ManualClock},
		exchange::ReqwestTransportErrorMapper,
		http::ReqwestHttpClient,
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`TokenClient`] backed by the test reqwest transport and a [`ManualClock`]
	/// starting at the current instant.
	pub fn build_reqwest_test_client(
		credentials: AuthorizationCredentials,
	) -> (ReqwestTokenClient, Arc<ManualClock>) {
		let clock = Arc::new(ManualClock::new(OffsetDateTime::now_utc()));
		let shared: Arc<dyn Clock> = clock.clone();
		let client = TokenClient::with_http_client(
			credentials,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.with_clock(shared);

		(client, clock)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
