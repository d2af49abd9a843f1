//! Token cache and refresh controller.
//!
//! [`TokenClient::get_access_token`] returns the cached access token while it is inside its
//! validity window (80% of the lifetime reported by the authorization service) and performs a
//! token exchange otherwise, or whenever the caller forces one. The cache is a single
//! lock-guarded [`CachedToken`] replaced wholesale after a successful exchange, so concurrent
//! callers never observe a token paired with another token's expiry. Failed exchanges leave
//! the cache untouched.
//!
//! Concurrent callers that find the cache expired may each run their own exchange; the last
//! successful response applied wins.

mod metrics;

pub use metrics::ExchangeMetrics;

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCredentials, TokenSecret},
	cache::CachedToken,
	clock::{Clock, SystemClock},
	exchange::{self, TransportErrorMapper},
	http::TokenHttpClient,
	obs::{self, ExchangeOutcome, ExchangeSpan},
	request::GrantType,
};
#[cfg(feature = "reqwest")]
use crate::{
	auth::CredentialsConfig, exchange::ReqwestTransportErrorMapper, http::ReqwestHttpClient,
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestTokenClient = TokenClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Acquires, caches, and refreshes access tokens for one set of credentials.
///
/// Clones share the same cache, transport, and counters.
pub struct TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	credentials: Arc<AuthorizationCredentials>,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	clock: Arc<dyn Clock>,
	metrics: Arc<ExchangeMetrics>,
	cache: Arc<RwLock<CachedToken>>,
}
impl<C, M> TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		credentials: AuthorizationCredentials,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			credentials: Arc::new(credentials),
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			clock: Arc::new(SystemClock),
			metrics: Default::default(),
			cache: Default::default(),
		}
	}

	/// Replaces the time source used to stamp and check cached tokens.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Credentials used for every exchange. Read-only.
	pub fn credentials(&self) -> &AuthorizationCredentials {
		&self.credentials
	}

	/// Per-client acquisition counters.
	pub fn metrics(&self) -> &ExchangeMetrics {
		&self.metrics
	}

	/// Consistent snapshot of the cached token and its validity instant.
	pub fn cached_token(&self) -> CachedToken {
		self.cache.read().clone()
	}

	/// Returns the cached token if still valid, otherwise exchanges credentials for a new one.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		self.get_access_token(false).await
	}

	/// Exchanges credentials for a new token even if the cached one is still valid.
	///
	/// On failure the previously cached token stays available to non-forced calls.
	pub async fn force_refresh(&self) -> Result<TokenSecret> {
		self.get_access_token(true).await
	}

	/// Returns an access token, performing a token exchange when the cache is empty, expired,
	/// or `force` is set.
	pub async fn get_access_token(&self, force: bool) -> Result<TokenSecret> {
		let grant = GrantType::from(&self.credentials.grant);

		if !force {
			if let Some(token) = self.cached_at(grant, self.clock.now()) {
				return Ok(token);
			}
		}

		let span = ExchangeSpan::new(grant, "get_access_token");

		obs::record_exchange_outcome(grant, ExchangeOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span
			.instrument(async move {
				let issued = exchange::exchange(
					self.credentials.as_ref(),
					self.http_client.as_ref(),
					self.transport_mapper.as_ref(),
				)
				.await?;
				let cached = CachedToken::issued(
					issued.access_token.clone(),
					issued.expires_in,
					self.clock.now(),
				);
				let valid_until = cached.valid_until();

				*self.cache.write() = cached;

				obs::trace_exchange_success(grant, valid_until);

				Ok(issued.access_token)
			})
			.await;

		match &result {
			Ok(_) => {
				self.metrics.record_success();
				obs::record_exchange_outcome(grant, ExchangeOutcome::Success);
			},
			Err(err) => {
				self.metrics.record_failure();
				obs::record_exchange_outcome(grant, ExchangeOutcome::Failure);
				obs::trace_exchange_failure(grant, err);
			},
		}

		result
	}

	fn cached_at(&self, grant: GrantType, now: OffsetDateTime) -> Option<TokenSecret> {
		let cache = self.cache.read();
		let token = cache.usable_at(now)?.clone();

		self.metrics.record_cache_hit();
		obs::record_exchange_outcome(grant, ExchangeOutcome::CacheHit);
		obs::trace_cache_hit(grant, cache.valid_until());

		Some(token)
	}
}
impl<C, M> Clone for TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			credentials: self.credentials.clone(),
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			clock: self.clock.clone(),
			metrics: self.metrics.clone(),
			cache: self.cache.clone(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl TokenClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by a reqwest transport that does not follow redirects.
	pub fn new(credentials: AuthorizationCredentials) -> Result<Self> {
		let http_client = ReqwestHttpClient::try_new()?;

		Ok(Self::with_http_client(credentials, http_client, ReqwestTransportErrorMapper))
	}

	/// Validates a deserialized configuration and creates a reqwest-backed client for it.
	pub fn from_config(config: CredentialsConfig) -> Result<Self> {
		Self::new(AuthorizationCredentials::try_from(config)?)
	}
}
impl<C, M> Debug for TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenClient")
			.field("credentials", &self.credentials)
			.field("cache", &*self.cache.read())
			.finish()
	}
}
