//! Immutable authorization credentials plus their builder and configuration form.
//!
//! Credentials pair a client identity with exactly one grant credential: a long-lived
//! refresh token (the default flow) or a scope set for the client-credentials exchange.
//! They are supplied once when constructing a [`TokenClient`](crate::client::TokenClient)
//! and never mutated afterwards.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, ScopeValidationError, TokenSecret},
	error::ConfigError,
};

/// Errors raised while assembling [`AuthorizationCredentials`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialsError {
	/// Client identifier was not supplied.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// Client secret was not supplied.
	#[error("Missing client secret.")]
	MissingClientSecret,
	/// Neither a refresh token nor scopes were supplied.
	#[error("Credentials must provide either a refresh token or scopes.")]
	MissingGrant,
	/// Both a refresh token and scopes were supplied.
	#[error("Credentials cannot provide both a refresh token and scopes.")]
	ConflictingGrants,
	/// Token endpoint was not supplied.
	#[error("Missing token endpoint.")]
	MissingEndpoint,
	/// Configured scopes are invalid.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] ScopeValidationError),
}

/// Grant credential presented to the authorization service.
#[derive(Clone, PartialEq, Eq)]
pub enum GrantCredential {
	/// Exchange a long-lived refresh token for an access token.
	RefreshToken(TokenSecret),
	/// Exchange the client identity alone for a token limited to the given scopes.
	ClientCredentials(ScopeSet),
}
impl Debug for GrantCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::RefreshToken(_) => f.debug_tuple("RefreshToken").field(&"<redacted>").finish(),
			Self::ClientCredentials(scopes) =>
				f.debug_tuple("ClientCredentials").field(scopes).finish(),
		}
	}
}

/// Credentials used for every token exchange performed by one client.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CredentialsConfig")]
pub struct AuthorizationCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: TokenSecret,
	/// Grant credential exchanged for access tokens.
	pub grant: GrantCredential,
	/// Token-exchange endpoint of the authorization service.
	pub endpoint: Url,
}
impl AuthorizationCredentials {
	/// Creates refresh-token credentials.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
		endpoint: Url,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			grant: GrantCredential::RefreshToken(refresh_token.into()),
			endpoint,
		}
	}

	/// Creates client-credentials credentials limited to `scopes`.
	pub fn client_credentials(
		client_id: impl Into<String>,
		client_secret: impl Into<TokenSecret>,
		scopes: ScopeSet,
		endpoint: Url,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			grant: GrantCredential::ClientCredentials(scopes),
			endpoint,
		}
	}

	/// Returns a builder for assembling credentials field by field.
	pub fn builder() -> AuthorizationCredentialsBuilder {
		AuthorizationCredentialsBuilder::default()
	}

	/// Returns the refresh token, when the refresh-token grant is configured.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		match &self.grant {
			GrantCredential::RefreshToken(secret) => Some(secret),
			GrantCredential::ClientCredentials(_) => None,
		}
	}

	/// Returns the scopes, when the client-credentials grant is configured.
	pub fn scopes(&self) -> Option<&ScopeSet> {
		match &self.grant {
			GrantCredential::ClientCredentials(scopes) => Some(scopes),
			GrantCredential::RefreshToken(_) => None,
		}
	}
}
impl Debug for AuthorizationCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("grant", &self.grant)
			.field("endpoint", &self.endpoint.as_str())
			.finish()
	}
}
impl TryFrom<CredentialsConfig> for AuthorizationCredentials {
	type Error = ConfigError;

	fn try_from(config: CredentialsConfig) -> Result<Self, Self::Error> {
		let mut builder = Self::builder()
			.client_id(config.client_id)
			.client_secret(config.client_secret)
			.endpoint(config.endpoint);

		if let Some(refresh) = config.refresh_token {
			builder = builder.refresh_token(refresh);
		}
		if let Some(scopes) = config.scopes {
			builder = builder.scopes(scopes)?;
		}

		Ok(builder.build()?)
	}
}

/// Serialized configuration form of [`AuthorizationCredentials`].
///
/// Exactly one of `refresh_token` or `scopes` must be present.
#[derive(Clone, Debug, Deserialize)]
pub struct CredentialsConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: TokenSecret,
	/// Refresh token for the refresh-token grant.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Scopes for the client-credentials grant.
	#[serde(default)]
	pub scopes: Option<Vec<String>>,
	/// Token-exchange endpoint.
	pub endpoint: Url,
}

/// Builder for [`AuthorizationCredentials`].
#[derive(Debug, Default)]
pub struct AuthorizationCredentialsBuilder {
	client_id: Option<String>,
	client_secret: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	scopes: Option<ScopeSet>,
	endpoint: Option<Url>,
}
impl AuthorizationCredentialsBuilder {
	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<TokenSecret>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Selects the refresh-token grant.
	pub fn refresh_token(mut self, refresh_token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Selects the client-credentials grant limited to `scopes`.
	pub fn scopes<I, S>(mut self, scopes: I) -> Result<Self, CredentialsError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = Some(ScopeSet::new(scopes)?);

		Ok(self)
	}

	/// Sets the token-exchange endpoint.
	pub fn endpoint(mut self, endpoint: Url) -> Self {
		self.endpoint = Some(endpoint);

		self
	}

	/// Consumes the builder and checks that every required field is present.
	pub fn build(self) -> Result<AuthorizationCredentials, CredentialsError> {
		let client_id = self.client_id.ok_or(CredentialsError::MissingClientId)?;
		let client_secret = self.client_secret.ok_or(CredentialsError::MissingClientSecret)?;
		let endpoint = self.endpoint.ok_or(CredentialsError::MissingEndpoint)?;
		let grant = match (self.refresh_token, self.scopes) {
			(Some(refresh), None) => GrantCredential::RefreshToken(refresh),
			(None, Some(scopes)) => GrantCredential::ClientCredentials(scopes),
			(Some(_), Some(_)) => return Err(CredentialsError::ConflictingGrants),
			(None, None) => return Err(CredentialsError::MissingGrant),
		};

		Ok(AuthorizationCredentials { client_id, client_secret, grant, endpoint })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn endpoint() -> Url {
		Url::parse("https://api.example.com/auth/o2/token").expect("Fixture URL should parse.")
	}

	#[test]
	fn builder_requires_every_field() {
		let err = AuthorizationCredentials::builder()
			.client_secret("secret")
			.refresh_token("refresh")
			.endpoint(endpoint())
			.build()
			.expect_err("Missing client id must be rejected.");

		assert_eq!(err, CredentialsError::MissingClientId);

		let err = AuthorizationCredentials::builder()
			.client_id("client")
			.client_secret("secret")
			.endpoint(endpoint())
			.build()
			.expect_err("Missing grant must be rejected.");

		assert_eq!(err, CredentialsError::MissingGrant);

		let err = AuthorizationCredentials::builder()
			.client_id("client")
			.client_secret("secret")
			.refresh_token("refresh")
			.build()
			.expect_err("Missing endpoint must be rejected.");

		assert_eq!(err, CredentialsError::MissingEndpoint);
	}

	#[test]
	fn builder_rejects_conflicting_grants() {
		let err = AuthorizationCredentials::builder()
			.client_id("client")
			.client_secret("secret")
			.refresh_token("refresh")
			.scopes(["sellingpartnerapi::notifications"])
			.expect("Scope fixture should be valid.")
			.endpoint(endpoint())
			.build()
			.expect_err("Refresh token and scopes are mutually exclusive.");

		assert_eq!(err, CredentialsError::ConflictingGrants);
	}

	#[test]
	fn config_deserializes_refresh_token_credentials() {
		let credentials: AuthorizationCredentials = serde_json::from_str(
			r#"{
				"client_id": "amzn1.application-oa2-client.1",
				"client_secret": "secret",
				"refresh_token": "Atzr|refresh",
				"endpoint": "https://api.example.com/auth/o2/token"
			}"#,
		)
		.expect("Refresh-token configuration should deserialize.");

		assert_eq!(credentials.client_id, "amzn1.application-oa2-client.1");
		assert_eq!(credentials.refresh_token().map(TokenSecret::expose), Some("Atzr|refresh"));
		assert!(credentials.scopes().is_none());
		assert_eq!(credentials.endpoint, endpoint());
	}

	#[test]
	fn config_deserializes_client_credentials() {
		let credentials: AuthorizationCredentials = serde_json::from_str(
			r#"{
				"client_id": "client",
				"client_secret": "secret",
				"scopes": ["sellingpartnerapi::notifications"],
				"endpoint": "https://api.example.com/auth/o2/token"
			}"#,
		)
		.expect("Client-credentials configuration should deserialize.");
		let scopes = credentials.scopes().expect("Scopes should be configured.");

		assert!(scopes.contains("sellingpartnerapi::notifications"));
		assert!(credentials.refresh_token().is_none());
	}

	#[test]
	fn config_errors_surface_as_configuration_failures() {
		let config = CredentialsConfig {
			client_id: "client".into(),
			client_secret: TokenSecret::new("secret"),
			refresh_token: Some(TokenSecret::new("refresh")),
			scopes: Some(vec!["sellingpartnerapi::notifications".into()]),
			endpoint: endpoint(),
		};
		let err = AuthorizationCredentials::try_from(config)
			.expect_err("Refresh token and scopes are mutually exclusive.");

		assert!(matches!(err, ConfigError::Credentials(CredentialsError::ConflictingGrants)));

		let config = CredentialsConfig {
			client_id: "client".into(),
			client_secret: TokenSecret::new("secret"),
			refresh_token: None,
			scopes: Some(vec!["has space".into()]),
			endpoint: endpoint(),
		};
		let err = AuthorizationCredentials::try_from(config)
			.expect_err("Whitespace inside a scope must be rejected.");

		assert!(matches!(err, ConfigError::Credentials(CredentialsError::InvalidScope(_))));
	}

	#[test]
	fn config_rejects_missing_grant() {
		let result = serde_json::from_str::<AuthorizationCredentials>(
			r#"{
				"client_id": "client",
				"client_secret": "secret",
				"endpoint": "https://api.example.com/auth/o2/token"
			}"#,
		);

		assert!(result.is_err());
	}

	#[test]
	fn debug_redacts_secrets() {
		let credentials =
			AuthorizationCredentials::new("client", "client-secret", "refresh-secret", endpoint());
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("client"));
		assert!(!rendered.contains("client-secret"));
		assert!(!rendered.contains("refresh-secret"));
	}
}
