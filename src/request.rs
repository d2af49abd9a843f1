//! Token-exchange request payloads.
//!
//! [`build`] turns stored [`AuthorizationCredentials`] into the exact JSON body posted to the
//! authorization service. It is a pure function: no I/O, no validation, and a fresh value for
//! every exchange.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCredentials, GrantCredential},
};

/// OAuth 2.0 grant types the client can present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Refresh Token grant.
	RefreshToken,
	/// Client Credentials grant for scoped, user-less tokens.
	ClientCredentials,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::RefreshToken => "refresh_token",
			GrantType::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<&GrantCredential> for GrantType {
	fn from(grant: &GrantCredential) -> Self {
		match grant {
			GrantCredential::RefreshToken(_) => Self::RefreshToken,
			GrantCredential::ClientCredentials(_) => Self::ClientCredentials,
		}
	}
}

/// Body of a single token-exchange request.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TokenRequestMeta {
	/// Grant being exchanged.
	pub grant_type: GrantType,
	/// Refresh token, present for [`GrantType::RefreshToken`].
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: String,
	/// Space-delimited scopes, present for [`GrantType::ClientCredentials`].
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
}
impl TokenRequestMeta {
	/// Serializes the payload into the JSON request body.
	pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
		serde_json::to_vec(self)
	}
}
impl From<&AuthorizationCredentials> for TokenRequestMeta {
	fn from(credentials: &AuthorizationCredentials) -> Self {
		build(credentials)
	}
}
impl Debug for TokenRequestMeta {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRequestMeta")
			.field("grant_type", &self.grant_type)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("scope", &self.scope)
			.finish()
	}
}

/// Builds the request payload for the grant configured in `credentials`.
pub fn build(credentials: &AuthorizationCredentials) -> TokenRequestMeta {
	let (refresh_token, scope) = match &credentials.grant {
		GrantCredential::RefreshToken(secret) => (Some(secret.expose().to_owned()), None),
		GrantCredential::ClientCredentials(scopes) => (None, Some(scopes.normalized())),
	};

	TokenRequestMeta {
		grant_type: GrantType::from(&credentials.grant),
		refresh_token,
		client_id: credentials.client_id.clone(),
		client_secret: credentials.client_secret.expose().to_owned(),
		scope,
	}
}
