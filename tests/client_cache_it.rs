#![cfg(all(feature = "test", feature = "reqwest"))]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use oauth2_token_client::{
	_preludet::*,
	auth::{AuthorizationCredentials, ScopeSet},
	cache::TokenStatus,
	clock::Clock,
	exchange::JSON_MEDIA_TYPE,
};

const CLIENT_ID: &str = "amzn1.application-oa2-client.cache";
const CLIENT_SECRET: &str = "secret-cache";
const REFRESH_TOKEN: &str = "Atzr|refresh-cache";

fn credentials(server: &MockServer) -> AuthorizationCredentials {
	AuthorizationCredentials::new(
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
		Url::parse(&server.url("/auth/o2/token")).expect("Mock token endpoint should parse."),
	)
}

#[tokio::test]
async fn cached_token_is_reused_inside_validity_window() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/o2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc\",\"token_type\":\"bearer\",\"expires_in\":3600}");
		})
		.await;
	let (client, clock) = build_reqwest_test_client(credentials(&server));
	let issued_at = clock.now();
	let token = client.get_access_token(false).await.expect("Initial exchange should succeed.");

	assert_eq!(token.expose(), "abc");
	assert_eq!(client.cached_token().valid_until(), issued_at + Duration::seconds(2_880));

	clock.advance(Duration::seconds(2_000));

	let reused = client.get_access_token(false).await.expect("Cached token should be reused.");

	assert_eq!(reused.expose(), "abc");

	mock.assert_calls_async(1).await;

	assert_eq!(client.metrics().cache_hits(), 1);
	assert_eq!(client.metrics().attempts(), 1);
}

#[tokio::test]
async fn expired_token_is_exchanged_again() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/o2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc\",\"expires_in\":3600}");
		})
		.await;
	let (client, clock) = build_reqwest_test_client(credentials(&server));

	client.access_token().await.expect("Initial exchange should succeed.");
	clock.advance(Duration::seconds(3_000));

	assert_eq!(client.cached_token().status_at(clock.now()), TokenStatus::Expired);

	let refreshed = client.access_token().await.expect("Expired token should be refreshed.");

	assert_eq!(refreshed.expose(), "abc");
	assert_eq!(client.cached_token().status_at(clock.now()), TokenStatus::Valid);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn forced_refresh_always_exchanges() {
	let server = MockServer::start_async().await;
	let first = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/o2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc\",\"expires_in\":3600}");
		})
		.await;
	let (client, clock) = build_reqwest_test_client(credentials(&server));

	client.access_token().await.expect("Initial exchange should succeed.");
	first.assert_calls_async(1).await;
	first.delete_async().await;

	let second = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/o2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"def\",\"expires_in\":600}");
		})
		.await;

	clock.advance(Duration::seconds(5));

	let forced = client.get_access_token(true).await.expect("Forced exchange should succeed.");

	assert_eq!(forced.expose(), "def");
	assert_eq!(client.cached_token().valid_until(), clock.now() + Duration::seconds(480));

	second.assert_calls_async(1).await;
}

#[tokio::test]
async fn refresh_request_posts_json_credentials() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/o2/token")
				.header("content-type", JSON_MEDIA_TYPE)
				.json_body(json!({
					"grant_type": "refresh_token",
					"refresh_token": REFRESH_TOKEN,
					"client_id": CLIENT_ID,
					"client_secret": CLIENT_SECRET,
				}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"shaped\",\"expires_in\":3600}");
		})
		.await;
	let (client, _) = build_reqwest_test_client(credentials(&server));
	let token = client.access_token().await.expect("Well-formed request should be accepted.");

	assert_eq!(token.expose(), "shaped");

	mock.assert_async().await;
}

#[tokio::test]
async fn client_credentials_request_posts_scope() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/o2/token").json_body(json!({
				"grant_type": "client_credentials",
				"client_id": CLIENT_ID,
				"client_secret": CLIENT_SECRET,
				"scope": "sellingpartnerapi::migration sellingpartnerapi::notifications",
			}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"grantless\",\"expires_in\":\"3600\"}");
		})
		.await;
	let scopes =
		ScopeSet::new(["sellingpartnerapi::notifications", "sellingpartnerapi::migration"])
			.expect("Scope fixture should be valid.");
	let credentials = AuthorizationCredentials::client_credentials(
		CLIENT_ID,
		CLIENT_SECRET,
		scopes,
		Url::parse(&server.url("/auth/o2/token")).expect("Mock token endpoint should parse."),
	);
	let (client, _) = build_reqwest_test_client(credentials);
	let token = client.access_token().await.expect("Client-credentials exchange should succeed.");

	assert_eq!(token.expose(), "grantless");

	mock.assert_async().await;
}

#[tokio::test]
async fn endpoint_query_is_not_forwarded() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/o2/token").query_param_missing("region");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"pathonly\",\"expires_in\":3600}");
		})
		.await;
	let credentials = AuthorizationCredentials::new(
		CLIENT_ID,
		CLIENT_SECRET,
		REFRESH_TOKEN,
		Url::parse(&server.url("/auth/o2/token?region=eu")).expect("Mock endpoint should parse."),
	);
	let (client, _) = build_reqwest_test_client(credentials);

	assert_eq!(
		client.access_token().await.expect("Exchange should succeed.").expose(),
		"pathonly"
	);

	mock.assert_async().await;
}
