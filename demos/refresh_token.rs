//! Demonstrates exchanging a refresh token with the default reqwest transport and reusing the
//! cached access token for subsequent calls.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use oauth2_token_client::{
	auth::AuthorizationCredentials, client::TokenClient, exchange::ReqwestTransportErrorMapper,
	http::ReqwestHttpClient, reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/o2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"Atza|demo-access\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let credentials = AuthorizationCredentials::builder()
		.client_id("amzn1.application-oa2-client.demo")
		.client_secret("demo-secret")
		.refresh_token("Atzr|demo-refresh")
		.endpoint(Url::parse(&server.url("/auth/o2/token"))?)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = <TokenClient<ReqwestHttpClient, ReqwestTransportErrorMapper>>::with_http_client(
		credentials,
		http_client,
		ReqwestTransportErrorMapper,
	);
	let first = client.access_token().await?;
	let second = client.access_token().await?;

	println!("Authorization header: {}.", first.bearer());
	println!("Second call reused the cached token: {}.", first == second);
	println!("Cached until: {}.", client.cached_token().valid_until());

	token_mock.assert_calls_async(1).await;

	Ok(())
}
