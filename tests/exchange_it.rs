#![cfg(feature = "reqwest")]

// std
use std::net::TcpListener;
// crates.io
use httpmock::prelude::*;
// self
use gateway_token_probe::{
	config::{GatewayConfig, IssuerConfig},
	error::{Error, TransportError},
	exchange::{Exerciser, ResponseBody},
	http::ReqwestTransport,
	token::{IssueOptions, SignedToken, TokenIssuer},
};

const PRODUCTS: &str = "/api/v1/products";

fn issuer() -> TokenIssuer {
	TokenIssuer::new(IssuerConfig::default()).expect("Default issuer config should be valid.")
}

fn exerciser(server: &MockServer) -> Exerciser<ReqwestTransport> {
	Exerciser::new(GatewayConfig::new(server.host(), server.port()))
		.expect("Reqwest exerciser should build for the mock gateway.")
}

fn bearer(token: &SignedToken) -> String {
	format!("Bearer {}", token.as_str())
}

#[tokio::test]
async fn valid_token_receives_structured_body() {
	let server = MockServer::start_async().await;
	let token = issuer().issue(IssueOptions::new()).expect("Issuance should succeed.");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(PRODUCTS).header("authorization", bearer(&token));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"items\":[{\"id\":1,\"name\":\"Widget\"}]}");
		})
		.await;
	let result = exerciser(&server)
		.exchange(token.as_str(), PRODUCTS)
		.await
		.expect("Exchange with a valid token should succeed.");

	mock.assert_calls_async(1).await;

	assert_eq!(result.status(), 200);
	assert!(result.body().is_structured());
	assert_eq!(
		result.body().as_structured().and_then(|body| body["items"][0]["name"].as_str()),
		Some("Widget")
	);
	assert_eq!(
		result.header("content-type").map(|value| value.first()),
		Some("application/json")
	);
}

#[tokio::test]
async fn expired_token_is_rejected() {
	let server = MockServer::start_async().await;
	let issuer = issuer();
	let valid = issuer.issue(IssueOptions::new()).expect("Issuance should succeed.");
	let expired = issuer
		.issue(IssueOptions::new().with_ttl_seconds(-3_600))
		.expect("Issuance with negative ttl should succeed.");

	server
		.mock_async(|when, then| {
			when.method(GET).path(PRODUCTS).header("authorization", bearer(&valid));
			then.status(200).header("content-type", "application/json").body("{\"items\":[]}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(PRODUCTS).header("authorization", bearer(&expired));
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"exp\":\"token expired\"}");
		})
		.await;

	let exerciser = exerciser(&server);
	let accepted =
		exerciser.exchange_default(valid.as_str()).await.expect("Valid exchange should succeed.");
	let rejected = exerciser
		.exchange_default(expired.as_str())
		.await
		.expect("Expired exchange should still produce a response.");

	assert_eq!(accepted.status(), 200);
	assert_eq!(rejected.status(), 401);
	assert_ne!(accepted.status(), rejected.status());
	assert_eq!(
		rejected.body().as_structured().and_then(|body| body["exp"].as_str()),
		Some("token expired")
	);
}

#[tokio::test]
async fn tampered_token_falls_back_to_raw_body() {
	let server = MockServer::start_async().await;
	let tampered = issuer()
		.issue(IssueOptions::new())
		.expect("Issuance should succeed.")
		.with_last_char_replaced();

	server
		.mock_async(|when, then| {
			when.method(GET).path(PRODUCTS).header("authorization", bearer(&tampered));
			then.status(401).header("content-type", "text/plain").body("Invalid signature");
		})
		.await;

	let result = exerciser(&server)
		.exchange(tampered.as_str(), PRODUCTS)
		.await
		.expect("Tampered exchange should still produce a response.");

	assert_eq!(result.status(), 401);
	assert_eq!(result.body(), &ResponseBody::Raw("Invalid signature".into()));
}

#[tokio::test]
async fn empty_body_is_marked_empty() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/orders");
			then.status(204);
		})
		.await;

	let result = exerciser(&server)
		.exchange("not-even-a-jwt", "/api/v1/orders")
		.await
		.expect("Exchange should succeed regardless of token shape.");

	assert_eq!(result.status(), 204);
	assert_eq!(result.body(), &ResponseBody::Empty);
}

#[tokio::test]
async fn redirects_are_reported_not_followed() {
	let server = MockServer::start_async().await;
	let redirect = server
		.mock_async(|when, then| {
			when.method(GET).path(PRODUCTS);
			then.status(302).header("location", "/login");
		})
		.await;
	let login = server
		.mock_async(|when, then| {
			when.method(GET).path("/login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"page\":\"login\"}");
		})
		.await;
	let result = exerciser(&server)
		.exchange("a.b.c", PRODUCTS)
		.await
		.expect("A redirect is still a response.");

	redirect.assert_calls_async(1).await;
	login.assert_calls_async(0).await;

	assert_eq!(result.status(), 302);
	assert_eq!(result.header("location").map(|value| value.first()), Some("/login"));
	assert_eq!(result.body(), &ResponseBody::Empty);
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
	let port = {
		let listener =
			TcpListener::bind("127.0.0.1:0").expect("Ephemeral port should be available.");

		listener.local_addr().expect("Listener should expose its address.").port()
	};
	let exerciser = Exerciser::new(GatewayConfig::new("127.0.0.1", port))
		.expect("Reqwest exerciser should build.");
	let err = exerciser
		.exchange("a.b.c", PRODUCTS)
		.await
		.expect_err("Nothing listens on the released port.");

	match err {
		Error::Transport(TransportError::Network { message, .. }) => {
			assert!(message.starts_with("error sending request"), "unexpected message: {message}");
			assert!(
				message.to_ascii_lowercase().contains("connection refused"),
				"root cause missing from: {message}"
			);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
