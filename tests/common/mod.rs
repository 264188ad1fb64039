//! Shared fixtures for provider integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use url::Url;
// self
use oauth2_authority::{
	auth::{Client, ClientId, CodeChallenge, ScopeSet},
	config::ServerConfig,
	provider::{AuthorizationParams, AuthorizationProvider, TokenResponse},
	store::MemoryStore,
};

pub const ISSUER: &str = "https://auth.example.com";
pub const REDIRECT_URI: &str = "https://app.example.com/cb";
pub const VERIFIER: &str = "verifier1";

pub fn redirect_uri() -> Url {
	Url::parse(REDIRECT_URI).expect("Redirect fixture should parse.")
}

pub fn scope(scopes: &[&str]) -> ScopeSet {
	ScopeSet::new(scopes.iter().copied()).expect("Scope fixture should be valid.")
}

pub fn client(id: &str) -> Client {
	Client::new(ClientId::new(id).expect("Client fixture should be valid."), vec![redirect_uri()])
}

/// Provider configured from [`ISSUER`] with clients `c1` and `c2` pre-registered.
pub fn provider_with(config: ServerConfig) -> (AuthorizationProvider, Arc<MemoryStore>) {
	let validated = config.validate().expect("Fixture config should validate.");
	let store = Arc::new(MemoryStore::default());

	store.insert_client(client("c1"));
	store.insert_client(client("c2"));

	(validated.configure(AuthorizationProvider::with_store(store.clone())), store)
}

pub fn provider() -> (AuthorizationProvider, Arc<MemoryStore>) {
	provider_with(ServerConfig::new(ISSUER))
}

pub async fn authorize(
	provider: &AuthorizationProvider,
	client: &Client,
	scopes: &[&str],
) -> String {
	let params = AuthorizationParams::new(redirect_uri(), CodeChallenge::from_verifier(VERIFIER))
		.with_scope(scope(scopes))
		.with_state("state-123");
	let target = provider.authorize(client, params).await.expect("Authorize should succeed.");

	target
		.query_pairs()
		.find(|(key, _)| key == "code")
		.map(|(_, value)| value.into_owned())
		.expect("Redirect should carry a code.")
}

pub async fn issue_tokens(
	provider: &AuthorizationProvider,
	client: &Client,
	scopes: &[&str],
) -> TokenResponse {
	let code = authorize(provider, client, scopes).await;

	provider
		.exchange_authorization_code(client, &code, Some(VERIFIER), None)
		.await
		.expect("Code exchange should succeed.")
}
