// self
use crate::{
	_prelude::*,
	auth::{Client, ClientId, CodeChallenge, ScopeSet},
	provider::{AuthorizationParams, AuthorizationProvider},
	store::MemoryStore,
};

pub(crate) const VERIFIER: &str = "verifier1";

pub(crate) fn redirect_uri() -> Url {
	Url::parse("https://app.example.com/cb").expect("Redirect fixture should parse.")
}

pub(crate) fn scope(scopes: &[&str]) -> ScopeSet {
	ScopeSet::new(scopes.iter().copied()).expect("Scope fixture should be valid.")
}

fn client(id: &str) -> Client {
	Client::new(ClientId::new(id).expect("Client fixture should be valid."), vec![redirect_uri()])
}

pub(crate) fn public_client() -> Client {
	client("c1")
}

pub(crate) fn other_client() -> Client {
	client("c2")
}

pub(crate) fn provider() -> (AuthorizationProvider, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::default());

	store.insert_client(public_client());
	store.insert_client(other_client());

	(AuthorizationProvider::with_store(store.clone()), store)
}

pub(crate) async fn authorize_with_scope(
	provider: &AuthorizationProvider,
	client: &Client,
	scopes: &[&str],
) -> String {
	let params =
		AuthorizationParams::new(redirect_uri(), CodeChallenge::from_verifier(VERIFIER))
			.with_scope(scope(scopes));
	let target =
		provider.authorize(client, params).await.expect("Authorize fixture should succeed.");

	target
		.query_pairs()
		.find(|(key, _)| key == "code")
		.map(|(_, value)| value.into_owned())
		.expect("Redirect should carry a code.")
}

pub(crate) async fn authorize(provider: &AuthorizationProvider, client: &Client) -> String {
	authorize_with_scope(provider, client, &["mcp:read", "mcp:tools"]).await
}
