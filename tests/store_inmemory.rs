// std
use std::sync::Arc;
// crates.io
use time::{Duration, OffsetDateTime, macros};
use tokio::task::JoinSet;
use url::Url;
// self
use oauth2_authority::{
	auth::{
		AuthorizationCodeRecord, ClientId, CodeChallenge, ScopeSet, TokenKind, TokenRecord,
		TokenSecret,
	},
	store::{CodeStore, MemoryStore, StoreError, TokenStore},
};

fn make_client() -> ClientId {
	ClientId::new("client-123").expect("Failed to build client identifier for memory store tests.")
}

fn make_scope() -> ScopeSet {
	ScopeSet::new(["email", "profile"]).expect("Failed to build default scope set for tests.")
}

fn build_code(code: &str, issued: OffsetDateTime) -> AuthorizationCodeRecord {
	AuthorizationCodeRecord {
		code: TokenSecret::new(code),
		client_id: make_client(),
		code_challenge: CodeChallenge::from_verifier("verifier"),
		scope: make_scope(),
		redirect_uri: Url::parse("https://app.example.com/cb")
			.expect("Redirect fixture should parse successfully."),
		issued_at: issued,
		expires_at: issued + Duration::minutes(10),
	}
}

fn build_token(token: &str, kind: TokenKind, expires: Option<OffsetDateTime>) -> TokenRecord {
	let mut builder = TokenRecord::builder(kind, make_client(), make_scope())
		.token(token)
		.issued_at(macros::datetime!(2025-11-10 12:00 UTC));

	if let Some(expires) = expires {
		builder = builder.expires_at(expires);
	}

	builder.build().expect("Token record fixture should build successfully.")
}

#[tokio::test]
async fn save_fetch_and_take_round_trip() {
	let store = MemoryStore::default();
	let expires = macros::datetime!(2025-11-10 13:00 UTC);
	let record = build_token("access-1", TokenKind::Access, Some(expires));

	store.save_token(record.clone()).await.expect("Saving token fixture should succeed.");

	let fetched = store
		.fetch_token("access-1")
		.await
		.expect("Fetching token record from memory store should succeed.")
		.expect("Stored record should remain present.");

	assert_eq!(fetched.token.expose(), record.token.expose());
	assert_eq!(fetched.expires_at, record.expires_at);
	assert_eq!(store.token_count(), 1);

	let taken = store.take_token("access-1").await.expect("Take should succeed.");

	assert!(taken.is_some());
	assert!(store.take_token("access-1").await.expect("Second take should succeed.").is_none());
	assert_eq!(store.token_count(), 0);
}

#[tokio::test]
async fn duplicate_keys_conflict() {
	let store = MemoryStore::default();
	let issued = macros::datetime!(2025-11-10 12:00 UTC);

	store.save_code(build_code("code-1", issued)).await.expect("First save should succeed.");

	let err = store
		.save_code(build_code("code-1", issued))
		.await
		.expect_err("Duplicate codes must be rejected.");

	assert_eq!(err, StoreError::Conflict { collection: "codes" });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_takes_remove_a_code_once() {
	let store = Arc::new(MemoryStore::default());

	store
		.save_code(build_code("race", OffsetDateTime::now_utc()))
		.await
		.expect("Saving code fixture should succeed.");

	let mut tasks = JoinSet::new();

	for _ in 0..16 {
		let store = store.clone();

		tasks.spawn(async move { store.take_code("race").await });
	}

	let taken = tasks
		.join_all()
		.await
		.into_iter()
		.filter(|result| matches!(result, Ok(Some(_))))
		.count();

	assert_eq!(taken, 1);
	assert_eq!(store.code_count(), 0);
}

#[tokio::test]
async fn purge_drops_only_expired_records() {
	let store = MemoryStore::default();
	let issued = macros::datetime!(2025-11-10 12:00 UTC);

	store.save_code(build_code("code-old", issued)).await.expect("Saving code should succeed.");
	store
		.save_code(build_code("code-new", issued + Duration::hours(1)))
		.await
		.expect("Saving code should succeed.");
	store
		.save_token(build_token("access", TokenKind::Access, Some(issued + Duration::hours(1))))
		.await
		.expect("Saving token should succeed.");
	store
		.save_token(build_token("refresh", TokenKind::Refresh, None))
		.await
		.expect("Saving token should succeed.");

	let sweep_at = issued + Duration::hours(1);

	assert_eq!(store.purge_expired_codes(sweep_at).await.expect("Purge should succeed."), 1);
	assert_eq!(store.purge_expired_tokens(sweep_at).await.expect("Purge should succeed."), 1);
	assert!(store.fetch_code("code-new").await.expect("Fetch should succeed.").is_some());
	assert!(store.fetch_token("refresh").await.expect("Fetch should succeed.").is_some());
}
