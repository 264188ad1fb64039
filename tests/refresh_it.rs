mod common;

// std
use std::{env, fs, process, sync::Arc};
// crates.io
use time::OffsetDateTime;
// self
use oauth2_authority::{
	config::ServerConfig,
	error::Error,
	provider::{AuthorizationProvider, RefreshPolicy},
	store::{ClientRegistry, FileStore},
};

fn refresh_of(response: &oauth2_authority::provider::TokenResponse) -> String {
	response
		.refresh_token
		.as_ref()
		.map(|token| token.expose().to_owned())
		.expect("Refresh tokens are issued by default.")
}

#[tokio::test]
async fn rotation_chain_keeps_original_grant() {
	let (provider, store) = common::provider();
	let client = common::client("c1");
	let initial = common::issue_tokens(&provider, &client, &["mcp:read", "mcp:tools"]).await;
	let narrowed = provider
		.exchange_refresh_token(
			&client,
			&refresh_of(&initial),
			Some(common::scope(&["mcp:read"])),
		)
		.await
		.expect("Narrowed refresh should succeed.");

	assert_eq!(narrowed.scope.as_deref(), Some("mcp:read"));
	assert_eq!(narrowed.expires_in, 3600);

	let verified = provider
		.verify_access_token(narrowed.access_token.expose())
		.await
		.expect("Refreshed access token should verify.");

	assert!(!verified.scope.contains("mcp:tools"));

	let restored = provider
		.exchange_refresh_token(&client, &refresh_of(&narrowed), None)
		.await
		.expect("Rotated refresh token should work once.");

	assert_eq!(restored.scope.as_deref(), Some("mcp:read mcp:tools"));

	// Three access tokens plus the live refresh token.
	assert_eq!(store.token_count(), 4);

	for stale in [refresh_of(&initial), refresh_of(&narrowed)] {
		assert!(matches!(
			provider.exchange_refresh_token(&client, &stale, None).await,
			Err(Error::InvalidGrant { .. })
		));
	}
}

#[tokio::test]
async fn widening_scope_is_rejected_without_rotating() {
	let (provider, _) = common::provider();
	let client = common::client("c1");
	let initial = common::issue_tokens(&provider, &client, &["mcp:read"]).await;
	let refresh = refresh_of(&initial);
	let err = provider
		.exchange_refresh_token(
			&client,
			&refresh,
			Some(common::scope(&["mcp:read", "mcp:admin"])),
		)
		.await
		.expect_err("Scopes outside the grant must be rejected.");

	assert!(matches!(err, Error::InvalidScope { .. }));
	assert_eq!(err.error_code().as_ref(), "invalid_scope");
	assert!(provider.exchange_refresh_token(&client, &refresh, None).await.is_ok());
}

#[tokio::test]
async fn disabled_refresh_omits_tokens_and_rejects_grant() {
	let mut config = ServerConfig::new(common::ISSUER);

	config.tokens.refresh_tokens = false;

	let (provider, _) = common::provider_with(config);
	let client = common::client("c1");
	let response = common::issue_tokens(&provider, &client, &[]).await;

	assert_eq!(provider.policy().refresh, RefreshPolicy::Disabled);
	assert!(response.refresh_token.is_none());
	assert!(matches!(
		provider.exchange_refresh_token(&client, "unused", None).await,
		Err(Error::UnsupportedGrantType { .. })
	));
}

#[tokio::test]
async fn file_store_survives_restart_between_rotations() {
	let path = env::temp_dir().join(format!(
		"oauth2_authority_refresh_it_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	));
	let client = common::client("c1");
	let refresh = {
		let store = Arc::new(FileStore::open(&path).expect("File store should open."));
		let provider = AuthorizationProvider::with_store(store.clone());

		store.register_client(client.clone()).await.expect("Client should be persisted.");

		refresh_of(&common::issue_tokens(&provider, &client, &["mcp:tools"]).await)
	};
	let store = Arc::new(FileStore::open(&path).expect("File store should reopen."));
	let provider = AuthorizationProvider::with_store(store);
	let rotated = provider
		.exchange_refresh_token(&client, &refresh, None)
		.await
		.expect("Persisted refresh token should rotate after restart.");

	assert_eq!(rotated.scope.as_deref(), Some("mcp:tools"));
	assert!(
		provider
			.authenticate_client("c1", None)
			.await
			.is_ok_and(|stored| stored.redirect_uris == client.redirect_uris)
	);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
	});
}
