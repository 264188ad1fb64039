// self
use crate::{
	_prelude::*,
	auth::{Client, ScopeSet, TokenKind},
	obs::OperationKind,
	provider::{AuthorizationProvider, TokenResponse},
};

impl AuthorizationProvider {
	/// Exchanges a refresh token for a new access token (`grant_type=refresh_token`).
	///
	/// Refresh tokens rotate: the presented token is deleted with the store's
	/// delete-if-present primitive and a new one carrying the original grant scope is
	/// returned. `scope` may narrow the new access token but never widen it. A rotated token
	/// replayed later fails with [`Error::InvalidGrant`].
	pub async fn exchange_refresh_token(
		&self,
		client: &Client,
		refresh_token: &str,
		scope: Option<ScopeSet>,
	) -> Result<TokenResponse> {
		self.observe(OperationKind::ExchangeRefresh, "exchange_refresh_token", async move {
			if !self.policy.refresh.is_enabled() {
				return Err(Error::UnsupportedGrantType { grant: "refresh_token" });
			}

			let now = OffsetDateTime::now_utc();
			let record = self
				.tokens
				.fetch_token(refresh_token)
				.await?
				.filter(|record| record.kind == TokenKind::Refresh)
				.ok_or_else(|| Error::invalid_grant("Refresh token is unknown or rotated"))?;

			if !record.is_owned_by(&client.client_id) {
				return Err(Error::invalid_grant("Refresh token was issued to another client"));
			}
			if record.is_expired_at(now) {
				self.tokens.take_token(refresh_token).await?;

				return Err(Error::invalid_grant("Refresh token expired"));
			}

			let access_scope = match scope {
				Some(requested) if !requested.is_subset_of(&record.scope) => {
					let extra = requested.difference(&record.scope).collect::<Vec<_>>().join(" ");

					return Err(Error::InvalidScope {
						reason: format!("Scopes outside the original grant: {extra}"),
					});
				},
				Some(requested) => requested,
				None => record.scope.clone(),
			};
			let record = self
				.tokens
				.take_token(refresh_token)
				.await?
				.ok_or_else(|| Error::invalid_grant("Refresh token is unknown or rotated"))?;

			self.issue_tokens(&record.client_id, access_scope, record.scope, now).await
		})
		.await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::task::JoinSet;
	// self
	use super::*;
	use crate::provider::{RefreshPolicy, TokenPolicy, fixtures};

	async fn issue(provider: &AuthorizationProvider, client: &Client) -> TokenResponse {
		let code = fixtures::authorize(provider, client).await;

		provider
			.exchange_authorization_code(client, &code, Some(fixtures::VERIFIER), None)
			.await
			.expect("Code exchange fixture should succeed.")
	}

	fn refresh_of(response: &TokenResponse) -> String {
		response
			.refresh_token
			.as_ref()
			.map(|token| token.expose().to_owned())
			.expect("Refresh token should be issued by default.")
	}

	#[tokio::test]
	async fn rotation_invalidates_previous_token() {
		let (provider, _) = fixtures::provider();
		let client = fixtures::public_client();
		let initial = issue(&provider, &client).await;
		let old_refresh = refresh_of(&initial);
		let rotated = provider
			.exchange_refresh_token(&client, &old_refresh, None)
			.await
			.expect("Refresh should succeed.");

		assert_ne!(refresh_of(&rotated), old_refresh);
		assert_eq!(rotated.scope.as_deref(), Some("mcp:read mcp:tools"));

		let err = provider
			.exchange_refresh_token(&client, &old_refresh, None)
			.await
			.expect_err("Rotated refresh tokens must not be reusable.");

		assert!(matches!(err, Error::InvalidGrant { .. }));
	}

	#[tokio::test]
	async fn narrowing_keeps_the_original_grant() {
		let (provider, _) = fixtures::provider();
		let client = fixtures::public_client();
		let initial = issue(&provider, &client).await;
		let narrowed = provider
			.exchange_refresh_token(
				&client,
				&refresh_of(&initial),
				Some(fixtures::scope(&["mcp:read"])),
			)
			.await
			.expect("Narrowing should succeed.");

		assert_eq!(narrowed.scope.as_deref(), Some("mcp:read"));

		let widened_back = provider
			.exchange_refresh_token(&client, &refresh_of(&narrowed), None)
			.await
			.expect("Rotated token should carry the original grant.");

		assert_eq!(widened_back.scope.as_deref(), Some("mcp:read mcp:tools"));

		let err = provider
			.exchange_refresh_token(
				&client,
				&refresh_of(&widened_back),
				Some(fixtures::scope(&["mcp:admin"])),
			)
			.await
			.expect_err("Widening must be rejected.");

		assert!(matches!(err, Error::InvalidScope { .. }));
	}

	#[tokio::test]
	async fn ownership_and_kind_are_enforced() {
		let (provider, store) = fixtures::provider();
		let client = fixtures::public_client();
		let initial = issue(&provider, &client).await;
		let err = provider
			.exchange_refresh_token(&fixtures::other_client(), &refresh_of(&initial), None)
			.await
			.expect_err("Foreign refresh tokens must be rejected.");

		assert!(matches!(err, Error::InvalidGrant { .. }));
		assert_eq!(store.token_count(), 2);

		let err = provider
			.exchange_refresh_token(&client, initial.access_token.expose(), None)
			.await
			.expect_err("Access tokens are not refresh tokens.");

		assert!(matches!(err, Error::InvalidGrant { .. }));
	}

	#[tokio::test]
	async fn disabled_refresh_is_unsupported() {
		let (provider, _) = fixtures::provider();
		let provider = provider
			.with_policy(TokenPolicy { refresh: RefreshPolicy::Disabled, ..Default::default() });
		let err = provider
			.exchange_refresh_token(&fixtures::public_client(), "anything", None)
			.await
			.expect_err("Refresh must be rejected when disabled.");

		assert!(matches!(err, Error::UnsupportedGrantType { grant: "refresh_token" }));
	}

	#[tokio::test]
	async fn expired_refresh_tokens_fail() {
		let (provider, _) = fixtures::provider();
		let provider = provider.with_policy(TokenPolicy {
			refresh: RefreshPolicy::Rotate { ttl: Some(Duration::seconds(-1)) },
			..Default::default()
		});
		let client = fixtures::public_client();
		let initial = issue(&provider, &client).await;
		let err = provider
			.exchange_refresh_token(&client, &refresh_of(&initial), None)
			.await
			.expect_err("Expired refresh tokens must be rejected.");

		assert!(matches!(err, Error::InvalidGrant { .. }));
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_refreshes_yield_one_winner() {
		const CALLERS: usize = 8;

		let (provider, _) = fixtures::provider();
		let client = fixtures::public_client();
		let refresh = refresh_of(&issue(&provider, &client).await);
		let mut tasks = JoinSet::new();

		for _ in 0..CALLERS {
			let provider = provider.clone();
			let client = client.clone();
			let refresh = refresh.clone();

			tasks.spawn(
				async move { provider.exchange_refresh_token(&client, &refresh, None).await },
			);
		}

		let mut successes = 0;

		while let Some(result) = tasks.join_next().await {
			if result.expect("Refresh task should not panic.").is_ok() {
				successes += 1;
			}
		}

		assert_eq!(successes, 1);
	}
}
