// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, TokenKind, TokenRecord, TokenSecret},
	error::ConfigError,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	provider::{AuthorizationProvider, RefreshPolicy},
};

/// Successful token endpoint response (RFC 6749 §5.1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
	/// Opaque bearer credential.
	pub access_token: TokenSecret,
	/// Always `Bearer`.
	pub token_type: &'static str,
	/// Seconds until the access token expires.
	pub expires_in: u64,
	/// Space-delimited granted scopes; omitted when nothing was granted.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Paired refresh token when the refresh policy issues one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
}

impl AuthorizationProvider {
	/// Runs `fut` inside an operation span and records its outcome.
	pub(super) async fn observe<T, Fut>(
		&self,
		kind: OperationKind,
		stage: &'static str,
		fut: Fut,
	) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		let span = OperationSpan::new(kind, stage);

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
			Err(e) => {
				obs::rejected(kind, e);
				self.metrics.record_rejection();
				obs::record_operation_outcome(kind, OperationOutcome::Failure);
			},
		}

		result
	}

	/// Mints and stores an access token plus, under the refresh policy, a refresh token.
	///
	/// The refresh token keeps `grant_scope` so later exchanges can narrow again from the
	/// original grant.
	pub(super) async fn issue_tokens(
		&self,
		client_id: &ClientId,
		access_scope: ScopeSet,
		grant_scope: ScopeSet,
		now: OffsetDateTime,
	) -> Result<TokenResponse> {
		let access = TokenRecord::builder(TokenKind::Access, client_id.clone(), access_scope)
			.generated_token()
			.issued_at(now)
			.expires_in(self.policy.access_token_ttl)
			.build()
			.map_err(ConfigError::from)?;
		let refresh = match self.policy.refresh {
			RefreshPolicy::Disabled => None,
			RefreshPolicy::Rotate { ttl } => {
				let mut builder =
					TokenRecord::builder(TokenKind::Refresh, client_id.clone(), grant_scope)
						.generated_token()
						.issued_at(now);

				if let Some(ttl) = ttl {
					builder = builder.expires_in(ttl);
				}

				Some(builder.build().map_err(ConfigError::from)?)
			},
		};
		let response = TokenResponse {
			access_token: access.token.clone(),
			token_type: "Bearer",
			expires_in: access.expires_in_at(now).unwrap_or_default(),
			scope: (!access.scope.is_empty()).then(|| access.scope.normalized()),
			refresh_token: refresh.as_ref().map(|record| record.token.clone()),
		};
		let minted = if refresh.is_some() { 2 } else { 1 };

		self.tokens.save_token(access).await?;

		let saved = match refresh {
			Some(refresh) => self.tokens.save_token(refresh).await,
			None => Ok(()),
		};

		if let Err(e) = saved {
			// A failed issuance must leave no usable access token behind.
			if let Err(_rollback) = self.tokens.take_token(response.access_token.expose()).await {
				#[cfg(feature = "tracing")]
				tracing::error!(error = %_rollback, "failed to roll back access token");
			}

			return Err(e.into());
		}

		self.metrics.record_tokens(minted);

		Ok(response)
	}
}
