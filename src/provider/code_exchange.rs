// self
use crate::{
	_prelude::*,
	auth::Client,
	obs::OperationKind,
	provider::{AuthorizationProvider, TokenResponse},
};

impl AuthorizationProvider {
	/// Exchanges an authorization code for tokens (`grant_type=authorization_code`).
	///
	/// The code is validated first (existence, expiry, client binding, PKCE, redirect URI)
	/// and only then removed with the store's delete-if-present primitive. Concurrent callers
	/// racing on one code therefore see exactly one success; everyone else gets
	/// [`Error::InvalidGrant`]. A client presenting someone else's code never consumes it.
	pub async fn exchange_authorization_code(
		&self,
		client: &Client,
		code: &str,
		code_verifier: Option<&str>,
		redirect_uri: Option<&Url>,
	) -> Result<TokenResponse> {
		self.observe(OperationKind::ExchangeCode, "exchange_authorization_code", async move {
			let now = OffsetDateTime::now_utc();
			let record = self
				.codes
				.fetch_code(code)
				.await?
				.ok_or_else(|| Error::invalid_grant("Authorization code is unknown or used"))?;

			if record.client_id != client.client_id {
				return Err(Error::invalid_grant(
					"Authorization code was issued to another client",
				));
			}
			if record.is_expired_at(now) {
				self.codes.take_code(code).await?;

				return Err(Error::invalid_grant("Authorization code expired"));
			}

			match code_verifier {
				Some(verifier) if !record.code_challenge.verify(verifier) =>
					return Err(Error::invalid_grant("PKCE verification failed")),
				None if self.policy.pkce_required =>
					return Err(Error::invalid_grant("code_verifier is required")),
				_ => {},
			}

			if redirect_uri.is_some_and(|uri| uri != &record.redirect_uri) {
				return Err(Error::invalid_grant(
					"redirect_uri does not match the authorization request",
				));
			}

			let record = self
				.codes
				.take_code(code)
				.await?
				.ok_or_else(|| Error::invalid_grant("Authorization code is unknown or used"))?;

			self.issue_tokens(&record.client_id, record.scope.clone(), record.scope, now).await
		})
		.await
	}
}
