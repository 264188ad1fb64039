// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, TokenKind, TokenSecret},
	obs::OperationKind,
	provider::AuthorizationProvider,
};

/// Access token facts a protected resource needs to authorize a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedToken {
	/// Verified bearer credential.
	pub token: TokenSecret,
	/// Client the token was issued to.
	pub client_id: ClientId,
	/// Granted scopes.
	pub scope: ScopeSet,
	/// Expiry instant.
	pub expires_at: OffsetDateTime,
}

impl AuthorizationProvider {
	/// Verifies a bearer access token against the current clock.
	pub async fn verify_access_token(&self, token: &str) -> Result<VerifiedToken> {
		self.verify_access_token_at(token, OffsetDateTime::now_utc()).await
	}

	/// Verifies a bearer access token as of `instant`. Expiry is inclusive: a token whose
	/// `expires_at` equals `instant` is rejected. Read-only.
	pub async fn verify_access_token_at(
		&self,
		token: &str,
		instant: OffsetDateTime,
	) -> Result<VerifiedToken> {
		self.observe(OperationKind::VerifyToken, "verify_access_token", async move {
			let record = self
				.tokens
				.fetch_token(token)
				.await?
				.ok_or_else(|| Error::invalid_token("Token is unknown or revoked"))?;

			if record.kind != TokenKind::Access {
				return Err(Error::invalid_token("Token is not an access token"));
			}

			match record.expires_at {
				Some(expires_at) if instant < expires_at => Ok(VerifiedToken {
					token: record.token,
					client_id: record.client_id,
					scope: record.scope,
					expires_at,
				}),
				_ => Err(Error::invalid_token("Token expired")),
			}
		})
		.await
	}
}
