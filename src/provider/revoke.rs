// self
use crate::{
	_prelude::*,
	auth::{Client, TokenKind},
	obs::OperationKind,
	provider::AuthorizationProvider,
};

impl AuthorizationProvider {
	/// Revokes an access or refresh token (RFC 7009).
	///
	/// Unknown or already revoked tokens succeed. A token owned by another client fails with
	/// [`Error::InvalidClient`] and stays in place. `token_type_hint` never narrows the search.
	pub async fn revoke_token(
		&self,
		client: &Client,
		token: &str,
		token_type_hint: Option<TokenKind>,
	) -> Result<()> {
		self.observe(OperationKind::RevokeToken, "revoke_token", async move {
			if !self.capabilities.revocation {
				return Err(Error::Unsupported { capability: "revocation" });
			}

			let Some(record) = self.tokens.fetch_token(token).await? else {
				return Ok(());
			};

			if !record.is_owned_by(&client.client_id) {
				return Err(Error::invalid_client("Token was issued to another client"));
			}

			#[cfg(feature = "tracing")]
			if let Some(hint) = token_type_hint.filter(|hint| *hint != record.kind) {
				tracing::debug!(%hint, actual = %record.kind, "token_type_hint does not match");
			}
			#[cfg(not(feature = "tracing"))]
			let _ = token_type_hint;

			if self.tokens.take_token(token).await?.is_some() {
				self.metrics.record_revocation();
			}

			Ok(())
		})
		.await
	}
}
