//! One-time authorization code records.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, CodeChallenge, ScopeSet, token::secret::TokenSecret},
};

/// Authorization code bound to a client, a PKCE challenge, and the redirect URI it was
/// issued for. Consumed exactly once.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizationCodeRecord {
	/// Opaque code value.
	pub code: TokenSecret,
	/// Client that requested the code.
	pub client_id: ClientId,
	/// S256 challenge the exchange verifier must satisfy.
	pub code_challenge: CodeChallenge,
	/// Scopes requested during authorization.
	pub scope: ScopeSet,
	/// Redirect URI the code was delivered to.
	pub redirect_uri: Url,
	/// Issue instant.
	pub issued_at: OffsetDateTime,
	/// Instant after which the code can no longer be exchanged.
	pub expires_at: OffsetDateTime,
}
impl AuthorizationCodeRecord {
	/// Returns `true` once `instant` reaches the expiry. Expiry is inclusive.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}
impl Debug for AuthorizationCodeRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationCodeRecord")
			.field("code", &"<redacted>")
			.field("client_id", &self.client_id)
			.field("code_challenge", &self.code_challenge)
			.field("scope", &self.scope)
			.field("redirect_uri", &self.redirect_uri)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
