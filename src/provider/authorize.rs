// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCodeRecord, Client, CodeChallenge, ScopeSet, TokenSecret},
	error::ConfigError,
	obs::OperationKind,
	provider::AuthorizationProvider,
};

/// Parameters of an authorization request the routing layer has already parsed.
#[derive(Clone, Debug)]
pub struct AuthorizationParams {
	/// Redirect URI the code is delivered to; must be registered for the client.
	pub redirect_uri: Url,
	/// S256 PKCE challenge bound to the code.
	pub code_challenge: CodeChallenge,
	/// Requested scopes.
	pub scope: ScopeSet,
	/// Opaque client state echoed back on the redirect.
	pub state: Option<String>,
}
impl AuthorizationParams {
	/// Creates parameters with no scope and no state.
	pub fn new(redirect_uri: Url, code_challenge: CodeChallenge) -> Self {
		Self { redirect_uri, code_challenge, scope: ScopeSet::default(), state: None }
	}

	/// Sets the requested scopes.
	pub fn with_scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}

	/// Sets the state value.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}
}

impl AuthorizationProvider {
	/// Issues a one-time authorization code and returns the redirect target carrying it.
	///
	/// The code is bound to the client, the PKCE challenge, the requested scope, and the
	/// redirect URI, and expires after [`TokenPolicy::code_ttl`](crate::provider::TokenPolicy).
	pub async fn authorize(&self, client: &Client, params: AuthorizationParams) -> Result<Url> {
		self.observe(OperationKind::Authorize, "authorize", async move {
			let AuthorizationParams { redirect_uri, code_challenge, scope, state } = params;
			let redirect_uri = client.resolve_redirect_uri(Some(&redirect_uri))?;
			let now = OffsetDateTime::now_utc();
			let record = AuthorizationCodeRecord {
				code: TokenSecret::generate(),
				client_id: client.client_id.clone(),
				code_challenge,
				scope,
				redirect_uri: redirect_uri.clone(),
				issued_at: now,
				expires_at: now
					.checked_add(self.policy.code_ttl)
					.ok_or(ConfigError::TtlOutOfRange { field: "code_ttl" })?,
			};
			let mut target = redirect_uri;

			{
				let mut query = target.query_pairs_mut();

				query.append_pair("code", record.code.expose());

				if let Some(state) = state.as_deref() {
					query.append_pair("state", state);
				}
			}

			self.codes.save_code(record).await?;
			self.metrics.record_code();

			Ok(target)
		})
		.await
	}
}
