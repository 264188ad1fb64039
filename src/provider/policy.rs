// self
use crate::_prelude::*;

/// Default access token lifetime.
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::hours(1);
/// Default authorization code lifetime.
pub const DEFAULT_CODE_TTL: Duration = Duration::minutes(10);
/// Default refresh token lifetime.
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::days(30);

/// Whether refresh tokens are issued and how they behave when exchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshPolicy {
	/// No refresh tokens; the `refresh_token` grant is rejected.
	Disabled,
	/// Every exchange deletes the presented refresh token and issues a new one.
	Rotate {
		/// Lifetime of each refresh token; `None` never expires.
		ttl: Option<Duration>,
	},
}
impl RefreshPolicy {
	/// Returns `true` when refresh tokens are issued.
	pub fn is_enabled(&self) -> bool {
		matches!(self, Self::Rotate { .. })
	}
}
impl Default for RefreshPolicy {
	fn default() -> Self {
		Self::Rotate { ttl: Some(DEFAULT_REFRESH_TOKEN_TTL) }
	}
}

/// Lifetimes and grant rules applied by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPolicy {
	/// Access token lifetime, reported as `expires_in`.
	pub access_token_ttl: Duration,
	/// Authorization code lifetime.
	pub code_ttl: Duration,
	/// Rejects code exchanges that omit `code_verifier`.
	pub pkce_required: bool,
	/// Refresh token issuance.
	pub refresh: RefreshPolicy,
}
impl Default for TokenPolicy {
	fn default() -> Self {
		Self {
			access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
			code_ttl: DEFAULT_CODE_TTL,
			pkce_required: true,
			refresh: RefreshPolicy::default(),
		}
	}
}
