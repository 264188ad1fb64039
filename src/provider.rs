//! Authorization server orchestrator owning the code and token lifecycle.
//!
//! [`AuthorizationProvider`] is the only component that makes lifecycle decisions. It issues
//! one-time codes bound to a client, a PKCE challenge, and a redirect URI; consumes each code
//! at most once through the store's delete-if-present primitive; mints opaque access and
//! refresh tokens; and verifies or revokes them. Stores stay dumb key-value collaborators.
//!
//! Every operation is wrapped in an [`OperationSpan`](crate::obs::OperationSpan) and reports
//! attempt/success/failure through [`obs::record_operation_outcome`](crate::obs::record_operation_outcome).

mod authorize;
mod code_exchange;
mod common;
mod counters;
mod policy;
mod refresh;
mod registration;
mod revoke;
mod verify;

#[cfg(test)] mod fixtures;

pub use authorize::AuthorizationParams;
pub use common::TokenResponse;
pub use counters::OperationMetrics;
pub use policy::*;
pub use verify::VerifiedToken;

// self
use crate::{
	_prelude::*,
	store::{ClientRegistry, CodeStore, TokenStore},
};

/// Optional endpoints served by the provider, computed once at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
	/// RFC 7591 dynamic client registration.
	pub registration: bool,
	/// RFC 7009 token revocation.
	pub revocation: bool,
}

/// Counts returned by [`AuthorizationProvider::purge_expired`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PurgeSummary {
	/// Expired authorization codes removed.
	pub codes: usize,
	/// Expired tokens removed.
	pub tokens: usize,
}

/// Issues, exchanges, verifies, and revokes OAuth credentials over pluggable stores.
#[derive(Clone)]
pub struct AuthorizationProvider {
	clients: Arc<dyn ClientRegistry>,
	codes: Arc<dyn CodeStore>,
	tokens: Arc<dyn TokenStore>,
	policy: TokenPolicy,
	capabilities: Capabilities,
	metrics: Arc<OperationMetrics>,
}
impl AuthorizationProvider {
	/// Creates a provider over three independent stores.
	///
	/// Revocation starts enabled; registration is enabled when the registry supports it.
	pub fn new(
		clients: Arc<dyn ClientRegistry>,
		codes: Arc<dyn CodeStore>,
		tokens: Arc<dyn TokenStore>,
	) -> Self {
		let capabilities =
			Capabilities { registration: clients.supports_registration(), revocation: true };

		Self {
			clients,
			codes,
			tokens,
			policy: TokenPolicy::default(),
			capabilities,
			metrics: Default::default(),
		}
	}

	/// Creates a provider backed by a single store implementing every contract.
	pub fn with_store<S>(store: Arc<S>) -> Self
	where
		S: 'static + ClientRegistry + CodeStore + TokenStore,
	{
		Self::new(store.clone(), store.clone(), store)
	}

	/// Replaces the token lifetime and grant policy.
	pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Enables or disables the revocation endpoint.
	pub fn with_revocation(mut self, enabled: bool) -> Self {
		self.capabilities.revocation = enabled;

		self
	}

	/// Enables or disables dynamic registration. Registration stays off when the registry
	/// cannot persist new clients.
	pub fn with_registration(mut self, enabled: bool) -> Self {
		self.capabilities.registration = enabled && self.clients.supports_registration();

		self
	}

	/// Optional endpoints this provider serves.
	pub fn capabilities(&self) -> Capabilities {
		self.capabilities
	}

	/// Active token policy.
	pub fn policy(&self) -> &TokenPolicy {
		&self.policy
	}

	/// Shared counters for issued, rejected, and revoked credentials.
	pub fn metrics(&self) -> &OperationMetrics {
		&self.metrics
	}

	/// Drops expired codes and tokens from the stores.
	///
	/// Expiry is always checked at read time, so this only bounds memory.
	pub async fn purge_expired(&self) -> Result<PurgeSummary> {
		self.purge_expired_at(OffsetDateTime::now_utc()).await
	}

	/// Same as [`AuthorizationProvider::purge_expired`] evaluated at `instant`.
	pub async fn purge_expired_at(&self, instant: OffsetDateTime) -> Result<PurgeSummary> {
		let codes = self.codes.purge_expired_codes(instant).await?;
		let tokens = self.tokens.purge_expired_tokens(instant).await?;

		#[cfg(feature = "tracing")]
		if codes + tokens > 0 {
			tracing::debug!(codes, tokens, "purged expired credentials");
		}

		Ok(PurgeSummary { codes, tokens })
	}
}
impl Debug for AuthorizationProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationProvider")
			.field("policy", &self.policy)
			.field("capabilities", &self.capabilities)
			.field("metrics", &self.metrics)
			.finish()
	}
}
