//! Optional observability helpers for provider operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `oauth2_authority.operation`
//!   with the `operation` and `stage` (call site) fields.
//! - Enable `metrics` to increment the `oauth2_authority_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

pub(crate) use self::tracing::rejected;

// self
use crate::_prelude::*;

/// Provider operations observed by the authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Authorization code issuance.
	Authorize,
	/// `authorization_code` grant at the token endpoint.
	ExchangeCode,
	/// `refresh_token` grant at the token endpoint.
	ExchangeRefresh,
	/// Access token verification for protected resources.
	VerifyToken,
	/// RFC 7009 revocation.
	RevokeToken,
	/// RFC 7591 dynamic registration.
	RegisterClient,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authorize => "authorize",
			OperationKind::ExchangeCode => "exchange_code",
			OperationKind::ExchangeRefresh => "exchange_refresh",
			OperationKind::VerifyToken => "verify_token",
			OperationKind::RevokeToken => "revoke_token",
			OperationKind::RegisterClient => "register_client",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a provider operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
