//! Authority-level error types shared across the provider, stores, and configuration.

// crates.io
use oauth2::basic::{BasicErrorResponse, BasicErrorResponseType};
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Grant and token variants are recoverable protocol failures; the HTTP boundary renders
/// them through [`Error::error_response`] and [`Error::status_code`]. [`Error::Config`] is
/// fatal and is only produced while loading configuration.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Authorization code or refresh token is unknown, expired, replayed, or bound elsewhere.
	#[error("The grant is invalid: {reason}.")]
	InvalidGrant {
		/// Human-readable reason string.
		reason: String,
	},
	/// Access token is absent, expired, or not an access token.
	#[error("The access token is invalid: {reason}.")]
	InvalidToken {
		/// Human-readable reason string.
		reason: String,
	},
	/// Requested scopes exceed the original grant.
	#[error("The requested scope is invalid: {reason}.")]
	InvalidScope {
		/// Human-readable reason string.
		reason: String,
	},
	/// Client is unknown, failed authentication, or does not own the presented credential.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Human-readable reason string.
		reason: String,
	},
	/// Request parameters are malformed.
	#[error("The request is invalid: {reason}.")]
	InvalidRequest {
		/// Human-readable reason string.
		reason: String,
	},
	/// Dynamic registration input was rejected.
	#[error("The client metadata is invalid: {reason}.")]
	InvalidClientMetadata {
		/// Human-readable reason string.
		reason: String,
	},
	/// The provider does not implement the requested grant.
	#[error("The {grant} grant is not supported.")]
	UnsupportedGrantType {
		/// Grant label.
		grant: &'static str,
	},
	/// An optional capability (registration, revocation) is disabled.
	#[error("The {capability} capability is not enabled.")]
	Unsupported {
		/// Capability label.
		capability: &'static str,
	},
}
impl Error {
	/// Returns the RFC 6749/6750/7591 error code for this failure.
	pub fn error_code(&self) -> BasicErrorResponseType {
		match self {
			Self::InvalidGrant { .. } => BasicErrorResponseType::InvalidGrant,
			Self::InvalidScope { .. } => BasicErrorResponseType::InvalidScope,
			Self::InvalidClient { .. } => BasicErrorResponseType::InvalidClient,
			Self::InvalidRequest { .. } | Self::Unsupported { .. } =>
				BasicErrorResponseType::InvalidRequest,
			Self::UnsupportedGrantType { .. } => BasicErrorResponseType::UnsupportedGrantType,
			Self::InvalidToken { .. } => BasicErrorResponseType::Extension("invalid_token".into()),
			Self::InvalidClientMetadata { .. } =>
				BasicErrorResponseType::Extension("invalid_client_metadata".into()),
			Self::Storage(_) | Self::Config(_) =>
				BasicErrorResponseType::Extension("server_error".into()),
		}
	}

	/// Builds the standard OAuth error body for this failure.
	///
	/// Server-side failures do not leak their description to clients.
	pub fn error_response(&self) -> BasicErrorResponse {
		let description = match self {
			Self::Storage(_) | Self::Config(_) => None,
			_ => Some(self.to_string()),
		};

		BasicErrorResponse::new(self.error_code(), description, None)
	}

	/// HTTP status the routing layer should answer with.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::InvalidClient { .. } | Self::InvalidToken { .. } => 401,
			Self::Storage(_) | Self::Config(_) => 500,
			_ => 400,
		}
	}

	/// Returns `true` for failures caused by the server rather than the request.
	pub fn is_server_error(&self) -> bool {
		matches!(self, Self::Storage(_) | Self::Config(_))
	}

	pub(crate) fn invalid_grant(reason: impl Into<String>) -> Self {
		Self::InvalidGrant { reason: reason.into() }
	}

	pub(crate) fn invalid_token(reason: impl Into<String>) -> Self {
		Self::InvalidToken { reason: reason.into() }
	}

	pub(crate) fn invalid_client(reason: impl Into<String>) -> Self {
		Self::InvalidClient { reason: reason.into() }
	}
}

/// Configuration and validation failures; fatal at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Issuer URL violates the issuer invariant.
	#[error(transparent)]
	InvalidIssuer(#[from] crate::metadata::IssuerUrlError),
	/// A derived endpoint URL could not be constructed.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS outside loopback development hosts.
	#[error("The {endpoint} URL must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which URL failed validation.
		endpoint: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Configuration document could not be parsed.
	#[error("Configuration could not be parsed at `{path}`.")]
	Parse {
		/// Path to the offending field.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// A lifetime setting is zero or negative.
	#[error("The {field} lifetime must be positive.")]
	NonPositiveTtl {
		/// Offending setting.
		field: &'static str,
	},
	/// A lifetime setting exceeds the supported maximum.
	#[error("The {field} lifetime exceeds the supported maximum.")]
	TtlOutOfRange {
		/// Offending setting.
		field: &'static str,
	},
	/// Configured scopes cannot be normalized.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Token record builder validation failed.
	#[error("Unable to build token record.")]
	TokenBuild(#[from] crate::auth::TokenRecordBuilderError),
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}
