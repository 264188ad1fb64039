//! Immutable token record structs, lifecycle helpers, and builders.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, token::secret::TokenSecret},
};

/// Kind of opaque token held by the token store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Bearer credential presented to protected resources.
	Access,
	/// Credential exchanged at the token endpoint for new access tokens.
	Refresh,
}
impl TokenKind {
	/// Returns the RFC 7009 `token_type_hint` label.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::Access => "access_token",
			TokenKind::Refresh => "refresh_token",
		}
	}

	/// Parses an RFC 7009 `token_type_hint`; unknown hints yield `None`.
	pub fn from_hint(hint: &str) -> Option<Self> {
		match hint {
			"access_token" => Some(TokenKind::Access),
			"refresh_token" => Some(TokenKind::Refresh),
			_ => None,
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Current lifecycle status for a token record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token is currently valid.
	Active,
	/// Token reached its expiry instant.
	Expired,
}

/// Errors produced by [`TokenRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenRecordBuilderError {
	/// Issued when no token value was provided.
	#[error("Token value is required.")]
	MissingToken,
	/// Access tokens must always carry an expiry.
	#[error("Access tokens require an expiry via expires_at or expires_in.")]
	MissingExpiry,
	/// The expiry instant falls outside the representable date range.
	#[error("Token expiry is out of range.")]
	ExpiryOutOfRange,
}

/// Immutable record describing an issued opaque token.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenRecord {
	/// Opaque token value; callers must avoid logging it.
	pub token: TokenSecret,
	/// Access or refresh.
	pub kind: TokenKind,
	/// Client the token was issued to.
	pub client_id: ClientId,
	/// Normalized scopes granted to this token.
	pub scope: ScopeSet,
	/// Issued-at instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant; `None` only for non-expiring refresh tokens.
	pub expires_at: Option<OffsetDateTime>,
}
impl TokenRecord {
	/// Returns a builder for the provided kind, owner, and scope.
	pub fn builder(kind: TokenKind, client_id: ClientId, scope: ScopeSet) -> TokenRecordBuilder {
		TokenRecordBuilder::new(kind, client_id, scope)
	}

	/// Computes the lifecycle status at a given instant. Expiry is inclusive.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		match self.expires_at {
			Some(expires_at) if instant >= expires_at => TokenStatus::Expired,
			_ => TokenStatus::Active,
		}
	}

	/// Returns `true` if the record has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` if the record is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if the record is owned by `client_id`.
	pub fn is_owned_by(&self, client_id: &ClientId) -> bool {
		&self.client_id == client_id
	}

	/// Whole seconds remaining at `instant`, clamped at zero; `None` when non-expiring.
	pub fn expires_in_at(&self, instant: OffsetDateTime) -> Option<u64> {
		self.expires_at
			.map(|expires_at| u64::try_from((expires_at - instant).whole_seconds()).unwrap_or(0))
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("token", &"<redacted>")
			.field("kind", &self.kind)
			.field("client_id", &self.client_id)
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`TokenRecord`].
#[derive(Clone, Debug)]
pub struct TokenRecordBuilder {
	kind: TokenKind,
	client_id: ClientId,
	scope: ScopeSet,
	token: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl TokenRecordBuilder {
	fn new(kind: TokenKind, client_id: ClientId, scope: ScopeSet) -> Self {
		Self {
			kind,
			client_id,
			scope,
			token: None,
			issued_at: None,
			expires_at: None,
			expires_in: None,
		}
	}

	/// Provides the token value.
	pub fn token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(TokenSecret::new(token));

		self
	}

	/// Uses a freshly generated opaque token value.
	pub fn generated_token(mut self) -> Self {
		self.token = Some(TokenSecret::generate());

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces a [`TokenRecord`].
	pub fn build(self) -> Result<TokenRecord, TokenRecordBuilderError> {
		let token = self.token.ok_or(TokenRecordBuilderError::MissingToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => Some(instant),
			(None, Some(delta)) => Some(
				issued_at.checked_add(delta).ok_or(TokenRecordBuilderError::ExpiryOutOfRange)?,
			),
			(None, None) => None,
		};

		if expires_at.is_none() && self.kind == TokenKind::Access {
			return Err(TokenRecordBuilderError::MissingExpiry);
		}

		Ok(TokenRecord {
			token,
			kind: self.kind,
			client_id: self.client_id,
			scope: self.scope,
			issued_at,
			expires_at,
		})
	}
}
