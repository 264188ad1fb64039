//! Storage contracts and built-in store implementations for clients, codes, and tokens.
//!
//! Stores are key-value collaborators with no business logic. Every contract exposes
//! atomic get/put/delete-if-present operations; lifecycle rules live in
//! [`AuthorizationProvider`](crate::provider::AuthorizationProvider).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCodeRecord, Client, TokenRecord},
};

/// Boxed future returned by every store operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Registered client lookup and optional dynamic registration.
pub trait ClientRegistry
where
	Self: Send + Sync,
{
	/// Fetches a registered client by identifier.
	fn fetch_client<'a>(&'a self, client_id: &'a str) -> StoreFuture<'a, Option<Client>>;

	/// Whether [`ClientRegistry::register_client`] is implemented. Decides if a registration
	/// endpoint is advertised at all.
	fn supports_registration(&self) -> bool {
		false
	}

	/// Persists a newly registered client.
	fn register_client(&self, client: Client) -> StoreFuture<'_, ()> {
		drop(client);

		Box::pin(async { Err(StoreError::Unsupported { operation: "register_client" }) })
	}
}

/// Authorization code persistence keyed by the code value.
pub trait CodeStore
where
	Self: Send + Sync,
{
	/// Inserts a new code; fails with [`StoreError::Conflict`] when the code already exists.
	fn save_code(&self, record: AuthorizationCodeRecord) -> StoreFuture<'_, ()>;

	/// Reads a code without consuming it.
	fn fetch_code<'a>(
		&'a self,
		code: &'a str,
	) -> StoreFuture<'a, Option<AuthorizationCodeRecord>>;

	/// Atomically deletes a code if present and returns the removed record. Exactly one of
	/// several concurrent callers observes `Some`.
	fn take_code<'a>(
		&'a self,
		code: &'a str,
	) -> StoreFuture<'a, Option<AuthorizationCodeRecord>>;

	/// Removes codes expired at `instant`, returning how many were dropped.
	fn purge_expired_codes(&self, instant: OffsetDateTime) -> StoreFuture<'_, usize>;
}

/// Opaque token persistence keyed by the token value.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Inserts a new token; fails with [`StoreError::Conflict`] when the token already exists.
	fn save_token(&self, record: TokenRecord) -> StoreFuture<'_, ()>;

	/// Reads a token without consuming it.
	fn fetch_token<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<TokenRecord>>;

	/// Atomically deletes a token if present and returns the removed record.
	fn take_token<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<TokenRecord>>;

	/// Removes tokens expired at `instant`, returning how many were dropped.
	fn purge_expired_tokens(&self, instant: OffsetDateTime) -> StoreFuture<'_, usize>;
}

/// Error type produced by store implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// A record with the same key already exists.
	#[error("Key already exists in the {collection} collection.")]
	Conflict {
		/// Collection label.
		collection: &'static str,
	},
	/// The backend does not implement an optional operation.
	#[error("The store does not support {operation}.")]
	Unsupported {
		/// Operation label.
		operation: &'static str,
	},
}
