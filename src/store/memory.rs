//! Thread-safe in-memory store for local development, tests, and single-process deployments.

// std
use std::collections::hash_map::Entry;
// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCodeRecord, Client, ClientId, TokenRecord},
	store::{ClientRegistry, CodeStore, StoreError, StoreFuture, TokenStore},
};

type ClientMap = Arc<RwLock<HashMap<ClientId, Client>>>;
type CodeMap = Arc<RwLock<HashMap<String, AuthorizationCodeRecord>>>;
type TokenMap = Arc<RwLock<HashMap<String, TokenRecord>>>;

/// Storage backend that keeps clients, codes, and tokens in-process.
///
/// Each collection sits behind its own lock, so a take on one code never contends with
/// token verification. Cloning shares the underlying maps.
#[derive(Clone, Debug)]
pub struct MemoryStore {
	clients: ClientMap,
	codes: CodeMap,
	tokens: TokenMap,
	registration: bool,
}
impl MemoryStore {
	/// Builds a store whose registry refuses dynamic registration.
	pub fn without_registration() -> Self {
		Self { registration: false, ..Default::default() }
	}

	/// Seeds a pre-registered client, replacing any existing entry with the same id.
	pub fn insert_client(&self, client: Client) {
		self.clients.write().insert(client.client_id.clone(), client);
	}

	/// Number of live (unconsumed) authorization codes.
	pub fn code_count(&self) -> usize {
		self.codes.read().len()
	}

	/// Number of stored tokens, expired ones included until purged.
	pub fn token_count(&self) -> usize {
		self.tokens.read().len()
	}

	fn insert_new<V>(
		map: &RwLock<HashMap<String, V>>,
		key: String,
		value: V,
		collection: &'static str,
	) -> Result<(), StoreError> {
		match map.write().entry(key) {
			Entry::Occupied(_) => Err(StoreError::Conflict { collection }),
			Entry::Vacant(slot) => {
				slot.insert(value);

				Ok(())
			},
		}
	}

	fn purge_now<V>(map: &RwLock<HashMap<String, V>>, expired: impl Fn(&V) -> bool) -> usize {
		let mut guard = map.write();
		let before = guard.len();

		guard.retain(|_, value| !expired(value));

		before - guard.len()
	}
}
impl Default for MemoryStore {
	fn default() -> Self {
		Self {
			clients: Default::default(),
			codes: Default::default(),
			tokens: Default::default(),
			registration: true,
		}
	}
}
impl ClientRegistry for MemoryStore {
	fn fetch_client<'a>(&'a self, client_id: &'a str) -> StoreFuture<'a, Option<Client>> {
		let map = self.clients.clone();

		Box::pin(async move { Ok(map.read().get(client_id).cloned()) })
	}

	fn supports_registration(&self) -> bool {
		self.registration
	}

	fn register_client(&self, client: Client) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			if !self.registration {
				return Err(StoreError::Unsupported { operation: "register_client" });
			}

			match self.clients.write().entry(client.client_id.clone()) {
				Entry::Occupied(_) => Err(StoreError::Conflict { collection: "clients" }),
				Entry::Vacant(slot) => {
					slot.insert(client);

					Ok(())
				},
			}
		})
	}
}
impl CodeStore for MemoryStore {
	fn save_code(&self, record: AuthorizationCodeRecord) -> StoreFuture<'_, ()> {
		let map = self.codes.clone();

		Box::pin(async move {
			let key = record.code.expose().to_owned();

			Self::insert_new(&map, key, record, "codes")
		})
	}

	fn fetch_code<'a>(
		&'a self,
		code: &'a str,
	) -> StoreFuture<'a, Option<AuthorizationCodeRecord>> {
		let map = self.codes.clone();

		Box::pin(async move { Ok(map.read().get(code).cloned()) })
	}

	fn take_code<'a>(
		&'a self,
		code: &'a str,
	) -> StoreFuture<'a, Option<AuthorizationCodeRecord>> {
		let map = self.codes.clone();

		Box::pin(async move { Ok(map.write().remove(code)) })
	}

	fn purge_expired_codes(&self, instant: OffsetDateTime) -> StoreFuture<'_, usize> {
		let map = self.codes.clone();

		Box::pin(async move { Ok(Self::purge_now(&map, |record| record.is_expired_at(instant))) })
	}
}
impl TokenStore for MemoryStore {
	fn save_token(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		let map = self.tokens.clone();

		Box::pin(async move {
			let key = record.token.expose().to_owned();

			Self::insert_new(&map, key, record, "tokens")
		})
	}

	fn fetch_token<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		let map = self.tokens.clone();

		Box::pin(async move { Ok(map.read().get(token).cloned()) })
	}

	fn take_token<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		let map = self.tokens.clone();

		Box::pin(async move { Ok(map.write().remove(token)) })
	}

	fn purge_expired_tokens(&self, instant: OffsetDateTime) -> StoreFuture<'_, usize> {
		let map = self.tokens.clone();

		Box::pin(async move { Ok(Self::purge_now(&map, |record| record.is_expired_at(instant))) })
	}
}
