//! Simple file-backed store for lightweight single-node deployments.

// std
use std::{
	collections::hash_map::Entry,
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCodeRecord, Client, ClientId, TokenRecord},
	store::{ClientRegistry, CodeStore, StoreError, StoreFuture, TokenStore},
};

#[derive(Clone, Debug, Default)]
struct State {
	clients: HashMap<ClientId, Client>,
	codes: HashMap<String, AuthorizationCodeRecord>,
	tokens: HashMap<String, TokenRecord>,
}
impl State {
	fn from_snapshot(snapshot: Snapshot) -> Self {
		Self {
			clients: snapshot.clients.into_iter().map(|c| (c.client_id.clone(), c)).collect(),
			codes: snapshot.codes.into_iter().map(|c| (c.code.expose().to_owned(), c)).collect(),
			tokens: snapshot.tokens.into_iter().map(|t| (t.token.expose().to_owned(), t)).collect(),
		}
	}
}

#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
	#[serde(default)]
	clients: Vec<Client>,
	#[serde(default)]
	codes: Vec<AuthorizationCodeRecord>,
	#[serde(default)]
	tokens: Vec<TokenRecord>,
}

/// Persists clients, codes, and tokens to a JSON file after each mutation.
///
/// Every mutation runs under the write lock and rewrites the snapshot through a temporary
/// file followed by a rename, so a crash never leaves a half-written store behind.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<State>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(State::from_snapshot(snapshot))) })
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(Snapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(Snapshot::default());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, state: &State) -> Result<(), StoreError> {
		let snapshot = Snapshot {
			clients: state.clients.values().cloned().collect(),
			codes: state.codes.values().cloned().collect(),
			tokens: state.tokens.values().cloned().collect(),
		};
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	/// Applies `mutate` to a copy of the state under the write lock. A reported change is
	/// committed in memory only after the snapshot has been persisted.
	fn mutate<T>(
		&self,
		mutate: impl FnOnce(&mut State) -> Result<(T, bool), StoreError>,
	) -> Result<T, StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();
		let (value, changed) = mutate(&mut next)?;

		if changed {
			self.persist_locked(&next)?;

			*guard = next;
		}

		Ok(value)
	}
}
impl ClientRegistry for FileStore {
	fn fetch_client<'a>(&'a self, client_id: &'a str) -> StoreFuture<'a, Option<Client>> {
		Box::pin(async move { Ok(self.inner.read().clients.get(client_id).cloned()) })
	}

	fn supports_registration(&self) -> bool {
		true
	}

	fn register_client(&self, client: Client) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|state| match state.clients.entry(client.client_id.clone()) {
				Entry::Occupied(_) => Err(StoreError::Conflict { collection: "clients" }),
				Entry::Vacant(slot) => {
					slot.insert(client);

					Ok(((), true))
				},
			})
		})
	}
}
impl CodeStore for FileStore {
	fn save_code(&self, record: AuthorizationCodeRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|state| match state.codes.entry(record.code.expose().to_owned()) {
				Entry::Occupied(_) => Err(StoreError::Conflict { collection: "codes" }),
				Entry::Vacant(slot) => {
					slot.insert(record);

					Ok(((), true))
				},
			})
		})
	}

	fn fetch_code<'a>(
		&'a self,
		code: &'a str,
	) -> StoreFuture<'a, Option<AuthorizationCodeRecord>> {
		Box::pin(async move { Ok(self.inner.read().codes.get(code).cloned()) })
	}

	fn take_code<'a>(
		&'a self,
		code: &'a str,
	) -> StoreFuture<'a, Option<AuthorizationCodeRecord>> {
		Box::pin(async move {
			self.mutate(|state| {
				let removed = state.codes.remove(code);
				let changed = removed.is_some();

				Ok((removed, changed))
			})
		})
	}

	fn purge_expired_codes(&self, instant: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async move {
			self.mutate(|state| {
				let before = state.codes.len();

				state.codes.retain(|_, record| !record.is_expired_at(instant));

				let removed = before - state.codes.len();

				Ok((removed, removed > 0))
			})
		})
	}
}
impl TokenStore for FileStore {
	fn save_token(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|state| match state.tokens.entry(record.token.expose().to_owned()) {
				Entry::Occupied(_) => Err(StoreError::Conflict { collection: "tokens" }),
				Entry::Vacant(slot) => {
					slot.insert(record);

					Ok(((), true))
				},
			})
		})
	}

	fn fetch_token<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async move { Ok(self.inner.read().tokens.get(token).cloned()) })
	}

	fn take_token<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async move {
			self.mutate(|state| {
				let removed = state.tokens.remove(token);
				let changed = removed.is_some();

				Ok((removed, changed))
			})
		})
	}

	fn purge_expired_tokens(&self, instant: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async move {
			self.mutate(|state| {
				let before = state.tokens.len();

				state.tokens.retain(|_, record| !record.is_expired_at(instant));

				let removed = before - state.tokens.len();

				Ok((removed, removed > 0))
			})
		})
	}
}
