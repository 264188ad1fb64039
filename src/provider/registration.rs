// self
use crate::{
	_prelude::*,
	auth::{Client, ClientAuthMethod, ClientId, ClientMetadata, TokenSecret},
	obs::OperationKind,
	provider::AuthorizationProvider,
};

impl AuthorizationProvider {
	/// Registers a client from RFC 7591 metadata.
	///
	/// The provider assigns a random `client_id`; `client_secret_post` clients also receive a
	/// random secret, which is only observable on the returned [`Client`].
	pub async fn register_client(&self, metadata: ClientMetadata) -> Result<Client> {
		self.observe(OperationKind::RegisterClient, "register_client", async move {
			if !self.capabilities.registration {
				return Err(Error::Unsupported { capability: "registration" });
			}

			let redirect_uris = metadata.validated_redirect_uris()?;
			let mut client = Client::new(ClientId::generate(), redirect_uris);

			if let Some(name) = metadata.client_name {
				client = client.with_client_name(name);
			}
			if metadata.token_endpoint_auth_method == ClientAuthMethod::ClientSecretPost {
				client = client.with_client_secret(TokenSecret::generate().expose());
			}

			self.clients.register_client(client.clone()).await?;

			Ok(client)
		})
		.await
	}

	/// Looks up a registered client.
	pub async fn fetch_client(&self, client_id: &str) -> Result<Option<Client>> {
		Ok(self.clients.fetch_client(client_id).await?)
	}

	/// Resolves a client and checks its `client_secret_post` credentials in constant time.
	///
	/// Unknown clients and bad secrets both fail with [`Error::InvalidClient`].
	pub async fn authenticate_client(
		&self,
		client_id: &str,
		client_secret: Option<&str>,
	) -> Result<Client> {
		let client = self
			.fetch_client(client_id)
			.await?
			.ok_or_else(|| Error::invalid_client("Unknown client"))?;

		client.authenticate(client_secret)?;

		Ok(client)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{provider::fixtures, store::MemoryStore};

	#[tokio::test]
	async fn registration_issues_credentials() {
		let (provider, _) = fixtures::provider();
		let mut metadata = ClientMetadata::new(["https://app.example.com/cb"]);

		metadata.client_name = Some("Example".into());

		let client = provider.register_client(metadata).await.expect("Registration should succeed.");
		let secret = client
			.client_secret
			.as_ref()
			.map(|secret| secret.expose().to_owned())
			.expect("Confidential clients should receive a secret.");

		assert_eq!(client.client_name.as_deref(), Some("Example"));

		let authenticated = provider
			.authenticate_client(&client.client_id, Some(&secret))
			.await
			.expect("Issued credentials should authenticate.");

		assert_eq!(authenticated.client_id, client.client_id);
		assert!(matches!(
			provider.authenticate_client(&client.client_id, Some("wrong")).await,
			Err(Error::InvalidClient { .. })
		));
		assert!(matches!(
			provider.authenticate_client("unknown", None).await,
			Err(Error::InvalidClient { .. })
		));
	}

	#[tokio::test]
	async fn public_clients_get_no_secret() {
		let (provider, _) = fixtures::provider();
		let mut metadata = ClientMetadata::new(["http://localhost:3000/cb"]);

		metadata.token_endpoint_auth_method = ClientAuthMethod::None;

		let client = provider.register_client(metadata).await.expect("Registration should succeed.");

		assert!(!client.is_confidential());
		assert!(provider.authenticate_client(&client.client_id, None).await.is_ok());
	}

	#[tokio::test]
	async fn invalid_metadata_and_disabled_registration_fail() {
		let (provider, _) = fixtures::provider();

		assert!(matches!(
			provider.register_client(ClientMetadata::new(["not a url"])).await,
			Err(Error::InvalidClientMetadata { .. })
		));

		let read_only =
			AuthorizationProvider::with_store(Arc::new(MemoryStore::without_registration()));

		assert!(!read_only.capabilities().registration);
		assert!(matches!(
			read_only.register_client(ClientMetadata::new(["https://app.example.com/cb"])).await,
			Err(Error::Unsupported { capability: "registration" })
		));
		assert!(!fixtures::provider().0.with_registration(false).capabilities().registration);
	}
}
