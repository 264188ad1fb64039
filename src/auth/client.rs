//! Registered OAuth clients and dynamic-registration input.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, token::secret::TokenSecret},
};

/// Token endpoint authentication methods a client may register with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// Form POST body parameters for `client_id`/`client_secret`.
	#[default]
	ClientSecretPost,
	/// Public clients that prove possession via PKCE only.
	None,
}
impl ClientAuthMethod {
	/// Returns the RFC 7591 identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClientAuthMethod::ClientSecretPost => "client_secret_post",
			ClientAuthMethod::None => "none",
		}
	}
}

/// A registered client. Immutable once created.
#[derive(Clone, Serialize, Deserialize)]
pub struct Client {
	/// Unique client identity.
	pub client_id: ClientId,
	/// Human-readable name supplied at registration.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_name: Option<String>,
	/// Non-empty, ordered list of absolute redirect URIs.
	pub redirect_uris: Vec<Url>,
	/// Secret for confidential clients; `None` for public clients.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<TokenSecret>,
	/// Registration instant.
	#[serde(rename = "client_id_issued_at", with = "time::serde::timestamp")]
	pub issued_at: OffsetDateTime,
}
impl Client {
	/// Builds a public client with the provided redirect URIs.
	pub fn new(client_id: ClientId, redirect_uris: Vec<Url>) -> Self {
		Self {
			client_id,
			client_name: None,
			redirect_uris,
			client_secret: None,
			issued_at: OffsetDateTime::now_utc(),
		}
	}

	/// Attaches a client secret, turning the client confidential.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the human-readable name.
	pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
		self.client_name = Some(name.into());

		self
	}

	/// Returns `true` when the client authenticates with a secret.
	pub fn is_confidential(&self) -> bool {
		self.client_secret.is_some()
	}

	/// Resolves the redirect URI for an authorization request.
	///
	/// An explicit URI must equal one of the registered URIs. Without one, the client's sole
	/// registered URI is used; clients with several registered URIs must name one.
	pub fn resolve_redirect_uri(&self, requested: Option<&Url>) -> Result<Url> {
		match requested {
			Some(uri) if self.redirect_uris.contains(uri) => Ok(uri.clone()),
			Some(_) => Err(Error::InvalidRequest { reason: "Unregistered redirect_uri".into() }),
			None => match self.redirect_uris.as_slice() {
				[only] => Ok(only.clone()),
				_ => Err(Error::InvalidRequest {
					reason: "redirect_uri must be specified when the client has multiple \
					         registered URIs"
						.into(),
				}),
			},
		}
	}

	/// Checks `client_secret_post` credentials. Public clients accept no secret.
	pub fn authenticate(&self, presented: Option<&str>) -> Result<()> {
		match (&self.client_secret, presented) {
			(None, _) => Ok(()),
			(Some(expected), Some(presented)) if expected.matches(presented) => Ok(()),
			(Some(_), Some(_)) => Err(Error::invalid_client("Invalid client_secret")),
			(Some(_), None) => Err(Error::invalid_client("Client secret is required")),
		}
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("client_id", &self.client_id)
			.field("client_name", &self.client_name)
			.field("redirect_uris", &self.redirect_uris)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("issued_at", &self.issued_at)
			.finish()
	}
}

/// RFC 7591 registration request subset accepted by the authority.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetadata {
	/// Raw redirect URIs; validated during registration.
	pub redirect_uris: Vec<String>,
	/// Optional human-readable name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_name: Option<String>,
	/// Requested token endpoint authentication method.
	#[serde(default)]
	pub token_endpoint_auth_method: ClientAuthMethod,
}
impl ClientMetadata {
	/// Creates registration input for the provided redirect URIs.
	pub fn new<I, S>(redirect_uris: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			redirect_uris: redirect_uris.into_iter().map(Into::into).collect(),
			..Default::default()
		}
	}

	/// Parses and checks redirect URIs: at least one, all absolute, none with a fragment.
	pub fn validated_redirect_uris(&self) -> Result<Vec<Url>> {
		if self.redirect_uris.is_empty() {
			return Err(Error::InvalidClientMetadata {
				reason: "At least one redirect_uri is required".into(),
			});
		}

		self.redirect_uris
			.iter()
			.map(|raw| {
				let uri = Url::parse(raw).map_err(|e| Error::InvalidClientMetadata {
					reason: format!("redirect_uri `{raw}` is not an absolute URL: {e}"),
				})?;

				if uri.fragment().is_some() {
					return Err(Error::InvalidClientMetadata {
						reason: format!("redirect_uri `{raw}` must not contain a fragment"),
					});
				}

				Ok(uri)
			})
			.collect()
	}
}
