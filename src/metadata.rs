//! RFC 8414 authorization-server and RFC 9728 protected-resource discovery documents.
//!
//! Documents are pure projections of validated configuration plus the provider's
//! [`Capabilities`](crate::provider::Capabilities); they are computed once and never persisted.

mod authorization_server;
mod protected_resource;

pub use authorization_server::*;
pub use protected_resource::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Well-known path of the authorization-server metadata document.
pub const AUTHORIZATION_SERVER_METADATA_PATH: &str = "/.well-known/oauth-authorization-server";
/// Well-known path of the protected-resource metadata document.
pub const PROTECTED_RESOURCE_METADATA_PATH: &str = "/.well-known/oauth-protected-resource";

/// Errors raised while validating an issuer identifier.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IssuerUrlError {
	/// The issuer is not an absolute URL.
	#[error("Issuer URL could not be parsed.")]
	Parse(#[from] url::ParseError),
	/// Plain HTTP is only tolerated for loopback development hosts.
	#[error("Issuer URL must use HTTPS: {url}.")]
	InsecureScheme {
		/// Rejected issuer.
		url: String,
	},
	/// Issuer identifiers cannot carry fragments.
	#[error("Issuer URL must not have a fragment: {url}.")]
	Fragment {
		/// Rejected issuer.
		url: String,
	},
	/// Issuer identifiers cannot carry query strings.
	#[error("Issuer URL must not have a query string: {url}.")]
	Query {
		/// Rejected issuer.
		url: String,
	},
}

/// Issuer identifier checked against the RFC 8414 §2 rules.
///
/// The scheme must be `https` unless the host is `localhost` or `127.0.0.1`, and neither a
/// fragment nor a query component may be present.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Url", into = "Url")]
pub struct IssuerUrl(Url);
impl IssuerUrl {
	/// Validates an already parsed URL.
	pub fn new(url: Url) -> Result<Self, IssuerUrlError> {
		if !is_secure_or_loopback(&url) {
			return Err(IssuerUrlError::InsecureScheme { url: url.to_string() });
		}
		if url.fragment().is_some() {
			return Err(IssuerUrlError::Fragment { url: url.to_string() });
		}
		if url.query().is_some() {
			return Err(IssuerUrlError::Query { url: url.to_string() });
		}

		Ok(Self(url))
	}

	/// Parses and validates an issuer string.
	pub fn parse(value: &str) -> Result<Self, IssuerUrlError> {
		Self::new(Url::parse(value)?)
	}

	/// Borrows the underlying URL.
	pub fn as_url(&self) -> &Url {
		&self.0
	}

	/// Returns the issuer as a string slice.
	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}
}
impl AsRef<Url> for IssuerUrl {
	fn as_ref(&self) -> &Url {
		&self.0
	}
}
impl Display for IssuerUrl {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}
impl FromStr for IssuerUrl {
	type Err = IssuerUrlError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl TryFrom<Url> for IssuerUrl {
	type Error = IssuerUrlError;

	fn try_from(value: Url) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<IssuerUrl> for Url {
	fn from(value: IssuerUrl) -> Self {
		value.0
	}
}

/// `https`, or plain `http` on `localhost`/`127.0.0.1`.
pub(crate) fn is_secure_or_loopback(url: &Url) -> bool {
	match url.scheme() {
		"https" => true,
		"http" => matches!(url.host_str(), Some("localhost" | "127.0.0.1")),
		_ => false,
	}
}

/// Builds the RFC 9728 metadata URL for a resource server: same origin, path replaced by
/// the well-known path, query and fragment dropped.
pub fn protected_resource_metadata_url(server_url: &Url) -> Url {
	let mut url = server_url.clone();

	url.set_path(PROTECTED_RESOURCE_METADATA_PATH);
	url.set_query(None);
	url.set_fragment(None);

	url
}

/// A discovery document resolved from a well-known path.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(untagged)]
pub enum DiscoveryDocument<'a> {
	/// RFC 8414 document.
	AuthorizationServer(&'a AuthorizationServerMetadata),
	/// RFC 9728 document.
	ProtectedResource(&'a ProtectedResourceMetadata),
}

/// Both discovery documents, computed once at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
	/// Authorization-server metadata.
	pub authorization_server: AuthorizationServerMetadata,
	/// Protected-resource metadata.
	pub protected_resource: ProtectedResourceMetadata,
}
impl Discovery {
	/// Derives both documents from their options.
	pub fn build(
		authorization_server: &AuthorizationServerOptions,
		protected_resource: &ProtectedResourceOptions,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			authorization_server: AuthorizationServerMetadata::build(authorization_server)?,
			protected_resource: ProtectedResourceMetadata::build(protected_resource),
		})
	}

	/// Resolves a request path against the well-known locations.
	pub fn resolve(&self, path: &str) -> Option<DiscoveryDocument<'_>> {
		match path.trim_end_matches('/') {
			AUTHORIZATION_SERVER_METADATA_PATH =>
				Some(DiscoveryDocument::AuthorizationServer(&self.authorization_server)),
			PROTECTED_RESOURCE_METADATA_PATH =>
				Some(DiscoveryDocument::ProtectedResource(&self.protected_resource)),
			_ => None,
		}
	}
}
