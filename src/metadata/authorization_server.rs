// self
use crate::{
	_prelude::*,
	auth::{ClientAuthMethod, PkceCodeChallengeMethod, ScopeSet},
	error::ConfigError,
	metadata::IssuerUrl,
	provider::Capabilities,
};

/// Inputs for [`AuthorizationServerMetadata::build`].
#[derive(Clone, Debug)]
pub struct AuthorizationServerOptions {
	/// Validated issuer identifier.
	pub issuer: IssuerUrl,
	/// Base for endpoint URLs; defaults to the issuer.
	pub base_url: Option<Url>,
	/// Scopes advertised to clients; omitted when empty.
	pub scopes_supported: ScopeSet,
	/// Human-readable documentation for developers.
	pub service_documentation: Option<Url>,
	/// Optional endpoints enabled on the provider.
	pub capabilities: Capabilities,
}
impl AuthorizationServerOptions {
	/// Creates options with no optional endpoints or advertised scopes.
	pub fn new(issuer: IssuerUrl) -> Self {
		Self {
			issuer,
			base_url: None,
			scopes_supported: ScopeSet::default(),
			service_documentation: None,
			capabilities: Capabilities::default(),
		}
	}

	/// Overrides the endpoint base URL.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Sets the advertised scopes.
	pub fn with_scopes_supported(mut self, scopes: ScopeSet) -> Self {
		self.scopes_supported = scopes;

		self
	}

	/// Sets the documentation URL.
	pub fn with_service_documentation(mut self, url: Url) -> Self {
		self.service_documentation = Some(url);

		self
	}

	/// Declares which optional endpoints are served.
	pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
		self.capabilities = capabilities;

		self
	}
}

/// RFC 8414 authorization-server metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationServerMetadata {
	/// Issuer identifier.
	pub issuer: Url,
	/// Authorization endpoint.
	pub authorization_endpoint: Url,
	/// Token endpoint.
	pub token_endpoint: Url,
	/// Dynamic registration endpoint; present only with the registration capability.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registration_endpoint: Option<Url>,
	/// Advertised scopes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scopes_supported: Option<Vec<String>>,
	/// Always `["code"]`.
	pub response_types_supported: Vec<String>,
	/// Grants the token endpoint accepts.
	pub grant_types_supported: Vec<String>,
	/// Client authentication methods at the token endpoint.
	pub token_endpoint_auth_methods_supported: Vec<String>,
	/// Developer documentation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_documentation: Option<Url>,
	/// Revocation endpoint; present only with the revocation capability.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub revocation_endpoint: Option<Url>,
	/// Client authentication methods at the revocation endpoint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub revocation_endpoint_auth_methods_supported: Option<Vec<String>>,
	/// Always `["S256"]`.
	pub code_challenge_methods_supported: Vec<String>,
}
impl AuthorizationServerMetadata {
	/// Derives the document from validated options.
	pub fn build(options: &AuthorizationServerOptions) -> Result<Self, ConfigError> {
		let base = options.base_url.as_ref().unwrap_or_else(|| options.issuer.as_url());
		let auth_methods = vec![ClientAuthMethod::ClientSecretPost.as_str().to_owned()];
		let scopes_supported = (!options.scopes_supported.is_empty())
			.then(|| options.scopes_supported.iter().map(str::to_owned).collect());
		let registration_endpoint = options
			.capabilities
			.registration
			.then(|| endpoint(base, "registration", "/register"))
			.transpose()?;
		let revocation_endpoint = options
			.capabilities
			.revocation
			.then(|| endpoint(base, "revocation", "/revoke"))
			.transpose()?;
		let revocation_endpoint_auth_methods_supported =
			revocation_endpoint.as_ref().map(|_| auth_methods.clone());

		Ok(Self {
			issuer: options.issuer.as_url().clone(),
			authorization_endpoint: endpoint(base, "authorization", "/authorize")?,
			token_endpoint: endpoint(base, "token", "/token")?,
			registration_endpoint,
			scopes_supported,
			response_types_supported: vec!["code".into()],
			grant_types_supported: vec!["authorization_code".into(), "refresh_token".into()],
			token_endpoint_auth_methods_supported: auth_methods,
			service_documentation: options.service_documentation.clone(),
			revocation_endpoint,
			revocation_endpoint_auth_methods_supported,
			code_challenge_methods_supported: vec![PkceCodeChallengeMethod::S256.as_str().into()],
		})
	}
}

fn endpoint(base: &Url, name: &'static str, path: &str) -> Result<Url, ConfigError> {
	base.join(path).map_err(|source| ConfigError::InvalidEndpoint { endpoint: name, source })
}
