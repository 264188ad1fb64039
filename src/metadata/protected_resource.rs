// self
use crate::{_prelude::*, auth::ScopeSet, metadata::IssuerUrl};

/// Inputs for [`ProtectedResourceMetadata::build`].
#[derive(Clone, Debug)]
pub struct ProtectedResourceOptions {
	/// Authorization server that issues tokens for this resource.
	pub issuer: IssuerUrl,
	/// Canonical URL of the resource server.
	pub resource_server_url: Url,
	/// Scopes the resource understands; omitted when empty.
	pub scopes_supported: ScopeSet,
	/// Human-readable resource name.
	pub resource_name: Option<String>,
	/// Developer documentation.
	pub resource_documentation: Option<Url>,
}

/// RFC 9728 protected-resource metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedResourceMetadata {
	/// Resource identifier.
	pub resource: Url,
	/// Authorization servers trusted by the resource; always the single issuer.
	pub authorization_servers: Vec<Url>,
	/// Scopes the resource understands.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scopes_supported: Option<Vec<String>>,
	/// Human-readable resource name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_name: Option<String>,
	/// Developer documentation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_documentation: Option<Url>,
}
impl ProtectedResourceMetadata {
	/// Derives the document from validated options.
	pub fn build(options: &ProtectedResourceOptions) -> Self {
		Self {
			resource: options.resource_server_url.clone(),
			authorization_servers: vec![options.issuer.as_url().clone()],
			scopes_supported: (!options.scopes_supported.is_empty())
				.then(|| options.scopes_supported.iter().map(str::to_owned).collect()),
			resource_name: options.resource_name.clone(),
			resource_documentation: options.resource_documentation.clone(),
		}
	}
}
