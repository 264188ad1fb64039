//! Authority configuration: serde-backed settings validated once at startup.
//!
//! [`ServerConfig`] is the raw document (typically JSON). [`ServerConfig::validate`] checks
//! the issuer invariant, URL schemes, scopes, and lifetimes, producing a [`ValidatedConfig`]
//! that configures the [`AuthorizationProvider`] and derives the [`Discovery`] documents.
//! Any failure here is fatal.

// self
use crate::{
	_prelude::*,
	auth::ScopeSet,
	error::ConfigError,
	metadata::{
		self, AuthorizationServerOptions, Discovery, IssuerUrl, ProtectedResourceOptions,
	},
	provider::{
		AuthorizationProvider, Capabilities, DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_CODE_TTL,
		DEFAULT_REFRESH_TOKEN_TTL, RefreshPolicy, TokenPolicy,
	},
};

/// Longest lifetime any setting accepts: ten years.
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Token lifetimes (in seconds) and grant rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
	/// Access token lifetime.
	pub access_token_ttl_secs: i64,
	/// Authorization code lifetime.
	pub code_ttl_secs: i64,
	/// Require `code_verifier` on every code exchange.
	pub pkce_required: bool,
	/// Issue rotating refresh tokens.
	pub refresh_tokens: bool,
	/// Refresh token lifetime; `null` never expires.
	pub refresh_token_ttl_secs: Option<i64>,
}
impl TokenSettings {
	/// Converts the settings into a provider policy.
	pub fn to_policy(&self) -> Result<TokenPolicy, ConfigError> {
		let refresh = if self.refresh_tokens {
			RefreshPolicy::Rotate {
				ttl: self
					.refresh_token_ttl_secs
					.map(|secs| positive("refresh_token_ttl_secs", secs))
					.transpose()?,
			}
		} else {
			RefreshPolicy::Disabled
		};

		Ok(TokenPolicy {
			access_token_ttl: positive("access_token_ttl_secs", self.access_token_ttl_secs)?,
			code_ttl: positive("code_ttl_secs", self.code_ttl_secs)?,
			pkce_required: self.pkce_required,
			refresh,
		})
	}
}
impl Default for TokenSettings {
	fn default() -> Self {
		Self {
			access_token_ttl_secs: DEFAULT_ACCESS_TOKEN_TTL.whole_seconds(),
			code_ttl_secs: DEFAULT_CODE_TTL.whole_seconds(),
			pkce_required: true,
			refresh_tokens: true,
			refresh_token_ttl_secs: Some(DEFAULT_REFRESH_TOKEN_TTL.whole_seconds()),
		}
	}
}

/// Raw authority configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
	/// Issuer identifier; validated by [`ServerConfig::validate`].
	pub issuer: String,
	/// Base URL for endpoints when it differs from the issuer.
	#[serde(default)]
	pub base_url: Option<Url>,
	/// Developer documentation advertised in both documents.
	#[serde(default)]
	pub service_documentation_url: Option<Url>,
	/// Scopes advertised to clients.
	#[serde(default)]
	pub scopes_supported: Vec<String>,
	/// Canonical URL of the protected resource; defaults to the issuer.
	#[serde(default)]
	pub resource_server_url: Option<Url>,
	/// Human-readable resource name.
	#[serde(default)]
	pub resource_name: Option<String>,
	/// Serve the revocation endpoint.
	#[serde(default = "enabled")]
	pub revocation: bool,
	/// Serve the registration endpoint when the registry supports it.
	#[serde(default = "enabled")]
	pub registration: bool,
	/// Token lifetimes and grant rules.
	#[serde(default)]
	pub tokens: TokenSettings,
}
impl ServerConfig {
	/// Creates a configuration for `issuer` with every other setting at its default.
	pub fn new(issuer: impl Into<String>) -> Self {
		Self {
			issuer: issuer.into(),
			base_url: None,
			service_documentation_url: None,
			scopes_supported: Vec::new(),
			resource_server_url: None,
			resource_name: None,
			revocation: true,
			registration: true,
			tokens: TokenSettings::default(),
		}
	}

	/// Parses a JSON document; errors name the offending field path.
	pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_slice(bytes);

		Ok(serde_path_to_error::deserialize(&mut deserializer)?)
	}

	/// Checks every invariant once and returns the validated form.
	pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
		let issuer = IssuerUrl::parse(&self.issuer)?;

		if let Some(base_url) = &self.base_url {
			ensure_secure("base_url", base_url)?;
		}

		let resource_server_url =
			self.resource_server_url.clone().unwrap_or_else(|| issuer.as_url().clone());

		ensure_secure("resource_server_url", &resource_server_url)?;

		Ok(ValidatedConfig {
			issuer,
			base_url: self.base_url.clone(),
			service_documentation: self.service_documentation_url.clone(),
			scopes_supported: ScopeSet::new(self.scopes_supported.iter().cloned())?,
			resource_server_url,
			resource_name: self.resource_name.clone(),
			revocation: self.revocation,
			registration: self.registration,
			policy: self.tokens.to_policy()?,
		})
	}
}

/// Configuration that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedConfig {
	/// Validated issuer.
	pub issuer: IssuerUrl,
	/// Endpoint base URL override.
	pub base_url: Option<Url>,
	/// Developer documentation.
	pub service_documentation: Option<Url>,
	/// Normalized advertised scopes.
	pub scopes_supported: ScopeSet,
	/// Canonical protected resource URL.
	pub resource_server_url: Url,
	/// Human-readable resource name.
	pub resource_name: Option<String>,
	/// Revocation requested.
	pub revocation: bool,
	/// Registration requested.
	pub registration: bool,
	/// Token policy.
	pub policy: TokenPolicy,
}
impl ValidatedConfig {
	/// Applies the policy and requested capabilities to a provider.
	pub fn configure(&self, provider: AuthorizationProvider) -> AuthorizationProvider {
		provider
			.with_policy(self.policy)
			.with_revocation(self.revocation)
			.with_registration(self.registration)
	}

	/// Options for the authorization-server document.
	pub fn authorization_server_options(
		&self,
		capabilities: Capabilities,
	) -> AuthorizationServerOptions {
		AuthorizationServerOptions {
			issuer: self.issuer.clone(),
			base_url: self.base_url.clone(),
			scopes_supported: self.scopes_supported.clone(),
			service_documentation: self.service_documentation.clone(),
			capabilities,
		}
	}

	/// Options for the protected-resource document.
	pub fn protected_resource_options(&self) -> ProtectedResourceOptions {
		ProtectedResourceOptions {
			issuer: self.issuer.clone(),
			resource_server_url: self.resource_server_url.clone(),
			scopes_supported: self.scopes_supported.clone(),
			resource_name: self.resource_name.clone(),
			resource_documentation: self.service_documentation.clone(),
		}
	}

	/// Derives both discovery documents for a provider with `capabilities`.
	pub fn discovery(&self, capabilities: Capabilities) -> Result<Discovery, ConfigError> {
		Discovery::build(
			&self.authorization_server_options(capabilities),
			&self.protected_resource_options(),
		)
	}
}

fn enabled() -> bool {
	true
}

fn positive(field: &'static str, secs: i64) -> Result<Duration, ConfigError> {
	if secs <= 0 {
		return Err(ConfigError::NonPositiveTtl { field });
	}
	if secs > MAX_TTL_SECS {
		return Err(ConfigError::TtlOutOfRange { field });
	}

	Ok(Duration::seconds(secs))
}

fn ensure_secure(endpoint: &'static str, url: &Url) -> Result<(), ConfigError> {
	if metadata::is_secure_or_loopback(url) {
		Ok(())
	} else {
		Err(ConfigError::InsecureEndpoint { endpoint, url: url.to_string() })
	}
}
