//! Walks an MCP-style client through dynamic registration, authorization with PKCE, the code
//! exchange, a refresh rotation, bearer verification, and revocation against the in-memory
//! store, printing the discovery documents along the way.

// std
use std::sync::Arc;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use oauth2_authority::{
	auth::{ClientMetadata, CodeChallenge, ScopeSet, TokenKind},
	config::ServerConfig,
	metadata::{AUTHORIZATION_SERVER_METADATA_PATH, PROTECTED_RESOURCE_METADATA_PATH},
	provider::{AuthorizationParams, AuthorizationProvider},
	store::MemoryStore,
};

const VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ServerConfig::from_json_slice(
		br#"{
			"issuer": "http://localhost:8080",
			"scopes_supported": ["mcp:read", "mcp:tools"],
			"resource_server_url": "http://localhost:3000/mcp",
			"resource_name": "Demo MCP server"
		}"#,
	)?
	.validate()?;
	let provider =
		config.configure(AuthorizationProvider::with_store(Arc::new(MemoryStore::default())));
	let discovery = config.discovery(provider.capabilities())?;

	for path in [AUTHORIZATION_SERVER_METADATA_PATH, PROTECTED_RESOURCE_METADATA_PATH] {
		let document =
			discovery.resolve(path).ok_or_else(|| eyre!("{} did not resolve", path))?;

		println!("GET {path}\n{}", serde_json::to_string_pretty(&document)?);
	}

	let client =
		provider.register_client(ClientMetadata::new(["http://localhost:6274/callback"])).await?;
	let client_secret = client.client_secret.as_ref().map(|secret| secret.expose().to_owned());

	println!("registered {}", client.client_id);

	let params = AuthorizationParams::new(
		client.redirect_uris[0].clone(),
		CodeChallenge::from_verifier(VERIFIER),
	)
	.with_scope(ScopeSet::new(["mcp:read", "mcp:tools"])?)
	.with_state("demo-state");
	let redirect = provider.authorize(&client, params).await?;
	let code = redirect
		.query_pairs()
		.find(|(key, _)| key == "code")
		.map(|(_, value)| value.into_owned())
		.ok_or_else(|| eyre!("redirect is missing the code"))?;

	println!("redirecting to {}", redirect.origin().ascii_serialization());

	let authenticated =
		provider.authenticate_client(&client.client_id, client_secret.as_deref()).await?;
	let tokens =
		provider.exchange_authorization_code(&authenticated, &code, Some(VERIFIER), None).await?;

	println!("token response: {}", serde_json::to_string(&tokens)?);

	let verified = provider.verify_access_token(tokens.access_token.expose()).await?;

	println!("verified token for {} with scope `{}`", verified.client_id, verified.scope);

	let refresh = tokens.refresh_token.ok_or_else(|| eyre!("refresh token missing"))?;
	let rotated = provider
		.exchange_refresh_token(
			&authenticated,
			refresh.expose(),
			Some(ScopeSet::new(["mcp:read"])?),
		)
		.await?;

	println!("narrowed access token scope: {:?}", rotated.scope);

	provider
		.revoke_token(&authenticated, rotated.access_token.expose(), Some(TokenKind::Access))
		.await?;

	match provider.verify_access_token(rotated.access_token.expose()).await {
		Ok(_) => return Err(eyre!("revoked token still verifies")),
		Err(e) => println!("after revocation: {} ({})", e, e.status_code()),
	}

	println!("metrics: {:?}", provider.metrics());

	Ok(())
}
