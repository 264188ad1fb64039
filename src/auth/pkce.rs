//! PKCE (RFC 7636) challenge modeling and S256 verification.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::token::secret};

const MIN_LEN: usize = 43;
const MAX_LEN: usize = 128;

/// Supported PKCE challenge methods. Only `S256` is accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE.
	#[default]
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub const fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}
impl FromStr for PkceCodeChallengeMethod {
	type Err = PkceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"S256" => Ok(Self::S256),
			other => Err(PkceError::UnsupportedMethod { method: other.to_owned() }),
		}
	}
}

/// Errors raised while accepting a PKCE challenge.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PkceError {
	/// Only `S256` is supported.
	#[error("Unsupported code_challenge_method `{method}`.")]
	UnsupportedMethod {
		/// Method supplied by the client.
		method: String,
	},
	/// The challenge is not 43 to 128 characters of the unreserved set.
	#[error("The code_challenge is malformed.")]
	MalformedChallenge,
}
impl From<PkceError> for Error {
	fn from(e: PkceError) -> Self {
		Error::InvalidRequest { reason: e.to_string() }
	}
}

/// Base64url S256 digest bound to an authorization code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CodeChallenge(String);
impl CodeChallenge {
	/// Accepts a client-supplied S256 challenge after validating its shape.
	pub fn new(value: impl Into<String>) -> Result<Self, PkceError> {
		let value = value.into();

		if !is_well_formed(&value) {
			return Err(PkceError::MalformedChallenge);
		}

		Ok(Self(value))
	}

	/// Computes the S256 challenge for a verifier.
	pub fn from_verifier(verifier: &str) -> Self {
		let mut hasher = Sha256::new();

		hasher.update(verifier.as_bytes());

		let digest = hasher.finalize();

		Self(URL_SAFE_NO_PAD.encode(digest))
	}

	/// Challenge method; always `S256`.
	pub fn method(&self) -> PkceCodeChallengeMethod {
		PkceCodeChallengeMethod::S256
	}

	/// Returns the base64url challenge string.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Recomputes S256 over `verifier` and compares it against the stored challenge in
	/// constant time.
	pub fn verify(&self, verifier: &str) -> bool {
		let computed = Self::from_verifier(verifier);

		secret::constant_time_eq(computed.0.as_bytes(), self.0.as_bytes())
	}
}
impl Debug for CodeChallenge {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CodeChallenge").field(&self.0).finish()
	}
}
impl From<CodeChallenge> for String {
	fn from(value: CodeChallenge) -> Self {
		value.0
	}
}
impl TryFrom<String> for CodeChallenge {
	type Error = PkceError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

fn is_well_formed(value: &str) -> bool {
	(MIN_LEN..=MAX_LEN).contains(&value.len())
		&& value
			.bytes()
			.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	// RFC 7636 Appendix B.
	const VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
	const CHALLENGE: &str = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";

	#[test]
	fn rfc_vector_verifies() {
		let challenge = CodeChallenge::new(CHALLENGE).expect("RFC challenge should be accepted.");

		assert_eq!(CodeChallenge::from_verifier(VERIFIER), challenge);
		assert!(challenge.verify(VERIFIER));
		assert_eq!(challenge.method().as_str(), "S256");
	}

	#[test]
	fn wrong_verifiers_fail() {
		let challenge = CodeChallenge::new(CHALLENGE).expect("RFC challenge should be accepted.");

		assert!(!challenge.verify("wrong-verifier"));
		assert!(!challenge.verify(&VERIFIER.replace('d', "e")));
		assert!(!challenge.verify(""));
	}

	#[test]
	fn digest_matches_oauth2_client_side() {
		let verifier = oauth2::PkceCodeVerifier::new(VERIFIER.to_owned());
		let expected = oauth2::PkceCodeChallenge::from_code_verifier_sha256(&verifier);

		assert_eq!(CodeChallenge::from_verifier(VERIFIER).as_str(), expected.as_str());
	}

	#[test]
	fn short_verifiers_still_round_trip() {
		let challenge = CodeChallenge::from_verifier("verifier1");

		assert!(CodeChallenge::new(challenge.as_str()).is_ok());
		assert!(challenge.verify("verifier1"));
		assert!(!challenge.verify("verifier2"));
	}

	#[test]
	fn challenges_are_shape_checked() {
		assert_eq!(CodeChallenge::new("short"), Err(PkceError::MalformedChallenge));
		assert_eq!(CodeChallenge::new("a".repeat(129)), Err(PkceError::MalformedChallenge));
		assert_eq!(
			CodeChallenge::new(format!("{}+", "a".repeat(43))),
			Err(PkceError::MalformedChallenge)
		);
		assert!(PkceCodeChallengeMethod::from_str("plain").is_err());
		assert_eq!(PkceCodeChallengeMethod::from_str("S256"), Ok(PkceCodeChallengeMethod::S256));
	}
}
