//! Opaque token records and the secret wrapper used for codes, tokens, and client secrets.

pub mod record;
pub mod secret;
