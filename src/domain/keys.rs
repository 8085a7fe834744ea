//! Signing key material.

use std::fmt;

use anyhow::{Context, Result};

/// Hex-encoded secp256k1 private key.
///
/// Only the signer reads the inner value. `Debug` never prints it, so
/// the key can't leak through `tracing` fields or error chains.
#[derive(Clone)]
pub struct KeyMaterial(String);

impl KeyMaterial {
    pub fn new(hex_key: impl Into<String>) -> Self {
        Self(hex_key.into())
    }

    /// Read the key from an environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        let value = std::env::var(var).with_context(|| format!("{var} not set"))?;
        Ok(Self(value.trim().to_string()))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial([redacted])")
    }
}
