//! Token handle configuration

use crate::{error::ConfigError, key::SigningKey, store::DEFAULT_PREFIX};
use serde::Deserialize;

/// Issuer used when none is configured
pub const DEFAULT_ISSUER: &str = "tokenguard";
/// Token lifetime used when none is configured (two hours)
pub const DEFAULT_LIFETIME_SECS: u64 = 7200;
/// Built-in signing secret.
///
/// Deployments must replace it; anyone holding this value can mint tokens
/// for a handle that still uses it.
pub const DEFAULT_SIGNING_KEY: &str = "tokenguard/default-signing-key";

/// Environment variable overriding [`Config::issuer`]
pub const ENV_ISSUER: &str = "TOKENGUARD_ISSUER";
/// Environment variable overriding [`Config::lifetime_secs`]
pub const ENV_LIFETIME_SECS: &str = "TOKENGUARD_LIFETIME_SECS";
/// Environment variable overriding [`Config::signing_key`]
pub const ENV_SIGNING_KEY: &str = "TOKENGUARD_SIGNING_KEY";
/// Environment variable overriding [`Config::store_prefix`]
pub const ENV_STORE_PREFIX: &str = "TOKENGUARD_STORE_PREFIX";

/// Issuer, lifetime, signing secret and revocation namespace for a handle.
///
/// Deserializable from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `iss` written into every token
    pub issuer: String,
    /// Seconds between `iat` and `exp`
    pub lifetime_secs: u64,
    /// HS256 secret
    pub signing_key: SigningKey,
    /// Namespace prepended to revocation store keys
    pub store_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            lifetime_secs: DEFAULT_LIFETIME_SECS,
            signing_key: SigningKey::from(DEFAULT_SIGNING_KEY),
            store_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the `TOKENGUARD_*` environment variables,
    /// falling back to defaults for unset ones.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for an unparsable lifetime or an empty key.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(issuer) = lookup(ENV_ISSUER) {
            config.issuer = issuer;
        }
        if let Some(value) = lookup(ENV_LIFETIME_SECS) {
            config.lifetime_secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidLifetime { value })?;
        }
        if let Some(secret) = lookup(ENV_SIGNING_KEY) {
            if secret.is_empty() {
                return Err(ConfigError::EmptyKey {
                    name: ENV_SIGNING_KEY,
                });
            }
            config.signing_key = SigningKey::from(secret);
        } else {
            tracing::warn!("{ENV_SIGNING_KEY} is not set; using the built-in signing key");
        }
        if let Some(prefix) = lookup(ENV_STORE_PREFIX) {
            config.store_prefix = prefix;
        }

        Ok(config)
    }
}
