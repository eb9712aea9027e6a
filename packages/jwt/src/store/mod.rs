//! Revocation store capability.
//!
//! The token handle only needs two operations from its backing store: write
//! a marker that expires after a number of seconds, and ask whether an
//! unexpired marker exists. Entries are keyed by [`store_key`], a hashed and
//! namespaced form of the raw token.

use crate::error::StoreError;
use sha2::{Digest, Sha256};
use std::sync::Arc;

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;

/// Default namespace for revocation markers
pub const DEFAULT_PREFIX: &str = "tokenguard:revoked:";

/// Expiring key-value store used to blacklist tokens.
pub trait RevocationStore: Send + Sync + 'static {
    /// Store a marker under `key` that expires after `ttl_secs`.
    ///
    /// A zero TTL must still write the marker.
    ///
    /// # Errors
    /// Returns the backend failure unchanged.
    fn set(&self, key: &str, ttl_secs: u64) -> Result<(), StoreError>;

    /// True iff an unexpired marker is present under `key`.
    ///
    /// # Errors
    /// Returns the backend failure unchanged.
    fn exists(&self, key: &str) -> Result<bool, StoreError>;
}

impl<S: RevocationStore + ?Sized> RevocationStore for Arc<S> {
    fn set(&self, key: &str, ttl_secs: u64) -> Result<(), StoreError> {
        (**self).set(key, ttl_secs)
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        (**self).exists(key)
    }
}

/// Fixed-width revocation key for `token`: `prefix` followed by the hex
/// SHA-256 of the raw token string.
#[must_use]
pub fn store_key(prefix: &str, token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{prefix}{}", hex::encode(digest))
}
