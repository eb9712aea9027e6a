//! HMAC signing key management

use rand::Rng;
use serde::Deserialize;
use std::fmt;
use zeroize::Zeroizing;

/// Recommended minimum HS256 secret length (256 bits)
pub const RECOMMENDED_KEY_LEN: usize = 32;

/// Symmetric signing secret.
///
/// The bytes are wiped on drop and never printed by `Debug`. Any length is
/// accepted; secrets shorter than [`RECOMMENDED_KEY_LEN`] are logged.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Wrap raw secret bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        if bytes.len() < RECOMMENDED_KEY_LEN {
            tracing::warn!(
                len = bytes.len(),
                recommended = RECOMMENDED_KEY_LEN,
                "HS256 signing key is shorter than recommended"
            );
        }
        Self(Zeroizing::new(bytes))
    }

    /// Generate a random secret of the recommended length
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; RECOMMENDED_KEY_LEN];
        rand::rng().fill(bytes.as_mut_slice());
        Self(Zeroizing::new(bytes))
    }

    /// Secret bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Secret length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-length secret
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for SigningKey {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for SigningKey {
    fn from(bytes: &[u8; N]) -> Self {
        Self::new(bytes.as_slice())
    }
}

impl From<Vec<u8>> for SigningKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for SigningKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes())
    }
}

impl From<String> for SigningKey {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_secret() {
        let key = SigningKey::from("hunter2-hunter2-hunter2-hunter2!");
        let printed = format!("{key:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("len: 32"));
    }

    #[test]
    fn short_keys_are_accepted() {
        let key = SigningKey::from("secret");
        assert_eq!(key.as_bytes(), b"secret");
    }

    #[test]
    fn generated_keys_differ() {
        let a = SigningKey::generate();
        let b = SigningKey::generate();
        assert_eq!(a.len(), RECOMMENDED_KEY_LEN);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn deserializes_from_string() {
        let key: SigningKey = serde_json::from_str(r#""from-config""#).unwrap();
        assert_eq!(key.as_bytes(), b"from-config");
    }
}
