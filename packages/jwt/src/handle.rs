//! Token handle: issue, validate, parse and revoke tokens.
//!
//! A [`Handle`] binds a swappable signing key and a fixed issuer/lifetime
//! policy to the codec and a [`RevocationStore`].
//!
//! `is_valid` and `parse` answer different questions. `is_valid` only checks
//! that a token is well-formed, correctly signed and unexpired; it never
//! talks to the store, so a revoked but unexpired token is still "valid".
//! `parse` additionally requires that the token has not been revoked, and
//! fails whenever the store cannot be reached.

use crate::{
    claims::{ClaimSet, Claims, StandardFields},
    clock::{Clock, SystemClock},
    codec,
    config::Config,
    error::{TokenError, TokenResult},
    http,
    key::SigningKey,
    store::{MemoryStore, RevocationStore, store_key},
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Stateful token façade.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct Handle {
    key: RwLock<SigningKey>,
    issuer: String,
    lifetime_secs: i64,
    store_prefix: String,
    store: Arc<dyn RevocationStore>,
    clock: Arc<dyn Clock>,
}

impl Handle {
    /// Build a handle from `config` on top of `store`, using the wall clock
    pub fn new(config: Config, store: impl RevocationStore) -> Self {
        Self::builder().with_config(config).with_store(store).build()
    }

    /// Start a [`HandleBuilder`]
    #[must_use]
    pub fn builder() -> HandleBuilder {
        HandleBuilder::new()
    }

    /// Issuer written into every token
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Seconds between `iat` and `exp`
    #[must_use]
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Revocation store key for `token`
    #[must_use]
    pub fn store_key(&self, token: &str) -> String {
        store_key(&self.store_prefix, token)
    }

    /// Issue a token carrying `claims` plus `iat = now`, `exp = now + lifetime`
    /// and the configured issuer.
    ///
    /// # Errors
    /// Returns [`TokenError::Encoding`] if the claims cannot be encoded.
    pub fn generate(&self, claims: &ClaimSet) -> TokenResult<String> {
        let key = self.key.read();
        let issued_at = self.clock.now();
        let fields = StandardFields {
            expires_at: issued_at.saturating_add(self.lifetime_secs),
            issued_at,
            issuer: self.issuer.clone(),
        };
        codec::encode(claims, &fields, &key)
    }

    /// True when `token` is well-formed, signed with the current key and
    /// unexpired. Does not consult the revocation store.
    #[must_use]
    pub fn is_valid(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }

    /// Verify `token` and check that it has not been revoked.
    ///
    /// # Errors
    /// [`TokenError::InvalidToken`] if verification fails,
    /// [`TokenError::Revoked`] if the store holds a marker for it, and
    /// [`TokenError::Store`] if the store cannot answer.
    pub fn parse(&self, token: &str) -> TokenResult<Claims> {
        let claims = self.decode(token)?;
        if self.store.exists(&self.store_key(token))? {
            tracing::debug!(issuer = %claims.issuer(), "revoked token presented");
            return Err(TokenError::Revoked);
        }
        Ok(claims)
    }

    /// Revoke `token` until it would have expired anyway.
    ///
    /// Revoking the same token again is harmless.
    ///
    /// # Errors
    /// [`TokenError::InvalidToken`] if the token does not verify (nothing is
    /// stored), [`TokenError::Store`] if the store write fails.
    pub fn revoke(&self, token: &str) -> TokenResult<()> {
        let claims = self.decode(token)?;
        let remaining = claims
            .expires_at()
            .saturating_sub(self.clock.now())
            .max(0);
        let ttl_secs = u64::try_from(remaining).unwrap_or_default();
        self.store.set(&self.store_key(token), ttl_secs)?;
        tracing::debug!(ttl_secs, "token revoked");
        Ok(())
    }

    /// Replace the signing key.
    ///
    /// Tokens signed under the previous key stop verifying immediately.
    pub fn set_key(&self, key: impl Into<SigningKey>) -> &Self {
        *self.key.write() = key.into();
        self
    }

    /// [`Handle::is_valid`] on the token carried by `req`
    #[must_use]
    pub fn is_valid_request<B>(&self, req: &::http::Request<B>) -> bool {
        self.is_valid(&http::token_from_request(req))
    }

    /// [`Handle::parse`] on the token carried by `req`
    ///
    /// # Errors
    /// As [`Handle::parse`]; a request without a token is an invalid token.
    pub fn parse_request<B>(&self, req: &::http::Request<B>) -> TokenResult<Claims> {
        self.parse(&http::token_from_request(req))
    }

    /// [`Handle::is_valid`] on the token carried by `req`, including an
    /// urlencoded body
    #[must_use]
    pub fn is_valid_request_with_body<B: AsRef<[u8]>>(&self, req: &::http::Request<B>) -> bool {
        self.is_valid(&http::token_from_request_with_body(req))
    }

    /// [`Handle::parse`] on the token carried by `req`, including an
    /// urlencoded body
    ///
    /// # Errors
    /// As [`Handle::parse_request`].
    pub fn parse_request_with_body<B: AsRef<[u8]>>(
        &self,
        req: &::http::Request<B>,
    ) -> TokenResult<Claims> {
        self.parse(&http::token_from_request_with_body(req))
    }

    /// Decode under the key's read lock; the lock is released on return.
    fn decode(&self, token: &str) -> TokenResult<Claims> {
        let key = self.key.read();
        codec::decode(token, &key, self.clock.now())
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("issuer", &self.issuer)
            .field("lifetime_secs", &self.lifetime_secs)
            .field("store_prefix", &self.store_prefix)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Handle`].
///
/// Unset parts fall back to [`Config::default`], an in-memory store and the
/// wall clock.
#[must_use]
pub struct HandleBuilder {
    config: Config,
    store: Option<Arc<dyn RevocationStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl HandleBuilder {
    /// Builder seeded with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            store: None,
            clock: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the issuer
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.config.issuer = issuer.into();
        self
    }

    /// Set the token lifetime in seconds
    pub fn with_lifetime_secs(mut self, lifetime_secs: u64) -> Self {
        self.config.lifetime_secs = lifetime_secs;
        self
    }

    /// Set the signing key
    pub fn with_key(mut self, key: impl Into<SigningKey>) -> Self {
        self.config.signing_key = key.into();
        self
    }

    /// Set the revocation key namespace
    pub fn with_store_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.store_prefix = prefix.into();
        self
    }

    /// Set the revocation store
    pub fn with_store(mut self, store: impl RevocationStore) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set the time source
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Finish the handle
    pub fn build(self) -> Handle {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::with_clock(Arc::clone(&clock))));
        Handle {
            key: RwLock::new(self.config.signing_key),
            issuer: self.config.issuer,
            lifetime_secs: i64::try_from(self.config.lifetime_secs).unwrap_or(i64::MAX),
            store_prefix: self.config.store_prefix,
            store,
            clock,
        }
    }
}

impl Default for HandleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::{Rejection, StoreError};

    fn uid_claims() -> ClaimSet {
        let mut claims = ClaimSet::new();
        claims.insert("uid".into(), 42.into());
        claims
    }

    struct Outage;

    impl RevocationStore for Outage {
        fn set(&self, _key: &str, _ttl_secs: u64) -> Result<(), StoreError> {
            Err(StoreError::new("store unavailable"))
        }

        fn exists(&self, _key: &str) -> Result<bool, StoreError> {
            Err(StoreError::new("store unavailable"))
        }
    }

    #[test]
    fn builder_defaults_match_config_defaults() {
        let handle = Handle::builder().build();
        let config = Config::default();
        assert_eq!(handle.issuer(), config.issuer);
        assert_eq!(handle.lifetime_secs(), 7200);
        assert!(handle.store_key("t").starts_with(&config.store_prefix));
    }

    #[test]
    fn empty_token_is_never_valid() {
        let handle = Handle::builder().with_key("secret").build();
        assert!(!handle.is_valid(""));
        assert!(handle.parse("").unwrap_err().is_invalid());
        assert!(handle.revoke("").unwrap_err().is_invalid());
    }

    #[test]
    fn store_outage_fails_parse_but_not_is_valid() {
        let handle = Handle::builder()
            .with_key("secret")
            .with_store(Outage)
            .build();
        let token = handle.generate(&uid_claims()).unwrap();
        assert!(handle.is_valid(&token));

        let err = handle.parse(&token).unwrap_err();
        assert!(matches!(err, TokenError::Store(_)));
        assert_eq!(err.to_string(), "store unavailable");

        assert!(matches!(handle.revoke(&token), Err(TokenError::Store(_))));
    }

    #[test]
    fn revoking_invalid_token_stores_nothing() {
        let clock = ManualClock::new(1000);
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let handle = Handle::builder()
            .with_key("secret")
            .with_clock(clock)
            .with_store(Arc::clone(&store))
            .build();

        let err = handle.revoke("not.a.token").unwrap_err();
        assert!(err.is_invalid());
        assert!(store.is_empty());
    }

    #[test]
    fn expired_token_cannot_be_revoked() {
        let clock = ManualClock::new(1000);
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let handle = Handle::builder()
            .with_key("secret")
            .with_lifetime_secs(60)
            .with_clock(clock.clone())
            .with_store(Arc::clone(&store))
            .build();

        let token = handle.generate(&uid_claims()).unwrap();
        clock.advance(60);
        let err = handle.revoke(&token).unwrap_err();
        assert_eq!(
            err.rejection(),
            Some(&Rejection::Expired { expires_at: 1060 })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn reserved_claims_fail_generation() {
        let handle = Handle::builder().with_key("secret").build();
        let mut claims = uid_claims();
        claims.insert("iss".into(), "someone-else".into());
        assert!(matches!(
            handle.generate(&claims),
            Err(TokenError::Encoding(_))
        ));
    }

    #[test]
    fn flat_view_names_fail_generation() {
        let handle = Handle::builder()
            .with_issuer("svc")
            .with_key("secret")
            .build();
        let mut claims = uid_claims();
        claims.insert("issuer".into(), "caller-value".into());
        claims.insert("expiresAt".into(), 1.into());
        assert!(matches!(
            handle.generate(&claims),
            Err(TokenError::Encoding(_))
        ));
    }

    #[test]
    fn form_body_token_is_read_by_body_variants() {
        let clock = ManualClock::new(1000);
        let handle = Handle::builder()
            .with_key("secret")
            .with_clock(clock.clone())
            .with_store(MemoryStore::with_clock(clock))
            .build();
        let token = handle.generate(&uid_claims()).unwrap();
        let req = ::http::Request::builder()
            .method("POST")
            .uri("/logout")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(format!("Authorization={token}").into_bytes())
            .unwrap();

        assert!(!handle.is_valid_request(&req));
        assert!(handle.is_valid_request_with_body(&req));
        let claims = handle.parse_request_with_body(&req).unwrap();
        assert_eq!(claims.get("uid"), Some(&crate::claims::ClaimValue::Int(42)));

        handle.revoke(&token).unwrap();
        assert!(handle.parse_request_with_body(&req).unwrap_err().is_revoked());
    }

    #[test]
    fn handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Handle>();
    }
}
