//! Revocable HS256 bearer tokens.
//!
//! This crate provides:
//! - HS256 token issuance and verification over arbitrary claims
//! - Revocation through an expiring key-value store (in-memory or Redis)
//! - A swappable signing key per [`Handle`]
//! - Bearer token extraction from HTTP requests
//! - An optional process-wide default handle in [`global`]
//!
//! ```
//! use tokenguard_jwt::{ClaimSet, ClaimValue, Handle, MemoryStore};
//!
//! let handle = Handle::builder()
//!     .with_issuer("svc")
//!     .with_lifetime_secs(3600)
//!     .with_key("a-secret-of-at-least-thirty-two-bytes")
//!     .with_store(MemoryStore::new())
//!     .build();
//!
//! let mut claims = ClaimSet::new();
//! claims.insert("uid".into(), 42.into());
//! let token = handle.generate(&claims)?;
//!
//! assert_eq!(handle.parse(&token)?.get("uid"), Some(&ClaimValue::Int(42)));
//! handle.revoke(&token)?;
//! assert!(handle.parse(&token).unwrap_err().is_revoked());
//! assert!(handle.is_valid(&token));
//! # Ok::<(), tokenguard_jwt::TokenError>(())
//! ```

pub mod claims;
pub mod clock;
pub mod codec;
pub mod config;
pub(crate) mod crypto;
mod error;
pub mod global;
mod handle;
pub mod http;
pub mod key;
pub mod store;

pub use claims::{ClaimSet, ClaimValue, Claims, StandardFields};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::*;
pub use handle::{Handle, HandleBuilder};
pub use key::SigningKey;
pub use store::{MemoryStore, RevocationStore};
#[cfg(feature = "redis")]
pub use store::RedisStore;
