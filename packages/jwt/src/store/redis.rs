//! Redis-backed revocation store.
//!
//! Markers are written with `SET key 1 PX <millis>` and checked with
//! `EXISTS`. Redis refuses a zero expiry, so a zero TTL becomes a one
//! millisecond marker: the write still happens and lapses right away.

use super::RevocationStore;
use crate::error::StoreError;
use parking_lot::Mutex;

/// Revocation store talking to a single Redis server.
///
/// The connection is opened on first use and discarded after an I/O
/// failure, so the next call reconnects.
pub struct RedisStore {
    client: ::redis::Client,
    conn: Mutex<Option<::redis::Connection>>,
}

impl RedisStore {
    /// Create a store for `url` (e.g. `redis://127.0.0.1/0`).
    ///
    /// # Errors
    /// Returns an error if the URL cannot be parsed. No connection is made yet.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let client = ::redis::Client::open(url).map_err(StoreError::new)?;
        Ok(Self::from_client(client))
    }

    /// Create a store around an existing client
    #[must_use]
    pub fn from_client(client: ::redis::Client) -> Self {
        Self {
            client,
            conn: Mutex::new(None),
        }
    }

    fn query<T: ::redis::FromRedisValue>(&self, cmd: &::redis::Cmd) -> Result<T, StoreError> {
        let mut guard = self.conn.lock();
        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => self.client.get_connection().map_err(StoreError::new)?,
        };

        match cmd.query::<T>(&mut conn) {
            Ok(value) => {
                *guard = Some(conn);
                Ok(value)
            }
            Err(e) => {
                if e.is_io_error() || e.is_connection_dropped() {
                    tracing::warn!(error = %e, "dropping redis connection after failure");
                } else {
                    *guard = Some(conn);
                }
                Err(StoreError::new(e))
            }
        }
    }
}

/// Largest `PX` Redis accepts
const MAX_EXPIRY_MILLIS: u64 = i64::MAX as u64;

/// Millisecond expiry for a marker; never zero and never above
/// [`MAX_EXPIRY_MILLIS`].
fn expiry_millis(ttl_secs: u64) -> u64 {
    ttl_secs.saturating_mul(1000).clamp(1, MAX_EXPIRY_MILLIS)
}

impl RevocationStore for RedisStore {
    fn set(&self, key: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let mut cmd = ::redis::cmd("SET");
        cmd.arg(key).arg(1).arg("PX").arg(expiry_millis(ttl_secs));
        self.query::<()>(&cmd)
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut cmd = ::redis::cmd("EXISTS");
        cmd.arg(key);
        self.query::<bool>(&cmd)
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("connected", &self.conn.lock().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_stays_within_redis_range() {
        assert_eq!(expiry_millis(0), 1);
        assert_eq!(expiry_millis(3590), 3_590_000);
        assert_eq!(expiry_millis(u64::MAX), i64::MAX as u64);
        assert_eq!(expiry_millis(i64::MAX as u64 / 1000 + 1), i64::MAX as u64);
        assert_eq!(expiry_millis(i64::MAX as u64 / 1000), i64::MAX as u64 / 1000 * 1000);
    }

    #[test]
    fn invalid_url_is_a_store_error() {
        assert!(RedisStore::open("not a url").is_err());
    }

    #[test]
    fn unreachable_server_surfaces_error() {
        let store = RedisStore::open("redis://127.0.0.1:1/").unwrap();
        assert!(store.exists("k").is_err());
        assert!(store.set("k", 10).is_err());
    }
}
