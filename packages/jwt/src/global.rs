//! Process-wide default handle.
//!
//! Prefer passing a [`Handle`] explicitly. These functions exist for call
//! sites that cannot carry one; they delegate to whichever handle is
//! installed when the call starts. The default is built from
//! [`Config::default`] with an in-memory revocation store.
//!
//! Swapping the handle does not affect calls already running: each call
//! holds its own `Arc` to the handle it started with, and that load finishes
//! before the handle's key lock is taken.

use crate::{
    claims::{ClaimSet, Claims},
    config::Config,
    error::TokenResult,
    handle::Handle,
    store::MemoryStore,
};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::sync::Arc;

static DEFAULT_HANDLE: Lazy<ArcSwap<Handle>> =
    Lazy::new(|| ArcSwap::from_pointee(Handle::new(Config::default(), MemoryStore::new())));

/// Install `handle` as the process default
pub fn set_handle(handle: Arc<Handle>) {
    DEFAULT_HANDLE.store(handle);
}

/// Currently installed default handle
#[must_use]
pub fn handle() -> Arc<Handle> {
    DEFAULT_HANDLE.load_full()
}

/// [`Handle::generate`] on the default handle
///
/// # Errors
/// As [`Handle::generate`].
pub fn generate(claims: &ClaimSet) -> TokenResult<String> {
    handle().generate(claims)
}

/// [`Handle::is_valid`] on the default handle
#[must_use]
pub fn is_valid(token: &str) -> bool {
    handle().is_valid(token)
}

/// [`Handle::parse`] on the default handle
///
/// # Errors
/// As [`Handle::parse`].
pub fn parse(token: &str) -> TokenResult<Claims> {
    handle().parse(token)
}

/// [`Handle::revoke`] on the default handle
///
/// # Errors
/// As [`Handle::revoke`].
pub fn revoke(token: &str) -> TokenResult<()> {
    handle().revoke(token)
}

/// [`Handle::is_valid_request`] on the default handle
#[must_use]
pub fn is_valid_request<B>(req: &::http::Request<B>) -> bool {
    handle().is_valid_request(req)
}

/// [`Handle::parse_request`] on the default handle
///
/// # Errors
/// As [`Handle::parse_request`].
pub fn parse_request<B>(req: &::http::Request<B>) -> TokenResult<Claims> {
    handle().parse_request(req)
}

/// [`Handle::is_valid_request_with_body`] on the default handle
#[must_use]
pub fn is_valid_request_with_body<B: AsRef<[u8]>>(req: &::http::Request<B>) -> bool {
    handle().is_valid_request_with_body(req)
}

/// [`Handle::parse_request_with_body`] on the default handle
///
/// # Errors
/// As [`Handle::parse_request`].
pub fn parse_request_with_body<B: AsRef<[u8]>>(req: &::http::Request<B>) -> TokenResult<Claims> {
    handle().parse_request_with_body(req)
}
