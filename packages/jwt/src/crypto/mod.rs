//! Signing primitives

pub mod hmac_sha256;
