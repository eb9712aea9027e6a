//! Compact token encoding and verification.
//!
//! Tokens are `base64url(header).base64url(payload).base64url(signature)`
//! without padding. Exactly one algorithm, HS256, is produced and accepted;
//! a header announcing anything else is rejected before the signature is
//! looked at.

use crate::{
    claims::{ClaimSet, Claims, StandardFields},
    crypto::hmac_sha256,
    error::{Rejection, TokenError, TokenResult},
    key::SigningKey,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

/// The only signing algorithm this codec issues or accepts
pub const ALGORITHM: &str = "HS256";

/// Token header
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

impl Header {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some("JWT".to_string()),
        }
    }
}

/// Encode `claims` merged with `fields` into a signed token.
///
/// # Errors
/// Returns [`TokenError::Encoding`] when a claim uses a reserved name, holds a
/// non-finite number, or cannot be serialized.
pub fn encode(claims: &ClaimSet, fields: &StandardFields, key: &SigningKey) -> TokenResult<String> {
    let payload = Claims::payload(claims, fields)?;

    let header_json =
        serde_json::to_vec(&Header::hs256()).map_err(|e| TokenError::Encoding(e.to_string()))?;
    let payload_json =
        serde_json::to_vec(&payload).map_err(|e| TokenError::Encoding(e.to_string()))?;

    let message = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(payload_json)
    );
    let signature = hmac_sha256::sign(key, message.as_bytes())?;

    Ok(format!("{message}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// Verify `token` under `key` at time `now` (unix seconds) and return its claims.
///
/// A token whose `exp` equals `now` is already expired.
///
/// # Errors
/// Every failure is [`TokenError::InvalidToken`]; the attached [`Rejection`]
/// tells malformed input, a foreign algorithm, a bad signature and expiry apart.
pub fn decode(token: &str, key: &SigningKey, now: i64) -> TokenResult<Claims> {
    let mut segments = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::rejected(Rejection::Malformed(
            "expected three segments",
        )));
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| TokenError::rejected(Rejection::Malformed("invalid header encoding")))?;
    let header: Header = serde_json::from_slice(&header_bytes)
        .map_err(|_| TokenError::rejected(Rejection::Malformed("invalid header JSON")))?;
    if header.alg != ALGORITHM {
        return Err(TokenError::rejected(Rejection::InvalidAlgorithm(header.alg)));
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::rejected(Rejection::Malformed("invalid signature encoding")))?;
    let message = &token[..header_b64.len() + 1 + payload_b64.len()];
    if !hmac_sha256::verify(key, message.as_bytes(), &signature) {
        return Err(TokenError::rejected(Rejection::BadSignature));
    }

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| TokenError::rejected(Rejection::Malformed("invalid payload encoding")))?;
    let payload: ClaimSet = serde_json::from_slice(&payload_bytes)
        .map_err(|_| TokenError::rejected(Rejection::Malformed("invalid payload JSON")))?;
    let claims = Claims::from_payload(payload)?;

    if now >= claims.standard.expires_at {
        return Err(TokenError::rejected(Rejection::Expired {
            expires_at: claims.standard.expires_at,
        }));
    }

    Ok(claims)
}
