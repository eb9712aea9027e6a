//! Claim values, claim sets and the standard fields merged into every token.

use crate::error::{Rejection, TokenError, TokenResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire name of the expiry claim.
pub const EXPIRES_AT: &str = "exp";
/// Wire name of the issued-at claim.
pub const ISSUED_AT: &str = "iat";
/// Wire name of the issuer claim.
pub const ISSUER: &str = "iss";

/// Name of the expiry in [`Claims::to_claim_set`].
pub const VIEW_EXPIRES_AT: &str = "expiresAt";
/// Name of the issued-at time in [`Claims::to_claim_set`].
pub const VIEW_ISSUED_AT: &str = "issuedAt";
/// Name of the issuer in [`Claims::to_claim_set`].
pub const VIEW_ISSUER: &str = "issuer";

/// Claim names owned by the token itself, on the wire or in the flat view;
/// callers may not supply them.
pub const RESERVED_CLAIMS: [&str; 6] = [
    EXPIRES_AT,
    ISSUED_AT,
    ISSUER,
    VIEW_EXPIRES_AT,
    VIEW_ISSUED_AT,
    VIEW_ISSUER,
];

/// A single claim value.
///
/// Serialized as plain JSON, so a token payload stays a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// JSON `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number; must be finite to be encoded
    Float(f64),
    /// String
    String(String),
    /// Ordered list
    List(Vec<ClaimValue>),
    /// Nested mapping
    Map(BTreeMap<String, ClaimValue>),
}

/// Caller-supplied claims, opaque to the token system.
pub type ClaimSet = BTreeMap<String, ClaimValue>;

impl ClaimValue {
    /// Integer payload, if this is an [`ClaimValue::Int`]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is a [`ClaimValue::String`]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean payload, if this is a [`ClaimValue::Bool`]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// JSON has no representation for NaN or infinities.
    fn check_encodable(&self, path: &str) -> TokenResult<()> {
        match self {
            ClaimValue::Float(v) if !v.is_finite() => Err(TokenError::Encoding(format!(
                "claim {path:?} holds a non-finite number"
            ))),
            ClaimValue::List(items) => items
                .iter()
                .try_for_each(|item| item.check_encodable(path)),
            ClaimValue::Map(entries) => entries
                .iter()
                .try_for_each(|(k, v)| v.check_encodable(&format!("{path}.{k}"))),
            _ => Ok(()),
        }
    }
}

impl From<bool> for ClaimValue {
    fn from(v: bool) -> Self {
        ClaimValue::Bool(v)
    }
}

impl From<i64> for ClaimValue {
    fn from(v: i64) -> Self {
        ClaimValue::Int(v)
    }
}

impl From<i32> for ClaimValue {
    fn from(v: i32) -> Self {
        ClaimValue::Int(i64::from(v))
    }
}

impl From<u32> for ClaimValue {
    fn from(v: u32) -> Self {
        ClaimValue::Int(i64::from(v))
    }
}

impl From<f64> for ClaimValue {
    fn from(v: f64) -> Self {
        ClaimValue::Float(v)
    }
}

impl From<&str> for ClaimValue {
    fn from(v: &str) -> Self {
        ClaimValue::String(v.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(v: String) -> Self {
        ClaimValue::String(v)
    }
}

impl<T: Into<ClaimValue>> From<Vec<T>> for ClaimValue {
    fn from(v: Vec<T>) -> Self {
        ClaimValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<ClaimSet> for ClaimValue {
    fn from(v: ClaimSet) -> Self {
        ClaimValue::Map(v)
    }
}

/// System-managed claims added to every token at generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardFields {
    /// Expiry (unix seconds)
    pub expires_at: i64,
    /// Issued-at (unix seconds)
    pub issued_at: i64,
    /// Issuer
    pub issuer: String,
}

/// Verified token contents: the standard fields plus the caller's claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Expiry, issued-at and issuer
    pub standard: StandardFields,
    /// Caller-supplied claims, without the standard fields
    pub private: ClaimSet,
}

impl Claims {
    /// Look up a caller claim by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.private.get(name)
    }

    /// Expiry (unix seconds)
    #[must_use]
    pub fn expires_at(&self) -> i64 {
        self.standard.expires_at
    }

    /// Issued-at (unix seconds)
    #[must_use]
    pub fn issued_at(&self) -> i64 {
        self.standard.issued_at
    }

    /// Issuer
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.standard.issuer
    }

    /// Flat view of every claim, with the standard fields under
    /// `expiresAt`, `issuedAt` and `issuer`.
    #[must_use]
    pub fn to_claim_set(&self) -> ClaimSet {
        let mut flat = self.private.clone();
        flat.insert(VIEW_EXPIRES_AT.into(), self.standard.expires_at.into());
        flat.insert(VIEW_ISSUED_AT.into(), self.standard.issued_at.into());
        flat.insert(VIEW_ISSUER.into(), self.standard.issuer.clone().into());
        flat
    }

    /// Merge caller claims and standard fields into the flat wire payload.
    pub(crate) fn payload(private: &ClaimSet, standard: &StandardFields) -> TokenResult<ClaimSet> {
        if let Some(name) = RESERVED_CLAIMS.iter().find(|name| private.contains_key(**name)) {
            return Err(TokenError::Encoding(format!(
                "claim {name:?} is reserved for the token's standard fields"
            )));
        }
        for (name, value) in private {
            value.check_encodable(name)?;
        }

        let mut payload = private.clone();
        payload.insert(EXPIRES_AT.into(), standard.expires_at.into());
        payload.insert(ISSUED_AT.into(), standard.issued_at.into());
        payload.insert(ISSUER.into(), standard.issuer.clone().into());
        Ok(payload)
    }

    /// Split a decoded wire payload back into standard fields and caller claims.
    pub(crate) fn from_payload(mut payload: ClaimSet) -> TokenResult<Self> {
        let expires_at = payload
            .remove(EXPIRES_AT)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| TokenError::rejected(Rejection::Malformed("missing integer exp")))?;
        let issued_at = payload
            .remove(ISSUED_AT)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| TokenError::rejected(Rejection::Malformed("missing integer iat")))?;
        let issuer = match payload.remove(ISSUER) {
            Some(ClaimValue::String(iss)) => iss,
            _ => return Err(TokenError::rejected(Rejection::Malformed("missing string iss"))),
        };

        Ok(Self {
            standard: StandardFields {
                expires_at,
                issued_at,
                issuer,
            },
            private: payload,
        })
    }
}
