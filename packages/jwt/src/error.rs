//! Token error types

use thiserror::Error;

/// Token operation result type
pub type TokenResult<T> = Result<T, TokenError>;

/// Why a token was rejected by the codec.
///
/// Callers only ever see the coarse [`TokenError::InvalidToken`] message; the
/// rejection is kept alongside it for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Not three base64url segments, bad JSON, or missing standard fields
    #[error("malformed token: {0}")]
    Malformed(&'static str),
    /// Header announced an algorithm other than HS256
    #[error("unexpected signing algorithm: {0}")]
    InvalidAlgorithm(String),
    /// Signature does not verify under the active key
    #[error("signature mismatch")]
    BadSignature,
    /// `exp` is at or before the verification time
    #[error("token expired at {expires_at}")]
    Expired {
        /// Expiry carried by the token (unix seconds)
        expires_at: i64,
    },
}

/// Failure reported by a revocation store backend.
///
/// Surfaced verbatim through [`TokenError::Store`].
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl StoreError {
    /// Wrap a backend error
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(source.into())
    }

    /// Borrow the backend error
    #[must_use]
    pub fn source_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

/// Token error types
#[derive(Debug, Error)]
pub enum TokenError {
    /// Claims could not be serialized into a token
    #[error("failed to encode token: {0}")]
    Encoding(String),
    /// Malformed, wrong algorithm, bad signature or expired
    #[error("invalid token")]
    InvalidToken(Rejection),
    /// Cryptographically valid but present in the revocation store
    #[error("token has been revoked")]
    Revoked,
    /// The revocation store call failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TokenError {
    /// Create an encoding error
    #[inline]
    #[must_use]
    pub fn encoding(msg: &str) -> Self {
        TokenError::Encoding(msg.to_string())
    }

    /// Create an invalid token error and record the detail at debug level
    #[inline]
    #[must_use]
    pub fn rejected(rejection: Rejection) -> Self {
        tracing::debug!(%rejection, "token rejected");
        TokenError::InvalidToken(rejection)
    }

    /// Detailed rejection reason, if this is an invalid token error
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            TokenError::InvalidToken(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// True for [`TokenError::InvalidToken`]
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, TokenError::InvalidToken(_))
    }

    /// True for [`TokenError::Revoked`]
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        matches!(self, TokenError::Revoked)
    }
}

/// Errors raised while reading [`crate::Config`] from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Lifetime variable is not a non-negative integer
    #[error("invalid token lifetime {value:?}: expected whole seconds")]
    InvalidLifetime {
        /// Raw variable value
        value: String,
    },
    /// Signing key variable is present but empty
    #[error("signing key variable {name} is empty")]
    EmptyKey {
        /// Variable name
        name: &'static str,
    },
}
