//! HMAC-SHA256 signing and verification for HS256 tokens

use crate::error::{TokenError, TokenResult};
use crate::key::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Keyed MAC over the signing input.
fn mac(key: &SigningKey, signing_input: &[u8]) -> Result<HmacSha256, hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())?;
    mac.update(signing_input);
    Ok(mac)
}

/// Sign `header.payload` with HMAC-SHA256
pub(crate) fn sign(key: &SigningKey, signing_input: &[u8]) -> TokenResult<Vec<u8>> {
    let mac = mac(key, signing_input).map_err(|_| TokenError::encoding("invalid HMAC key"))?;
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time verification of an HMAC-SHA256 signature
pub(crate) fn verify(key: &SigningKey, signing_input: &[u8], signature: &[u8]) -> bool {
    mac(key, signing_input).is_ok_and(|mac| mac.verify_slice(signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_rfc4231_case_2() {
        let key = SigningKey::from("Jefe");
        let tag = sign(&key, b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn verify_rejects_other_keys_and_truncation() {
        let key = SigningKey::from("secret");
        let tag = sign(&key, b"a.b").unwrap();
        assert!(verify(&key, b"a.b", &tag));
        assert!(!verify(&SigningKey::from("other"), b"a.b", &tag));
        assert!(!verify(&key, b"a.c", &tag));
        assert!(!verify(&key, b"a.b", &tag[..16]));
    }
}
