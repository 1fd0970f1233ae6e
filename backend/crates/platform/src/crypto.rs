//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Unguessable URL-safe token built from `len` random bytes
pub fn random_token(len: usize) -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(len))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 digest rendered as unpadded base64url
pub fn sha256_b64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(sha256(data))
}

/// Append an HMAC-SHA256 signature: `"{payload}.{base64url(mac)}"`
pub fn sign(secret: &[u8; 32], payload: &str) -> String {
    let mut mac = new_mac(secret);
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();
    format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(signature))
}

/// Check a value produced by [`sign`] and return its payload.
///
/// Returns `None` for any malformed or forged input; the comparison is
/// constant-time.
pub fn verify_signed<'a>(secret: &[u8; 32], token: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = token.rsplit_once('.')?;
    let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

    let mut mac = new_mac(secret);
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(payload)
}

fn new_mac(secret: &[u8; 32]) -> HmacSha256 {
    // HMAC accepts keys of any length, a 32-byte key cannot fail
    match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts 32-byte keys"),
    }
}
