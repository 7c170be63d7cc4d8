//! Session key fingerprinting.
//!
//! A truncated SHA-256 digest of the signing key lets operators tell which key
//! is active without logging key material.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First eight bytes of the SHA-256 digest of the signing key, hex encoded.
///
/// # Examples
/// ```
/// use actix_web::cookie::Key;
/// use values_app::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
