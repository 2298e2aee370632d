//! `X-Signature` checks for OneBot event posts.
//!
//! With a `secret` configured, a OneBot implementation signs every event
//! post as `sha1=<hex HMAC-SHA1(secret, body)>`.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

const PREFIX: &str = "sha1=";

fn mac(secret: &str, body: &[u8]) -> Result<HmacSha1, InvalidLength> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())?;
    mac.update(body);
    Ok(mac)
}

/// Header value a sender with `secret` attaches to `body`.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, InvalidLength> {
    let digest = mac(secret, body)?.finalize().into_bytes();
    Ok(format!("{}{}", PREFIX, hex::encode(digest)))
}

/// Check a header value against `body` in constant time.
pub fn verify(secret: &str, header: Option<&str>, body: &[u8]) -> bool {
    let Some(digest) = header.and_then(|h| h.trim().strip_prefix(PREFIX)) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest) else {
        return false;
    };
    mac(secret, body).is_ok_and(|mac| mac.verify_slice(&expected).is_ok())
}
