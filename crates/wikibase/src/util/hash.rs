//! Content hashing for data values.

use md5::{Digest, Md5};

/// Returns the lowercase hex MD5 digest of `text`.
///
/// Empty input yields an empty string rather than the digest of nothing.
pub fn md5_hex(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let digest = Md5::digest(text.as_bytes());
    let mut s = String::with_capacity(32);
    for byte in digest.iter() {
        s.push_str(&format!("{:02x}", byte));
    }
    s
}
