//! Content fingerprinting for build artifacts.
//!
//! A fingerprint is an opaque content-derived string used only to detect
//! that a new artifact differs from the previous one; adversarial collision
//! resistance is not a requirement for a trust-the-filesystem local tool.

use std::io;
use std::path::Path;

/// Compute the content fingerprint of the file at `path`.
///
/// Returns `Ok(None)` when the file does not exist; I/O errors reading an
/// existing file propagate to the caller (and fail that build cycle).
pub fn fingerprint_file(path: &Path) -> io::Result<Option<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(fingerprint_bytes(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Fingerprint raw bytes. Deterministic and content-addressed.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
