//! Fuzzy fingerprints of canonical function bodies.
//!
//! A [`Fingerprinter`] is the raw primitive: it maps bytes to a digest string
//! or to one of its "too small to hash" sentinels. [`Digest::from_raw`] applies
//! the storage rules on top of that output.

pub mod tlsh;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

pub use tlsh::Tlsh;

/// Raw outputs that mean "no fingerprint for this input".
pub const NULL_SENTINELS: &[&str] = &["", "TNULL", "NULL"];

/// Version marker the primitive may prepend to a digest.
pub const VERSION_PREFIX: &str = "T1";

/// Length of a digest carrying [`VERSION_PREFIX`].
pub const VERSIONED_LEN: usize = 72;

/// Length of a stored digest.
pub const DIGEST_LEN: usize = VERSIONED_LEN - VERSION_PREFIX.len();

/// Maps a byte string to a fuzzy digest.
pub trait Fingerprinter: Send + Sync {
    /// Raw digest, or one of [`NULL_SENTINELS`] when the input is degenerate.
    fn fingerprint(&self, data: &[u8]) -> String;
}

/// A stored fingerprint: lowercase hex, version prefix removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest(String);

impl Digest {
    /// Apply the storage rules to a raw primitive output.
    ///
    /// Sentinels yield `None`. A 72-character value starting with `T1` loses
    /// the prefix; anything else is kept whole.
    pub fn from_raw(raw: &str) -> Option<Self> {
        if NULL_SENTINELS.contains(&raw) {
            return None;
        }
        let body = if raw.len() == VERSIONED_LEN && raw.starts_with(VERSION_PREFIX) {
            &raw[VERSION_PREFIX.len()..]
        } else {
            raw
        };
        Some(Self(body.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Digest {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Fingerprint a canonical body and apply the storage rules.
pub fn digest_of(fingerprinter: &dyn Fingerprinter, canonical: &str) -> Option<Digest> {
    Digest::from_raw(&fingerprinter.fingerprint(canonical.as_bytes()))
}
