//! Player identifiers derived from display names.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A stable player identifier.
///
/// Serialized transparently as a plain string so report documents keep
/// their `"id": "player-05"` shape.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a PlayerId from an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a PlayerId from a display name.
    ///
    /// Alphanumeric characters are lowercased and everything else collapses
    /// into single `-` separators. Names with no alphanumerics at all fall
    /// back to `player-` plus the first 8 hex characters of the SHA256 of
    /// the name.
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        for ch in name.trim().chars() {
            if ch.is_alphanumeric() {
                slug.extend(ch.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }

        if !slug.is_empty() {
            return Self(slug);
        }

        let digest = Sha256::digest(name.as_bytes());
        let hash = hex::encode(digest);
        Self(format!("player-{}", &hash[..8]))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for PlayerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
