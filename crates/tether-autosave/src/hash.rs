//! Content hashing for save deduplication
//!
//! [`ContentHash`] is the Blake3 digest of a draft's JSON encoding. Two
//! drafts with the same fields and values in the same order hash equally,
//! which is exactly the "nothing changed since the last save" test.

use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Blake3 digest of a draft's serialized content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Digest of raw bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Digest of a value's JSON encoding
    ///
    /// # Errors
    /// The value cannot be encoded as JSON
    #[inline]
    pub fn compute_serializable<T: Serialize + ?Sized>(
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_vec(value)?;
        Ok(Self::compute(&json))
    }

    /// Raw digest
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 8 bytes as hex, for log lines
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Draft;

    #[test]
    fn equal_drafts_hash_equally() {
        let a = Draft::new().with("title", "x").with("done", false);
        let b = Draft::new().with("title", "x").with("done", false);
        assert_eq!(
            ContentHash::compute_serializable(&a).unwrap(),
            ContentHash::compute_serializable(&b).unwrap()
        );
    }

    #[test]
    fn any_field_change_changes_hash() {
        let a = Draft::new().with("title", "x");
        let b = Draft::new().with("title", "y");
        assert_ne!(
            ContentHash::compute_serializable(&a).unwrap(),
            ContentHash::compute_serializable(&b).unwrap()
        );
    }

    #[test]
    fn short_form_is_prefix_of_display() {
        let hash = ContentHash::compute(b"draft");
        assert_eq!(hash.short().len(), 16);
        assert!(hash.to_string().starts_with(&hash.short()));
    }
}
