//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings produced by a deterministic
//! content hash over a canonical byte encoding. Equal content always yields
//! the same id; ids double as deduplication and lookup keys.
//!
//! ## Storage
//!
//! Objects are stored in `.grit/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::error::{Error, Result};
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Object identifier (SHA-1 hash)
///
/// A 40-character hexadecimal string that uniquely identifies an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Hash a byte sequence into an object id
    ///
    /// This is the deterministic content-hash function the whole object model
    /// rests on: identical bytes always produce the same id.
    pub fn hash(bytes: &[u8]) -> Self {
        Self::hash_chunks([bytes])
    }

    /// Hash a sequence of byte chunks as one logical value
    ///
    /// Used for commit identity, which is derived from several fields rather
    /// than from a single buffer.
    pub fn hash_chunks<'c>(chunks: impl IntoIterator<Item = &'c [u8]>) -> Self {
        let mut hasher = Sha1::new();
        for chunk in chunks {
            hasher.update(chunk);
        }

        let oid = hasher.finalize();
        ObjectId(format!("{oid:x}"))
    }

    /// Parse and validate an object ID from a string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or `Error::Corrupt` on invalid length/characters
    pub fn try_parse(id: String) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(Error::Corrupt(format!(
                "invalid object id length: {}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Corrupt(format!("invalid object id characters: {id}")));
        }
        Ok(Self(id))
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Get abbreviated form of the object ID (first 7 characters)
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
