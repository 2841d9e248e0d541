//! Blob object
//!
//! Blobs store the raw bytes of one file's content at one point in time.
//! They carry no metadata; filenames live in the trees of commits.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Read, Write};

/// Blob object representing one file version's content
///
/// Each distinct content is stored at most once, identified by the hash of
/// its canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }

    /// Id a given file content would be stored under, without building a Blob
    pub fn id_for(content: &[u8]) -> ObjectId {
        let header = format!("{} {}\0", ObjectType::Blob.as_str(), content.len());
        ObjectId::hash_chunks([header.as_bytes(), content])
    }
}

impl Packable for Blob {
    fn serialize(&self) -> crate::error::Result<Bytes> {
        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> crate::error::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}
