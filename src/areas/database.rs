//! Object database
//!
//! Content-addressed, immutable byte storage for blobs and commit records.
//! Blobs go in through `put`, which hashes the canonical encoding and is
//! idempotent. Commit records go in through `insert` under their derived id,
//! since commit identity deliberately excludes the secondary parent and so
//! cannot be recomputed from the stored bytes alone.
//!
//! No deletion is exposed: commits are permanent and blobs are retained
//! indefinitely (ids are content-derived, so retention never changes
//! observable behavior).

use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub trait ObjectStore {
    /// Store bytes under their content hash, returning the id. Repeated
    /// puts of identical content are no-ops beyond recomputing the id.
    fn put(&self, bytes: Bytes) -> Result<ObjectId>;

    /// Store bytes under a caller-derived id (commit records)
    fn insert(&self, id: &ObjectId, bytes: Bytes) -> Result<()>;

    /// Fails with `Error::NotFound` when no object has that id
    fn get(&self, id: &ObjectId) -> Result<Bytes>;

    fn exists(&self, id: &ObjectId) -> bool;

    /// Every stored object id, in no particular order. Serves history-wide
    /// scans (global log, find) and abbreviated-id resolution.
    fn list_ids(&self) -> Result<Vec<ObjectId>>;
}

/// File-backed object database
///
/// Objects live at `<root>/<first-2-chars>/<remaining-38-chars>`,
/// zlib-compressed, written to a temp file and renamed into place so a
/// partially written object is never observable under its final name.
#[derive(Debug, new)]
pub struct FsObjectStore {
    path: Box<Path>,
}

impl FsObjectStore {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.path.join(id.to_path())
    }

    fn write_object(&self, object_path: PathBuf, content: Bytes) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::Corrupt(format!("invalid object path {}", object_path.display())))?;
        std::fs::create_dir_all(object_dir)?;

        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let compressed = Self::compress(content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)?;
        file.write_all(&compressed)?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path)?;

        Ok(())
    }

    fn compress(data: Bytes) -> Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&data)?;

        Ok(encoder.finish()?.into())
    }

    fn decompress(data: Vec<u8>) -> Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;

        Ok(decompressed.into())
    }

    fn generate_temp_name() -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.subsec_nanos())
            .unwrap_or_default();

        format!("tmp-obj-{}-{}", std::process::id(), nanos)
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, bytes: Bytes) -> Result<ObjectId> {
        let id = ObjectId::hash(&bytes);
        self.insert(&id, bytes)?;

        Ok(id)
    }

    fn insert(&self, id: &ObjectId, bytes: Bytes) -> Result<()> {
        let object_path = self.object_path(id);

        if !object_path.exists() {
            self.write_object(object_path, bytes)?;
        }

        Ok(())
    }

    fn get(&self, id: &ObjectId) -> Result<Bytes> {
        let object_path = self.object_path(id);
        let compressed =
            std::fs::read(&object_path).map_err(|_| Error::NotFound(id.to_string()))?;

        Self::decompress(compressed)
    }

    fn exists(&self, id: &ObjectId) -> bool {
        self.object_path(id).exists()
    }

    fn list_ids(&self) -> Result<Vec<ObjectId>> {
        let mut ids = Vec::new();

        if !self.path.exists() {
            return Ok(ids);
        }

        for dir_entry in std::fs::read_dir(&self.path)? {
            let dir_entry = dir_entry?;
            if !dir_entry.path().is_dir() {
                continue;
            }
            let dir_name = dir_entry.file_name().to_string_lossy().to_string();

            for file_entry in std::fs::read_dir(dir_entry.path())? {
                let file_name = file_entry?.file_name().to_string_lossy().to_string();
                if let Ok(id) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                    ids.push(id);
                }
            }
        }

        Ok(ids)
    }
}

/// In-memory object database for tests and ephemeral repositories
#[derive(Debug, Default)]
pub struct MemObjectStore {
    objects: RefCell<HashMap<ObjectId, Bytes>>,
}

impl MemObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemObjectStore {
    fn put(&self, bytes: Bytes) -> Result<ObjectId> {
        let id = ObjectId::hash(&bytes);
        self.objects.borrow_mut().entry(id.clone()).or_insert(bytes);

        Ok(id)
    }

    fn insert(&self, id: &ObjectId, bytes: Bytes) -> Result<()> {
        self.objects
            .borrow_mut()
            .entry(id.clone())
            .or_insert(bytes);

        Ok(())
    }

    fn get(&self, id: &ObjectId) -> Result<Bytes> {
        self.objects
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn exists(&self, id: &ObjectId) -> bool {
        self.objects.borrow().contains_key(id)
    }

    fn list_ids(&self) -> Result<Vec<ObjectId>> {
        Ok(self.objects.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::proptest;

    proptest! {
        #[test]
        fn put_is_deterministic_over_content(
            bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..512)
        ) {
            let store = MemObjectStore::new();
            let first = store.put(Bytes::from(bytes.clone())).unwrap();
            let second = store.put(Bytes::from(bytes)).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = MemObjectStore::new();
        let id = store.put(Bytes::from_static(b"payload")).unwrap();

        assert!(store.exists(&id));
        assert_eq!(store.get(&id).unwrap(), Bytes::from_static(b"payload"));
    }

    #[test]
    fn get_of_unknown_id_is_not_found() {
        let store = MemObjectStore::new();
        let id = ObjectId::hash(b"never stored");

        assert!(!store.exists(&id));
        assert!(matches!(store.get(&id), Err(Error::NotFound(_))));
    }

    #[test]
    fn repeated_puts_store_one_object() {
        let store = MemObjectStore::new();
        store.put(Bytes::from_static(b"dup")).unwrap();
        store.put(Bytes::from_static(b"dup")).unwrap();

        assert_eq!(store.list_ids().unwrap().len(), 1);
    }
}
