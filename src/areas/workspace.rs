//! Working tree access
//!
//! A flat namespace of file names mapped to byte contents. Only top-level
//! files are versioned; the metadata directory is invisible to every
//! operation that enumerates or compares working-tree state.

use crate::error::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub trait Workspace {
    /// Fails with `Error::NotFound` when the file does not exist
    fn read_file(&self, name: &str) -> Result<Bytes>;

    fn write_file(&self, name: &str, content: &[u8]) -> Result<()>;

    /// Removing a file that is already absent is not an error
    fn delete_file(&self, name: &str) -> Result<()>;

    fn file_exists(&self, name: &str) -> bool;

    /// Top-level file names in lexicographic order, metadata excluded
    fn list_files(&self) -> Result<Vec<String>>;
}

/// Working tree rooted at a directory on disk
#[derive(Debug, new)]
pub struct FsWorkspace {
    path: Box<Path>,
    metadata_dir: String,
}

impl FsWorkspace {
    pub fn root_path(&self) -> &Path {
        &self.path
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Workspace for FsWorkspace {
    fn read_file(&self, name: &str) -> Result<Bytes> {
        std::fs::read(self.file_path(name))
            .map(Bytes::from)
            .map_err(|_| Error::NotFound(name.to_string()))
    }

    fn write_file(&self, name: &str, content: &[u8]) -> Result<()> {
        std::fs::write(self.file_path(name), content)?;

        Ok(())
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        let path = self.file_path(name);
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        Ok(())
    }

    fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name == self.metadata_dir {
                continue;
            }
            names.push(name);
        }
        names.sort();

        Ok(names)
    }
}

/// In-memory working tree for tests and ephemeral repositories
#[derive(Debug, Default)]
pub struct MemWorkspace {
    files: RefCell<BTreeMap<String, Bytes>>,
}

impl MemWorkspace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Workspace for MemWorkspace {
    fn read_file(&self, name: &str) -> Result<Bytes> {
        self.files
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn write_file(&self, name: &str, content: &[u8]) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(name.to_string(), Bytes::copy_from_slice(content));

        Ok(())
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files.borrow_mut().remove(name);

        Ok(())
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.borrow().contains_key(name)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        Ok(self.files.borrow().keys().cloned().collect())
    }
}
