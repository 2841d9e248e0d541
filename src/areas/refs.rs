//! Branch references and the current-branch pointer
//!
//! Each branch is a named, mutable pointer to a commit id. Exactly one
//! branch is current at any time; HEAD is resolved through it rather than
//! stored as a commit id of its own (no detached state).

use crate::artifacts::branch::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Error, Result};
use derive_new::new;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub trait RefStore {
    /// Fails with `Error::NoSuchBranch` when the branch does not exist
    fn read_ref(&self, branch: &BranchName) -> Result<ObjectId>;

    /// Creates the branch when absent, repoints it when present
    fn write_ref(&self, branch: &BranchName, id: &ObjectId) -> Result<()>;

    fn delete_ref(&self, branch: &BranchName) -> Result<()>;

    fn ref_exists(&self, branch: &BranchName) -> bool;

    /// All branch names in lexicographic order
    fn list_refs(&self) -> Result<Vec<BranchName>>;

    fn current_branch(&self) -> Result<BranchName>;

    fn set_current_branch(&self, branch: &BranchName) -> Result<()>;
}

const HEAD_REF_PREFIX: &str = "ref: refs/heads/";

/// File-backed refs: one file per branch under `refs/heads/`, plus a HEAD
/// file holding `ref: refs/heads/<name>`.
#[derive(Debug, new)]
pub struct FsRefStore {
    path: Box<Path>,
}

impl FsRefStore {
    pub fn heads_path(&self) -> PathBuf {
        self.path.join("refs").join("heads")
    }

    fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    fn ref_path(&self, branch: &BranchName) -> PathBuf {
        self.heads_path().join(branch.as_str())
    }
}

impl RefStore for FsRefStore {
    fn read_ref(&self, branch: &BranchName) -> Result<ObjectId> {
        let raw = std::fs::read_to_string(self.ref_path(branch))
            .map_err(|_| Error::NoSuchBranch(branch.to_string()))?;

        ObjectId::try_parse(raw.trim().to_string())
    }

    fn write_ref(&self, branch: &BranchName, id: &ObjectId) -> Result<()> {
        std::fs::create_dir_all(self.heads_path())?;
        std::fs::write(self.ref_path(branch), format!("{id}\n"))?;

        Ok(())
    }

    fn delete_ref(&self, branch: &BranchName) -> Result<()> {
        std::fs::remove_file(self.ref_path(branch))
            .map_err(|_| Error::NoSuchBranch(branch.to_string()))
    }

    fn ref_exists(&self, branch: &BranchName) -> bool {
        self.ref_path(branch).exists()
    }

    fn list_refs(&self) -> Result<Vec<BranchName>> {
        let heads = self.heads_path();
        let mut branches = Vec::new();

        if !heads.exists() {
            return Ok(branches);
        }

        for entry in std::fs::read_dir(heads)? {
            let name = entry?.file_name().to_string_lossy().to_string();
            branches.push(BranchName::try_parse(name)?);
        }
        branches.sort();

        Ok(branches)
    }

    fn current_branch(&self) -> Result<BranchName> {
        let raw = std::fs::read_to_string(self.head_path())?;
        let name = raw
            .trim()
            .strip_prefix(HEAD_REF_PREFIX)
            .ok_or_else(|| Error::Corrupt(format!("malformed HEAD: {}", raw.trim())))?;

        BranchName::try_parse(name.to_string())
    }

    fn set_current_branch(&self, branch: &BranchName) -> Result<()> {
        std::fs::write(self.head_path(), format!("{HEAD_REF_PREFIX}{branch}\n"))?;

        Ok(())
    }
}

/// In-memory refs for tests and ephemeral repositories
#[derive(Debug, Default)]
pub struct MemRefStore {
    refs: RefCell<BTreeMap<BranchName, ObjectId>>,
    current: RefCell<Option<BranchName>>,
}

impl MemRefStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefStore for MemRefStore {
    fn read_ref(&self, branch: &BranchName) -> Result<ObjectId> {
        self.refs
            .borrow()
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::NoSuchBranch(branch.to_string()))
    }

    fn write_ref(&self, branch: &BranchName, id: &ObjectId) -> Result<()> {
        self.refs.borrow_mut().insert(branch.clone(), id.clone());

        Ok(())
    }

    fn delete_ref(&self, branch: &BranchName) -> Result<()> {
        self.refs
            .borrow_mut()
            .remove(branch)
            .map(|_| ())
            .ok_or_else(|| Error::NoSuchBranch(branch.to_string()))
    }

    fn ref_exists(&self, branch: &BranchName) -> bool {
        self.refs.borrow().contains_key(branch)
    }

    fn list_refs(&self) -> Result<Vec<BranchName>> {
        Ok(self.refs.borrow().keys().cloned().collect())
    }

    fn current_branch(&self) -> Result<BranchName> {
        self.current
            .borrow()
            .clone()
            .ok_or_else(|| Error::Corrupt("no current branch".to_string()))
    }

    fn set_current_branch(&self, branch: &BranchName) -> Result<()> {
        *self.current.borrow_mut() = Some(branch.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[test]
    fn write_then_read_ref() {
        let refs = MemRefStore::new();
        let id = ObjectId::hash(b"commit");
        refs.write_ref(&branch("master"), &id).unwrap();

        assert_eq!(refs.read_ref(&branch("master")).unwrap(), id);
    }

    #[test]
    fn read_of_missing_branch_fails() {
        let refs = MemRefStore::new();

        assert!(matches!(
            refs.read_ref(&branch("ghost")),
            Err(Error::NoSuchBranch(_))
        ));
    }

    #[test]
    fn list_refs_is_sorted() {
        let refs = MemRefStore::new();
        let id = ObjectId::hash(b"commit");
        refs.write_ref(&branch("zeta"), &id).unwrap();
        refs.write_ref(&branch("alpha"), &id).unwrap();

        assert_eq!(
            refs.list_refs().unwrap(),
            vec![branch("alpha"), branch("zeta")]
        );
    }

    #[test]
    fn current_branch_round_trips() {
        let refs = MemRefStore::new();
        refs.set_current_branch(&branch("dev")).unwrap();

        assert_eq!(refs.current_branch().unwrap(), branch("dev"));
    }

    #[test]
    fn delete_removes_the_branch() {
        let refs = MemRefStore::new();
        let id = ObjectId::hash(b"commit");
        refs.write_ref(&branch("dev"), &id).unwrap();
        refs.delete_ref(&branch("dev")).unwrap();

        assert!(!refs.ref_exists(&branch("dev")));
    }
}
