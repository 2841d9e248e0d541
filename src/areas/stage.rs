//! Staging area
//!
//! The stage is the buffer between the working tree and the next commit:
//! additions map filenames to the content that will be committed, removals
//! name files the next commit will drop. Staging decisions always compare
//! against the head commit's tree, never against earlier stage entries.

use crate::areas::database::ObjectStore;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::tree::Tree;
use crate::error::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    additions: BTreeMap<String, Bytes>,
    removals: BTreeSet<String>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn additions(&self) -> impl Iterator<Item = (&String, &Bytes)> {
        self.additions.iter()
    }

    pub fn removals(&self) -> impl Iterator<Item = &String> {
        self.removals.iter()
    }

    pub fn is_addition(&self, name: &str) -> bool {
        self.additions.contains_key(name)
    }

    pub fn is_removal(&self, name: &str) -> bool {
        self.removals.contains(name)
    }

    pub fn staged_content(&self, name: &str) -> Option<&Bytes> {
        self.additions.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Stage a file for addition.
    ///
    /// Content identical to what the head commit already tracks is not
    /// staged; instead any pending entry for the file (addition or removal)
    /// is withdrawn, so the operation is idempotent.
    pub fn stage_addition(&mut self, name: &str, content: Bytes, head_tree: &Tree) {
        self.removals.remove(name);

        if head_tree.blob_id(name) == Some(&Blob::id_for(&content)) {
            self.additions.remove(name);
            return;
        }

        self.additions.insert(name.to_string(), content);
    }

    /// Stage a file for removal.
    ///
    /// Withdraws a pending addition; files tracked by the head commit are
    /// additionally staged for removal, and the returned flag tells the
    /// caller to delete the working copy. A file that is neither staged nor
    /// tracked cannot be removed.
    pub fn stage_removal(&mut self, name: &str, head_tree: &Tree) -> Result<bool> {
        let was_addition = self.additions.remove(name).is_some();

        if head_tree.tracks(name) {
            self.removals.insert(name.to_string());
            return Ok(true);
        }

        if was_addition {
            return Ok(false);
        }

        Err(Error::NothingToRemove(name.to_string()))
    }

    /// Overlay the stage onto a head tree, storing a blob for each staged
    /// addition, and return the resulting snapshot.
    pub fn apply_to(&self, head_tree: &Tree, objects: &dyn ObjectStore) -> Result<Tree> {
        let mut tree = head_tree.clone();

        for (name, content) in &self.additions {
            let blob = Blob::new(content.clone());
            let blob_id = objects.put(blob.serialize()?)?;
            tree.insert(name.clone(), blob_id);
        }
        for name in &self.removals {
            tree.remove(name);
        }

        Ok(tree)
    }

    /// `apply_to` with the commit-time guard: refuses an empty stage
    pub fn build_next_tree(&self, head_tree: &Tree, objects: &dyn ObjectStore) -> Result<Tree> {
        if self.is_empty() {
            return Err(Error::NoChangesStaged);
        }

        self.apply_to(head_tree, objects)
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }
}

pub trait StageStore {
    fn load(&self) -> Result<Stage>;

    fn save(&self, stage: &Stage) -> Result<()>;
}

/// File-backed stage: staged contents live as files under `addition/`,
/// staged removals as empty marker files under `removal/`.
#[derive(Debug, new)]
pub struct FsStageStore {
    path: Box<Path>,
}

impl FsStageStore {
    fn addition_path(&self) -> PathBuf {
        self.path.join("addition")
    }

    fn removal_path(&self) -> PathBuf {
        self.path.join("removal")
    }

    fn read_dir_names(dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();

        if dir.exists() {
            for entry in std::fs::read_dir(dir)? {
                names.push(entry?.file_name().to_string_lossy().to_string());
            }
        }

        Ok(names)
    }
}

impl StageStore for FsStageStore {
    fn load(&self) -> Result<Stage> {
        let mut stage = Stage::new();

        for name in Self::read_dir_names(&self.addition_path())? {
            let content = std::fs::read(self.addition_path().join(&name))?;
            stage.additions.insert(name, Bytes::from(content));
        }
        for name in Self::read_dir_names(&self.removal_path())? {
            stage.removals.insert(name);
        }

        Ok(stage)
    }

    fn save(&self, stage: &Stage) -> Result<()> {
        let addition = self.addition_path();
        let removal = self.removal_path();

        if addition.exists() {
            std::fs::remove_dir_all(&addition)?;
        }
        if removal.exists() {
            std::fs::remove_dir_all(&removal)?;
        }
        std::fs::create_dir_all(&addition)?;
        std::fs::create_dir_all(&removal)?;

        for (name, content) in &stage.additions {
            std::fs::write(addition.join(name), content)?;
        }
        for name in &stage.removals {
            std::fs::write(removal.join(name), b"")?;
        }

        Ok(())
    }
}

/// In-memory stage for tests and ephemeral repositories
#[derive(Debug, Default)]
pub struct MemStageStore {
    stage: RefCell<Stage>,
}

impl MemStageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StageStore for MemStageStore {
    fn load(&self) -> Result<Stage> {
        Ok(self.stage.borrow().clone())
    }

    fn save(&self, stage: &Stage) -> Result<()> {
        *self.stage.borrow_mut() = stage.clone();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::database::MemObjectStore;
    use pretty_assertions::assert_eq;

    fn head_tracking(name: &str, content: &[u8]) -> Tree {
        Tree::from_iter([(name.to_string(), Blob::id_for(content))])
    }

    #[test]
    fn staging_new_content_records_an_addition() {
        let mut stage = Stage::new();
        stage.stage_addition("a.txt", Bytes::from_static(b"one"), &Tree::new());

        assert!(stage.is_addition("a.txt"));
        assert_eq!(
            stage.staged_content("a.txt"),
            Some(&Bytes::from_static(b"one"))
        );
    }

    #[test]
    fn staging_head_identical_content_withdraws_the_entry() {
        let head = head_tracking("a.txt", b"one");
        let mut stage = Stage::new();

        stage.stage_addition("a.txt", Bytes::from_static(b"two"), &head);
        assert!(stage.is_addition("a.txt"));

        stage.stage_addition("a.txt", Bytes::from_static(b"one"), &head);
        assert!(stage.is_empty());
    }

    #[test]
    fn staging_an_addition_cancels_a_pending_removal() {
        let head = head_tracking("a.txt", b"one");
        let mut stage = Stage::new();
        stage.stage_removal("a.txt", &head).unwrap();

        stage.stage_addition("a.txt", Bytes::from_static(b"two"), &head);

        assert!(!stage.is_removal("a.txt"));
        assert!(stage.is_addition("a.txt"));
    }

    #[test]
    fn removal_of_tracked_file_deletes_the_working_copy() {
        let head = head_tracking("a.txt", b"one");
        let mut stage = Stage::new();

        let delete_working_copy = stage.stage_removal("a.txt", &head).unwrap();

        assert!(delete_working_copy);
        assert!(stage.is_removal("a.txt"));
    }

    #[test]
    fn removal_of_staged_only_file_just_unstages_it() {
        let mut stage = Stage::new();
        stage.stage_addition("a.txt", Bytes::from_static(b"one"), &Tree::new());

        let delete_working_copy = stage.stage_removal("a.txt", &Tree::new()).unwrap();

        assert!(!delete_working_copy);
        assert!(stage.is_empty());
    }

    #[test]
    fn removal_of_unknown_file_fails() {
        let mut stage = Stage::new();

        assert!(matches!(
            stage.stage_removal("ghost.txt", &Tree::new()),
            Err(Error::NothingToRemove(_))
        ));
    }

    #[test]
    fn staging_is_idempotent() {
        let mut stage = Stage::new();
        stage.stage_addition("a.txt", Bytes::from_static(b"one"), &Tree::new());
        let first = stage.clone();

        stage.stage_addition("a.txt", Bytes::from_static(b"one"), &Tree::new());

        assert_eq!(stage, first);
    }

    #[test]
    fn build_next_tree_overlays_additions_and_removals() {
        let head = head_tracking("old.txt", b"old");
        let objects = MemObjectStore::new();
        let mut stage = Stage::new();
        stage.stage_addition("new.txt", Bytes::from_static(b"new"), &head);
        stage.stage_removal("old.txt", &head).unwrap();

        let tree = stage.build_next_tree(&head, &objects).unwrap();

        assert!(!tree.tracks("old.txt"));
        assert_eq!(tree.blob_id("new.txt"), Some(&Blob::id_for(b"new")));
    }

    #[test]
    fn build_next_tree_refuses_an_empty_stage() {
        let objects = MemObjectStore::new();

        assert!(matches!(
            Stage::new().build_next_tree(&Tree::new(), &objects),
            Err(Error::NoChangesStaged)
        ));
    }
}
