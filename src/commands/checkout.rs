use crate::areas::repository::Repository;
use crate::artifacts::branch::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::error::{Error, Result};

impl Repository {
    /// Restore a file's working copy from the head commit. The stage is
    /// untouched.
    pub fn checkout_file(&self, name: &str) -> Result<()> {
        let head_id = self.head_id()?;
        self.checkout_file_at(head_id.as_str(), name)
    }

    /// Restore a file's working copy from the named commit, which may be
    /// given as an unambiguous id prefix. The stage is untouched.
    pub fn checkout_file_at(&self, commit: &str, name: &str) -> Result<()> {
        let commit = self.graph().get(&self.resolve_commit(commit)?)?;
        let blob_id = commit
            .tree()
            .blob_id(name)
            .ok_or_else(|| Error::FileNotInCommit(name.to_string()))?;

        let content = self.load_blob(blob_id)?;
        self.workspace().write_file(name, &content)
    }

    /// Switch to another branch, replacing the working tree with its tip
    /// commit's snapshot and clearing the stage.
    ///
    /// Refuses to run while any untracked working file exists, before
    /// touching anything. The guard is deliberately blanket rather than
    /// limited to files the switch would overwrite.
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let branch = BranchName::try_parse(name)?;

        if !self.refs().ref_exists(&branch) {
            return Err(Error::NoSuchBranch(name.to_string()));
        }
        if self.refs().current_branch()? == branch {
            return Err(Error::AlreadyOnBranch(name.to_string()));
        }

        let current_tree = self.head()?.tree().clone();
        self.guard_untracked(&current_tree)?;

        let target_id = self.refs().read_ref(&branch)?;
        let target_tree = self.graph().get(&target_id)?.tree().clone();
        self.replace_working_tree(&target_tree)?;

        let mut stage = self.load_stage()?;
        stage.clear();
        self.save_stage(&stage)?;

        self.refs().set_current_branch(&branch)
    }

    /// Fail with `Error::WouldOverwriteUntracked` when any working file is
    /// not tracked by `current_tree`
    pub(crate) fn guard_untracked(&self, current_tree: &Tree) -> Result<()> {
        for name in self.workspace().list_files()? {
            if !current_tree.tracks(&name) {
                return Err(Error::WouldOverwriteUntracked(name));
            }
        }

        Ok(())
    }

    /// Make the working tree match `target_tree`: write every file it
    /// tracks, delete every working file it does not
    pub(crate) fn replace_working_tree(&self, target_tree: &Tree) -> Result<()> {
        for (name, blob_id) in target_tree.entries() {
            let content = self.load_blob(blob_id)?;
            self.workspace().write_file(name, &content)?;
        }
        for name in self.workspace().list_files()? {
            if !target_tree.tracks(&name) {
                self.workspace().delete_file(&name)?;
            }
        }

        Ok(())
    }

    /// Resolve a full or abbreviated commit id to a stored commit's id
    pub(crate) fn resolve_commit(&self, target: &str) -> Result<ObjectId> {
        if target.len() == crate::artifacts::objects::OBJECT_ID_LENGTH {
            let Ok(id) = ObjectId::try_parse(target.to_string()) else {
                return Err(Error::NotFound(target.to_string()));
            };
            return match self.graph().try_get(&id) {
                Ok(Some(_)) => Ok(id),
                _ => Err(Error::NotFound(target.to_string())),
            };
        }

        let mut matches = Vec::new();
        for id in self.objects().list_ids()? {
            if id.as_str().starts_with(target) && self.graph().try_get(&id)?.is_some() {
                matches.push(id);
            }
        }

        match matches.len() {
            0 => Err(Error::NotFound(target.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::AmbiguousPrefix(target.to_string())),
        }
    }
}
