use crate::areas::repository::Repository;
use crate::artifacts::branch::BranchName;
use crate::artifacts::merge::{self, MergeOutcome};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::error::{Error, Result};

impl Repository {
    /// Merge another branch into the current one.
    ///
    /// Preconditions run in a fixed order before anything is touched:
    /// branch existence, self-merge, clean stage, then the fast-forward and
    /// already-ancestor split point shortcuts, and last the untracked-file
    /// scan limited to files the merge would write or delete.
    pub fn merge(&self, name: &str) -> Result<MergeOutcome> {
        let other_branch = BranchName::try_parse(name)?;

        if !self.refs().ref_exists(&other_branch) {
            return Err(Error::NoSuchBranch(name.to_string()));
        }
        let current_branch = self.refs().current_branch()?;
        if current_branch == other_branch {
            return Err(Error::SelfMerge);
        }
        if !self.load_stage()?.is_empty() {
            return Err(Error::UncommittedChanges);
        }

        let graph = self.graph();
        let current_id = self.head_id()?;
        let other_id = self.refs().read_ref(&other_branch)?;
        let current_commit = graph.get(&current_id)?;
        let split = graph.split_point(&current_commit, &other_id)?;

        if split.id() == current_id {
            return self.fast_forward(&current_branch, &other_id);
        }
        if split.id() == other_id {
            return Ok(MergeOutcome::AlreadyAncestor);
        }

        let split_tree = split.tree().clone();
        let current_tree = current_commit.tree().clone();
        let other_tree = graph.get(&other_id)?.tree().clone();

        let plan = merge::classify(&split_tree, &current_tree, &other_tree);
        for file in self.workspace().list_files()? {
            if !current_tree.tracks(&file) && plan.touches(&file) {
                return Err(Error::WouldOverwriteUntracked(file));
            }
        }

        let mut stage = self.load_stage()?;

        for file in &plan.additions {
            let content = self.blob_content_or_empty(&other_tree, file)?;
            self.workspace().write_file(file, &content)?;
            stage.stage_addition(file, content.into(), &current_tree);
        }
        for file in &plan.removals {
            // removals only apply to tracked files with a working copy; a
            // hand-deleted file stays in the merge commit's snapshot
            if current_tree.tracks(file) && self.workspace().file_exists(file) {
                self.workspace().delete_file(file)?;
                stage.stage_removal(file, &current_tree)?;
            }
        }
        for file in &plan.conflicts {
            let ours = self.blob_content_or_empty(&current_tree, file)?;
            let theirs = self.blob_content_or_empty(&other_tree, file)?;
            let content = merge::conflict_file_content(&ours, &theirs);

            self.workspace().write_file(file, &content)?;
            stage.stage_addition(file, content.into(), &current_tree);
        }

        let tree = stage.apply_to(&current_tree, self.objects())?;
        let message = format!("Merged {other_branch} into {current_branch}.");
        let commit = graph.create(&message, current_id, Some(other_id), tree)?;

        self.refs().write_ref(&current_branch, &commit.id())?;
        stage.clear();
        self.save_stage(&stage)?;

        Ok(MergeOutcome::Merged {
            commit: commit.id(),
            conflicts: plan.conflicts.iter().cloned().collect(),
        })
    }

    /// Move the current branch ref to the other tip and check its snapshot
    /// out, without creating a merge commit
    fn fast_forward(
        &self,
        current_branch: &BranchName,
        other_id: &ObjectId,
    ) -> Result<MergeOutcome> {
        let current_tree = self.head()?.tree().clone();
        self.guard_untracked(&current_tree)?;

        let other_tree = self.graph().get(other_id)?.tree().clone();
        self.replace_working_tree(&other_tree)?;

        let mut stage = self.load_stage()?;
        stage.clear();
        self.save_stage(&stage)?;

        self.refs().write_ref(current_branch, other_id)?;

        Ok(MergeOutcome::FastForwarded)
    }

    fn blob_content_or_empty(&self, tree: &Tree, name: &str) -> Result<Vec<u8>> {
        match tree.blob_id(name) {
            Some(id) => Ok(self.load_blob(id)?.to_vec()),
            None => Ok(Vec::new()),
        }
    }
}
