use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::status::{ChangeKind, StatusReport, UnstagedChange};
use crate::error::Result;
use std::collections::BTreeMap;

impl Repository {
    /// Describe the working tree relative to the head commit and the stage
    pub fn status(&self) -> Result<StatusReport> {
        let head_tree = self.head()?.tree().clone();
        let stage = self.load_stage()?;

        let current_branch = self.refs().current_branch()?.to_string();
        let branches = self
            .refs()
            .list_refs()?
            .into_iter()
            .map(|branch| branch.to_string())
            .collect();

        let staged = stage.additions().map(|(name, _)| name.clone()).collect();
        let removed = stage.removals().cloned().collect();

        let mut drifted: BTreeMap<String, ChangeKind> = BTreeMap::new();
        let mut untracked = Vec::new();

        for name in self.workspace().list_files()? {
            let working_id = Blob::id_for(&self.workspace().read_file(&name)?);

            if let Some(content) = stage.staged_content(&name) {
                if Blob::id_for(content) != working_id {
                    drifted.insert(name, ChangeKind::Modified);
                }
            } else if head_tree.tracks(&name) && !stage.is_removal(&name) {
                if head_tree.blob_id(&name) != Some(&working_id) {
                    drifted.insert(name, ChangeKind::Modified);
                }
            } else {
                // neither staged nor tracked, or re-created after rm
                untracked.push(name);
            }
        }

        // staged or tracked files whose working copy is gone
        for (name, _) in stage.additions() {
            if !self.workspace().file_exists(name) {
                drifted.insert(name.clone(), ChangeKind::Deleted);
            }
        }
        for name in head_tree.file_names() {
            if !stage.is_removal(name)
                && !stage.is_addition(name)
                && !self.workspace().file_exists(name)
            {
                drifted.insert(name.clone(), ChangeKind::Deleted);
            }
        }

        let unstaged = drifted
            .into_iter()
            .map(|(name, kind)| UnstagedChange { name, kind })
            .collect();

        Ok(StatusReport {
            current_branch,
            branches,
            staged,
            removed,
            unstaged,
            untracked,
        })
    }
}
