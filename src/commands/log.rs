use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::Result;

impl Repository {
    /// History of the current branch: the primary-parent chain from head
    /// down to the root. Secondary parents of merge commits are not
    /// followed.
    pub fn log(&self) -> Result<Vec<Commit>> {
        let graph = self.graph();
        let mut history = Vec::new();
        let mut cursor = Some(self.head_id()?);

        while let Some(id) = cursor {
            let commit = graph.get(&id)?;
            cursor = commit.parent().cloned();
            history.push(commit);
        }

        Ok(history)
    }

    /// Every commit ever made, across all branches, newest first
    pub fn global_log(&self) -> Result<Vec<Commit>> {
        let graph = self.graph();
        let mut commits = Vec::new();

        for id in self.objects().list_ids()? {
            if let Some(commit) = graph.try_get(&id)? {
                commits.push(commit);
            }
        }
        commits.sort_by(|a, b| {
            b.timestamp()
                .cmp(&a.timestamp())
                .then_with(|| a.id().cmp(&b.id()))
        });

        Ok(commits)
    }

    /// Ids of every commit whose message matches `message` exactly
    pub fn find(&self, message: &str) -> Result<Vec<ObjectId>> {
        let mut ids = self
            .global_log()?
            .into_iter()
            .filter(|commit| commit.message() == message)
            .map(|commit| commit.id())
            .collect::<Vec<_>>();
        ids.sort();

        Ok(ids)
    }
}
