use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::error::Result;

impl Repository {
    /// Turn the stage into a new commit on the current branch.
    ///
    /// The empty-stage check runs before the empty-message check, so a bare
    /// `commit` with nothing staged reports the stage, not the message.
    pub fn commit(&self, message: &str) -> Result<Commit> {
        let head_id = self.head_id()?;
        let head_tree = self.head()?.tree().clone();
        let mut stage = self.load_stage()?;

        let tree = stage.build_next_tree(&head_tree, self.objects())?;
        let commit = self.graph().create(message, head_id, None, tree)?;

        let branch = self.refs().current_branch()?;
        self.refs().write_ref(&branch, &commit.id())?;

        stage.clear();
        self.save_stage(&stage)?;

        Ok(commit)
    }
}
