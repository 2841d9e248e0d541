use crate::areas::repository::Repository;
use crate::artifacts::branch::BranchName;
use crate::error::Result;
use std::path::Path;

/// Branch every repository starts on
pub const DEFAULT_BRANCH: &str = "master";

impl Repository {
    /// Create a repository at `path` with the root commit and the default
    /// branch pointing at it.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let repository = Repository::create(path)?;
        repository.bootstrap()?;

        Ok(repository)
    }

    /// `init` against ephemeral storage
    pub fn init_in_memory() -> Result<Self> {
        let repository = Repository::in_memory();
        repository.bootstrap()?;

        Ok(repository)
    }

    fn bootstrap(&self) -> Result<()> {
        let root = self.graph().insert_root()?;
        let branch = BranchName::try_parse(DEFAULT_BRANCH)?;

        self.refs().write_ref(&branch, &root.id())?;
        self.refs().set_current_branch(&branch)
    }
}
