use crate::areas::repository::Repository;
use crate::artifacts::branch::BranchName;
use crate::error::{Error, Result};

impl Repository {
    /// Create a branch pointing at the current head. The current branch
    /// does not change.
    pub fn branch(&self, name: &str) -> Result<()> {
        let branch = BranchName::try_parse(name)?;

        if self.refs().ref_exists(&branch) {
            return Err(Error::BranchExists(name.to_string()));
        }

        self.refs().write_ref(&branch, &self.head_id()?)
    }

    /// Delete a branch pointer. Commits reachable from it are untouched.
    pub fn rm_branch(&self, name: &str) -> Result<()> {
        let branch = BranchName::try_parse(name)?;

        if !self.refs().ref_exists(&branch) {
            return Err(Error::NoSuchBranch(name.to_string()));
        }
        if self.refs().current_branch()? == branch {
            return Err(Error::CurrentBranch(name.to_string()));
        }

        self.refs().delete_ref(&branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn branch_points_at_the_current_head() {
        let repository = Repository::init_in_memory().unwrap();

        repository.branch("side").unwrap();

        let branch = BranchName::try_parse("side").unwrap();
        assert_eq!(
            repository.refs().read_ref(&branch).unwrap(),
            repository.head_id().unwrap()
        );
        assert_eq!(
            repository.refs().current_branch().unwrap().as_str(),
            "master"
        );
    }

    #[test]
    fn duplicate_branch_name_fails() {
        let repository = Repository::init_in_memory().unwrap();
        repository.branch("side").unwrap();

        assert!(matches!(
            repository.branch("side"),
            Err(Error::BranchExists(_))
        ));
    }

    #[test]
    fn rm_branch_deletes_only_the_pointer() {
        let repository = Repository::init_in_memory().unwrap();
        let head = repository.head_id().unwrap();
        repository.branch("side").unwrap();

        repository.rm_branch("side").unwrap();

        let branch = BranchName::try_parse("side").unwrap();
        assert!(!repository.refs().ref_exists(&branch));
        assert!(repository.graph().get(&head).is_ok());
    }

    #[test]
    fn rm_branch_refuses_the_current_branch() {
        let repository = Repository::init_in_memory().unwrap();

        assert!(matches!(
            repository.rm_branch("master"),
            Err(Error::CurrentBranch(_))
        ));
    }

    #[test]
    fn rm_branch_of_a_missing_branch_fails() {
        let repository = Repository::init_in_memory().unwrap();

        assert!(matches!(
            repository.rm_branch("ghost"),
            Err(Error::NoSuchBranch(_))
        ));
    }
}
