use crate::areas::repository::Repository;
use crate::error::{Error, Result};

impl Repository {
    /// Move the current branch to an arbitrary commit, replacing the
    /// working tree with its snapshot and clearing the stage. The commit
    /// may be given as an unambiguous id prefix.
    pub fn reset(&self, target: &str) -> Result<()> {
        let target_id = self.resolve_commit(target)?;
        let target_tree = self.graph().get(&target_id)?.tree().clone();
        let current_tree = self.head()?.tree().clone();

        // narrower guard than a branch switch: only untracked files the
        // target commit would overwrite block the reset
        for name in self.workspace().list_files()? {
            if !current_tree.tracks(&name) && target_tree.tracks(&name) {
                return Err(Error::WouldOverwriteUntracked(name));
            }
        }

        self.replace_working_tree(&target_tree)?;

        let mut stage = self.load_stage()?;
        stage.clear();
        self.save_stage(&stage)?;

        let branch = self.refs().current_branch()?;
        self.refs().write_ref(&branch, &target_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    fn commit_file(repository: &Repository, name: &str, content: &[u8], message: &str) {
        repository.workspace().write_file(name, content).unwrap();
        repository.add(name).unwrap();
        repository.commit(message).unwrap();
    }

    #[test]
    fn reset_moves_the_branch_and_the_working_tree() {
        let repository = Repository::init_in_memory().unwrap();
        commit_file(&repository, "a.txt", b"old", "first");
        let old_id = repository.head_id().unwrap();
        commit_file(&repository, "a.txt", b"new", "second");
        commit_file(&repository, "b.txt", b"extra", "third");

        repository.reset(old_id.as_str()).unwrap();

        assert_eq!(repository.head_id().unwrap(), old_id);
        assert_eq!(
            repository.workspace().read_file("a.txt").unwrap(),
            Bytes::from_static(b"old")
        );
        assert!(!repository.workspace().file_exists("b.txt"));
    }

    #[test]
    fn reset_accepts_an_id_prefix_and_clears_the_stage() {
        let repository = Repository::init_in_memory().unwrap();
        commit_file(&repository, "a.txt", b"old", "first");
        let old_id = repository.head_id().unwrap();
        commit_file(&repository, "a.txt", b"new", "second");
        repository.workspace().write_file("a.txt", b"wip").unwrap();
        repository.add("a.txt").unwrap();

        repository.reset(&old_id.to_short_oid()).unwrap();

        assert!(repository.load_stage().unwrap().is_empty());
        assert_eq!(repository.head_id().unwrap(), old_id);
    }

    #[test]
    fn reset_refuses_to_overwrite_an_untracked_file() {
        let repository = Repository::init_in_memory().unwrap();
        commit_file(&repository, "a.txt", b"old", "first");
        let target = repository.head_id().unwrap();
        repository.rm("a.txt").unwrap();
        repository.commit("drop a").unwrap();
        repository.workspace().write_file("a.txt", b"loose").unwrap();

        assert!(matches!(
            repository.reset(target.as_str()),
            Err(Error::WouldOverwriteUntracked(_))
        ));
    }

    #[test]
    fn reset_deletes_untracked_files_absent_from_the_target() {
        let repository = Repository::init_in_memory().unwrap();
        commit_file(&repository, "a.txt", b"old", "first");
        let target = repository.head_id().unwrap();
        commit_file(&repository, "a.txt", b"new", "second");
        repository.workspace().write_file("loose.txt", b"l").unwrap();

        repository.reset(target.as_str()).unwrap();

        assert!(!repository.workspace().file_exists("loose.txt"));
        assert_eq!(
            repository.workspace().read_file("a.txt").unwrap(),
            Bytes::from_static(b"old")
        );
    }
}
