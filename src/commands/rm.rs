use crate::areas::repository::Repository;
use crate::error::Result;

impl Repository {
    /// Unstage a pending addition, or stage a tracked file for removal and
    /// delete its working copy
    pub fn rm(&self, name: &str) -> Result<()> {
        let head_tree = self.head()?.tree().clone();

        let mut stage = self.load_stage()?;
        let delete_working_copy = stage.stage_removal(name, &head_tree)?;
        self.save_stage(&stage)?;

        if delete_working_copy {
            self.workspace().delete_file(name)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn rm_of_a_tracked_file_stages_removal_and_deletes_the_working_copy() {
        let repository = Repository::init_in_memory().unwrap();
        repository.workspace().write_file("a.txt", b"one").unwrap();
        repository.add("a.txt").unwrap();
        repository.commit("add a").unwrap();

        repository.rm("a.txt").unwrap();

        assert!(!repository.workspace().file_exists("a.txt"));
        assert!(repository.load_stage().unwrap().is_removal("a.txt"));
    }

    #[test]
    fn rm_of_a_staged_only_file_keeps_the_working_copy() {
        let repository = Repository::init_in_memory().unwrap();
        repository.workspace().write_file("a.txt", b"one").unwrap();
        repository.add("a.txt").unwrap();

        repository.rm("a.txt").unwrap();

        assert!(repository.workspace().file_exists("a.txt"));
        assert!(repository.load_stage().unwrap().is_empty());
    }

    #[test]
    fn rm_of_an_unknown_file_fails() {
        let repository = Repository::init_in_memory().unwrap();
        repository.workspace().write_file("a.txt", b"one").unwrap();

        assert!(matches!(
            repository.rm("a.txt"),
            Err(Error::NothingToRemove(_))
        ));
    }
}
