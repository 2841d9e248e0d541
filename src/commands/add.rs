use crate::areas::repository::Repository;
use crate::error::Result;

impl Repository {
    /// Stage a working file for addition in the next commit
    pub fn add(&self, name: &str) -> Result<()> {
        let content = self.workspace().read_file(name)?;
        let head_tree = self.head()?.tree().clone();

        let mut stage = self.load_stage()?;
        stage.stage_addition(name, content, &head_tree);
        self.save_stage(&stage)
    }
}
