#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

pub fn write_file(file_spec: &FileSpec) {
    std::fs::write(&file_spec.path, &file_spec.content)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", file_spec.path, e));
}

/// Generate flat text files with fabricated contents in `dir`
pub fn write_generated_files(dir: &Path, files_count: usize) -> Vec<FileSpec> {
    use fake::{
        Fake,
        faker::lorem::en::{Word, Words},
    };

    (0..files_count)
        .map(|index| {
            let file_name = format!("{}_{}.txt", Word().fake::<String>(), index);
            let file_content = Words(5..10).fake::<Vec<String>>().join(" ");

            let file_spec = FileSpec::new(dir.join(&file_name), file_content);
            write_file(&file_spec);

            file_spec
        })
        .collect::<Vec<_>>()
}

pub fn run_grit_command(dir: &Path, args: &[&str]) -> Command {
    let mut command = Command::cargo_bin("grit").expect("Failed to find grit binary");
    command.current_dir(dir).args(args);
    command
}

pub fn grit_commit(dir: &Path, message: &str) -> Command {
    run_grit_command(dir, &["commit", "-m", message])
}

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A fresh repository with one committed file `tracked.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_grit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let tracked = FileSpec::new(
        repository_dir.path().join("tracked.txt"),
        "first version".to_string(),
    );
    write_file(&tracked);

    run_grit_command(repository_dir.path(), &["add", "tracked.txt"])
        .assert()
        .success();
    grit_commit(repository_dir.path(), "track a file")
        .assert()
        .success();

    repository_dir
}

pub fn read_file(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name))
        .unwrap_or_else(|e| panic!("Failed to read file {name}: {e}"))
}
