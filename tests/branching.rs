use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

use common::{FileSpec, grit_commit, init_repository_dir, run_grit_command, write_file};

#[rstest]
fn checkout_switches_branch_and_working_tree(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_grit_command(dir, &["branch", "side"]).assert().success();

    write_file(&FileSpec::new(dir.join("tracked.txt"), "master edit".to_string()));
    run_grit_command(dir, &["add", "tracked.txt"]).assert().success();
    grit_commit(dir, "edit on master").assert().success();

    run_grit_command(dir, &["checkout", "side"]).assert().success();

    assert_eq!(common::read_file(dir, "tracked.txt"), "first version");
    run_grit_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*side"));
}

#[rstest]
fn checkout_of_an_unknown_branch_fails(init_repository_dir: TempDir) {
    run_grit_command(init_repository_dir.path(), &["checkout", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such branch exists."));
}

#[rstest]
fn checkout_of_the_current_branch_fails(init_repository_dir: TempDir) {
    run_grit_command(init_repository_dir.path(), &["checkout", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No need to checkout the current branch."));
}

#[rstest]
fn checkout_refuses_to_clobber_an_untracked_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_grit_command(dir, &["branch", "side"]).assert().success();
    write_file(&FileSpec::new(dir.join("loose.txt"), "loose".to_string()));

    run_grit_command(dir, &["checkout", "side"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("There is an untracked file in the way"));
}

#[rstest]
fn duplicate_branch_creation_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_grit_command(dir, &["branch", "side"]).assert().success();

    run_grit_command(dir, &["branch", "side"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A branch with that name already exists."));
}

#[rstest]
fn rm_branch_deletes_the_pointer_but_not_the_current_one(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_grit_command(dir, &["branch", "side"]).assert().success();

    run_grit_command(dir, &["rm-branch", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot remove the current branch."));

    run_grit_command(dir, &["rm-branch", "side"]).assert().success();
    run_grit_command(dir, &["rm-branch", "side"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A branch with that name does not exist."));
}

#[rstest]
fn checkout_file_from_an_abbreviated_commit_id(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    let output = run_grit_command(dir, &["find", "track a file"]).assert().success();
    let full_id = String::from_utf8(output.get_output().stdout.clone())
        .unwrap()
        .trim()
        .to_string();
    let prefix = &full_id[..8];

    write_file(&FileSpec::new(dir.join("tracked.txt"), "later".to_string()));
    run_grit_command(dir, &["add", "tracked.txt"]).assert().success();
    grit_commit(dir, "later edit").assert().success();

    run_grit_command(dir, &["checkout", prefix, "--", "tracked.txt"])
        .assert()
        .success();

    assert_eq!(common::read_file(dir, "tracked.txt"), "first version");
}

#[rstest]
fn reset_moves_the_branch_back_and_restores_the_tree(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    let output = run_grit_command(dir, &["find", "track a file"]).assert().success();
    let target = String::from_utf8(output.get_output().stdout.clone())
        .unwrap()
        .trim()
        .to_string();

    write_file(&FileSpec::new(dir.join("extra.txt"), "extra".to_string()));
    run_grit_command(dir, &["add", "extra.txt"]).assert().success();
    grit_commit(dir, "add extra").assert().success();

    run_grit_command(dir, &["reset", &target]).assert().success();

    assert!(!dir.join("extra.txt").exists());
    run_grit_command(dir, &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("track a file"))
        .stdout(predicate::str::contains("add extra").not());
}

#[rstest]
fn reset_with_an_unknown_commit_id_fails(init_repository_dir: TempDir) {
    run_grit_command(init_repository_dir.path(), &["reset", "deadbeefdeadbeef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No commit with that id exists."));
}
