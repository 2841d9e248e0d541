use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use grit::areas::repository::Repository;
use grit::artifacts::merge::MergeOutcome;
use grit::artifacts::objects::commit::Commit;
use grit::artifacts::status::StatusReport;
use grit::error::Error;

#[derive(Parser)]
#[command(
    name = "grit",
    version = "0.1.0",
    about = "A tiny local version-control system",
    long_about = "A tiny local version-control system: content-addressed \
    snapshots, branches and three-way merges for flat directories of files. \
    It is a learning project, not a git replacement.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Initialize a new repository")]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(about = "Stage a file for addition in the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(about = "Unstage a file, or stage a tracked file for removal")]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(about = "Record the staged changes as a new commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(about = "Show the current branch's history")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(about = "List the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(about = "Show branches, staged changes and untracked files")]
    Status,
    #[command(
        about = "Switch branches, or restore a file's working copy",
        long_about = "Three forms: `checkout <branch>` switches branches; \
        `checkout -- <file>` restores the file from the head commit; \
        `checkout <commit> -- <file>` restores it from the given commit, \
        which may be an abbreviated id."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name, or commit id when restoring a file")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "File to restore")]
        file: Option<String>,
    },
    #[command(about = "Create a branch pointing at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(about = "Move the current branch to an arbitrary commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(about = "Merge a branch into the current one")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { path } = &cli.command {
        let path = match path {
            Some(path) => std::path::PathBuf::from(path),
            None => std::env::current_dir()?,
        };
        Repository::init(&path).map_err(|error| anyhow!(describe(&cli.command, &error)))?;
        println!("Initialized empty repository in {}", path.display());

        return Ok(());
    }

    let repository = Repository::open(std::env::current_dir()?)
        .map_err(|error| anyhow!(describe(&cli.command, &error)))?;

    run(&repository, &cli.command).map_err(|error| anyhow!(describe(&cli.command, &error)))
}

fn run(repository: &Repository, command: &Commands) -> grit::error::Result<()> {
    match command {
        Commands::Init { .. } => unreachable!("handled before opening the repository"),
        Commands::Add { file } => repository.add(file)?,
        Commands::Rm { file } => repository.rm(file)?,
        Commands::Commit { message } => {
            let commit = repository.commit(message)?;
            println!(
                "[{} {}] {}",
                repository.refs().current_branch()?,
                commit.id().to_short_oid(),
                first_line(commit.message())
            );
        }
        Commands::Log => {
            for commit in repository.log()? {
                print_commit(&commit);
            }
        }
        Commands::GlobalLog => {
            for commit in repository.global_log()? {
                print_commit(&commit);
            }
        }
        Commands::Find { message } => {
            let ids = repository.find(message)?;
            if ids.is_empty() {
                return Err(Error::NotFound(message.clone()));
            }
            for id in ids {
                println!("{id}");
            }
        }
        Commands::Status => print_status(&repository.status()?),
        Commands::Checkout { target, file } => match (target, file) {
            (Some(commit), Some(file)) => repository.checkout_file_at(commit, file)?,
            (None, Some(file)) => repository.checkout_file(file)?,
            (Some(branch), None) => repository.checkout_branch(branch)?,
            (None, None) => {
                return Err(Error::NoSuchBranch(String::new()));
            }
        },
        Commands::Branch { name } => repository.branch(name)?,
        Commands::RmBranch { name } => repository.rm_branch(name)?,
        Commands::Reset { commit } => repository.reset(commit)?,
        Commands::Merge { branch } => match repository.merge(branch)? {
            MergeOutcome::Merged { conflicts, .. } if !conflicts.is_empty() => {
                println!("Encountered a merge conflict.");
            }
            MergeOutcome::Merged { commit, .. } => {
                println!("Merged into {}.", commit.to_short_oid());
            }
            MergeOutcome::FastForwarded => println!("Current branch fast-forwarded."),
            MergeOutcome::AlreadyAncestor => {
                println!("Given branch is an ancestor of the current branch.");
            }
        },
    }

    Ok(())
}

/// Translate an error kind into the user-facing message for the command
/// that raised it. The core never prints; all wording lives here.
fn describe(command: &Commands, error: &Error) -> String {
    match (command, error) {
        (Commands::Add { .. }, Error::NotFound(_)) => "File does not exist.".to_string(),
        (Commands::Find { .. }, Error::NotFound(_)) => {
            "Found no commit with that message.".to_string()
        }
        (_, Error::NotFound(_)) => "No commit with that id exists.".to_string(),
        (_, Error::AmbiguousPrefix(prefix)) => {
            format!("Ambiguous commit id prefix: {prefix}.")
        }
        (_, Error::EmptyMessage) => "Please enter a commit message.".to_string(),
        (_, Error::NothingToRemove(_)) => "No reason to remove the file.".to_string(),
        (_, Error::NoChangesStaged) => "No changes added to the commit.".to_string(),
        (Commands::Checkout { .. }, Error::NoSuchBranch(_)) => "No such branch exists.".to_string(),
        (_, Error::NoSuchBranch(_)) => "A branch with that name does not exist.".to_string(),
        (_, Error::BranchExists(_)) => "A branch with that name already exists.".to_string(),
        (_, Error::AlreadyOnBranch(_)) => "No need to checkout the current branch.".to_string(),
        (_, Error::CurrentBranch(_)) => "Cannot remove the current branch.".to_string(),
        (_, Error::SelfMerge) => "Cannot merge a branch with itself.".to_string(),
        (_, Error::UncommittedChanges) => "You have uncommitted changes.".to_string(),
        (_, Error::WouldOverwriteUntracked(_)) => {
            "There is an untracked file in the way; delete it, or add and commit it first."
                .to_string()
        }
        (_, Error::FileNotInCommit(_)) => "File does not exist in that commit.".to_string(),
        (_, Error::RepositoryExists) => {
            "A repository already exists in the current directory.".to_string()
        }
        (_, Error::NoRepository) => "Not in an initialized repository.".to_string(),
        (_, error) => error.to_string(),
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

fn print_commit(commit: &Commit) {
    println!("===");
    println!("commit {}", commit.id());
    if let (Some(parent), Some(merge_parent)) = (commit.parent(), commit.merge_parent()) {
        println!(
            "Merge: {} {}",
            parent.to_short_oid(),
            merge_parent.to_short_oid()
        );
    }
    println!("Date: {}", commit.readable_timestamp());
    println!("{}", commit.message());
    println!();
}

fn print_status(report: &StatusReport) {
    println!("=== Branches ===");
    for branch in &report.branches {
        if *branch == report.current_branch {
            println!("*{branch}");
        } else {
            println!("{branch}");
        }
    }
    println!();

    println!("=== Staged Files ===");
    for file in &report.staged {
        println!("{file}");
    }
    println!();

    println!("=== Removed Files ===");
    for file in &report.removed {
        println!("{file}");
    }
    println!();

    println!("=== Modifications Not Staged For Commit ===");
    for change in &report.unstaged {
        println!("{} ({})", change.name, change.kind.as_str());
    }
    println!();

    println!("=== Untracked Files ===");
    for file in &report.untracked {
        println!("{file}");
    }
    println!();
}
