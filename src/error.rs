//! Error kinds surfaced by the core
//!
//! Every operation returns one of these kinds instead of printing or exiting.
//! The CLI layer owns the user-facing message text and the process exit code;
//! the core only reports what went wrong. All kinds are terminal for the
//! current operation and none is retried internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Object, commit or ref lookup miss.
    #[error("object not found: {0}")]
    NotFound(String),

    /// An abbreviated commit id matched more than one commit.
    #[error("ambiguous commit id prefix: {0}")]
    AmbiguousPrefix(String),

    /// Commit message was empty.
    #[error("commit message is empty")]
    EmptyMessage,

    /// File is neither tracked by the head commit nor staged for addition.
    #[error("file is neither tracked nor staged: {0}")]
    NothingToRemove(String),

    /// Both pending sets of the staging index are empty.
    #[error("no changes staged")]
    NoChangesStaged,

    #[error("no such branch: {0}")]
    NoSuchBranch(String),

    #[error("branch name is not valid: {0}")]
    InvalidBranchName(String),

    #[error("branch already exists: {0}")]
    BranchExists(String),

    /// The named branch is already checked out.
    #[error("already on branch: {0}")]
    AlreadyOnBranch(String),

    /// The current branch cannot be deleted.
    #[error("cannot delete the current branch: {0}")]
    CurrentBranch(String),

    #[error("cannot merge a branch with itself")]
    SelfMerge,

    /// The staging index must be empty before a merge.
    #[error("uncommitted changes in the staging index")]
    UncommittedChanges,

    /// An untracked working file would be overwritten or removed.
    /// Detected before any file is touched, never as a failed write.
    #[error("an untracked working file is in the way: {0}")]
    WouldOverwriteUntracked(String),

    #[error("file is not tracked by that commit: {0}")]
    FileNotInCommit(String),

    #[error("a repository already exists here")]
    RepositoryExists,

    #[error("not inside an initialized repository")]
    NoRepository,

    /// A stored object could not be decoded.
    #[error("corrupt object: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
