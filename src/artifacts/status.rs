//! Working tree status report
//!
//! A pure data description of the repository state between commits. The
//! core fills it in; rendering the sections as text belongs to the CLI.

/// How an unstaged working-tree change differs from what is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modified,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// A tracked or staged file whose working copy drifted without being staged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstagedChange {
    pub name: String,
    pub kind: ChangeKind,
}

/// Snapshot of branches, staged changes, drifted files and untracked files.
/// Every list is filename-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub current_branch: String,
    /// All branch names, current one included
    pub branches: Vec<String>,
    /// Files staged for addition
    pub staged: Vec<String>,
    /// Files staged for removal
    pub removed: Vec<String>,
    /// Tracked or staged files modified or deleted in the working tree
    /// without being staged
    pub unstaged: Vec<UnstagedChange>,
    /// Working files neither tracked by the head commit nor staged
    pub untracked: Vec<String>,
}
