//! Three-way merge classification
//!
//! Given the trees of the split point, the current head and the other
//! branch's head, every filename in any of the three trees is classified
//! into at most one of three disjoint sets:
//!
//! - **additions**: take the other side's content
//! - **removals**: delete and untrack the file
//! - **conflicts**: both sides changed it incompatibly
//!
//! Content comparison happens entirely over blob ids: ids are
//! content-derived, so equal ids mean equal bytes and vice versa.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::BTreeSet;

/// The conflict marker opening line, followed by the current side's content
pub const CONFLICT_HEAD_MARKER: &str = "<<<<<<< HEAD\n";
/// The conflict marker separating the two sides
pub const CONFLICT_SEPARATOR: &str = "=======\n";
/// The conflict marker closing line
pub const CONFLICT_END_MARKER: &str = ">>>>>>>\n";

/// File-level actions a merge will apply to the working tree and stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub additions: BTreeSet<String>,
    pub removals: BTreeSet<String>,
    pub conflicts: BTreeSet<String>,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty() && self.conflicts.is_empty()
    }

    /// Whether the plan would write to or delete the named file
    pub fn touches(&self, name: &str) -> bool {
        self.additions.contains(name)
            || self.removals.contains(name)
            || self.conflicts.contains(name)
    }
}

/// How a completed merge operation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A two-parent merge commit was created; `conflicts` lists the files
    /// left with conflict markers (non-fatal)
    Merged {
        commit: ObjectId,
        conflicts: Vec<String>,
    },
    /// The current branch was an ancestor of the other tip and its ref was
    /// moved forward without creating a merge commit
    FastForwarded,
    /// The other tip was already an ancestor of the current branch; nothing
    /// to do
    AlreadyAncestor,
}

/// True when `name`'s blob in `tree` differs from `base` (absence on one
/// side counts as a difference)
fn changed(tree: &Tree, base: &Tree, name: &str) -> bool {
    tree.blob_id(name) != base.blob_id(name)
}

/// Classify every file of the three trees into the merge decision table.
///
/// For files tracked at the split point, the rules are evaluated in order;
/// the first match wins:
/// 1. unmodified here, deleted there        -> removal
/// 2. deleted on both sides                 -> removal
/// 3. deleted here, unmodified there        -> removal (keep deleted)
/// 4. modified there only                   -> addition (take theirs)
/// 5. modified on both sides, differing     -> conflict
///
/// Files the other side introduced after the split:
/// - absent here too                        -> addition
/// - present here with differing content    -> conflict
/// - present here with identical content    -> no action (either copy works)
pub fn classify(split: &Tree, current: &Tree, other: &Tree) -> MergePlan {
    let mut plan = MergePlan::default();

    for name in split.file_names() {
        let current_modified = changed(current, split, name);
        let other_modified = changed(other, split, name);
        let current_deleted = !current.tracks(name);
        let other_deleted = !other.tracks(name);

        if !current_modified && other_deleted {
            plan.removals.insert(name.clone());
        } else if current_deleted && other_deleted {
            plan.removals.insert(name.clone());
        } else if current_deleted && !other_modified {
            plan.removals.insert(name.clone());
        } else if other_modified && !current_modified {
            plan.additions.insert(name.clone());
        } else if other_modified
            && current_modified
            && current.blob_id(name) != other.blob_id(name)
        {
            plan.conflicts.insert(name.clone());
        }
    }

    for name in other.file_names() {
        if split.tracks(name) {
            continue;
        }

        if !current.tracks(name) {
            plan.additions.insert(name.clone());
        } else if current.blob_id(name) != other.blob_id(name) {
            plan.conflicts.insert(name.clone());
        }
        // identical independent additions need no action: both copies match
    }

    plan
}

/// Build the working-tree content for a conflicted file: both sides'
/// content between literal marker lines, an empty side standing in for a
/// deletion
pub fn conflict_file_content(ours: &[u8], theirs: &[u8]) -> Vec<u8> {
    let mut content =
        Vec::with_capacity(ours.len() + theirs.len() + CONFLICT_HEAD_MARKER.len() + 16);
    content.extend_from_slice(CONFLICT_HEAD_MARKER.as_bytes());
    content.extend_from_slice(ours);
    content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
    content.extend_from_slice(theirs);
    content.extend_from_slice(CONFLICT_END_MARKER.as_bytes());

    content
}
