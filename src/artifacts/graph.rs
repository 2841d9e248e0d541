//! Commit graph
//!
//! The history forms a directed acyclic graph of immutable commits, rooted
//! at the single commit without a primary parent. This module provides
//! commit creation, lookup, ancestry queries and split point (merge base)
//! computation on top of the object store.
//!
//! ## Split point algorithm
//!
//! `split_point` deliberately does NOT implement a general lowest common
//! ancestor search. It walks the current commit's primary-parent chain and
//! at each step tests that commit's primary parent against the other tip's
//! ancestor set before its secondary parent. This primary-parent-first bias
//! can select a suboptimal common ancestor when the true nearest one is
//! reachable only through secondary-parent edges deeper in the chain. The
//! behavior is a documented approximation and is preserved exactly for
//! compatibility; replacing it would observably change merge-base selection
//! and downstream conflict sets.

use crate::areas::database::ObjectStore;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::io::Cursor;

/// Macro for debug logging of the split point walk, enabled with the
/// `debug_merge` feature flag
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

/// Ancestry and merge-base queries over stored commits
pub struct CommitGraph<'a> {
    objects: &'a dyn ObjectStore,
}

impl<'a> CommitGraph<'a> {
    pub fn new(objects: &'a dyn ObjectStore) -> Self {
        CommitGraph { objects }
    }

    /// Create and store a commit.
    ///
    /// Fails with `Error::EmptyMessage` when the message is empty. The root
    /// commit is exempt and constructed through `insert_root`, never here.
    pub fn create(
        &self,
        message: &str,
        parent: ObjectId,
        merge_parent: Option<ObjectId>,
        tree: Tree,
    ) -> Result<Commit> {
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let commit = Commit::new(
            message.to_string(),
            chrono::Local::now().fixed_offset(),
            Some(parent),
            merge_parent,
            tree,
        );
        self.insert(&commit)?;

        Ok(commit)
    }

    /// Store the single root commit
    pub fn insert_root(&self) -> Result<Commit> {
        let root = Commit::root();
        self.insert(&root)?;

        Ok(root)
    }

    fn insert(&self, commit: &Commit) -> Result<()> {
        // commits are stored under their derived id, which excludes the
        // secondary parent, so a plain content-addressed put would not do
        self.objects.insert(&commit.id(), commit.serialize()?)
    }

    /// Load a commit, failing with `Error::NotFound` when the id is absent
    /// or designates a non-commit object
    pub fn get(&self, id: &ObjectId) -> Result<Commit> {
        self.try_get(id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Load the object at `id` as a commit, `Ok(None)` when it is a blob
    pub fn try_get(&self, id: &ObjectId) -> Result<Option<Commit>> {
        let bytes = self.objects.get(id)?;
        let mut reader = Cursor::new(bytes);

        match ObjectType::parse_object_type(&mut reader)? {
            ObjectType::Commit => Ok(Some(Commit::deserialize(reader)?)),
            ObjectType::Blob => Ok(None),
        }
    }

    /// All commit ids reachable from `start` by following primary and
    /// secondary parent edges, inclusive of `start`
    pub fn ancestors(&self, start: &ObjectId) -> Result<HashSet<ObjectId>> {
        let mut reachable = HashSet::new();
        let mut pending = vec![start.clone()];

        while let Some(id) = pending.pop() {
            if !reachable.insert(id.clone()) {
                continue;
            }

            let commit = self.get(&id)?;
            if let Some(parent) = commit.parent() {
                pending.push(parent.clone());
            }
            if let Some(merge_parent) = commit.merge_parent() {
                pending.push(merge_parent.clone());
            }
        }

        Ok(reachable)
    }

    /// Compute the merge base of `current` and the commit at `other_tip`.
    ///
    /// Biased primary-parent-first walk (see module docs): current itself
    /// when it is an ancestor of the other tip, otherwise the first commit
    /// along current's primary chain whose primary (checked first) or
    /// secondary parent lies in the other tip's ancestor set, falling back
    /// to the root.
    pub fn split_point(&self, current: &Commit, other_tip: &ObjectId) -> Result<Commit> {
        let ancestors = self.ancestors(other_tip)?;

        if ancestors.contains(&current.id()) {
            debug_log!("split point: current {} is its own split", current.id());
            return Ok(current.clone());
        }

        let mut walk = current.clone();
        while let Some(parent_id) = walk.parent().cloned() {
            debug_log!("split point walk at {}", walk.id());

            if ancestors.contains(&parent_id) {
                return self.get(&parent_id);
            }
            if let Some(merge_id) = walk.merge_parent()
                && ancestors.contains(merge_id)
            {
                return self.get(merge_id);
            }

            walk = self.get(&parent_id)?;
        }

        // the walk bottomed out at the root commit
        Ok(walk)
    }
}
