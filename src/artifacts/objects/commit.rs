//! Commit object
//!
//! Commits are immutable snapshot nodes in the history graph. Each carries:
//! - A message (the single root commit uses the fixed `"initial commit"`)
//! - A creation timestamp (the root commit uses the epoch origin)
//! - An optional primary parent id (absent only for the root commit)
//! - An optional secondary parent id (present only for merge commits)
//! - A tree: the full filename -> blob id snapshot
//!
//! ## Identity
//!
//! A commit's id is the hash of (message, timestamp, primary parent id,
//! canonical tree bytes). The secondary parent is intentionally excluded
//! from identity derivation.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0time <unix-seconds> <offset>
//! parent <parent-sha>
//! merge <second-parent-sha>
//! blob <blob-sha> <filename>
//!
//! <commit message>
//! ```
//! The `parent`, `merge` and `blob` lines are each omitted when absent.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::io::{BufRead, Read, Write};

/// Message of the single root commit
pub const ROOT_MESSAGE: &str = "initial commit";

/// Immutable snapshot node with up to two parents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    message: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
    /// Primary parent id; `None` only for the root commit
    parent: Option<ObjectId>,
    /// Secondary parent id; `Some` only for merge commits
    merge_parent: Option<ObjectId>,
    tree: Tree,
}

impl Commit {
    pub fn new(
        message: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        tree: Tree,
    ) -> Self {
        Commit {
            message,
            timestamp,
            parent,
            merge_parent,
            tree,
        }
    }

    /// The single root commit: fixed message, epoch timestamp, no parents,
    /// empty tree. Constructed only here, never through the graph's `create`.
    pub fn root() -> Self {
        Commit {
            message: ROOT_MESSAGE.to_string(),
            timestamp: chrono::DateTime::UNIX_EPOCH.fixed_offset(),
            parent: None,
            merge_parent: None,
            tree: Tree::new(),
        }
    }

    /// Derive the commit's id from its logical fields.
    ///
    /// Hashes (message, timestamp repr, primary parent id, canonical tree
    /// bytes). A `None` parent hashes as the empty string so the derivation
    /// matches the documented formula. The secondary parent does not
    /// participate: two merge commits differing only in their secondary
    /// parent share an id.
    pub fn id(&self) -> ObjectId {
        let timestamp = self.timestamp_repr();
        let parent = self.parent.as_ref().map(ObjectId::as_str).unwrap_or("");
        let tree_bytes = self.tree.canonical_bytes();

        ObjectId::hash_chunks([
            self.message.as_bytes(),
            timestamp.as_bytes(),
            parent.as_bytes(),
            tree_bytes.as_ref(),
        ])
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Format timestamp in human-readable form, e.g.
    /// "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    fn timestamp_repr(&self) -> String {
        format!("{} {}", self.timestamp.timestamp(), self.timestamp.format("%z"))
    }

    fn parse_timestamp(value: &str) -> Result<chrono::DateTime<chrono::FixedOffset>> {
        let (seconds, offset) = value
            .split_once(' ')
            .ok_or_else(|| Error::Corrupt(format!("invalid commit timestamp: {value}")))?;

        let seconds = seconds
            .parse::<i64>()
            .map_err(|_| Error::Corrupt(format!("invalid commit timestamp: {value}")))?;
        let instant = chrono::DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| Error::Corrupt(format!("invalid commit timestamp: {value}")))?;

        Ok(instant.with_timezone(&Self::parse_offset(offset)?))
    }

    /// Parse a `+hhmm`/`-hhmm` zone offset
    fn parse_offset(value: &str) -> Result<chrono::FixedOffset> {
        let corrupt = || Error::Corrupt(format!("invalid timezone offset: {value}"));

        if value.len() != 5 {
            return Err(corrupt());
        }
        let sign = match &value[..1] {
            "+" => 1,
            "-" => -1,
            _ => return Err(corrupt()),
        };
        let hours = value[1..3].parse::<i32>().map_err(|_| corrupt())?;
        let minutes = value[3..5].parse::<i32>().map_err(|_| corrupt())?;

        chrono::FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(corrupt)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut object_content = vec![format!("time {}", self.timestamp_repr())];

        if let Some(parent) = &self.parent {
            object_content.push(format!("parent {}", parent.as_str()));
        }
        if let Some(merge_parent) = &self.merge_parent {
            object_content.push(format!("merge {}", merge_parent.as_str()));
        }
        for (name, blob_id) in self.tree.entries() {
            object_content.push(format!("blob {} {}", blob_id.as_str(), name));
        }
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let content_bytes = object_content.join("\n").into_bytes();

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)
            .map_err(|_| Error::Corrupt("commit content is not valid UTF-8".to_string()))?;

        let mut lines = content.lines();

        let time_line = lines
            .next()
            .ok_or_else(|| Error::Corrupt("commit is missing its time line".to_string()))?;
        let timestamp = Self::parse_timestamp(
            time_line
                .strip_prefix("time ")
                .ok_or_else(|| Error::Corrupt("commit has an invalid time line".to_string()))?,
        )?;

        let mut parent = None;
        let mut merge_parent = None;
        let mut tree = Tree::new();

        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            if let Some(id) = line.strip_prefix("parent ") {
                parent = Some(ObjectId::try_parse(id.to_string())?);
            } else if let Some(id) = line.strip_prefix("merge ") {
                merge_parent = Some(ObjectId::try_parse(id.to_string())?);
            } else if let Some(entry) = line.strip_prefix("blob ") {
                let (blob_id, name) = entry.split_once(' ').ok_or_else(|| {
                    Error::Corrupt(format!("commit has an invalid tree entry: {line}"))
                })?;
                tree.insert(name.to_string(), ObjectId::try_parse(blob_id.to_string())?);
            } else {
                return Err(Error::Corrupt(format!(
                    "commit has an unrecognized header line: {line}"
                )));
            }
        }

        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Commit::new(message, timestamp, parent, merge_parent, tree))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    /// Commit identity is derived from logical fields, not the encoding.
    fn object_id(&self) -> Result<ObjectId> {
        Ok(self.id())
    }
}
