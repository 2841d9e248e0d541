//! Snapshot tree
//!
//! A tree is the filename -> blob id mapping held by a commit. It represents
//! the full snapshot of the working tree at that commit, not a diff, and is
//! kept in total order by filename so its canonical byte form (and therefore
//! the commit id derived from it) is deterministic.

use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree(BTreeMap<String, ObjectId>);

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn blob_id(&self, name: &str) -> Option<&ObjectId> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: String, blob_id: ObjectId) {
        self.0.insert(name, blob_id);
    }

    pub fn remove(&mut self, name: &str) {
        self.0.remove(name);
    }

    /// Entries in filename order
    pub fn entries(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.0.iter()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical byte form, one `blob <id> <name>` line per entry in
    /// filename order. This exact byte sequence participates in commit
    /// identity derivation, so it must never change shape.
    pub fn canonical_bytes(&self) -> Bytes {
        let mut lines = Vec::new();
        for (name, blob_id) in &self.0 {
            lines.push(format!("blob {} {}", blob_id.as_str(), name));
        }

        Bytes::from(lines.join("\n").into_bytes())
    }
}

impl FromIterator<(String, ObjectId)> for Tree {
    fn from_iter<T: IntoIterator<Item = (String, ObjectId)>>(iter: T) -> Self {
        Tree(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_bytes_are_filename_sorted() {
        let mut tree = Tree::new();
        tree.insert("b.txt".to_string(), ObjectId::hash(b"two"));
        tree.insert("a.txt".to_string(), ObjectId::hash(b"one"));

        let rendered = String::from_utf8(tree.canonical_bytes().to_vec()).unwrap();
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" a.txt"));
        assert!(lines[1].ends_with(" b.txt"));
    }

    #[test]
    fn insertion_order_does_not_change_canonical_bytes() {
        let one = ObjectId::hash(b"one");
        let two = ObjectId::hash(b"two");

        let forward = Tree::from_iter([
            ("a.txt".to_string(), one.clone()),
            ("b.txt".to_string(), two.clone()),
        ]);
        let backward = Tree::from_iter([
            ("b.txt".to_string(), two),
            ("a.txt".to_string(), one),
        ]);

        assert_eq!(forward.canonical_bytes(), backward.canonical_bytes());
    }
}
