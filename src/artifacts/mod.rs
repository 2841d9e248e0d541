//! Data structures and algorithms
//!
//! - `branch`: validated branch names
//! - `graph`: commit graph traversal and split point (merge base) search
//! - `merge`: three-way merge classification and conflict file layout
//! - `objects`: object types (blob, commit, tree, object id)
//! - `status`: working tree status report

pub mod branch;
pub mod graph;
pub mod merge;
pub mod objects;
pub mod status;
