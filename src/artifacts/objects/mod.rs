//! Object types and operations
//!
//! All repository content is stored as objects identified by SHA-1 hashes.
//! There are two object types:
//!
//! - **Blob**: the content of one file version (raw bytes)
//! - **Commit**: an immutable snapshot node with up to two parents and a
//!   filename -> blob id tree
//!
//! Both serialize to the `<type> <size>\0<content>` on-disk format.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
