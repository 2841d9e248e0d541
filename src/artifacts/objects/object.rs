use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::Result;
use bytes::Bytes;
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Deserialize the object content. The `<type> <size>\0` header has
    /// already been consumed by the caller.
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Content-derived id: the hash of the canonical serialized form.
    ///
    /// Commits override this — their identity is derived from logical fields
    /// rather than the stored encoding (the secondary parent is excluded).
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        Ok(ObjectId::hash(&content))
    }
}
