//! Repository handle
//!
//! All operations run against an explicit `Repository` value bundling the
//! four storage areas behind their traits: object database, branch refs,
//! working tree and stage. The file-backed constructors wire every area to
//! the `.grit` metadata directory; `in_memory` wires them to ephemeral
//! stores for tests.

use crate::areas::database::{FsObjectStore, MemObjectStore, ObjectStore};
use crate::areas::refs::{FsRefStore, MemRefStore, RefStore};
use crate::areas::stage::{FsStageStore, MemStageStore, Stage, StageStore};
use crate::areas::workspace::{FsWorkspace, MemWorkspace, Workspace};
use crate::artifacts::graph::CommitGraph;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::io::Cursor;
use std::path::Path;

/// Name of the metadata directory at the working tree root
pub const METADATA_DIR: &str = ".grit";

pub struct Repository {
    objects: Box<dyn ObjectStore>,
    refs: Box<dyn RefStore>,
    workspace: Box<dyn Workspace>,
    stage: Box<dyn StageStore>,
}

impl Repository {
    /// Open an existing repository rooted at `path`.
    ///
    /// Fails with `Error::NoRepository` when `path` holds no metadata
    /// directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = path.join(METADATA_DIR);

        if !metadata.is_dir() {
            return Err(Error::NoRepository);
        }

        Ok(Self::at(path))
    }

    /// Create the metadata directory layout for a fresh repository.
    ///
    /// Fails with `Error::RepositoryExists` when one is already present.
    /// The caller still owes the root commit and the default branch.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = path.join(METADATA_DIR);

        if metadata.exists() {
            return Err(Error::RepositoryExists);
        }

        std::fs::create_dir_all(metadata.join("objects"))?;
        std::fs::create_dir_all(metadata.join("refs").join("heads"))?;
        std::fs::create_dir_all(metadata.join("stage").join("addition"))?;
        std::fs::create_dir_all(metadata.join("stage").join("removal"))?;

        Ok(Self::at(path))
    }

    fn at(path: &Path) -> Self {
        let metadata = path.join(METADATA_DIR);

        Repository {
            objects: Box::new(FsObjectStore::new(metadata.join("objects").into())),
            refs: Box::new(FsRefStore::new(metadata.clone().into())),
            workspace: Box::new(FsWorkspace::new(path.into(), METADATA_DIR.to_string())),
            stage: Box::new(FsStageStore::new(metadata.join("stage").into())),
        }
    }

    /// Fully in-memory repository, used by tests. The caller still owes the
    /// root commit and the default branch, same as `create`.
    pub fn in_memory() -> Self {
        Repository {
            objects: Box::new(MemObjectStore::new()),
            refs: Box::new(MemRefStore::new()),
            workspace: Box::new(MemWorkspace::new()),
            stage: Box::new(MemStageStore::new()),
        }
    }

    pub fn objects(&self) -> &dyn ObjectStore {
        &*self.objects
    }

    pub fn refs(&self) -> &dyn RefStore {
        &*self.refs
    }

    pub fn workspace(&self) -> &dyn Workspace {
        &*self.workspace
    }

    pub fn graph(&self) -> CommitGraph<'_> {
        CommitGraph::new(&*self.objects)
    }

    /// Id of the commit the current branch designates
    pub fn head_id(&self) -> Result<ObjectId> {
        let branch = self.refs.current_branch()?;
        self.refs.read_ref(&branch)
    }

    /// The commit the current branch designates
    pub fn head(&self) -> Result<Commit> {
        let id = self.head_id()?;
        self.graph().get(&id)
    }

    pub fn load_stage(&self) -> Result<Stage> {
        self.stage.load()
    }

    pub fn save_stage(&self, stage: &Stage) -> Result<()> {
        self.stage.save(stage)
    }

    /// Load a blob's content, failing with `Error::Corrupt` when the id
    /// designates a commit
    pub fn load_blob(&self, id: &ObjectId) -> Result<Bytes> {
        let bytes = self.objects.get(id)?;
        let mut reader = Cursor::new(bytes);

        match ObjectType::parse_object_type(&mut reader)? {
            ObjectType::Blob => Ok(Blob::deserialize(reader)?.into_content()),
            ObjectType::Commit => Err(Error::Corrupt(format!("{id} is not a blob"))),
        }
    }
}
