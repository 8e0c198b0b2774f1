mod error;
mod fs;
mod memory;
mod path;

use std::io::Read;

pub use error::{Result, StoreError};
pub use fs::FsStorage;
pub use memory::MemoryStorage;
pub use path::{split_logical_path, validate_file_name};

/// Handle to a directory inside a storage root.
///
/// Handles are only meaningful to the storage that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirHandle {
    logical_path: String,
}

impl DirHandle {
    fn new(segments: &[&str]) -> Self {
        Self {
            logical_path: segments.join("/"),
        }
    }

    pub fn logical_path(&self) -> &str {
        &self.logical_path
    }
}

/// Handle to a file inside a directory of a storage root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    dir: DirHandle,
    name: String,
    mime_type: Option<String>,
}

impl FileHandle {
    fn new(dir: &DirHandle, name: &str, mime_type: Option<&str>) -> Self {
        Self {
            dir: dir.clone(),
            name: name.to_string(),
            mime_type: mime_type.map(str::to_string),
        }
    }

    pub fn dir(&self) -> &DirHandle {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type given at creation, if this handle came from `create_file`.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

/// Tree of named directories and files reachable through opaque handles.
///
/// `Ok(None)` from the lookup methods means "does not exist"; errors are
/// reserved for a root that cannot be reached or for failed I/O.
pub trait Storage: Send + Sync {
    fn resolve_directory(&self, logical_path: &str) -> Result<Option<DirHandle>>;

    fn create_directory(&self, logical_path: &str) -> Result<DirHandle>;

    fn find_file(&self, dir: &DirHandle, name: &str) -> Result<Option<FileHandle>>;

    /// Creates an empty file, or returns the existing one unchanged.
    fn create_file(&self, dir: &DirHandle, name: &str, mime_type: &str) -> Result<FileHandle>;

    fn open_for_read(&self, file: &FileHandle) -> Result<Box<dyn Read + Send>>;

    /// Replaces the whole content of `file`. Readers observe either the old
    /// or the new content, never a partial write.
    fn replace_contents(&self, file: &FileHandle, bytes: &[u8]) -> Result<()>;
}
