use std::fs;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};
use crate::path::{split_logical_path, validate_file_name};
use crate::{DirHandle, FileHandle, Storage};

/// Storage backed by a directory on the local filesystem.
///
/// The root itself is never created here; it is owned by the application
/// (see `ensure_app_data_dir`), and a missing root reports as unavailable.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location a file handle points at.
    pub fn file_path(&self, file: &FileHandle) -> PathBuf {
        self.dir_path(file.dir()).join(file.name())
    }

    fn dir_path(&self, dir: &DirHandle) -> PathBuf {
        dir.logical_path()
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    fn require_root(&self) -> Result<()> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::RootUnavailable(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(
                StoreError::RootUnavailable(self.root.display().to_string()),
            ),
            Err(err) => Err(err.into()),
        }
    }
}

impl Storage for FsStorage {
    fn resolve_directory(&self, logical_path: &str) -> Result<Option<DirHandle>> {
        let segments = split_logical_path(logical_path)?;
        self.require_root()?;
        let handle = DirHandle::new(&segments);
        match fs::metadata(self.dir_path(&handle)) {
            Ok(meta) if meta.is_dir() => Ok(Some(handle)),
            Ok(_) => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn create_directory(&self, logical_path: &str) -> Result<DirHandle> {
        let segments = split_logical_path(logical_path)?;
        self.require_root()?;
        let handle = DirHandle::new(&segments);
        fs::create_dir_all(self.dir_path(&handle))?;
        Ok(handle)
    }

    fn find_file(&self, dir: &DirHandle, name: &str) -> Result<Option<FileHandle>> {
        validate_file_name(name)?;
        let handle = FileHandle::new(dir, name, None);
        match fs::metadata(self.file_path(&handle)) {
            Ok(meta) if meta.is_file() => Ok(Some(handle)),
            Ok(_) => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn create_file(&self, dir: &DirHandle, name: &str, mime_type: &str) -> Result<FileHandle> {
        validate_file_name(name)?;
        let handle = FileHandle::new(dir, name, Some(mime_type));
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_path(&handle))?;
        Ok(handle)
    }

    fn open_for_read(&self, file: &FileHandle) -> Result<Box<dyn Read + Send>> {
        let path = self.file_path(file);
        let reader = fs::File::open(&path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(path.display().to_string())
            } else {
                StoreError::Io(err)
            }
        })?;
        Ok(Box::new(BufReader::new(reader)))
    }

    fn replace_contents(&self, file: &FileHandle, bytes: &[u8]) -> Result<()> {
        let dir = self.dir_path(file.dir());
        let target = dir.join(file.name());
        // Same directory as the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }
}
