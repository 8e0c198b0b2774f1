use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, StoreError};
use crate::path::{split_logical_path, validate_file_name};
use crate::{DirHandle, FileHandle, Storage};

#[derive(Debug)]
struct MemoryTree {
    root_available: bool,
    fail_reads: bool,
    fail_writes: bool,
    dirs: BTreeSet<String>,
    files: BTreeMap<(String, String), Vec<u8>>,
}

/// In-process storage tree with switchable faults.
#[derive(Debug)]
pub struct MemoryStorage {
    tree: Mutex<MemoryTree>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tree: Mutex::new(MemoryTree {
                root_available: true,
                fail_reads: false,
                fail_writes: false,
                dirs: BTreeSet::new(),
                files: BTreeMap::new(),
            }),
        }
    }

    fn tree(&self) -> MutexGuard<'_, MemoryTree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_root_available(&self, available: bool) {
        self.tree().root_available = available;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.tree().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.tree().fail_writes = fail;
    }

    /// Writes a file directly, creating its directory, bypassing faults.
    pub fn put_file(&self, logical_dir: &str, name: &str, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let dir = split_logical_path(logical_dir)?.join("/");
        validate_file_name(name)?;
        let mut tree = self.tree();
        tree.dirs.insert(dir.clone());
        tree.files.insert((dir, name.to_string()), bytes.into());
        Ok(())
    }

    pub fn file_contents(&self, logical_dir: &str, name: &str) -> Option<Vec<u8>> {
        let dir = split_logical_path(logical_dir).ok()?.join("/");
        self.tree().files.get(&(dir, name.to_string())).cloned()
    }

    pub fn remove_file(&self, logical_dir: &str, name: &str) -> bool {
        let Ok(segments) = split_logical_path(logical_dir) else {
            return false;
        };
        let key = (segments.join("/"), name.to_string());
        self.tree().files.remove(&key).is_some()
    }

    fn require_root(tree: &MemoryTree) -> Result<()> {
        if tree.root_available {
            Ok(())
        } else {
            Err(StoreError::RootUnavailable("memory root".to_string()))
        }
    }
}

impl Storage for MemoryStorage {
    fn resolve_directory(&self, logical_path: &str) -> Result<Option<DirHandle>> {
        let segments = split_logical_path(logical_path)?;
        let tree = self.tree();
        Self::require_root(&tree)?;
        let handle = DirHandle::new(&segments);
        Ok(tree.dirs.contains(handle.logical_path()).then_some(handle))
    }

    fn create_directory(&self, logical_path: &str) -> Result<DirHandle> {
        let segments = split_logical_path(logical_path)?;
        let mut tree = self.tree();
        Self::require_root(&tree)?;
        if tree.fail_writes {
            return Err(StoreError::Injected("create directory"));
        }
        let handle = DirHandle::new(&segments);
        tree.dirs.insert(handle.logical_path().to_string());
        Ok(handle)
    }

    fn find_file(&self, dir: &DirHandle, name: &str) -> Result<Option<FileHandle>> {
        validate_file_name(name)?;
        let tree = self.tree();
        Self::require_root(&tree)?;
        let key = (dir.logical_path().to_string(), name.to_string());
        Ok(tree
            .files
            .contains_key(&key)
            .then(|| FileHandle::new(dir, name, None)))
    }

    fn create_file(&self, dir: &DirHandle, name: &str, mime_type: &str) -> Result<FileHandle> {
        validate_file_name(name)?;
        let mut tree = self.tree();
        Self::require_root(&tree)?;
        if tree.fail_writes {
            return Err(StoreError::Injected("create file"));
        }
        if !tree.dirs.contains(dir.logical_path()) {
            return Err(StoreError::NotFound(dir.logical_path().to_string()));
        }
        tree.files
            .entry((dir.logical_path().to_string(), name.to_string()))
            .or_default();
        Ok(FileHandle::new(dir, name, Some(mime_type)))
    }

    fn open_for_read(&self, file: &FileHandle) -> Result<Box<dyn Read + Send>> {
        let tree = self.tree();
        Self::require_root(&tree)?;
        if tree.fail_reads {
            return Err(StoreError::Injected("open for read"));
        }
        let key = (file.dir().logical_path().to_string(), file.name().to_string());
        let bytes = tree
            .files
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", key.0, key.1)))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn replace_contents(&self, file: &FileHandle, bytes: &[u8]) -> Result<()> {
        let mut tree = self.tree();
        Self::require_root(&tree)?;
        if tree.fail_writes {
            return Err(StoreError::Injected("replace contents"));
        }
        let key = (file.dir().logical_path().to_string(), file.name().to_string());
        if !tree.dirs.contains(&key.0) {
            return Err(StoreError::NotFound(key.0));
        }
        tree.files.insert(key, bytes.to_vec());
        Ok(())
    }
}
