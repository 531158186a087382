//! Local directory client: serves a directory tree through the `FsClient` seam.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use super::{FileHandle, FileInfo, FileKind, FsClient};
use crate::error::ClientError;

const DEFAULT_BLOCK_SIZE: u64 = 128 * 1024 * 1024;

type SharedFile = Arc<Mutex<File>>;

pub struct LocalFsClient {
    root: PathBuf,
    // The table lock only guards lookups; I/O runs under the per-file lock.
    files: Mutex<HashMap<u64, SharedFile>>,
    next_handle: AtomicU64,
}

impl LocalFsClient {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            files: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of handles opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.files().len()
    }

    // Remote paths are absolute; they resolve under `root` and may not escape
    // it, neither through `..` nor through symlinks pointing outside.
    fn path_for(&self, path: &str) -> Result<PathBuf, ClientError> {
        let rel = Path::new(path.trim_start_matches('/'));
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ClientError::NotFound(path.to_string()));
        }
        let root = fs::canonicalize(&self.root).map_err(|e| map_not_found(path, e))?;
        let resolved = fs::canonicalize(root.join(rel)).map_err(|e| map_not_found(path, e))?;
        if !resolved.starts_with(&root) {
            return Err(ClientError::NotFound(path.to_string()));
        }
        Ok(resolved)
    }

    fn files(&self) -> MutexGuard<'_, HashMap<u64, SharedFile>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_file<T>(
        &self,
        handle: FileHandle,
        f: impl FnOnce(&mut File) -> io::Result<T>,
    ) -> Result<T, ClientError> {
        let file = self
            .files()
            .get(&handle.id())
            .cloned()
            .ok_or(ClientError::InvalidHandle(handle.id()))?;
        let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&mut file)?)
    }
}

fn map_not_found(path: &str, e: io::Error) -> ClientError {
    if e.kind() == io::ErrorKind::NotFound {
        ClientError::NotFound(path.to_string())
    } else {
        ClientError::Io(e)
    }
}

impl FsClient for LocalFsClient {
    fn open_file(&self, path: &str) -> Result<FileHandle, ClientError> {
        let local = self.path_for(path)?;
        let meta = fs::metadata(&local).map_err(|e| map_not_found(path, e))?;
        if meta.is_dir() {
            return Err(ClientError::IsADirectory(path.to_string()));
        }
        let file = File::open(&local).map_err(|e| map_not_found(path, e))?;
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.files().insert(id, Arc::new(Mutex::new(file)));
        Ok(FileHandle::new(id))
    }

    fn read(&self, handle: FileHandle, buf: &mut [u8]) -> Result<usize, ClientError> {
        self.with_file(handle, |file| loop {
            match file.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        })
    }

    fn tell(&self, handle: FileHandle) -> Result<u64, ClientError> {
        self.with_file(handle, |file| file.stream_position())
    }

    fn seek(&self, handle: FileHandle, offset: u64) -> Result<(), ClientError> {
        self.with_file(handle, |file| file.seek(SeekFrom::Start(offset)).map(|_| ()))
    }

    fn close_file(&self, handle: FileHandle) -> Result<(), ClientError> {
        self.files()
            .remove(&handle.id())
            .map(drop)
            .ok_or(ClientError::InvalidHandle(handle.id()))
    }

    fn get_path_info(&self, path: &str) -> Result<FileInfo, ClientError> {
        let local = self.path_for(path)?;
        let meta = fs::metadata(&local).map_err(|e| map_not_found(path, e))?;
        Ok(FileInfo {
            path: path.to_string(),
            kind: if meta.is_dir() {
                FileKind::Directory
            } else {
                FileKind::File
            },
            size: meta.len(),
            block_size: DEFAULT_BLOCK_SIZE,
            replication: 1,
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    fn free_file_info(&self, _info: FileInfo) {}
}
