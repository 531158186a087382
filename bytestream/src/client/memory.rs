//! In-memory client with fault injection, used to exercise stream error paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use super::{FileHandle, FileInfo, FileKind, FsClient};
use crate::error::ClientError;

/// Client operations that can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Open,
    Read,
    Tell,
    Seek,
    Close,
    PathInfo,
}

struct OpenFile {
    data: Arc<Vec<u8>>,
    pos: u64,
}

#[derive(Default)]
struct State {
    files: HashMap<String, Arc<Vec<u8>>>,
    open: HashMap<u64, OpenFile>,
    next_handle: u64,
    // Op -> calls still let through before the armed failure fires.
    failures: HashMap<Op, usize>,
    max_read_chunk: Option<usize>,
    outstanding_infos: usize,
}

impl State {
    fn check(&mut self, op: Op) -> Result<(), ClientError> {
        match self.failures.get_mut(&op) {
            Some(0) => {
                self.failures.remove(&op);
                Err(ClientError::Injected(format!("injected {op:?} failure")))
            }
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn file_mut(&mut self, handle: FileHandle) -> Result<&mut OpenFile, ClientError> {
        self.open
            .get_mut(&handle.id())
            .ok_or(ClientError::InvalidHandle(handle.id()))
    }
}

#[derive(Default)]
pub struct MemoryClient {
    state: Mutex<State>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `path`, replacing any previous content. Open
    /// handles keep reading the content they were opened with.
    pub fn insert(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.state()
            .files
            .insert(path.into(), Arc::new(data.into()));
    }

    /// Makes the next call of `op` fail. One-shot.
    pub fn fail_next(&self, op: Op) {
        self.fail_after(op, 0);
    }

    /// Lets `calls` calls of `op` succeed, then fails the following one.
    /// Re-arming replaces any pending failure for `op`.
    pub fn fail_after(&self, op: Op, calls: usize) {
        self.state().failures.insert(op, calls);
    }

    /// Caps how many bytes a single client read returns.
    pub fn set_max_read_chunk(&self, max: Option<usize>) {
        self.state().max_read_chunk = max;
    }

    pub fn open_handles(&self) -> usize {
        self.state().open.len()
    }

    /// `FileInfo` structures handed out and not yet freed.
    pub fn outstanding_file_infos(&self) -> usize {
        self.state().outstanding_infos
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FsClient for MemoryClient {
    fn open_file(&self, path: &str) -> Result<FileHandle, ClientError> {
        let mut state = self.state();
        state.check(Op::Open)?;
        let data = state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(path.to_string()))?;
        state.next_handle += 1;
        let id = state.next_handle;
        state.open.insert(id, OpenFile { data, pos: 0 });
        Ok(FileHandle::new(id))
    }

    fn read(&self, handle: FileHandle, buf: &mut [u8]) -> Result<usize, ClientError> {
        let mut state = self.state();
        state.check(Op::Read)?;
        let cap = state.max_read_chunk.unwrap_or(usize::MAX);
        let file = state.file_mut(handle)?;
        let start = usize::try_from(file.pos)
            .unwrap_or(usize::MAX)
            .min(file.data.len());
        let n = buf.len().min(file.data.len() - start).min(cap);
        buf[..n].copy_from_slice(&file.data[start..start + n]);
        file.pos += n as u64;
        Ok(n)
    }

    fn tell(&self, handle: FileHandle) -> Result<u64, ClientError> {
        let mut state = self.state();
        state.check(Op::Tell)?;
        Ok(state.file_mut(handle)?.pos)
    }

    fn seek(&self, handle: FileHandle, offset: u64) -> Result<(), ClientError> {
        let mut state = self.state();
        state.check(Op::Seek)?;
        state.file_mut(handle)?.pos = offset;
        Ok(())
    }

    fn close_file(&self, handle: FileHandle) -> Result<(), ClientError> {
        let mut state = self.state();
        state.check(Op::Close)?;
        state
            .open
            .remove(&handle.id())
            .map(drop)
            .ok_or(ClientError::InvalidHandle(handle.id()))
    }

    fn get_path_info(&self, path: &str) -> Result<FileInfo, ClientError> {
        let mut state = self.state();
        state.check(Op::PathInfo)?;
        let size = state
            .files
            .get(path)
            .map(|data| data.len() as u64)
            .ok_or_else(|| ClientError::NotFound(path.to_string()))?;
        state.outstanding_infos += 1;
        Ok(FileInfo {
            path: path.to_string(),
            kind: FileKind::File,
            size,
            block_size: 64 * 1024 * 1024,
            replication: 3,
            modified: Some(Utc::now()),
        })
    }

    fn free_file_info(&self, _info: FileInfo) {
        let mut state = self.state();
        state.outstanding_infos = state.outstanding_infos.saturating_sub(1);
    }
}
