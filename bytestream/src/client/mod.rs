//! Remote filesystem client seam
//!
//! The byte stream adapter never talks to a filesystem directly; it is handed
//! a shared client implementing [`FsClient`]. The client owns every open file
//! and hands out opaque [`FileHandle`]s that stay valid until `close_file`.
//!
//! Submodules:
//! - `localfs`: client rooted at a local directory, for development and demos
//! - `memory`: in-memory client with fault injection, for tests
pub mod localfs;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ClientError;

/// Opaque reference to a file opened by a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileHandle(u64);

impl FileHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
}

/// Path metadata returned by [`FsClient::get_path_info`].
///
/// The client may track these structures; callers hand each one back through
/// [`FsClient::free_file_info`] once they are done with it.
#[derive(Clone, Debug, Serialize)]
pub struct FileInfo {
    pub path: String,
    pub kind: FileKind,
    pub size: u64,
    pub block_size: u64,
    pub replication: u16,
    pub modified: Option<DateTime<Utc>>,
}

/// Capability set consumed from a remote filesystem connection.
///
/// Implementations are shared between streams and must tolerate concurrent
/// calls on distinct handles. A `read` returning `Ok(0)` signals end-of-data.
pub trait FsClient: Send + Sync {
    /// Opens `path` read-only.
    fn open_file(&self, path: &str) -> Result<FileHandle, ClientError>;

    fn read(&self, handle: FileHandle, buf: &mut [u8]) -> Result<usize, ClientError>;

    /// Current cursor offset of `handle`.
    fn tell(&self, handle: FileHandle) -> Result<u64, ClientError>;

    /// Moves the cursor of `handle` to the absolute `offset`.
    fn seek(&self, handle: FileHandle, offset: u64) -> Result<(), ClientError>;

    fn close_file(&self, handle: FileHandle) -> Result<(), ClientError>;

    fn get_path_info(&self, path: &str) -> Result<FileInfo, ClientError>;

    fn free_file_info(&self, info: FileInfo);
}
