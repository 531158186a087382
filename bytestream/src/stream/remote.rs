//! RemoteByteStream: forwards the `ByteStream` contract to a remote filesystem client.

use std::fmt;
use std::sync::Arc;

use scopeguard::guard;
use tracing::{debug, trace, warn};

use super::ByteStream;
use crate::client::{FileHandle, FileInfo, FsClient};
use crate::counter::BytesReadSink;
use crate::error::{ClientError, Result, StreamError};

pub struct RemoteByteStream<C: FsClient> {
    client: Arc<C>,
    sink: Arc<dyn BytesReadSink>,
    file: Option<FileHandle>,
    location: String,
    // bytes read since the last open; published to `sink` on close
    total_bytes_read: u64,
}

impl<C: FsClient> RemoteByteStream<C> {
    pub fn new(client: Arc<C>, sink: Arc<dyn BytesReadSink>) -> Self {
        Self {
            client,
            sink,
            file: None,
            location: String::new(),
            total_bytes_read: 0,
        }
    }

    /// Location passed to the most recent `open`.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Bytes read since the last successful open.
    pub fn bytes_read(&self) -> u64 {
        self.total_bytes_read
    }

    fn handle(&self) -> Result<FileHandle> {
        self.file.ok_or(StreamError::NotOpen)
    }

    fn path_info(&self) -> Result<FileInfo> {
        self.client
            .get_path_info(&self.location)
            .map_err(|source| StreamError::Metadata {
                location: self.location.clone(),
                source,
            })
    }

    fn tell(&self, handle: FileHandle) -> Result<u64> {
        self.client
            .tell(handle)
            .map_err(|source| StreamError::Position {
                location: self.location.clone(),
                source,
            })
    }

    fn read_error(&self, source: ClientError) -> StreamError {
        StreamError::Read {
            location: self.location.clone(),
            source,
        }
    }
}

impl<C: FsClient> ByteStream for RemoteByteStream<C> {
    fn open(&mut self, location: &str) -> Result<()> {
        if self.file.is_some() {
            return Err(StreamError::AlreadyOpen {
                location: self.location.clone(),
            });
        }
        self.location = location.to_string();
        self.total_bytes_read = 0;
        let handle = self
            .client
            .open_file(location)
            .map_err(|source| StreamError::Open {
                location: self.location.clone(),
                source,
            })?;
        self.file = Some(handle);
        debug!("RemoteByteStream: opened file {}", self.location);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let handle = self.handle()?;
        let mut n_read = 0;
        while n_read < buf.len() {
            // On error the bytes of this call are dropped and not counted.
            let last_read = self
                .client
                .read(handle, &mut buf[n_read..])
                .map_err(|e| self.read_error(e))?;
            if last_read == 0 {
                break;
            }
            n_read += last_read;
        }
        self.total_bytes_read += n_read as u64;
        trace!(location = %self.location, requested = buf.len(), n_read, "read");
        Ok(n_read)
    }

    fn seek(&mut self, offset: u64) -> Result<()> {
        let handle = self.handle()?;
        self.client
            .seek(handle, offset)
            .map_err(|source| StreamError::Seek {
                location: self.location.clone(),
                offset,
                source,
            })
    }

    fn position(&self) -> Result<u64> {
        let handle = self.handle()?;
        self.tell(handle)
    }

    fn eof(&self) -> Result<bool> {
        let handle = self.handle()?;
        let client = &self.client;
        let info = guard(self.path_info()?, |info| client.free_file_info(info));
        let position = self.tell(handle)?;
        Ok(position >= info.size)
    }

    fn size(&self) -> Result<u64> {
        self.handle()?;
        let info = self.path_info()?;
        let size = info.size;
        self.client.free_file_info(info);
        Ok(size)
    }

    fn close(&mut self) -> Result<()> {
        let Some(handle) = self.file else {
            return Ok(());
        };
        self.client
            .close_file(handle)
            .map_err(|source| StreamError::Close {
                location: self.location.clone(),
                source,
            })?;
        self.file = None;
        self.sink.add(self.total_bytes_read);
        debug!(
            "RemoteByteStream: closed file {} after reading {} bytes",
            self.location, self.total_bytes_read
        );
        Ok(())
    }
}

impl<C: FsClient> Drop for RemoteByteStream<C> {
    fn drop(&mut self) {
        if self.file.is_some() {
            if let Err(e) = self.close() {
                warn!("RemoteByteStream: dropped with open file: {e}");
            }
        }
    }
}

impl<C: FsClient> fmt::Debug for RemoteByteStream<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteByteStream")
            .field("location", &self.location)
            .field("file", &self.file)
            .field("total_bytes_read", &self.total_bytes_read)
            .finish()
    }
}
