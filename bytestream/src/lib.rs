// Library crate for bytestream: read access to remote files through an injected
// filesystem client, plus the commands behind the `bytestream` binary.

pub mod cli;
pub mod client;
pub mod commands;
pub mod counter;
pub mod error;
pub mod stream;

pub use client::{FileHandle, FileInfo, FileKind, FsClient};
pub use counter::{BytesReadSink, Counter, NullSink};
pub use error::{ClientError, Result, StreamError};
pub use stream::{ByteStream, ByteStreamReader, RemoteByteStream};
