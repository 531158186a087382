//! Byte streams over remote files
//!
//! Responsibilities:
//! - Define the narrow capability contract scanners read through
//!   ([`ByteStream`]): open/read/seek/position/eof/close.
//! - Adapt a shared [`FsClient`](crate::client::FsClient) connection to that
//!   contract, one open file per stream ([`RemoteByteStream`]).
//! - Bridge any byte stream into `std::io::Read + Seek` ([`ByteStreamReader`]).
//!
//! A stream is driven from a single thread; every call blocks until the
//! client returns. Nothing is retried here.
pub mod reader;
pub mod remote;

pub use reader::ByteStreamReader;
pub use remote::RemoteByteStream;

use crate::error::Result;

pub trait ByteStream {
    /// Opens `location` for reading. The cursor starts at offset 0.
    fn open(&mut self, location: &str) -> Result<()>;

    /// Fills `buf` until it is full or the file has no more data and returns
    /// the number of bytes read. A short count means end-of-data was reached.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Moves the cursor to the absolute `offset`.
    fn seek(&mut self, offset: u64) -> Result<()>;

    fn position(&self) -> Result<u64>;

    /// True once the cursor has reached the file size.
    fn eof(&self) -> Result<bool>;

    /// Total size of the open file.
    fn size(&self) -> Result<u64>;

    /// Releases the open file. Closing a stream with nothing open succeeds.
    fn close(&mut self) -> Result<()>;
}
