//! `std::io` bridge for byte streams.

use std::io::{self, SeekFrom};

use super::ByteStream;

/// Wraps an open [`ByteStream`] so it can be used wherever `io::Read` or
/// `io::Seek` is expected (`BufReader`, `io::copy`, decoders).
#[derive(Debug)]
pub struct ByteStreamReader<S: ByteStream> {
    inner: S,
}

impl<S: ByteStream> ByteStreamReader<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteStream> io::Read for ByteStreamReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.inner.read(buf)?)
    }
}

impl<S: ByteStream> io::Seek for ByteStreamReader<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.inner.position()?.checked_add_signed(delta),
            SeekFrom::End(delta) => self.inner.size()?.checked_add_signed(delta),
        };
        let target = target.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;
        self.inner.seek(target)?;
        Ok(target)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.inner.position()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryClient;
    use crate::counter::NullSink;
    use crate::stream::RemoteByteStream;
    use std::io::{BufRead, BufReader, Read, Seek};
    use std::sync::Arc;

    fn reader_over(data: &[u8]) -> ByteStreamReader<RemoteByteStream<MemoryClient>> {
        let client = Arc::new(MemoryClient::new());
        client.insert("/t/lines.txt", data.to_vec());
        let mut stream = RemoteByteStream::new(client, Arc::new(NullSink));
        ByteStream::open(&mut stream, "/t/lines.txt").unwrap();
        ByteStreamReader::new(stream)
    }

    #[test]
    fn test_buf_reader_lines() {
        let reader = BufReader::new(reader_over(b"alpha\nbeta\ngamma\n"));
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_seek_from_end_and_current() {
        let mut r = reader_over(b"0123456789");
        assert_eq!(r.seek(SeekFrom::End(-3)).unwrap(), 7);
        let mut tail = String::new();
        r.read_to_string(&mut tail).unwrap();
        assert_eq!(tail, "789");

        assert_eq!(r.seek(SeekFrom::Start(2)).unwrap(), 2);
        assert_eq!(r.seek(SeekFrom::Current(3)).unwrap(), 5);
        assert_eq!(r.stream_position().unwrap(), 5);
        let mut one = [0u8; 1];
        r.read_exact(&mut one).unwrap();
        assert_eq!(&one, b"5");
    }

    #[test]
    fn test_seek_before_start_is_invalid() {
        let mut r = reader_over(b"abc");
        let err = r.seek(SeekFrom::Current(-1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(r.stream_position().unwrap(), 0);
    }

    #[test]
    fn test_inner_stream_stays_reachable() {
        let mut r = reader_over(b"abcdef");
        assert_eq!(r.get_ref().location(), "/t/lines.txt");
        r.get_mut().seek(4).unwrap();
        let mut rest = String::new();
        r.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "ef");
        assert_eq!(r.get_ref().bytes_read(), 2);
    }

    #[test]
    fn test_into_inner_returns_stream() {
        let mut r = reader_over(b"abc");
        let mut buf = Vec::new();
        r.read_to_end(&mut buf).unwrap();
        let stream = r.into_inner();
        assert_eq!(stream.bytes_read(), 3);
        assert!(stream.eof().unwrap());
    }
}
