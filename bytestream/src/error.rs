use std::io;

use thiserror::Error;

/// Failure reported by a remote filesystem client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("invalid file handle {0}")]
    InvalidHandle(u64),

    #[error("is a directory: {0}")]
    IsADirectory(String),

    // Raised by test clients that simulate remote failures.
    #[error("{0}")]
    Injected(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Error surfaced by a byte stream. Every client-facing variant names the
/// file it was working on and keeps the client's own error as its source.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to open remote file {location}: {source}")]
    Open { location: String, source: ClientError },

    #[error("Error reading from remote file {location}: {source}")]
    Read { location: String, source: ClientError },

    #[error("Error seeking remote file {location} to offset {offset}: {source}")]
    Seek {
        location: String,
        offset: u64,
        source: ClientError,
    },

    #[error("Error getting position of remote file {location}: {source}")]
    Position { location: String, source: ClientError },

    #[error("Error closing remote file {location}: {source}")]
    Close { location: String, source: ClientError },

    #[error("Error getting info for remote file {location}: {source}")]
    Metadata { location: String, source: ClientError },

    #[error("no remote file is open")]
    NotOpen,

    #[error("stream already has {location} open")]
    AlreadyOpen { location: String },
}

pub type Result<T> = std::result::Result<T, StreamError>;

impl StreamError {
    /// Location of the file the failed operation targeted, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Open { location, .. }
            | Self::Read { location, .. }
            | Self::Seek { location, .. }
            | Self::Position { location, .. }
            | Self::Close { location, .. }
            | Self::Metadata { location, .. }
            | Self::AlreadyOpen { location } => Some(location),
            Self::NotOpen => None,
        }
    }

    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Open { source, .. }
            | Self::Read { source, .. }
            | Self::Seek { source, .. }
            | Self::Position { source, .. }
            | Self::Close { source, .. }
            | Self::Metadata { source, .. } => Some(source),
            Self::NotOpen | Self::AlreadyOpen { .. } => None,
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match err.client_error() {
            Some(ClientError::NotFound(_)) => io::ErrorKind::NotFound,
            Some(ClientError::Io(e)) => e.kind(),
            Some(_) => io::ErrorKind::Other,
            None => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
