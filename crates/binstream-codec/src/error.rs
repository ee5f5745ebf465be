use std::fmt;

use binstream_channel::FileMode;

/// The capability an operation needs from its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => f.write_str("read"),
            Operation::Write => f.write_str("write"),
        }
    }
}

/// Errors that can occur while encoding or decoding a stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The channel's mode does not allow the operation.
    #[error("{operation} not permitted on a channel opened with {mode:?}")]
    Capability { operation: Operation, mode: FileMode },

    /// An I/O error occurred on the channel.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel ended before a read could be satisfied.
    #[error("channel ended before {needed} bytes could be read")]
    Truncated { needed: usize },

    /// A length prefix asks for more bytes than the channel has left.
    #[error("length prefix of {needed} bytes exceeds the {available} bytes remaining")]
    UnexpectedEof { needed: u64, available: u64 },

    /// A length prefix exceeds the configured maximum.
    #[error("length prefix too large ({len} bytes, max {max})")]
    LengthTooLarge { len: usize, max: usize },

    /// A length does not fit the 4-byte prefix.
    #[error("length {0} does not fit a 4-byte prefix")]
    LengthOverflow(usize),

    /// The destination buffer cannot hold the value plus its terminator.
    #[error("destination too small ({len} bytes + terminator, capacity {capacity})")]
    CapacityExceeded { len: usize, capacity: usize },

    /// Decoded text is not valid UTF-8.
    #[error("text is not valid UTF-8: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),

    /// Decoded bytes are not a valid value of the requested type.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// An earlier operation failed and the stream has not been repositioned.
    #[error("stream is unhealthy after an earlier failure")]
    Unhealthy,
}

pub type Result<T> = std::result::Result<T, StreamError>;

impl StreamError {
    /// Map a failed raw read or write of `needed` bytes.
    pub(crate) fn from_io(err: std::io::Error, needed: usize) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => StreamError::Truncated { needed },
            _ => StreamError::Io(err),
        }
    }
}
