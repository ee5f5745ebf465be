use std::fmt;
use std::io;

use binstream_channel::ChannelError;
use binstream_codec::StreamError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn io_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::UnexpectedEof => FAILURE,
        _ => INTERNAL,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(io_code(err.kind()), format!("{context}: {err}"))
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    let code = match &err {
        ChannelError::Open { source, .. } | ChannelError::Io(source) => io_code(source.kind()),
        ChannelError::InvalidMode(_) => USAGE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn stream_error(context: &str, err: StreamError) -> CliError {
    match err {
        StreamError::Io(source) => io_error(context, source),
        StreamError::Capability { .. } => {
            CliError::new(PERMISSION_DENIED, format!("{context}: {err}"))
        }
        StreamError::Truncated { .. }
        | StreamError::UnexpectedEof { .. }
        | StreamError::LengthTooLarge { .. }
        | StreamError::LengthOverflow(_)
        | StreamError::CapacityExceeded { .. }
        | StreamError::InvalidText(_)
        | StreamError::InvalidData(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        StreamError::Unhealthy => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}
