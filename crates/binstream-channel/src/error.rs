use std::path::PathBuf;

use crate::mode::FileMode;

/// Errors that can occur while opening or driving a byte channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to open the file at the specified path.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requested mode is empty or combines exclusive flags.
    #[error("invalid file mode {0:?}")]
    InvalidMode(FileMode),

    /// An I/O error occurred on the channel.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
