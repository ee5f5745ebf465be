use std::io::{Read, Seek, Write};

use crate::mode::FileMode;

/// A seekable byte source/sink that knows its access mode.
///
/// This is the only interface the codec consumes: raw `read`/`write`,
/// `seek`/`stream_position`, and the mode flags used for capability checks.
/// Implementations should refuse I/O their mode does not allow with
/// `ErrorKind::PermissionDenied`.
pub trait ByteChannel: Read + Write + Seek {
    /// The mode the channel was opened with.
    fn mode(&self) -> FileMode;
}

impl<C: ByteChannel + ?Sized> ByteChannel for &mut C {
    fn mode(&self) -> FileMode {
        (**self).mode()
    }
}

impl<C: ByteChannel + ?Sized> ByteChannel for Box<C> {
    fn mode(&self) -> FileMode {
        (**self).mode()
    }
}

pub(crate) fn denied(op: &str, mode: FileMode) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        format!("{op} not permitted by mode {mode:?}"),
    )
}
