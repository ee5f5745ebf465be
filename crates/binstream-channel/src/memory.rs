use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use crate::mode::FileMode;
use crate::traits::{denied, ByteChannel};

/// A growable in-memory byte channel.
///
/// Writes past the end extend the buffer; writes inside it overwrite.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    cursor: Cursor<Vec<u8>>,
    mode: FileMode,
}

impl MemoryChannel {
    /// Create an empty read/write channel.
    pub fn new() -> Self {
        Self::with_mode(FileMode::READ_WRITE)
    }

    /// Create an empty channel with an explicit mode.
    pub fn with_mode(mode: FileMode) -> Self {
        Self::from_bytes(Vec::new(), mode)
    }

    /// Wrap existing bytes. `APPEND` starts the cursor at the end.
    pub fn from_bytes(bytes: Vec<u8>, mode: FileMode) -> Self {
        let mut cursor = Cursor::new(bytes);
        if mode.contains(FileMode::APPEND) {
            cursor.set_position(cursor.get_ref().len() as u64);
        }
        Self { cursor, mode }
    }

    /// Wrap existing bytes for reading only.
    pub fn read_only(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_bytes(bytes.into(), FileMode::READ)
    }

    /// Create an empty channel that only accepts writes.
    pub fn write_only() -> Self {
        Self::with_mode(FileMode::WRITE)
    }

    /// The full contents, independent of the cursor.
    pub fn as_bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Current cursor position.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Consume the channel and return its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for MemoryChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.mode.is_readable() {
            return Err(denied("read", self.mode));
        }
        self.cursor.read(buf)
    }
}

impl Write for MemoryChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.mode.is_writable() {
            return Err(denied("write", self.mode));
        }
        if self.mode.contains(FileMode::APPEND) {
            self.cursor.seek(SeekFrom::End(0))?;
        }
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryChannel {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl ByteChannel for MemoryChannel {
    fn mode(&self) -> FileMode {
        self.mode
    }
}
