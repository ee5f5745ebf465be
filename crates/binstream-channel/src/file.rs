use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ChannelError, Result};
use crate::mode::FileMode;
use crate::traits::{denied, ByteChannel};

/// A file opened for binary I/O.
///
/// The file is opened with the translated [`FileMode`] and closed on drop.
/// I/O the mode does not permit fails with `PermissionDenied` before the
/// file is touched.
#[derive(Debug)]
pub struct BinaryFile {
    file: File,
    path: PathBuf,
    mode: FileMode,
}

impl BinaryFile {
    /// Open `path` with `mode`. `BINARY` is always added.
    pub fn open(path: impl AsRef<Path>, mode: FileMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mode = mode.validate()? | FileMode::BINARY;

        let file = match mode.open_options().open(&path) {
            Ok(file) => file,
            Err(source) => {
                warn!(path = %path.display(), ?mode, error = %source, "failed to open file");
                return Err(ChannelError::Open { path, source });
            }
        };

        debug!(path = %path.display(), ?mode, "opened binary file");
        Ok(Self { file, path, mode })
    }

    /// Create or truncate `path` for reading and writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, FileMode::READ | FileMode::OVERWRITE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Size on disk, from file metadata.
    pub fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Flush and sync file contents to disk.
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }

    /// Consume the channel and return the underlying file.
    pub fn into_inner(self) -> File {
        self.file
    }
}

impl Read for BinaryFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.mode.is_readable() {
            return Err(denied("read", self.mode));
        }
        self.file.read(buf)
    }
}

impl Write for BinaryFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.mode.is_writable() {
            return Err(denied("write", self.mode));
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Seek for BinaryFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl ByteChannel for BinaryFile {
    fn mode(&self) -> FileMode {
        self.mode
    }
}
