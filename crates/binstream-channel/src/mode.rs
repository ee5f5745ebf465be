//! Access-mode flags for byte channels.

use std::fs::OpenOptions;

use bitflags::bitflags;

use crate::error::{ChannelError, Result};

bitflags! {
    /// How a channel was opened.
    ///
    /// Flags combine freely, except `OVERWRITE` with `APPEND`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileMode: u8 {
        /// Allow input operations, cursor at 0.
        const READ = 1;
        /// Allow output operations, keep previous data, cursor at 0.
        const WRITE = 2;
        /// Allow output operations, erase previous data.
        const OVERWRITE = 4;
        /// Allow output operations, cursor at end of data.
        const APPEND = 8;
        /// Binary mode. Informational: there is no text translation.
        const BINARY = 16;
    }
}

impl FileMode {
    /// Read and write without truncation.
    pub const READ_WRITE: FileMode = FileMode::READ.union(FileMode::WRITE);

    /// Returns true if input operations are allowed.
    pub fn is_readable(self) -> bool {
        self.contains(FileMode::READ)
    }

    /// Returns true if any output flag is set.
    pub fn is_writable(self) -> bool {
        self.intersects(FileMode::WRITE | FileMode::OVERWRITE | FileMode::APPEND)
    }

    /// Reject modes that can do nothing, or that both truncate and append.
    pub fn validate(self) -> Result<Self> {
        if !self.is_readable() && !self.is_writable() {
            return Err(ChannelError::InvalidMode(self));
        }
        if self.contains(FileMode::OVERWRITE | FileMode::APPEND) {
            return Err(ChannelError::InvalidMode(self));
        }
        Ok(self)
    }

    /// Translate into `OpenOptions`.
    ///
    /// Any output flag creates the file when it is missing.
    pub fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.contains(FileMode::READ));

        if self.contains(FileMode::WRITE) {
            options.write(true).create(true);
        }
        if self.contains(FileMode::OVERWRITE) {
            options.write(true).create(true).truncate(true);
        }
        if self.contains(FileMode::APPEND) {
            options.append(true).create(true);
        }
        options
    }
}

impl Default for FileMode {
    fn default() -> Self {
        FileMode::READ
    }
}
