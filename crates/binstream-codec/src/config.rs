/// Default maximum length accepted from a text/buffer prefix: 64 MiB.
pub const DEFAULT_MAX_LENGTH: usize = 64 * 1024 * 1024;

/// Limits applied while decoding length-prefixed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Largest text/buffer length a read will allocate for. Default: 64 MiB.
    pub max_length: usize,
    /// When true, a length prefix larger than the bytes left in the channel
    /// is rejected before allocating.
    pub check_remaining: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            check_remaining: true,
        }
    }
}
