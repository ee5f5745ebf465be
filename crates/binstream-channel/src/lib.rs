//! Seekable byte channels for the binstream codec.
//!
//! This is the lowest layer of binstream. A channel is anything that can
//! read, write and seek raw bytes and knows which of those it is allowed to
//! do:
//! - [`BinaryFile`]: a file opened with a [`FileMode`]
//! - [`MemoryChannel`]: a growable in-memory buffer
//!
//! The codec in `binstream-codec` builds on the [`ByteChannel`] trait only.

pub mod error;
pub mod file;
pub mod memory;
pub mod mode;
pub mod traits;

pub use error::{ChannelError, Result};
pub use file::BinaryFile;
pub use memory::MemoryChannel;
pub use mode::FileMode;
pub use traits::ByteChannel;
