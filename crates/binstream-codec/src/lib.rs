//! Typed binary stream codec over seekable byte channels.
//!
//! This is the core of binstream. Values map to a bare concatenation of
//! host-order encodings:
//! - Scalars: their raw in-memory bytes (`size_of::<T>()` each)
//! - Text and raw buffers: a 4-byte length followed by the bytes
//! - Sequences: a 4-byte count followed by each element
//!
//! There is no header, magic, version or checksum. Writer and reader must
//! agree on the exact sequence of types, and the format is only portable
//! between machines with the same endianness.
//!
//! Operations chain, and health is checked once at the end:
//!
//! ```
//! use binstream_channel::MemoryChannel;
//! use binstream_codec::BinaryStream;
//!
//! let mut channel = MemoryChannel::new();
//! let mut stream = BinaryStream::new(&mut channel);
//! stream.write(&7u32).write_text("seven").write_sequence(&[1u16, 2, 3]);
//! assert!(stream.finish().is_ok());
//!
//! stream.rewind().unwrap();
//! let (mut n, mut name, mut items) = (0u32, String::new(), Vec::<u16>::new());
//! stream.read(&mut n).read_text(&mut name).read_sequence(&mut items);
//! assert!(stream.finish().is_ok());
//! assert_eq!((n, name.as_str(), items), (7, "seven", vec![1, 2, 3]));
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod reader;
pub mod stream;
pub mod writer;

pub use buffer::ByteBuffer;
pub use codec::{Decode, Encode, LengthPrefix, PREFIX_SIZE};
pub use config::{StreamConfig, DEFAULT_MAX_LENGTH};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{Operation, Result, StreamError};
pub use stream::BinaryStream;
