//! Typed binary streams over files and memory buffers.
//!
//! binstream reads and writes scalars, length-prefixed text and buffers, and
//! count-prefixed sequences over any seekable byte channel, in host byte
//! order with no framing.
//!
//! # Crate Structure
//!
//! - [`channel`]: byte channels with access modes (files, memory)
//! - [`codec`]: the stream cursor and its value encodings
//!
//! ```
//! use binstream::channel::MemoryChannel;
//! use binstream::codec::BinaryStream;
//!
//! let mut channel = MemoryChannel::new();
//! let mut stream = BinaryStream::new(&mut channel);
//! stream.write(&42u16).write_text("answer");
//! stream.rewind().unwrap();
//!
//! let (mut n, mut label) = (0u16, String::new());
//! stream.read(&mut n).read_text(&mut label);
//! assert!(stream.finish().is_ok());
//! assert_eq!((n, label.as_str()), (42, "answer"));
//! ```

/// Re-export channel types.
pub mod channel {
    pub use binstream_channel::*;
}

/// Re-export codec types.
pub mod codec {
    pub use binstream_codec::*;
}
