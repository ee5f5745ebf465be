//! Write operations.
//!
//! Values are encoded into the stream's scratch buffer and written with a
//! single `write_all`, so a value that fails to encode leaves the channel
//! untouched. Text and raw buffers skip the scratch buffer: the prefix and
//! the payload are written directly.

use std::ffi::CStr;
use std::io::Write;

use binstream_channel::ByteChannel;
use bytemuck::Pod;
use bytes::BytesMut;

use crate::codec::{Encode, LengthPrefix};
use crate::error::{Operation, Result, StreamError};
use crate::stream::{BinaryStream, INITIAL_BUFFER_CAPACITY, SCRATCH_RETAIN_LIMIT};

impl<C: ByteChannel> BinaryStream<C> {
    /// Write raw bytes as they are, without a prefix.
    #[track_caller]
    pub fn try_write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.require(Operation::Write)?;
        if bytes.is_empty() {
            return Ok(());
        }
        match self.inner.write_all(bytes) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(StreamError::from_io(err, bytes.len()))),
        }
    }

    /// Write a fixed-width value as its raw host representation.
    ///
    /// Writes exactly `size_of::<T>()` bytes with no byte-order conversion.
    #[track_caller]
    pub fn try_write_scalar<T: Pod>(&mut self, value: &T) -> Result<()> {
        self.try_write_raw(bytemuck::bytes_of(value))
    }

    /// Chaining form of [`try_write_scalar`](Self::try_write_scalar).
    #[track_caller]
    pub fn write_scalar<T: Pod>(&mut self, value: &T) -> &mut Self {
        let result = self.try_write_scalar(value);
        self.record(result)
    }

    #[track_caller]
    fn write_with<F>(&mut self, encode: F) -> Result<()>
    where
        F: FnOnce(&mut BytesMut) -> Result<()>,
    {
        self.require(Operation::Write)?;

        self.buf.clear();
        if let Err(err) = encode(&mut self.buf) {
            return Err(self.fail(err));
        }

        let len = self.buf.len();
        let written = self.inner.write_all(&self.buf);
        if self.buf.capacity() > SCRATCH_RETAIN_LIMIT {
            self.buf = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
        }
        match written {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(StreamError::from_io(err, len))),
        }
    }

    /// Write a length prefix and `bytes` without staging them.
    #[track_caller]
    fn write_prefixed(&mut self, bytes: &[u8]) -> Result<()> {
        self.require(Operation::Write)?;
        let prefix = match LengthPrefix::try_from(bytes.len()) {
            Ok(prefix) => prefix,
            Err(_) => return Err(self.fail(StreamError::LengthOverflow(bytes.len()))),
        };

        let mut written = self.inner.write_all(&prefix.to_ne_bytes());
        if written.is_ok() && !bytes.is_empty() {
            written = self.inner.write_all(bytes);
        }
        match written {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(StreamError::from_io(err, bytes.len()))),
        }
    }

    /// Encode and write any [`Encode`] value.
    #[track_caller]
    pub fn try_write<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.write_with(|dst| value.encode(dst))
    }

    /// Chaining form of [`try_write`](Self::try_write).
    #[track_caller]
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        let result = self.try_write(value);
        self.record(result)
    }

    /// Write length-prefixed text. Empty text writes only the prefix.
    #[track_caller]
    pub fn write_text(&mut self, text: &str) -> &mut Self {
        let result = self.write_prefixed(text.as_bytes());
        self.record(result)
    }

    /// Write a length-prefixed raw buffer.
    #[track_caller]
    pub fn write_buffer(&mut self, bytes: &[u8]) -> &mut Self {
        let result = self.write_prefixed(bytes);
        self.record(result)
    }

    /// Write a count-prefixed sequence, elements in order.
    #[track_caller]
    pub fn write_sequence<T: Encode>(&mut self, items: &[T]) -> &mut Self {
        self.write(items)
    }

    /// Write a C string's bytes with a length prefix, without the terminator.
    #[track_caller]
    pub fn try_write_cstr(&mut self, value: &CStr) -> Result<()> {
        self.try_write(value)
    }

    /// Chaining form of [`try_write_cstr`](Self::try_write_cstr).
    #[track_caller]
    pub fn write_cstr(&mut self, value: &CStr) -> &mut Self {
        let result = self.try_write_cstr(value);
        self.record(result)
    }

    /// Flush the underlying channel.
    pub fn flush(&mut self) -> Result<()> {
        match self.inner.flush() {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(StreamError::Io(err))),
        }
    }
}
