//! Read operations.
//!
//! Each operation has a chaining form that records failures on the stream
//! and a `try_` form that returns them.

use std::io::Read;

use binstream_channel::ByteChannel;
use bytemuck::Pod;
use tracing::trace;

use crate::buffer::ByteBuffer;
use crate::codec::{Decode, LengthPrefix};
use crate::error::{Operation, Result, StreamError};
use crate::stream::BinaryStream;

/// Upper bound on the bytes a sequence read reserves before decoding.
const MAX_PREALLOC_BYTES: usize = 64 * 1024;

/// Elements to reserve for a sequence of `count` with `available` bytes left.
fn reserve_hint<T: Decode>(count: usize, available: u64) -> usize {
    let available = usize::try_from(available).unwrap_or(usize::MAX);
    let fits = available / T::MIN_WIRE_SIZE.max(1);
    let budget = MAX_PREALLOC_BYTES / std::mem::size_of::<T>().max(1);
    count.min(fits).min(budget)
}

impl<C: ByteChannel> BinaryStream<C> {
    /// Read exactly `buf.len()` raw bytes.
    #[track_caller]
    pub fn try_read_raw(&mut self, buf: &mut [u8]) -> Result<()> {
        self.require(Operation::Read)?;
        if buf.is_empty() {
            return Ok(());
        }
        match self.inner.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(StreamError::from_io(err, buf.len()))),
        }
    }

    /// Read a fixed-width value from its raw host representation.
    ///
    /// Reads exactly `size_of::<T>()` bytes with no byte-order conversion.
    /// The `Pod` bound limits this to types for which every bit pattern is
    /// valid and that hold no pointers or padding.
    #[track_caller]
    pub fn try_read_scalar<T: Pod>(&mut self) -> Result<T> {
        let mut value = T::zeroed();
        self.try_read_raw(bytemuck::bytes_of_mut(&mut value))?;
        Ok(value)
    }

    /// Chaining form of [`try_read_scalar`](Self::try_read_scalar).
    #[track_caller]
    pub fn read_scalar<T: Pod>(&mut self, out: &mut T) -> &mut Self {
        let result = self.try_read_scalar::<T>().map(|value| *out = value);
        self.record(result)
    }

    /// Decode any [`Decode`] value.
    #[track_caller]
    pub fn try_read<T: Decode>(&mut self) -> Result<T> {
        self.require(Operation::Read)?;
        T::decode(self).map_err(|err| self.fail(err))
    }

    /// Chaining form of [`try_read`](Self::try_read). `out` is left as is on
    /// failure.
    #[track_caller]
    pub fn read<T: Decode>(&mut self, out: &mut T) -> &mut Self {
        let result = self.try_read::<T>().map(|value| *out = value);
        self.record(result)
    }

    /// Read a text/buffer length prefix and validate it.
    #[track_caller]
    fn read_len_checked(&mut self) -> Result<usize> {
        let len = self.try_read_scalar::<LengthPrefix>()? as usize;
        self.check_len(len)?;
        Ok(len)
    }

    /// Read length-prefixed UTF-8 text.
    ///
    /// A zero length yields an empty string without a raw read.
    #[track_caller]
    pub fn try_read_text(&mut self) -> Result<String> {
        let len = self.read_len_checked()?;
        if len == 0 {
            return Ok(String::new());
        }

        let mut bytes = vec![0u8; len];
        self.try_read_raw(&mut bytes)?;
        trace!(len, "decoded text");
        String::from_utf8(bytes).map_err(|err| self.fail(StreamError::InvalidText(err)))
    }

    /// Chaining form of [`try_read_text`](Self::try_read_text).
    #[track_caller]
    pub fn read_text(&mut self, out: &mut String) -> &mut Self {
        let result = self.try_read_text().map(|text| *out = text);
        self.record(result)
    }

    /// Read a length-prefixed raw buffer.
    #[track_caller]
    pub fn try_read_buffer(&mut self) -> Result<ByteBuffer> {
        let len = self.read_len_checked()?;
        if len == 0 {
            return Ok(ByteBuffer::default());
        }

        let mut bytes = vec![0u8; len];
        self.try_read_raw(&mut bytes)?;
        trace!(len, "decoded buffer");
        Ok(ByteBuffer::from(bytes))
    }

    /// Chaining form of [`try_read_buffer`](Self::try_read_buffer).
    #[track_caller]
    pub fn read_buffer(&mut self, out: &mut ByteBuffer) -> &mut Self {
        let result = self.try_read_buffer().map(|buffer| *out = buffer);
        self.record(result)
    }

    /// Read a count-prefixed sequence into `out`.
    ///
    /// `out` is cleared once the count is read, then each element is
    /// appended as it is decoded. If element `k` fails, `out` keeps the
    /// elements before it.
    ///
    /// Space is reserved for no more elements than the remaining bytes can
    /// hold, and for at most 64 KiB of them.
    #[track_caller]
    pub fn try_read_sequence_into<T: Decode>(&mut self, out: &mut Vec<T>) -> Result<()> {
        let start = self.tell()?;
        let count = self.try_read_scalar::<LengthPrefix>()? as usize;
        out.clear();

        let available = self.remaining()?;
        out.reserve(reserve_hint::<T>(count, available));

        for _ in 0..count {
            match T::decode(self) {
                Ok(item) => out.push(item),
                Err(err) => return Err(self.fail(err)),
            }
        }

        let end = self.tell()?;
        trace!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            count,
            "decoded sequence"
        );
        Ok(())
    }

    /// Chaining form of [`try_read_sequence_into`](Self::try_read_sequence_into).
    #[track_caller]
    pub fn read_sequence<T: Decode>(&mut self, out: &mut Vec<T>) -> &mut Self {
        let result = self.try_read_sequence_into(out);
        self.record(result)
    }

    /// Read length-prefixed bytes into `buf` and NUL-terminate them.
    ///
    /// Fails with [`StreamError::CapacityExceeded`] unless `buf` has room
    /// for the bytes plus the terminator; only the prefix is consumed in that
    /// case. The length is then validated like a text length. Returns the
    /// length without the terminator.
    #[track_caller]
    pub fn try_read_cstr_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        let len = self.try_read_scalar::<LengthPrefix>()? as usize;
        if len >= buf.len() {
            return Err(self.fail(StreamError::CapacityExceeded {
                len,
                capacity: buf.len(),
            }));
        }
        self.check_len(len)?;

        self.try_read_raw(&mut buf[..len])?;
        buf[len] = 0;
        Ok(len)
    }

    /// Chaining form of [`try_read_cstr_into`](Self::try_read_cstr_into).
    #[track_caller]
    pub fn read_cstr_into(&mut self, buf: &mut [u8]) -> &mut Self {
        let result = self.try_read_cstr_into(buf).map(|_| ());
        self.record(result)
    }
}
