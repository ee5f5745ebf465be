use std::ffi::{CStr, CString};

use binstream_channel::ByteChannel;
use bytes::{BufMut, BytesMut};

use crate::buffer::ByteBuffer;
use crate::error::{Result, StreamError};
use crate::stream::BinaryStream;

/// Type of every length and count prefix.
pub type LengthPrefix = u32;

/// Prefix width on the wire: 4 bytes, host byte order.
pub const PREFIX_SIZE: usize = std::mem::size_of::<LengthPrefix>();

/// A value that can be written to a stream.
///
/// Encoding goes into a scratch buffer first; the stream writes it to the
/// channel in one call, so a value that fails to encode writes nothing.
pub trait Encode {
    fn encode(&self, dst: &mut BytesMut) -> Result<()>;
}

/// A value that can be read back from a stream.
pub trait Decode: Sized {
    /// Fewest bytes one encoded value occupies. Bounds how many elements a
    /// sequence read reserves space for up front.
    const MIN_WIRE_SIZE: usize = 1;

    fn decode<C: ByteChannel>(stream: &mut BinaryStream<C>) -> Result<Self>;
}

/// Append a length prefix.
///
/// Wire format:
/// ```text
/// ┌──────────────────────┬──────────────────┐
/// │ Length (4B, host)    │ Length items     │
/// └──────────────────────┴──────────────────┘
/// ```
pub fn encode_len(len: usize, dst: &mut BytesMut) -> Result<()> {
    let prefix = LengthPrefix::try_from(len).map_err(|_| StreamError::LengthOverflow(len))?;
    dst.put_slice(&prefix.to_ne_bytes());
    Ok(())
}

pub(crate) fn encode_bytes(bytes: &[u8], dst: &mut BytesMut) -> Result<()> {
    dst.reserve(PREFIX_SIZE + bytes.len());
    encode_len(bytes.len(), dst)?;
    dst.put_slice(bytes);
    Ok(())
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode(&self, dst: &mut BytesMut) -> Result<()> {
                    dst.put_slice(bytemuck::bytes_of(self));
                    Ok(())
                }
            }

            impl Decode for $ty {
                const MIN_WIRE_SIZE: usize = std::mem::size_of::<$ty>();

                fn decode<C: ByteChannel>(stream: &mut BinaryStream<C>) -> Result<Self> {
                    stream.try_read_scalar::<$ty>()
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl Encode for bool {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_u8(u8::from(*self));
        Ok(())
    }
}

impl Decode for bool {
    fn decode<C: ByteChannel>(stream: &mut BinaryStream<C>) -> Result<Self> {
        match stream.try_read_scalar::<u8>()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(stream.fail(StreamError::InvalidData(format!(
                "invalid bool byte {other:#04x}"
            )))),
        }
    }
}

impl Encode for str {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        encode_bytes(self.as_bytes(), dst)
    }
}

impl Encode for String {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        self.as_str().encode(dst)
    }
}

impl Decode for String {
    const MIN_WIRE_SIZE: usize = PREFIX_SIZE;

    fn decode<C: ByteChannel>(stream: &mut BinaryStream<C>) -> Result<Self> {
        stream.try_read_text()
    }
}

impl Encode for ByteBuffer {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        encode_bytes(self.as_slice(), dst)
    }
}

impl Decode for ByteBuffer {
    const MIN_WIRE_SIZE: usize = PREFIX_SIZE;

    fn decode<C: ByteChannel>(stream: &mut BinaryStream<C>) -> Result<Self> {
        stream.try_read_buffer()
    }
}

/// Written without the terminator.
impl Encode for CStr {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        encode_bytes(self.to_bytes(), dst)
    }
}

impl Encode for CString {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        self.as_c_str().encode(dst)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        encode_len(self.len(), dst)?;
        for item in self {
            item.encode(dst)?;
        }
        Ok(())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        self.as_slice().encode(dst)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        self.as_slice().encode(dst)
    }
}

/// Elements decoded before a failure are dropped; use
/// [`BinaryStream::read_sequence`] to keep them.
impl<T: Decode> Decode for Vec<T> {
    const MIN_WIRE_SIZE: usize = PREFIX_SIZE;

    fn decode<C: ByteChannel>(stream: &mut BinaryStream<C>) -> Result<Self> {
        let mut items = Vec::new();
        stream.try_read_sequence_into(&mut items)?;
        Ok(items)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        (**self).encode(dst)
    }
}
