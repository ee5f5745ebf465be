//! Field layouts for `binstream dump`.
//!
//! A layout is a comma-separated list of field types, for example
//! `u32,text,seq<f64>,seq<seq<u8>>`.

use std::fmt;
use std::str::FromStr;

use binstream_channel::ByteChannel;
use binstream_codec::{BinaryStream, LengthPrefix, StreamError};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Text,
    Buffer,
    CStr,
    Seq(Box<FieldType>),
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_prefix("seq<").and_then(|rest| rest.strip_suffix('>')) {
            return Ok(FieldType::Seq(Box::new(inner.parse()?)));
        }
        let ty = match s {
            "u8" => FieldType::U8,
            "u16" => FieldType::U16,
            "u32" => FieldType::U32,
            "u64" => FieldType::U64,
            "i8" => FieldType::I8,
            "i16" => FieldType::I16,
            "i32" => FieldType::I32,
            "i64" => FieldType::I64,
            "f32" => FieldType::F32,
            "f64" => FieldType::F64,
            "bool" => FieldType::Bool,
            "text" => FieldType::Text,
            "buffer" => FieldType::Buffer,
            "cstr" => FieldType::CStr,
            "" => return Err("empty field type".to_string()),
            other => return Err(format!("unknown field type `{other}`")),
        };
        Ok(ty)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::U8 => "u8",
            FieldType::U16 => "u16",
            FieldType::U32 => "u32",
            FieldType::U64 => "u64",
            FieldType::I8 => "i8",
            FieldType::I16 => "i16",
            FieldType::I32 => "i32",
            FieldType::I64 => "i64",
            FieldType::F32 => "f32",
            FieldType::F64 => "f64",
            FieldType::Bool => "bool",
            FieldType::Text => "text",
            FieldType::Buffer => "buffer",
            FieldType::CStr => "cstr",
            FieldType::Seq(inner) => return write!(f, "seq<{inner}>"),
        };
        f.write_str(name)
    }
}

/// A field that failed to decode, with whatever part of it was decoded.
///
/// Only sequences have a partial value: the elements before the failure.
#[derive(Debug)]
pub struct FieldError {
    pub partial: Option<Value>,
    pub error: StreamError,
}

impl From<StreamError> for FieldError {
    fn from(error: StreamError) -> Self {
        Self {
            partial: None,
            error,
        }
    }
}

/// Parse a comma-separated layout. At least one field is required.
pub fn parse_layout(input: &str) -> std::result::Result<Vec<FieldType>, String> {
    let fields = input
        .split(',')
        .map(str::parse)
        .collect::<std::result::Result<Vec<FieldType>, String>>()?;
    Ok(fields)
}

/// Decode one field of type `ty` into a JSON value.
///
/// Buffers are rendered as lowercase hex. C strings are read into a
/// `cstr_capacity` byte buffer, terminator included. A sequence that fails
/// part way reports the elements decoded so far, nested partials included.
pub fn decode_field<C: ByteChannel>(
    stream: &mut BinaryStream<C>,
    ty: &FieldType,
    cstr_capacity: usize,
) -> Result<Value, FieldError> {
    let value = match ty {
        FieldType::U8 => Value::from(stream.try_read::<u8>()?),
        FieldType::U16 => Value::from(stream.try_read::<u16>()?),
        FieldType::U32 => Value::from(stream.try_read::<u32>()?),
        FieldType::U64 => Value::from(stream.try_read::<u64>()?),
        FieldType::I8 => Value::from(stream.try_read::<i8>()?),
        FieldType::I16 => Value::from(stream.try_read::<i16>()?),
        FieldType::I32 => Value::from(stream.try_read::<i32>()?),
        FieldType::I64 => Value::from(stream.try_read::<i64>()?),
        FieldType::F32 => Value::from(stream.try_read::<f32>()?),
        FieldType::F64 => Value::from(stream.try_read::<f64>()?),
        FieldType::Bool => Value::from(stream.try_read::<bool>()?),
        FieldType::Text => Value::from(stream.try_read_text()?),
        FieldType::Buffer => Value::from(to_hex(&stream.try_read_buffer()?)),
        FieldType::CStr => {
            let mut buf = vec![0u8; cstr_capacity];
            let len = stream.try_read_cstr_into(&mut buf)?;
            Value::from(String::from_utf8_lossy(&buf[..len]).into_owned())
        }
        FieldType::Seq(inner) => {
            let count = stream.try_read::<LengthPrefix>()?;
            let mut items = Vec::new();
            for _ in 0..count {
                match decode_field(stream, inner, cstr_capacity) {
                    Ok(item) => items.push(item),
                    Err(FieldError { partial, error }) => {
                        items.extend(partial);
                        return Err(FieldError {
                            partial: Some(Value::Array(items)),
                            error,
                        });
                    }
                }
            }
            Value::Array(items)
        }
    };
    Ok(value)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
