use std::ffi::CString;
use std::io::SeekFrom;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use binstream_channel::{BinaryFile, ByteChannel, FileMode, MemoryChannel};
use binstream_codec::{
    BinaryStream, ByteBuffer, Decode, Encode, Operation, Result, StreamError,
};
use bytes::BytesMut;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("binstream-codec-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn u32_roundtrip_from_empty_channel() {
    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);

    stream.write(&0xDEAD_BEEFu32);
    stream.seek(SeekFrom::Start(0)).unwrap();

    assert_eq!(stream.try_read::<u32>().unwrap(), 0xDEAD_BEEF);
}

#[test]
fn empty_and_short_text_positions() {
    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);

    stream.write_text("").write_text("hello");
    stream.rewind().unwrap();

    let (mut first, mut second) = (String::from("stale"), String::new());
    stream.read_text(&mut first).read_text(&mut second);
    assert!(stream.finish().is_ok());

    assert_eq!(first, "");
    assert_eq!(second, "hello");
    assert_eq!(stream.tell().unwrap(), 4 + 4 + 5);
}

#[test]
fn u32_sequence_roundtrip_position() {
    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);

    stream.write_sequence(&[1u32, 2, 3]);
    stream.rewind().unwrap();

    let mut items = Vec::new();
    stream.read_sequence::<u32>(&mut items);
    assert!(stream.finish().is_ok());
    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(stream.tell().unwrap(), 4 + 3 * 4);
}

#[test]
fn zero_buffer_roundtrip() {
    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);

    stream.write(&ByteBuffer::new(10));
    stream.rewind().unwrap();

    let buffer = stream.try_read_buffer().unwrap();
    assert_eq!(buffer.len(), 10);
    assert!(buffer.iter().all(|b| *b == 0));
}

#[test]
fn read_only_file_rejects_write() {
    let dir = temp_dir("readonly");
    let path = dir.join("data.bin");
    std::fs::write(&path, b"original").unwrap();

    let mut file = BinaryFile::open(&path, FileMode::READ).unwrap();
    let mut stream = BinaryStream::new(&mut file);

    stream.write(&1u64).write_text("more");
    assert!(!stream.is_healthy());
    assert!(matches!(
        stream.finish(),
        Err(StreamError::Capability {
            operation: Operation::Write,
            ..
        })
    ));
    drop(file);

    assert_eq!(std::fs::read(&path).unwrap(), b"original");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn truncated_sequence_keeps_decoded_prefix() {
    let mut wire = 5u32.to_ne_bytes().to_vec();
    wire.extend_from_slice(&10u32.to_ne_bytes());
    wire.extend_from_slice(&20u32.to_ne_bytes());
    let mut channel = MemoryChannel::read_only(wire);
    let mut stream = BinaryStream::new(&mut channel);

    let mut items = vec![99u32];
    stream.read_sequence(&mut items);

    assert_eq!(items, vec![10, 20]);
    assert!(!stream.is_healthy());
    assert!(matches!(
        stream.finish(),
        Err(StreamError::Truncated { needed: 4 })
    ));
}

#[test]
fn failed_read_is_sticky_until_seek() {
    let mut channel = MemoryChannel::read_only(vec![1, 2]);
    let mut stream = BinaryStream::new(&mut channel);

    assert!(stream.try_read::<u32>().is_err());
    let position = stream.tell().unwrap();

    assert!(matches!(
        stream.try_read::<u8>(),
        Err(StreamError::Unhealthy)
    ));
    assert_eq!(stream.tell().unwrap(), position, "no bytes consumed");

    stream.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(stream.try_read::<u8>().unwrap(), 1);
}

#[test]
fn write_only_channel_rejects_read() {
    let mut channel = MemoryChannel::write_only();
    let mut stream = BinaryStream::new(&mut channel);
    stream.write(&3u16);
    stream.rewind().unwrap();

    assert!(matches!(
        stream.try_read::<u16>(),
        Err(StreamError::Capability {
            operation: Operation::Read,
            ..
        })
    ));
    assert_eq!(stream.tell().unwrap(), 0);
}

#[test]
fn scalar_roundtrip_across_types() {
    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);

    stream
        .write(&u8::MAX)
        .write(&i16::MIN)
        .write(&u64::MAX)
        .write(&i128::MIN)
        .write(&f32::EPSILON)
        .write(&f64::NAN)
        .write(&true);
    stream.rewind().unwrap();

    assert_eq!(stream.try_read::<u8>().unwrap(), u8::MAX);
    assert_eq!(stream.try_read::<i16>().unwrap(), i16::MIN);
    assert_eq!(stream.try_read::<u64>().unwrap(), u64::MAX);
    assert_eq!(stream.try_read::<i128>().unwrap(), i128::MIN);
    assert_eq!(stream.try_read::<f32>().unwrap().to_bits(), f32::EPSILON.to_bits());
    assert_eq!(stream.try_read::<f64>().unwrap().to_bits(), f64::NAN.to_bits());
    assert!(stream.try_read::<bool>().unwrap());
    assert!(stream.is_at_end().unwrap());
}

#[test]
fn text_with_embedded_nul_roundtrip() {
    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);

    let text = "nul\0inside\0";
    stream.write_text(text);
    stream.rewind().unwrap();

    let decoded = stream.try_read_text().unwrap();
    assert_eq!(decoded, text);
    assert_eq!(decoded.len(), 11);
}

#[test]
fn buffers_of_many_lengths_roundtrip() {
    let buffers: Vec<Vec<u8>> = (0..64u8).map(|n| (0..n).collect()).collect();

    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);
    for buffer in &buffers {
        stream.write_buffer(buffer);
    }
    stream.rewind().unwrap();

    for buffer in &buffers {
        assert_eq!(stream.try_read_buffer().unwrap().as_slice(), buffer.as_slice());
    }
    assert!(stream.is_at_end().unwrap());
}

#[test]
fn nested_sequences_roundtrip() {
    let value = vec![
        vec!["a".to_string(), String::new()],
        vec![],
        vec!["longer text".to_string()],
    ];

    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);
    stream.write(&value);
    stream.rewind().unwrap();

    let mut decoded: Vec<Vec<String>> = Vec::new();
    stream.read_sequence(&mut decoded);
    assert!(stream.finish().is_ok());
    assert_eq!(decoded, value);
}

#[test]
fn cstr_roundtrip_into_fixed_buffer() {
    let mut channel = MemoryChannel::new();
    let mut stream = BinaryStream::new(&mut channel);

    let name = CString::new("label").unwrap();
    stream.write_cstr(&name);
    stream.rewind().unwrap();

    let mut buf = [0xFFu8; 16];
    stream.read_cstr_into(&mut buf);
    assert!(stream.finish().is_ok());
    assert_eq!(&buf[..6], b"label\0");
}

#[test]
fn corrupt_length_prefix_rejected() {
    let mut wire = u32::MAX.to_ne_bytes().to_vec();
    wire.extend_from_slice(b"tiny");
    let mut channel = MemoryChannel::read_only(wire);
    let mut stream = BinaryStream::new(&mut channel);

    let err = stream.try_read_text().unwrap_err();
    assert!(matches!(err, StreamError::LengthTooLarge { .. }));
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    id: u32,
    name: String,
    tags: Vec<String>,
    payload: ByteBuffer,
    enabled: bool,
}

impl Encode for Entry {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        self.id.encode(dst)?;
        self.name.encode(dst)?;
        self.tags.encode(dst)?;
        self.payload.encode(dst)?;
        self.enabled.encode(dst)
    }
}

impl Decode for Entry {
    fn decode<C: ByteChannel>(stream: &mut BinaryStream<C>) -> Result<Self> {
        Ok(Entry {
            id: stream.try_read()?,
            name: stream.try_read()?,
            tags: stream.try_read()?,
            payload: stream.try_read()?,
            enabled: stream.try_read()?,
        })
    }
}

#[test]
fn user_types_roundtrip_through_file() {
    let dir = temp_dir("entries");
    let path = dir.join("entries.bin");
    let entries = vec![
        Entry {
            id: 1,
            name: "first".into(),
            tags: vec!["a".into(), "b".into()],
            payload: ByteBuffer::from(vec![1, 2, 3]),
            enabled: true,
        },
        Entry {
            id: 2,
            name: String::new(),
            tags: Vec::new(),
            payload: ByteBuffer::default(),
            enabled: false,
        },
    ];

    {
        let mut file = BinaryFile::create(&path).unwrap();
        let mut stream = BinaryStream::new(&mut file);
        stream.write_text("entries").write_sequence(&entries);
        stream.finish().unwrap();
        stream.flush().unwrap();
    }

    let mut file = BinaryFile::open(&path, FileMode::READ).unwrap();
    let mut stream = BinaryStream::new(&mut file);
    let (mut title, mut decoded) = (String::new(), Vec::<Entry>::new());
    stream.read_text(&mut title).read_sequence(&mut decoded);
    stream.finish().unwrap();

    assert_eq!(title, "entries");
    assert_eq!(decoded, entries);
    assert!(stream.is_at_end().unwrap());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn injected_diagnostics_count_violations() {
    let count = Arc::new(AtomicUsize::new(0));
    let sink = {
        let count = Arc::clone(&count);
        move |_: &str, _: &'static std::panic::Location<'static>| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    };

    let mut channel = MemoryChannel::read_only(Vec::new());
    let mut stream = BinaryStream::new(&mut channel).with_diagnostics(Arc::new(sink));

    stream.write(&1u8).write(&2u8);
    assert_eq!(count.load(Ordering::SeqCst), 1, "second write is a no-op");

    stream.rewind().unwrap();
    stream.write_text("again");
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

/// A u32 that only decodes when even.
#[derive(Debug, PartialEq)]
struct Even(u32);

impl Decode for Even {
    const MIN_WIRE_SIZE: usize = 4;

    fn decode<C: ByteChannel>(stream: &mut BinaryStream<C>) -> Result<Self> {
        let value: u32 = stream.try_read()?;
        if value % 2 != 0 {
            return Err(StreamError::InvalidData(format!("{value} is odd")));
        }
        Ok(Even(value))
    }
}

#[test]
fn rejected_user_value_makes_stream_unhealthy() {
    let mut wire = 1u32.to_ne_bytes().to_vec();
    wire.extend_from_slice(&2u32.to_ne_bytes());
    let mut channel = MemoryChannel::read_only(wire);
    let mut stream = BinaryStream::new(&mut channel);

    assert!(matches!(
        stream.try_read::<Even>(),
        Err(StreamError::InvalidData(_))
    ));
    assert!(!stream.is_healthy());
    assert!(matches!(
        stream.try_read::<Even>(),
        Err(StreamError::Unhealthy)
    ));
    assert_eq!(stream.tell().unwrap(), 4, "second value left unread");

    stream.seek(SeekFrom::Start(4)).unwrap();
    assert_eq!(stream.try_read::<Even>().unwrap(), Even(2));
}

#[test]
fn rejected_user_element_stops_sequence() {
    let mut wire = 3u32.to_ne_bytes().to_vec();
    for value in [4u32, 7, 8] {
        wire.extend_from_slice(&value.to_ne_bytes());
    }
    let mut channel = MemoryChannel::read_only(wire);
    let mut stream = BinaryStream::new(&mut channel);

    let mut items = Vec::new();
    assert!(stream.try_read_sequence_into::<Even>(&mut items).is_err());
    assert_eq!(items, vec![Even(4)]);
    assert!(!stream.is_healthy());
    assert!(matches!(stream.try_read::<u32>(), Err(StreamError::Unhealthy)));
}
