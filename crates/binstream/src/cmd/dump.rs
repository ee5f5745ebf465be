use std::io::SeekFrom;

use binstream_channel::{BinaryFile, ByteChannel, FileMode};
use binstream_codec::{BinaryStream, StreamConfig, StreamError};
use tracing::{debug, info};

use crate::cmd::DumpArgs;
use crate::exit::{channel_error, stream_error, CliError, CliResult, SUCCESS, USAGE};
use crate::layout::{decode_field, parse_layout, FieldError, FieldType};
use crate::output::{print_dump, DumpField, DumpOutput, OutputFormat};

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = parse_layout(&args.layout)
        .map_err(|err| CliError::new(USAGE, format!("invalid layout: {err}")))?;
    if args.cstr_capacity == 0 {
        return Err(CliError::new(USAGE, "cstr capacity must be greater than zero"));
    }

    let mut file =
        BinaryFile::open(&args.path, FileMode::READ).map_err(|e| channel_error("open", e))?;
    let config = StreamConfig {
        max_length: args.max_length,
        ..StreamConfig::default()
    };
    let mut stream = BinaryStream::with_config(&mut file, config);
    let size = stream.size().map_err(|e| stream_error("size", e))?;
    if args.offset > size {
        return Err(CliError::new(
            USAGE,
            format!("offset {} is past the end of a {size} byte file", args.offset),
        ));
    }
    stream
        .seek(SeekFrom::Start(args.offset))
        .map_err(|e| stream_error("seek", e))?;

    let mut fields = Vec::new();
    let outcome = decode_all(&mut stream, &layout, &args, &mut fields);
    info!(fields = fields.len(), complete = outcome.is_ok(), "dump finished");

    let out = DumpOutput {
        path: args.path.display().to_string(),
        size,
        fields,
        complete: outcome.is_ok(),
        error: outcome.as_ref().err().map(ToString::to_string),
    };
    print_dump(&out, format);

    match outcome {
        Ok(()) => Ok(SUCCESS),
        Err(err) => Err(stream_error("decode failed", err)),
    }
}

/// Decode the layout once, or until the end with `--repeat`. Fields decoded
/// before a failure are kept in `fields`, followed by the partly decoded
/// field when it has a partial value.
fn decode_all<C: ByteChannel>(
    stream: &mut BinaryStream<C>,
    layout: &[FieldType],
    args: &DumpArgs,
    fields: &mut Vec<DumpField>,
) -> Result<(), StreamError> {
    let mut pass = 0usize;
    loop {
        for ty in layout {
            let offset = stream.tell()?;
            let value = match decode_field(stream, ty, args.cstr_capacity) {
                Ok(value) => value,
                Err(FieldError { partial, error }) => {
                    if let Some(value) = partial {
                        fields.push(DumpField {
                            offset,
                            kind: ty.to_string(),
                            value,
                            partial: true,
                        });
                    }
                    return Err(error);
                }
            };
            debug!(offset, field = %ty, "decoded field");
            fields.push(DumpField {
                offset,
                kind: ty.to_string(),
                value,
                partial: false,
            });
        }
        pass += 1;

        if !args.repeat || stream.is_at_end()? {
            debug!(pass, "layout passes decoded");
            return Ok(());
        }
    }
}
