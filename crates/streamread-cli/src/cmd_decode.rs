/// Implementation of `streamread decode`.
///
/// Opens the input as a live source, then performs one typed read per
/// layout field and prints each value as it is decoded.
///
/// # Output format
///
/// One tab-separated line per field: byte offset, field name, value.
///
/// ```text
/// 0	u32le	42
/// 4	str	"hello"
/// 10	bool	true
/// 11	bytes:4	deadbeef
/// ```
///
/// With `--repeat` the layout is decoded again and again. Running out of
/// input exactly at the start of a record ends the run cleanly; running
/// out anywhere else is a truncation error.
use std::io::Write;

use anyhow::{Context, Result, bail};
use streamread_decoder::{ReadError, ReaderConfig, StreamReader, TextEncoding};
use streamread_source::{ReaderSource, Source};
use tracing::debug;

use crate::layout::{Field, parse_layout};
use crate::{DecodeArgs, open_input};

/// Run the `streamread decode` command.
///
/// # Errors
///
/// Returns an error if the layout or encoding is invalid, the input cannot
/// be opened, or a field cannot be decoded.
pub async fn run(args: &DecodeArgs) -> Result<()> {
    let fields = parse_layout(&args.layout)?;
    let encoding: TextEncoding = args.encoding.parse()?;

    let input = open_input(&args.input).await?;
    let source = ReaderSource::with_capacity(input, args.chunk_size);
    let config = ReaderConfig::default().with_encoding(encoding);
    let mut reader = StreamReader::with_config(source, config);

    let mut out = std::io::stdout();
    let records = decode_records(&mut reader, &fields, args.repeat, &mut out)
        .await
        .with_context(|| format!("failed to decode {}", args.input.display()))?;

    debug!(records, bytes = reader.offset(), "decode complete");
    Ok(())
}

/// Decode `fields` once, or until the input ends when `repeat` is set.
/// Returns the number of complete records.
///
/// A repeated layout must consume input, otherwise the end of the input
/// would never be reached.
pub async fn decode_records<S: Source, W: Write>(
    reader: &mut StreamReader<S>,
    fields: &[Field],
    repeat: bool,
    out: &mut W,
) -> Result<u64> {
    if repeat && fields.iter().all(|field| field.is_zero_width()) {
        bail!("--repeat needs a layout that consumes at least one byte per record");
    }

    let mut records = 0;
    loop {
        let record_start = reader.offset();
        for field in fields {
            let offset = reader.offset();
            match decode_field(reader, *field).await {
                Ok(value) => writeln!(out, "{offset}\t{field}\t{value}")?,
                Err(err)
                    if repeat
                        && err.is_stream_closed()
                        && reader.offset() == record_start =>
                {
                    // The failed read consumed nothing; stray bytes mean a
                    // truncated record rather than a clean end.
                    if matches!(reader.read(1).await, Err(probe) if probe.is_stream_closed()) {
                        return Ok(records);
                    }
                    return Err(err).with_context(|| format!("field {field} at offset {offset}"));
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("field {field} at offset {offset}"));
                }
            }
        }
        records += 1;

        if !repeat {
            return Ok(records);
        }
    }
}

/// Perform the typed read for `field` and render its value.
async fn decode_field<S: Source>(
    reader: &mut StreamReader<S>,
    field: Field,
) -> Result<String, ReadError> {
    let value = match field {
        Field::U8 => reader.read_u8().await?.to_string(),
        Field::I8 => reader.read_i8().await?.to_string(),
        Field::Bool => reader.read_bool().await?.to_string(),
        Field::Varint => reader.read_7bit_encoded_int().await?.to_string(),
        Field::U16(e) => reader.read_u16(e).await?.to_string(),
        Field::I16(e) => reader.read_i16(e).await?.to_string(),
        Field::U32(e) => reader.read_u32(e).await?.to_string(),
        Field::I32(e) => reader.read_i32(e).await?.to_string(),
        Field::U64(e) => reader.read_u64(e).await?.to_string(),
        Field::I64(e) => reader.read_i64(e).await?.to_string(),
        Field::F32(e) => reader.read_f32(e).await?.to_string(),
        Field::F64(e) => reader.read_f64(e).await?.to_string(),
        Field::UInt(width, e) => reader.read_uint(width, e).await?.to_string(),
        Field::Int(width, e) => reader.read_int(width, e).await?.to_string(),
        Field::Str(len) => format!("{:?}", reader.read_string(len, None).await?),
        Field::Bytes(len) => hex::encode(reader.read(len).await?),
    };
    Ok(value)
}
