/// Implementation of `streamread hexdump`.
///
/// Reads the input through the exact-read decoder, 16 bytes at a time,
/// and prints one line per chunk.
///
/// # Output format
///
/// ```text
/// 00000000  68 65 6c 6c 6f 20 77 6f 72 6c 64 0a 00 01 02 03  hello world.....
/// 00000010  ff fe                                             ..
/// ```
use std::io::Write;

use anyhow::Result;
use streamread_decoder::StreamReader;
use streamread_source::{ReaderSource, Source};

use crate::{HexdumpArgs, open_input};

const LINE_WIDTH: usize = 16;

/// Run the `streamread hexdump` command.
///
/// # Errors
///
/// Returns an error if the input cannot be opened or read.
pub async fn run(args: &HexdumpArgs) -> Result<()> {
    let input = open_input(&args.input).await?;
    let mut reader = StreamReader::new(ReaderSource::with_capacity(input, args.chunk_size));

    let mut out = std::io::stdout();
    let total = dump(&mut reader, &mut out).await?;
    tracing::debug!(total, "hexdump complete");
    Ok(())
}

/// Dump everything left in `reader` to `out`. Returns the final offset.
pub async fn dump<S: Source, W: Write>(reader: &mut StreamReader<S>, out: &mut W) -> Result<u64> {
    loop {
        let offset = reader.offset();
        match reader.read(LINE_WIDTH).await {
            Ok(line) => write_line(out, offset, &line)?,
            Err(err) if err.is_stream_closed() => break,
            Err(err) => return Err(err.into()),
        }
    }

    // A failed exact read consumes nothing, so the short tail is still
    // there to be taken one byte at a time.
    let offset = reader.offset();
    let mut tail = Vec::with_capacity(LINE_WIDTH);
    loop {
        match reader.read_byte().await {
            Ok(byte) => tail.push(byte),
            Err(err) if err.is_stream_closed() => break,
            Err(err) => return Err(err.into()),
        }
    }
    if !tail.is_empty() {
        write_line(out, offset, &tail)?;
    }

    Ok(reader.offset())
}

fn write_line<W: Write>(out: &mut W, offset: u64, chunk: &[u8]) -> Result<()> {
    let hex = chunk
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");
    let ascii: String = chunk
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { char::from(b) } else { '.' })
        .collect();
    writeln!(out, "{offset:08x}  {hex:<47}  {ascii}")?;
    Ok(())
}
