/// streamread command-line tool: decode binary files or pipes through the
/// exact-read decoder.
///
/// # Command overview
///
/// ```text
/// streamread <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Decode a stream according to a comma-separated field layout
///   hexdump    Print a stream as 16-byte hex lines
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder activity to stderr (debug level)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                    |
/// |------|--------------------------------------------|
/// | 0    | Success                                    |
/// | 1    | Error (I/O failure, truncated input, etc.) |
///
/// Errors and logs go to stderr so stdout can be piped cleanly.
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tokio::io::AsyncRead;
use tracing_subscriber::EnvFilter;

mod cmd_decode;
mod cmd_hexdump;
mod layout;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decode binary streams field by field.
#[derive(Parser)]
#[command(name = "streamread", version, about = "Exact-read binary stream decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder activity to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode a stream according to a field layout.
    Decode(DecodeArgs),
    /// Print a stream as hex, 16 bytes per line.
    Hexdump(HexdumpArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `streamread decode`.
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────────────┐
/// │ Flag         │ Effect                                               │
/// ├──────────────┼──────────────────────────────────────────────────────┤
/// │ --layout     │ fields to decode, e.g. `u32le,str,f64be`             │
/// │ --encoding   │ text encoding for `str` fields (default utf8)        │
/// │ --repeat     │ decode the layout again until the input ends         │
/// │ --chunk-size │ bytes read from the input per readiness wait         │
/// └──────────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// Field names: `u8 i8 bool varint u16le u16be i16le i16be u32le u32be
/// i32le i32be u64le u64be i64le i64be f32le f32be f64le f64be
/// uint<N>le uint<N>be int<N>le int<N>be str str:<len> bytes:<len>`.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Input file, or `-` for stdin.
    pub input: PathBuf,

    /// Comma-separated field layout.
    #[arg(short, long)]
    pub layout: String,

    /// Text encoding for string fields: utf8, ascii, latin1, utf16le, hex,
    /// base64 or base64url.
    #[arg(long, default_value = "utf8")]
    pub encoding: String,

    /// Keep decoding the layout until the input ends on a record boundary.
    #[arg(long)]
    pub repeat: bool,

    /// Bytes requested from the input per read.
    #[arg(long, default_value_t = streamread_source::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

/// Arguments for `streamread hexdump`.
#[derive(clap::Args)]
pub struct HexdumpArgs {
    /// Input file, or `-` for stdin.
    pub input: PathBuf,

    /// Bytes requested from the input per read.
    #[arg(long, default_value_t = streamread_source::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Open `path` for async reading; `-` means stdin.
pub async fn open_input(path: &Path) -> anyhow::Result<Box<dyn AsyncRead + Unpin + Send>> {
    use anyhow::Context;

    if path.as_os_str() == "-" {
        return Ok(Box::new(tokio::io::stdin()));
    }
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;
    Ok(Box::new(file))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args).await,
        Commands::Hexdump(args) => cmd_hexdump::run(&args).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
