/// Field layouts for `streamread decode`.
///
/// A layout is a comma-separated list of field names, each naming one
/// typed read on the decoder:
///
/// ```text
///   u32le,str,bool,f64be,bytes:16
///   ─┬──  ─┬─ ─┬── ─┬─── ─┬──────
///    │     │   │    │     └── 16 raw bytes, printed as hex
///    │     │   │    └──────── 8-byte double, big endian
///    │     │   └───────────── 1 byte, zero = false
///    │     └───────────────── 7-bit length prefix + text
///    └─────────────────────── 4-byte unsigned, little endian
/// ```
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use streamread_decoder::Endian;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    U8,
    I8,
    Bool,
    Varint,
    U16(Endian),
    I16(Endian),
    U32(Endian),
    I32(Endian),
    U64(Endian),
    I64(Endian),
    F32(Endian),
    F64(Endian),
    UInt(usize, Endian),
    Int(usize, Endian),
    Str(Option<usize>),
    Bytes(usize),
}

/// Split a trailing `le` / `be` off a field name.
fn split_endian(name: &str) -> Option<(&str, Endian)> {
    if let Some(stem) = name.strip_suffix("le") {
        Some((stem, Endian::Little))
    } else {
        name.strip_suffix("be").map(|stem| (stem, Endian::Big))
    }
}

fn parse_len(raw: &str, field: &str) -> Result<usize> {
    raw.parse()
        .with_context(|| format!("invalid length {raw:?} in field {field:?}"))
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();

        if let Some(len) = name.strip_prefix("str:") {
            return Ok(Self::Str(Some(parse_len(len, s)?)));
        }
        if let Some(len) = name.strip_prefix("bytes:") {
            return Ok(Self::Bytes(parse_len(len, s)?));
        }

        match name.as_str() {
            "u8" | "byte" => return Ok(Self::U8),
            "i8" => return Ok(Self::I8),
            "bool" => return Ok(Self::Bool),
            "varint" => return Ok(Self::Varint),
            "str" => return Ok(Self::Str(None)),
            _ => {}
        }

        let (stem, endian) =
            split_endian(&name).ok_or_else(|| anyhow!("unknown field {s:?}"))?;
        let field = match stem {
            "u16" => Self::U16(endian),
            "i16" => Self::I16(endian),
            "u32" => Self::U32(endian),
            "i32" => Self::I32(endian),
            "u64" => Self::U64(endian),
            "i64" => Self::I64(endian),
            "f32" => Self::F32(endian),
            "f64" => Self::F64(endian),
            _ => {
                if let Some(width) = stem.strip_prefix("uint") {
                    Self::UInt(parse_width(width, s)?, endian)
                } else if let Some(width) = stem.strip_prefix("int") {
                    Self::Int(parse_width(width, s)?, endian)
                } else {
                    bail!("unknown field {s:?}");
                }
            }
        };
        Ok(field)
    }
}

impl Field {
    /// True when decoding this field consumes no input.
    #[must_use]
    pub fn is_zero_width(self) -> bool {
        matches!(self, Self::Str(Some(0)) | Self::Bytes(0))
    }
}

fn parse_width(raw: &str, field: &str) -> Result<usize> {
    let width = parse_len(raw, field)?;
    if !(1..=6).contains(&width) {
        bail!("width {width} in field {field:?} is outside 1..=6");
    }
    Ok(width)
}

fn endian_suffix(endian: Endian) -> &'static str {
    match endian {
        Endian::Big => "be",
        Endian::Little => "le",
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::U8 => f.write_str("u8"),
            Self::I8 => f.write_str("i8"),
            Self::Bool => f.write_str("bool"),
            Self::Varint => f.write_str("varint"),
            Self::U16(e) => write!(f, "u16{}", endian_suffix(e)),
            Self::I16(e) => write!(f, "i16{}", endian_suffix(e)),
            Self::U32(e) => write!(f, "u32{}", endian_suffix(e)),
            Self::I32(e) => write!(f, "i32{}", endian_suffix(e)),
            Self::U64(e) => write!(f, "u64{}", endian_suffix(e)),
            Self::I64(e) => write!(f, "i64{}", endian_suffix(e)),
            Self::F32(e) => write!(f, "f32{}", endian_suffix(e)),
            Self::F64(e) => write!(f, "f64{}", endian_suffix(e)),
            Self::UInt(w, e) => write!(f, "uint{w}{}", endian_suffix(e)),
            Self::Int(w, e) => write!(f, "int{w}{}", endian_suffix(e)),
            Self::Str(None) => f.write_str("str"),
            Self::Str(Some(len)) => write!(f, "str:{len}"),
            Self::Bytes(len) => write!(f, "bytes:{len}"),
        }
    }
}

/// Parse a comma-separated layout. Empty entries are skipped.
///
/// # Errors
///
/// Fails on the first unknown field name, or when nothing is left.
pub fn parse_layout(layout: &str) -> Result<Vec<Field>> {
    let fields = layout
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Field>>>()?;

    if fields.is_empty() {
        bail!("layout is empty");
    }
    Ok(fields)
}
