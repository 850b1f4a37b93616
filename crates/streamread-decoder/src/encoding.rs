use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose;

/// Text encodings accepted by [`StreamReader::read_string`](crate::StreamReader::read_string).
///
/// Decoding never fails: malformed input is replaced rather than
/// rejected, so a string read fails only when its bytes cannot be read.
///
/// ```text
/// ┌───────────┬──────────────────┬───────────────────────────────────────┐
/// │ Variant   │ Names            │ Rule                                  │
/// ├───────────┼──────────────────┼───────────────────────────────────────┤
/// │ Utf8      │ utf8, utf-8      │ invalid sequences become U+FFFD       │
/// │ Ascii     │ ascii            │ high bit of each byte cleared         │
/// │ Latin1    │ latin1, binary   │ byte value is the code point          │
/// │ Utf16Le   │ utf16le, ucs2    │ LE code units, odd tail byte dropped  │
/// │ Hex       │ hex              │ two lowercase hex digits per byte     │
/// │ Base64    │ base64           │ standard alphabet, padded             │
/// │ Base64Url │ base64url        │ URL-safe alphabet, unpadded           │
/// └───────────┴──────────────────┴───────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
    Utf16Le,
    Hex,
    Base64,
    Base64Url,
}

impl TextEncoding {
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Ascii => bytes.iter().map(|&b| char::from(b & 0x7F)).collect(),
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Utf16Le => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            Self::Hex => hex::encode(bytes),
            Self::Base64 => general_purpose::STANDARD.encode(bytes),
            Self::Base64Url => general_purpose::URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Ascii => "ascii",
            Self::Latin1 => "latin1",
            Self::Utf16Le => "utf16le",
            Self::Hex => "hex",
            Self::Base64 => "base64",
            Self::Base64Url => "base64url",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an encoding name fails.
#[derive(Debug, thiserror::Error)]
#[error("unknown text encoding: {0:?}")]
pub struct UnknownEncoding(pub String);

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "ascii" => Ok(Self::Ascii),
            "latin1" | "binary" => Ok(Self::Latin1),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(Self::Utf16Le),
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            "base64url" => Ok(Self::Base64Url),
            _ => Err(UnknownEncoding(s.to_owned())),
        }
    }
}
