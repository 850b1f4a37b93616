#![warn(clippy::pedantic)]

pub mod config;
pub mod encoding;
pub mod error;
pub mod primitives;
pub mod reader;
pub mod seven_bit;

pub use config::ReaderConfig;
pub use encoding::TextEncoding;
pub use error::ReadError;
pub use primitives::Endian;
pub use reader::StreamReader;
pub use seven_bit::{MAX_7BIT_ENCODED_LEN, SevenBitError, decode_7bit_int, encode_7bit_int};
