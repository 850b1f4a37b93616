use streamread_source::Source;

use crate::encoding::TextEncoding;
use crate::error::ReadError;
use crate::reader::StreamReader;
use crate::seven_bit::accumulate;

/// Byte order for multi-byte reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Widest integer the arbitrary-width readers accept.
const MAX_VAR_WIDTH: usize = 6;

/// Generate a reader for a fixed-width numeric type with a
/// `from_be_bytes` / `from_le_bytes` pair.
macro_rules! fixed_width_reader {
    ($(#[$doc:meta])* $name:ident -> $ty:ty) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Fails exactly when the underlying [`read`](StreamReader::read) fails.
        pub async fn $name(&mut self, endian: Endian) -> Result<$ty, ReadError> {
            let bytes = self.read(size_of::<$ty>()).await?;
            let mut raw = [0u8; size_of::<$ty>()];
            raw.copy_from_slice(&bytes);
            Ok(match endian {
                Endian::Big => <$ty>::from_be_bytes(raw),
                Endian::Little => <$ty>::from_le_bytes(raw),
            })
        }
    };
}

/// Typed decoders. Each one is a single exact read followed by a pure
/// conversion; none of them talks to the source directly.
///
/// | Reader                  | Bytes    |
/// |-------------------------|----------|
/// | `read_byte` / `read_u8` | 1        |
/// | `read_i8`, `read_bool`  | 1        |
/// | `read_u16` / `read_i16` | 2        |
/// | `read_u32` / `read_i32` | 4        |
/// | `read_u64` / `read_i64` | 8        |
/// | `read_uint` / `read_int`| 1–6      |
/// | `read_f32`              | 4        |
/// | `read_f64`              | 8        |
/// | `read_7bit_encoded_int` | 1 or more|
/// | `read_string`           | prefix + length |
impl<S: Source> StreamReader<S> {
    /// Read one raw byte.
    ///
    /// # Errors
    ///
    /// Fails exactly when the underlying [`read`](Self::read) fails.
    pub async fn read_byte(&mut self) -> Result<u8, ReadError> {
        let bytes = self.read(1).await?;
        Ok(bytes[0])
    }

    /// Same as [`read_byte`](Self::read_byte).
    ///
    /// # Errors
    ///
    /// Fails exactly when the underlying [`read`](Self::read) fails.
    pub async fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.read_byte().await
    }

    /// # Errors
    ///
    /// Fails exactly when the underlying [`read`](Self::read) fails.
    pub async fn read_i8(&mut self) -> Result<i8, ReadError> {
        Ok(i8::from_be_bytes([self.read_byte().await?]))
    }

    /// Read one byte; zero is `false`, anything else `true`.
    ///
    /// # Errors
    ///
    /// Fails exactly when the underlying [`read`](Self::read) fails.
    pub async fn read_bool(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_byte().await? != 0)
    }

    /// Read a 7-bit encoded integer, one byte at a time.
    ///
    /// See [`decode_7bit_int`](crate::decode_7bit_int) for the bit layout.
    /// There is no length limit: the integer ends at the first byte with
    /// the high bit clear.
    ///
    /// # Errors
    ///
    /// Fails when any byte read fails. Bytes consumed by earlier rounds
    /// stay consumed.
    pub async fn read_7bit_encoded_int(&mut self) -> Result<i64, ReadError> {
        let mut acc = 0;
        loop {
            let (next, done) = accumulate(acc, self.read_byte().await?);
            if done {
                return Ok(next);
            }
            acc = next;
        }
    }

    /// Read a string.
    ///
    /// With `len` set, exactly that many bytes are read. Without it, the
    /// length comes from a 7-bit encoded integer prefix. `Some(0)` is an
    /// explicit empty string and reads no prefix. `encoding` defaults to
    /// [`ReaderConfig::encoding`](crate::ReaderConfig).
    ///
    /// # Errors
    ///
    /// - [`ReadError::InvalidLength`] if the prefix decodes negative.
    /// - [`ReadError::StringTooLong`] if the length exceeds
    ///   `max_string_len`. Checked before any string byte is read.
    /// - Any error from the underlying reads.
    pub async fn read_string(
        &mut self,
        len: Option<usize>,
        encoding: Option<TextEncoding>,
    ) -> Result<String, ReadError> {
        let len = match len {
            Some(len) => len,
            None => {
                let length = self.read_7bit_encoded_int().await?;
                usize::try_from(length).map_err(|_| ReadError::InvalidLength { length })?
            }
        };

        if let Some(limit) = self.config().max_string_len
            && len > limit
        {
            return Err(ReadError::StringTooLong { length: len, limit });
        }

        let encoding = encoding.unwrap_or(self.config().encoding);
        let bytes = self.read(len).await?;
        Ok(encoding.decode(&bytes))
    }

    fixed_width_reader! {
        /// Read a 16-bit unsigned integer.
        read_u16 -> u16
    }

    fixed_width_reader! {
        /// Read a 16-bit two's-complement integer.
        read_i16 -> i16
    }

    fixed_width_reader! {
        /// Read a 32-bit unsigned integer.
        read_u32 -> u32
    }

    fixed_width_reader! {
        /// Read a 32-bit two's-complement integer.
        read_i32 -> i32
    }

    fixed_width_reader! {
        /// Read a 64-bit unsigned integer.
        read_u64 -> u64
    }

    fixed_width_reader! {
        /// Read a 64-bit two's-complement integer.
        read_i64 -> i64
    }

    fixed_width_reader! {
        /// Read an IEEE-754 single-precision float. Both byte orders decode
        /// four bytes as `f32`.
        read_f32 -> f32
    }

    fixed_width_reader! {
        /// Read an IEEE-754 double-precision float.
        read_f64 -> f64
    }

    /// Read an unsigned integer `byte_len` bytes wide (1 to 6).
    ///
    /// # Errors
    ///
    /// - [`ReadError::InvalidByteLength`] for widths outside 1..=6, before
    ///   anything is read.
    /// - Any error from the underlying [`read`](Self::read).
    pub async fn read_uint(&mut self, byte_len: usize, endian: Endian) -> Result<u64, ReadError> {
        if !(1..=MAX_VAR_WIDTH).contains(&byte_len) {
            return Err(ReadError::InvalidByteLength { byte_len });
        }

        let bytes = self.read(byte_len).await?;
        let fold = |acc: u64, &b: &u8| (acc << 8) | u64::from(b);
        Ok(match endian {
            Endian::Big => bytes.iter().fold(0, fold),
            Endian::Little => bytes.iter().rev().fold(0, fold),
        })
    }

    /// Read a two's-complement integer `byte_len` bytes wide (1 to 6),
    /// sign-extended to `i64`.
    ///
    /// # Errors
    ///
    /// Same as [`read_uint`](Self::read_uint).
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub async fn read_int(&mut self, byte_len: usize, endian: Endian) -> Result<i64, ReadError> {
        let raw = self.read_uint(byte_len, endian).await?;
        let unused = 64 - 8 * byte_len as u32;
        Ok(((raw << unused) as i64) >> unused)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ReaderConfig;
    use streamread_source::SingleShotSource;

    use super::*;

    fn reader(bytes: &[u8]) -> StreamReader<SingleShotSource> {
        StreamReader::from_bytes(bytes.to_vec())
    }

    #[tokio::test]
    async fn byte_and_bool() {
        let mut r = reader(&[0xFF, 0x00, 0x02]);
        assert_eq!(r.read_byte().await.unwrap(), 0xFF);
        assert!(!r.read_bool().await.unwrap());
        assert!(r.read_bool().await.unwrap());
    }

    #[tokio::test]
    async fn i8_is_twos_complement() {
        let mut r = reader(&[0xFF, 0x80, 0x7F]);
        assert_eq!(r.read_i8().await.unwrap(), -1);
        assert_eq!(r.read_i8().await.unwrap(), i8::MIN);
        assert_eq!(r.read_i8().await.unwrap(), i8::MAX);
    }

    #[tokio::test]
    async fn sixteen_and_thirty_two_bit_orders() {
        let mut r = reader(&[0x01, 0x02, 0x01, 0x02, 0xFF, 0xFE, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(r.read_u16(Endian::Big).await.unwrap(), 0x0102);
        assert_eq!(r.read_u16(Endian::Little).await.unwrap(), 0x0201);
        assert_eq!(r.read_i16(Endian::Big).await.unwrap(), -2);
        assert_eq!(r.read_u32(Endian::Big).await.unwrap(), 1);
        assert_eq!(r.offset(), 10);
    }

    #[tokio::test]
    async fn u32_roundtrips_boundaries() {
        for value in [0, 1, 0xFF, 0x0100, 0x1234_5678, u32::MAX - 1, u32::MAX] {
            let mut bytes = value.to_be_bytes().to_vec();
            bytes.extend_from_slice(&value.to_le_bytes());
            let mut r = reader(&bytes);
            assert_eq!(r.read_u32(Endian::Big).await.unwrap(), value);
            assert_eq!(r.read_u32(Endian::Little).await.unwrap(), value);
        }
    }

    #[tokio::test]
    async fn sixty_four_bit() {
        let mut bytes = (-2i64).to_le_bytes().to_vec();
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        let mut r = reader(&bytes);
        assert_eq!(r.read_i64(Endian::Little).await.unwrap(), -2);
        assert_eq!(r.read_u64(Endian::Big).await.unwrap(), u64::MAX);
    }

    #[tokio::test]
    async fn floats_in_both_orders() {
        let mut bytes = 1.5f32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&(-0.25f32).to_le_bytes());
        bytes.extend_from_slice(&std::f64::consts::PI.to_be_bytes());
        bytes.extend_from_slice(&1e300f64.to_le_bytes());
        let mut r = reader(&bytes);
        assert_eq!(r.read_f32(Endian::Big).await.unwrap(), 1.5);
        assert_eq!(r.read_f32(Endian::Little).await.unwrap(), -0.25);
        assert_eq!(r.read_f64(Endian::Big).await.unwrap(), std::f64::consts::PI);
        assert_eq!(r.read_f64(Endian::Little).await.unwrap(), 1e300);
        assert_eq!(r.offset(), 24);
    }

    #[tokio::test]
    async fn arbitrary_width_unsigned() {
        let mut r = reader(&[0x01, 0x02, 0x03, 0x01, 0x02, 0x03, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(r.read_uint(3, Endian::Big).await.unwrap(), 0x01_0203);
        assert_eq!(r.read_uint(3, Endian::Little).await.unwrap(), 0x03_0201);
        assert_eq!(r.read_uint(6, Endian::Big).await.unwrap(), 0xFFFF_FFFF_FFFF);
    }

    #[tokio::test]
    async fn arbitrary_width_signed() {
        let mut r = reader(&[0xFF, 0xFE, 0x80, 0x00, 0x00, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(r.read_int(2, Endian::Big).await.unwrap(), -2);
        assert_eq!(r.read_int(3, Endian::Big).await.unwrap(), -0x80_0000);
        assert_eq!(r.read_int(1, Endian::Little).await.unwrap(), 0x7F);
        assert_eq!(r.read_int(6, Endian::Little).await.unwrap(), -1);
    }

    #[tokio::test]
    async fn arbitrary_width_rejects_bad_lengths_without_reading() {
        let mut r = reader(&[0; 8]);
        assert!(matches!(
            r.read_uint(0, Endian::Big).await,
            Err(ReadError::InvalidByteLength { byte_len: 0 })
        ));
        assert!(matches!(
            r.read_int(7, Endian::Big).await,
            Err(ReadError::InvalidByteLength { byte_len: 7 })
        ));
        assert_eq!(r.offset(), 0);
    }

    #[tokio::test]
    async fn seven_bit_int_matches_mask_and_shift_rule() {
        let mut r = reader(&[0x81, 0x05, 0x7F, 0x00]);
        assert_eq!(r.read_7bit_encoded_int().await.unwrap(), 133);
        assert_eq!(r.read_7bit_encoded_int().await.unwrap(), 63);
        assert_eq!(r.read_7bit_encoded_int().await.unwrap(), 0);
        assert_eq!(r.offset(), 4);
    }

    #[tokio::test]
    async fn truncated_seven_bit_int_is_stream_closed() {
        let mut r = reader(&[0x81]);
        assert!(r.read_7bit_encoded_int().await.unwrap_err().is_stream_closed());
        assert_eq!(r.offset(), 1);
    }

    #[tokio::test]
    async fn prefixed_string() {
        let mut r = reader(b"\x05hello");
        assert_eq!(r.read_string(None, None).await.unwrap(), "hello");
        assert_eq!(r.offset(), 6);
    }

    #[tokio::test]
    async fn explicit_length_string_skips_prefix() {
        let mut r = reader(b"abcdef");
        assert_eq!(r.read_string(Some(3), None).await.unwrap(), "abc");
        assert_eq!(r.read_string(Some(0), None).await.unwrap(), "");
        assert_eq!(r.offset(), 3);
    }

    #[tokio::test]
    async fn string_with_explicit_encoding() {
        let mut r = reader(&[0x02, 0xCA, 0xFE]);
        assert_eq!(r.read_string(None, Some(TextEncoding::Hex)).await.unwrap(), "cafe");
    }

    #[tokio::test]
    async fn string_as_base64() {
        let mut r = reader(&[0x03, 0xFB, 0xFF, 0x01, 0x00]);
        assert_eq!(r.read_string(None, Some(TextEncoding::Base64)).await.unwrap(), "+/8B");
        assert_eq!(r.offset(), 4);
    }

    #[tokio::test]
    async fn string_uses_configured_encoding() {
        let config = ReaderConfig::default().with_encoding(TextEncoding::Latin1);
        let mut r = StreamReader::with_config(SingleShotSource::new(vec![0x01, 0xE9]), config);
        assert_eq!(r.read_string(None, None).await.unwrap(), "é");
    }

    #[tokio::test]
    async fn string_length_cap() {
        let config = ReaderConfig::default().with_max_string_len(4);
        let mut r = StreamReader::with_config(SingleShotSource::new(&b"\x05hello"[..]), config);
        assert!(matches!(
            r.read_string(None, None).await,
            Err(ReadError::StringTooLong { length: 5, limit: 4 })
        ));
        // Only the prefix was consumed.
        assert_eq!(r.offset(), 1);
    }

    #[tokio::test]
    async fn negative_length_prefix_is_rejected() {
        // Prefix decodes to i32::MIN after the 32-bit shift.
        let mut r = reader(&[0x88, 0x80, 0x80, 0x80, 0x00]);
        assert!(matches!(
            r.read_string(None, None).await,
            Err(ReadError::InvalidLength { length }) if length == i64::from(i32::MIN)
        ));
    }

    #[tokio::test]
    async fn typed_read_past_end_fails_without_consuming() {
        let mut r = reader(&[0x00, 0x01, 0x02]);
        assert!(r.read_u32(Endian::Big).await.unwrap_err().is_stream_closed());
        assert_eq!(r.read_u16(Endian::Big).await.unwrap(), 1);
    }
}
