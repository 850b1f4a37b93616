/// Longest encoding [`encode_7bit_int`] produces: 31 value bits in
/// 7-bit groups.
pub const MAX_7BIT_ENCODED_LEN: usize = 5;

/// Bits of each byte that carry value.
const PAYLOAD_MASK: u8 = 0b0011_1111;

/// Continuation flag: another byte follows.
const CONTINUATION: u8 = 0b1000_0000;

/// Errors from the synchronous 7-bit integer helpers.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SevenBitError {
    /// The slice ended while the continuation bit was still set.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The value has a 7-bit group with bit 6 set (only 6 bits of each
    /// group survive decoding), or does not fit in 31 bits.
    #[error("value {value} cannot be expressed as a 7-bit encoded integer")]
    Unrepresentable { value: u32 },
}

/// One decoding round: fold `byte` into `acc`.
///
/// Returns the new accumulator and whether decoding is complete. The
/// low six bits of the byte are added, then, if the continuation bit is
/// set, the accumulator is truncated to 32 bits and shifted left by
/// seven. Note the mask is six bits wide while the shift is seven: bit 6
/// of every byte is ignored and the value keeps a zero bit per group.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn accumulate(acc: i64, byte: u8) -> (i64, bool) {
    let acc = acc + i64::from(byte & PAYLOAD_MASK);
    if byte & CONTINUATION == 0 {
        (acc, true)
    } else {
        (i64::from((acc as i32).wrapping_shl(7)), false)
    }
}

/// Decode a 7-bit encoded integer from the front of `buf`.
///
/// # Returns
///
/// `(decoded_value, bytes_consumed)` on success.
///
/// # Wire format examples
///
/// | Bytes                | Value |
/// |----------------------|-------|
/// | `[0x00]`             | 0     |
/// | `[0x3F]`             | 63    |
/// | `[0x7F]`             | 63    |
/// | `[0x81, 0x00]`       | 128   |
/// | `[0x81, 0x05]`       | 133   |
/// | `[0x81, 0x80, 0x00]` | 16384 |
///
/// # Errors
///
/// [`SevenBitError::UnexpectedEof`] if the slice ends mid-integer.
pub fn decode_7bit_int(buf: &[u8]) -> Result<(i64, usize), SevenBitError> {
    let mut acc = 0;
    for (i, &byte) in buf.iter().enumerate() {
        let (next, done) = accumulate(acc, byte);
        if done {
            return Ok((next, i + 1));
        }
        acc = next;
    }
    Err(SevenBitError::UnexpectedEof { offset: buf.len() })
}

/// Encode `value` so that [`decode_7bit_int`] returns it.
///
/// Groups of seven bits are written most significant first, each with the
/// continuation bit set except the last. Because decoding keeps only six
/// bits per byte, a value is representable only when every 7-bit group is
/// at most `0x3F` and the value fits in 31 bits.
///
/// # Returns
///
/// The number of bytes written (1–5).
///
/// # Errors
///
/// [`SevenBitError::Unrepresentable`] when the value cannot round-trip.
///
/// # Panics
///
/// Panics if `buf` is shorter than the encoding. A buffer of
/// [`MAX_7BIT_ENCODED_LEN`] bytes is always sufficient.
pub fn encode_7bit_int(value: u32, buf: &mut [u8]) -> Result<usize, SevenBitError> {
    if value > i32::MAX.unsigned_abs() {
        return Err(SevenBitError::Unrepresentable { value });
    }

    let mut groups = [0u8; MAX_7BIT_ENCODED_LEN];
    let mut len = 0;
    let mut rest = value;
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let group = (rest & 0x7F) as u8;
        if group > PAYLOAD_MASK {
            return Err(SevenBitError::Unrepresentable { value });
        }
        groups[len] = group;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for (i, group) in groups[..len].iter().rev().enumerate() {
        buf[i] = if i + 1 < len { group | CONTINUATION } else { *group };
    }
    Ok(len)
}
