//! Fixture helpers shared by the integration tests and benchmarks.

use bytes::Bytes;
use streamread_decoder::{MAX_7BIT_ENCODED_LEN, encode_7bit_int};
use streamread_source::{ChannelSource, channel};

/// Build a payload field by field.
#[derive(Default)]
pub struct PayloadBuilder {
    buf: Vec<u8>,
}

impl PayloadBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append a 7-bit encoded integer.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not representable in the 7-bit scheme.
    #[must_use]
    pub fn seven_bit(mut self, value: u32) -> Self {
        let mut buf = [0u8; MAX_7BIT_ENCODED_LEN];
        let len = encode_7bit_int(value, &mut buf).expect("representable 7-bit value");
        self.buf.extend_from_slice(&buf[..len]);
        self
    }

    /// Append a 7-bit length prefix followed by the UTF-8 bytes of `text`.
    #[must_use]
    pub fn string(self, text: &str) -> Self {
        let len = u32::try_from(text.len()).expect("string length fits in u32");
        self.seven_bit(len).bytes(text.as_bytes())
    }

    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Spawn a task that feeds `payload` to a [`ChannelSource`] in chunks of
/// `chunk` bytes, yielding between chunks, then closes it.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn fragmented_source(payload: Vec<u8>, chunk: usize) -> (ChannelSource, tokio::task::JoinHandle<()>) {
    let (feeder, source) = channel();
    let payload = Bytes::from(payload);
    let handle = tokio::spawn(async move {
        for start in (0..payload.len()).step_by(chunk.max(1)) {
            let end = (start + chunk.max(1)).min(payload.len());
            if feeder.push(payload.slice(start..end)).is_err() {
                return;
            }
            tokio::task::yield_now().await;
        }
    });
    (source, handle)
}
