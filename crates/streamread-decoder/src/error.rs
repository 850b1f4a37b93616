use streamread_source::SourceError;

/// Errors returned by [`StreamReader`](crate::StreamReader) operations.
///
/// An exact read either yields every requested byte or fails without
/// consuming anything, so every variant leaves the reader's offset where
/// it was before the failing call.
///
/// ```text
///   ReadError
///   ├── StreamClosed        ← source closed with fewer bytes than requested
///   ├── UncaughtRead        ← source broke its pull contract or failed
///   ├── InvalidByteLength   ← arbitrary-width integer outside 1..=6 bytes
///   ├── InvalidLength       ← negative 7-bit string length prefix
///   └── StringTooLong       ← string length above ReaderConfig::max_string_len
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The source has permanently closed and cannot supply `requested`
    /// more bytes.
    #[error("attempted to read {requested} bytes at offset {offset} from a closed stream")]
    StreamClosed { requested: usize, offset: u64 },

    /// A pull failed while the source was still open.
    #[error("uncaught error reading {requested} bytes: {source}")]
    UncaughtRead {
        requested: usize,
        #[source]
        source: SourceError,
    },

    /// Arbitrary-width integer readers accept 1 to 6 bytes.
    #[error("byte length {byte_len} out of range 1..=6")]
    InvalidByteLength { byte_len: usize },

    /// A 7-bit length prefix decoded to a negative number.
    #[error("invalid string length {length}")]
    InvalidLength { length: i64 },

    /// A string length exceeds the configured cap.
    #[error("string length {length} exceeds limit {limit}")]
    StringTooLong { length: usize, limit: usize },
}

impl ReadError {
    /// Whether this error means the stream ended.
    #[must_use]
    pub fn is_stream_closed(&self) -> bool {
        matches!(self, Self::StreamClosed { .. })
    }
}
