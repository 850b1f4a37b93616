use crate::encoding::TextEncoding;

/// Configuration for a [`StreamReader`](crate::StreamReader).
///
/// ```text
/// ┌────────────────┬───────────────────────────────────────────────────┐
/// │ Field          │ Purpose                                           │
/// ├────────────────┼───────────────────────────────────────────────────┤
/// │ encoding       │ Text encoding when read_string gets None          │
/// │ max_string_len │ Optional cap on string lengths, checked before    │
/// │                │ any string byte is read                           │
/// └────────────────┴───────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReaderConfig {
    pub encoding: TextEncoding,
    pub max_string_len: Option<usize>,
}

impl Default for ReaderConfig {
    /// UTF-8 strings, no length cap.
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            max_string_len: None,
        }
    }
}

impl ReaderConfig {
    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_max_string_len(mut self, limit: usize) -> Self {
        self.max_string_len = Some(limit);
        self
    }
}
