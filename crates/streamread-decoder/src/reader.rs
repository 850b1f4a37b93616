use bytes::Bytes;
use streamread_source::{Pull, Readiness, SingleShotSource, Source, SourceError};
use tracing::{debug, trace};

use crate::config::ReaderConfig;
use crate::error::ReadError;

/// Asynchronous exact-read decoder over a pull-based [`Source`].
///
/// Every read asks the source for exactly the bytes it needs. When the
/// source cannot supply them yet, the reader suspends on the source's
/// readiness signal and retries, so a caller only ever sees complete
/// values:
///
/// ```text
///   read(n) ──▶ pull(n) ──Data──────────────▶ offset += n, return bytes
///                 │
///                 └─Insufficient──▶ ready().await ──▶ pull(n) ...
///                                        │
///                                        └─Closed──▶ final pull(n)
///                                                      └─Insufficient──▶ StreamClosed
/// ```
///
/// The reader owns its source exclusively and takes `&mut self` for every
/// read, so reads are served strictly in the order they are issued.
/// Dropping a pending read future is safe: pulls are all-or-nothing and
/// the offset only moves once a pull succeeds.
///
/// # Example
///
/// ```rust
/// use streamread_decoder::{Endian, StreamReader};
///
/// # tokio_test_block(async {
/// let mut reader = StreamReader::from_bytes(vec![0x00, 0x2A, 0x01]);
/// assert_eq!(reader.read_u16(Endian::Big).await.unwrap(), 42);
/// assert!(reader.read_bool().await.unwrap());
/// assert_eq!(reader.offset(), 3);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct StreamReader<S> {
    source: S,
    config: ReaderConfig,
    offset: u64,
    closed: bool,
    finished: bool,
}

impl StreamReader<SingleShotSource> {
    /// Read from a fixed in-memory buffer.
    #[must_use]
    pub fn from_bytes(payload: impl Into<Bytes>) -> Self {
        Self::new(SingleShotSource::new(payload))
    }
}

impl<S: Source> StreamReader<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    #[must_use]
    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        Self {
            source,
            config,
            offset: 0,
            closed: false,
            finished: false,
        }
    }

    /// Read exactly `n` bytes.
    ///
    /// `read(0)` returns an empty buffer without touching the source.
    ///
    /// # Errors
    ///
    /// - [`ReadError::StreamClosed`] if the source closed before `n`
    ///   bytes became available.
    /// - [`ReadError::UncaughtRead`] if a pull failed, or returned the
    ///   wrong number of bytes, while the source was still open.
    ///
    /// No bytes are consumed and the offset is unchanged on failure.
    pub async fn read(&mut self, n: usize) -> Result<Bytes, ReadError> {
        if n == 0 {
            return Ok(Bytes::new());
        }

        loop {
            match self.source.pull(n) {
                Ok(Pull::Data(bytes)) if bytes.len() == n => {
                    self.offset += n as u64;
                    return Ok(bytes);
                }
                Ok(Pull::Data(bytes)) => {
                    let err = SourceError::ShortPull {
                        requested: n,
                        returned: bytes.len(),
                    };
                    return Err(self.fail(n, err));
                }
                Ok(Pull::Insufficient) => {}
                Err(err) => return Err(self.fail(n, err)),
            }

            if self.closed || self.source.is_closed() {
                self.closed = true;
                debug!(requested = n, offset = self.offset, "read past end of closed stream");
                return Err(ReadError::StreamClosed {
                    requested: n,
                    offset: self.offset,
                });
            }

            trace!(requested = n, offset = self.offset, "waiting for source readiness");
            if self.source.ready().await == Readiness::Closed {
                // Loop once more: bytes may have landed together with the close.
                self.closed = true;
            }
        }
    }

    fn fail(&mut self, requested: usize, source: SourceError) -> ReadError {
        if self.closed || self.source.is_closed() {
            self.closed = true;
            debug!(requested, offset = self.offset, error = %source, "pull failed on closed stream");
            ReadError::StreamClosed {
                requested,
                offset: self.offset,
            }
        } else {
            debug!(requested, offset = self.offset, error = %source, "pull failed");
            ReadError::UncaughtRead { requested, source }
        }
    }

    /// Bytes consumed by successful reads so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether a read has observed the source closing.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Caller-owned completion flag. The reader never changes it.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}
