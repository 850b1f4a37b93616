use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::error::SourceError;
use crate::source::{Pull, Readiness, Source, split_exact};

/// Bytes requested from the reader per readiness wait.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// A live source backed by any [`AsyncRead`]: files, sockets, pipes,
/// stdin.
///
/// Each [`ready`](Source::ready) performs one read of up to
/// `chunk_size` bytes into the internal buffer. A zero-length read means
/// end of stream and closes the source. A read error is parked and
/// surfaced by the next [`pull`](Source::pull).
pub struct ReaderSource<R> {
    reader: R,
    buf: BytesMut,
    chunk_size: usize,
    closed: bool,
    error: Option<std::io::Error>,
}

impl<R: AsyncRead + Unpin> ReaderSource<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Create a source that reads at most `chunk_size` bytes per wait.
    ///
    /// A `chunk_size` of zero is bumped to one so every wait makes
    /// progress.
    #[must_use]
    pub fn with_capacity(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            buf: BytesMut::new(),
            chunk_size: chunk_size.max(1),
            closed: false,
            error: None,
        }
    }

    /// Bytes read from the reader but not yet pulled.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncRead + Unpin> Source for ReaderSource<R> {
    fn pull(&mut self, n: usize) -> Result<Pull, SourceError> {
        if let Some(err) = self.error.take() {
            return Err(SourceError::Io(err));
        }
        Ok(split_exact(&mut self.buf, n))
    }

    async fn ready(&mut self) -> Readiness {
        if self.closed {
            return Readiness::Closed;
        }

        // Limit the read so one wait never grows the buffer unboundedly.
        let mut limited = (&mut self.reader).take(self.chunk_size as u64);
        match limited.read_buf(&mut self.buf).await {
            Ok(0) => {
                debug!(buffered = self.buf.len(), "reader source reached end of stream");
                self.closed = true;
                Readiness::Closed
            }
            Ok(read) => {
                trace!(read, "reader source filled buffer");
                Readiness::Ready
            }
            Err(err) => {
                debug!(error = %err, "reader source read failed");
                self.error = Some(err);
                Readiness::Ready
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
