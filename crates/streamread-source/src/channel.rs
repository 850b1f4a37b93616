use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, trace};

use crate::error::SourceError;
use crate::source::{Pull, Readiness, Source, split_exact};

/// Create a live source together with the handle that feeds it.
///
/// Chunks pushed through the [`SourceFeeder`] arrive at the
/// [`ChannelSource`] in order. Dropping the feeder (or calling
/// [`SourceFeeder::close`]) closes the source once every pushed chunk has
/// been received.
///
/// ```text
///   producer task                          reader task
///   ─────────────                          ───────────
///   feeder.push(chunk) ──▶ mpsc ──▶ ChannelSource::ready() / pull(n)
///   drop(feeder)       ──▶ closed
/// ```
#[must_use]
pub fn channel() -> (SourceFeeder, ChannelSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        SourceFeeder { tx },
        ChannelSource {
            rx,
            buf: BytesMut::new(),
            closed: false,
        },
    )
}

/// Producer half of [`channel`].
#[derive(Clone, Debug)]
pub struct SourceFeeder {
    tx: mpsc::UnboundedSender<Bytes>,
}

impl SourceFeeder {
    /// Append a chunk to the source.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ReceiverDropped`] when the source is gone.
    pub fn push(&self, chunk: impl Into<Bytes>) -> Result<(), SourceError> {
        self.tx
            .send(chunk.into())
            .map_err(|_| SourceError::ReceiverDropped)
    }

    /// Stop producing. Same as dropping this handle; other clones of the
    /// feeder keep the source open.
    pub fn close(self) {
        drop(self);
    }
}

/// A live source fed chunk by chunk from another task.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Bytes>,
    buf: BytesMut,
    closed: bool,
}

impl ChannelSource {
    /// Bytes received but not yet pulled.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Move every chunk already sitting in the channel into the buffer.
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(chunk) => self.buf.extend_from_slice(&chunk),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.mark_closed();
                    break;
                }
            }
        }
    }

    fn mark_closed(&mut self) {
        if !self.closed {
            debug!(buffered = self.buf.len(), "channel source closed");
            self.closed = true;
        }
    }
}

impl Source for ChannelSource {
    fn pull(&mut self, n: usize) -> Result<Pull, SourceError> {
        if self.buf.len() < n && !self.closed {
            self.drain();
        }
        Ok(split_exact(&mut self.buf, n))
    }

    async fn ready(&mut self) -> Readiness {
        if self.closed {
            return Readiness::Closed;
        }

        // recv() is cancel-safe: a dropped wait never loses a chunk.
        match self.rx.recv().await {
            Some(chunk) => {
                trace!(len = chunk.len(), "channel chunk received");
                self.buf.extend_from_slice(&chunk);
                Readiness::Ready
            }
            None => {
                self.mark_closed();
                Readiness::Closed
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
