use bytes::Bytes;
use tracing::trace;

use crate::error::SourceError;
use crate::source::{Pull, Readiness, Source};

/// Result of asking a [`SingleShotSource`] for its chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The whole wrapped payload, handed out exactly once.
    Chunk(Bytes),

    /// Nothing more will ever be produced.
    End,
}

/// A source over one fixed byte sequence.
///
/// The payload is delivered atomically: the first delivery yields all of
/// it, every later delivery yields [`Delivery::End`]. An empty payload
/// counts as already delivered, so it ends immediately instead of
/// producing an empty chunk.
///
/// As a [`Source`], the first pull triggers delivery and later pulls
/// serve exact-size slices out of the delivered chunk. Readiness never
/// blocks: before delivery the chunk is ready, after delivery the source
/// is closed.
///
/// ```text
///   new(payload) ──deliver()──▶ Chunk(payload) ──deliver()──▶ End ─▶ End ...
///        │                            │
///        └── ready() = Ready          └── ready() = Closed
/// ```
#[derive(Clone, Debug)]
pub struct SingleShotSource {
    payload: Bytes,
    delivered: bool,
    /// Delivered bytes not yet pulled.
    buf: Bytes,
}

impl SingleShotSource {
    #[must_use]
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            delivered: false,
            buf: Bytes::new(),
        }
    }

    /// Hand out the payload if it has not been handed out yet.
    pub fn deliver(&mut self) -> Delivery {
        if self.delivered || self.payload.is_empty() {
            self.delivered = true;
            return Delivery::End;
        }

        self.delivered = true;
        Delivery::Chunk(std::mem::take(&mut self.payload))
    }

    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    /// Bytes that can still be pulled, delivered or not.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() + self.payload.len()
    }
}

impl From<Vec<u8>> for SingleShotSource {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(payload)
    }
}

impl From<&'static [u8]> for SingleShotSource {
    fn from(payload: &'static [u8]) -> Self {
        Self::new(payload)
    }
}

impl Source for SingleShotSource {
    fn pull(&mut self, n: usize) -> Result<Pull, SourceError> {
        if !self.delivered
            && let Delivery::Chunk(chunk) = self.deliver()
        {
            trace!(len = chunk.len(), "single-shot payload delivered");
            self.buf = chunk;
        }

        if self.buf.len() >= n {
            Ok(Pull::Data(self.buf.split_to(n)))
        } else {
            Ok(Pull::Insufficient)
        }
    }

    async fn ready(&mut self) -> Readiness {
        if self.delivered {
            Readiness::Closed
        } else {
            Readiness::Ready
        }
    }

    fn is_closed(&self) -> bool {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_whole_payload_once() {
        let mut source = SingleShotSource::new(&b"abc"[..]);
        assert_eq!(source.deliver(), Delivery::Chunk(Bytes::from_static(b"abc")));
        assert_eq!(source.deliver(), Delivery::End);
        assert_eq!(source.deliver(), Delivery::End);
    }

    #[test]
    fn empty_payload_ends_immediately() {
        let mut source = SingleShotSource::new(Vec::new());
        assert_eq!(source.deliver(), Delivery::End);
        assert!(source.is_delivered());
    }

    #[test]
    fn pull_serves_slices_in_order() {
        let mut source = SingleShotSource::from(vec![1, 2, 3, 4, 5]);
        assert_eq!(source.pull(2).unwrap(), Pull::Data(Bytes::from_static(&[1, 2])));
        assert_eq!(source.pull(3).unwrap(), Pull::Data(Bytes::from_static(&[3, 4, 5])));
        assert_eq!(source.pull(1).unwrap(), Pull::Insufficient);
        assert!(source.is_closed());
    }

    #[test]
    fn short_pull_keeps_bytes() {
        let mut source = SingleShotSource::new(&b"xyz"[..]);
        assert_eq!(source.pull(4).unwrap(), Pull::Insufficient);
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.pull(3).unwrap(), Pull::Data(Bytes::from_static(b"xyz")));
    }

    #[tokio::test]
    async fn readiness_never_blocks() {
        let mut source = SingleShotSource::new(&b"a"[..]);
        assert_eq!(source.ready().await, Readiness::Ready);

        source.pull(1).unwrap();
        assert_eq!(source.ready().await, Readiness::Closed);
        assert_eq!(source.ready().await, Readiness::Closed);
    }

    #[tokio::test]
    async fn empty_payload_reports_closed_after_first_pull() {
        let mut source = SingleShotSource::new(Vec::new());
        assert_eq!(source.pull(1).unwrap(), Pull::Insufficient);
        assert_eq!(source.ready().await, Readiness::Closed);
    }
}
