use bytes::{Bytes, BytesMut};

use crate::error::SourceError;

/// Outcome of a [`Source::pull`].
///
/// A pull is all-or-nothing: either the source hands out exactly the
/// requested number of bytes, or it hands out nothing and keeps its
/// buffer intact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pull {
    /// Exactly the requested number of bytes, front of the buffer first.
    Data(Bytes),

    /// Fewer bytes than requested are buffered right now.
    Insufficient,
}

/// Outcome of waiting on [`Source::ready`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// New bytes may have become available since the last pull.
    Ready,

    /// The source will never produce another byte. Bytes already
    /// buffered can still be pulled.
    Closed,
}

/// A pull-based byte producer.
///
/// This is the capability the exact-read decoder is written against.
/// Every implementation buffers bytes internally and exposes three
/// operations:
///
/// ```text
/// ┌────────────┬──────────────────────────────────────────────────────┐
/// │ Operation  │ Contract                                             │
/// ├────────────┼──────────────────────────────────────────────────────┤
/// │ pull(n)    │ exactly n bytes, or Insufficient (never fewer)       │
/// │ ready()    │ completes once, the next time bytes arrive or the    │
/// │            │ source closes; a fresh call registers a fresh wait   │
/// │ is_closed  │ true forever once no more bytes will be produced     │
/// └────────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// `ready` must be cancel-safe: dropping the future before completion
/// must not lose any byte the source already received.
#[allow(async_fn_in_trait)]
pub trait Source {
    /// Take exactly `n` bytes from the front of the buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the underlying producer failed.
    /// Running out of bytes is not an error; it is `Pull::Insufficient`.
    fn pull(&mut self, n: usize) -> Result<Pull, SourceError>;

    /// Wait until the source may hold more bytes than before, or until
    /// it closes.
    async fn ready(&mut self) -> Readiness;

    /// Whether the source has permanently stopped producing bytes.
    fn is_closed(&self) -> bool;
}

impl<S: Source + ?Sized> Source for &mut S {
    fn pull(&mut self, n: usize) -> Result<Pull, SourceError> {
        (**self).pull(n)
    }

    async fn ready(&mut self) -> Readiness {
        (**self).ready().await
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// Split `n` bytes off the front of `buf`, or leave it untouched.
///
/// Shared by the buffered sources so they all honour the same
/// all-or-nothing pull rule.
pub(crate) fn split_exact(buf: &mut BytesMut, n: usize) -> Pull {
    if buf.len() >= n {
        Pull::Data(buf.split_to(n).freeze())
    } else {
        Pull::Insufficient
    }
}
