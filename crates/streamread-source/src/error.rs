/// Errors a [`Source`](crate::Source) can report from a pull, plus the
/// feeder-side failure of a channel source.
///
/// ```text
///   SourceError
///   ├── ShortPull         ← pull returned a length other than requested
///   ├── ReceiverDropped   ← feeder pushed after the source was dropped
///   └── Io(io::Error)     ← the backing AsyncRead failed
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A pull produced a chunk whose length differs from the request.
    ///
    /// Sources must return exactly `n` bytes or `Pull::Insufficient`, so
    /// this always indicates a broken source implementation.
    #[error("pull of {requested} bytes returned {returned} bytes")]
    ShortPull { requested: usize, returned: usize },

    /// The [`ChannelSource`](crate::ChannelSource) on the other end of a
    /// [`SourceFeeder`](crate::SourceFeeder) no longer exists.
    #[error("source receiver dropped")]
    ReceiverDropped,

    /// An I/O error from the reader behind a [`ReaderSource`](crate::ReaderSource).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
