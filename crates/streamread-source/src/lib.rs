#![warn(clippy::pedantic)]

pub mod channel;
pub mod error;
pub mod reader;
pub mod single_shot;
pub mod source;

pub use channel::{ChannelSource, SourceFeeder, channel};
pub use error::SourceError;
pub use reader::{DEFAULT_CHUNK_SIZE, ReaderSource};
pub use single_shot::{Delivery, SingleShotSource};
pub use source::{Pull, Readiness, Source};
