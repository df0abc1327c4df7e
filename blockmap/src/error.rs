use thiserror::Error;

/// Errors returned by index encoding and decoding.
///
/// An empty set-algebra result is not an error: it is the empty index
/// returned by [`BitmapIndex::empty`](crate::BitmapIndex::empty).
#[derive(Debug, Error)]
pub enum Error {
    /// The buffer or the parts handed in do not describe a valid index.
    #[error("invalid index layout: {0}")]
    Format(#[from] FormatError),

    /// Encoding an index without any set bit.
    #[error("index data empty")]
    EmptyData,

    /// Decoding values from an index without any set bit.
    #[error("no values found in index")]
    NotFound,

    /// The writer handed to `write_to` failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Details of a [`Error::Format`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The buffer cannot hold a header and at least one data byte.
    #[error("buffer of {len} bytes is too short (need more than 8)")]
    TooShort { len: usize },

    /// The header implies more data than the buffer holds.
    #[error("header requires {needed} bytes but buffer holds {len}")]
    Truncated { needed: usize, len: usize },

    /// The end block precedes the start block.
    #[error("inverted block range: start {start} > end {end}")]
    InvertedRange { start: u32, end: u32 },

    /// The data length disagrees with the block range.
    #[error("data holds {len} bytes for a range of {expected} blocks")]
    LengthMismatch { expected: usize, len: usize },

    /// The block cannot be addressed by a 32-bit bit position.
    #[error("block {block} is outside the addressable range")]
    BlockOutOfRange { block: u32 },
}

/// A specialized Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;
