//! Error types for blockfile.

use thiserror::Error;

use super::BlockId;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the block layer.
///
/// I/O failures are passed through unchanged. The remaining variants are
/// misuse errors: they mean the caller asked for something outside a buffer
/// or outside a file, and nothing was read or written.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from file or directory operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A page accessor touched bytes past the end of the buffer.
    #[error("Access of {len} bytes at offset {offset} exceeds page capacity {capacity}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    /// The bytes stored at `offset` are not a valid UTF-8 string.
    #[error("Invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Requested block lies past the end of its file.
    #[error("Block {block} not found (file has {block_count} blocks)")]
    BlockNotFound { block: BlockId, block_count: u64 },

    /// The block's byte offset does not fit in a `u64`.
    #[error("Block {block} is out of range for block size {block_size}")]
    BlockOutOfRange { block: BlockId, block_size: usize },

    /// The page handed to the file manager is not exactly one block long.
    #[error("Page size {actual} does not match block size {expected}")]
    PageSizeMismatch { expected: usize, actual: usize },
}
