//! Configuration constants for blockfile.

/// Default size of a block in bytes (4KB).
///
/// Any block size works as long as every process opening a directory uses
/// the same one; nothing on disk records it.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Files in the managed directory whose name starts with this prefix are
/// transient and removed when a [`FileManager`](crate::storage::FileManager)
/// starts up.
pub const TEMP_FILE_PREFIX: &str = "temp";

/// Width of an encoded integer, and of the length prefix in front of byte
/// arrays and strings.
pub const INT_SIZE: usize = std::mem::size_of::<u64>();
