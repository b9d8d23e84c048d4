//! Block identifier type.

use std::fmt;

use sha2::{Digest, Sha256};

/// Identifies a block on disk: a file name plus a zero-based block number.
///
/// Block `n` of a file occupies bytes `[n * block_size, (n + 1) * block_size)`.
/// Neither field is validated here; an empty file name or a block number
/// past the end of the file is caught by the file manager, if at all.
///
/// # Example
/// ```
/// use blockfile::BlockId;
///
/// let block = BlockId::new("students.tbl", 2);
/// assert_eq!(block.file_name(), "students.tbl");
/// assert_eq!(block.number(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockId {
    file_name: String,
    number: u64,
}

impl BlockId {
    /// Create a new BlockId.
    pub fn new(file_name: impl Into<String>, number: u64) -> Self {
        Self {
            file_name: file_name.into(),
            number,
        }
    }

    /// Name of the file holding this block, relative to the managed directory.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Zero-based index of the block within its file.
    #[inline]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Deterministic content hash: the hex SHA-256 digest of `{file_name number}`.
    ///
    /// Stable across processes and platforms, so it can key on-disk or
    /// shared maps. Equal blocks always hash equal. The digest carries no
    /// ordering and is not meant for integrity checks.
    pub fn hash_code(&self) -> String {
        let digest = Sha256::digest(format!("{{{} {}}}", self.file_name, self.number));
        format!("{:x}", digest)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[file {}, block {}]", self.file_name, self.number)
    }
}
