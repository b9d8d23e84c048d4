//! Page - a block-sized buffer with a typed-field codec.
//!
//! A [`Page`] holds exactly one block's worth of bytes. It is the staging
//! area for block I/O and knows how to encode three kinds of values at a
//! caller-chosen offset:
//!
//! ```text
//! integer:  ┌──────────────────┐
//!           │ u64 LE (8 bytes) │
//!           └──────────────────┘
//! bytes:    ┌──────────────────┬───────────────────┐
//!           │ len: u64 LE (8)  │ raw bytes (len)   │
//!           └──────────────────┴───────────────────┘
//! string:   same as bytes, over the string's UTF-8 encoding
//! ```
//!
//! No type tags are stored. Higher layers own the schema of what lives at
//! each offset.

use crate::common::config::INT_SIZE;
use crate::common::{Error, Result};

/// A fixed-capacity byte buffer with length-prefixed accessors.
///
/// The buffer length is set at construction and never changes. Every
/// accessor checks that the encoded value fits inside the buffer and
/// returns [`Error::OutOfBounds`] otherwise, leaving the buffer untouched.
///
/// # Example
/// ```
/// use blockfile::Page;
///
/// let mut page = Page::new(400);
/// page.set_string(88, "abcdefghijklm").unwrap();
/// let next = 88 + Page::max_length_for_string("abcdefghijklm");
/// page.set_int(next, 345).unwrap();
///
/// assert_eq!(page.get_string(88).unwrap(), "abcdefghijklm");
/// assert_eq!(page.get_int(next).unwrap(), 345);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    data: Vec<u8>,
}

impl Page {
    /// Create a zero-filled page of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
        }
    }

    /// Wrap an existing buffer, e.g. bytes that arrived from outside the
    /// file manager. The page's capacity is the buffer's length.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { data: bytes }
    }

    /// Capacity of the page in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get immutable slice of page data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable slice of page data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the page and return its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Zero out the entire page.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    // ========================================================================
    // Integers
    // ========================================================================

    /// Read the little-endian u64 stored at `offset`.
    pub fn get_int(&self, offset: usize) -> Result<u64> {
        let raw = self.range(offset, INT_SIZE)?;
        let mut buf = [0u8; INT_SIZE];
        buf.copy_from_slice(raw);
        Ok(u64::from_le_bytes(buf))
    }

    /// Store `value` as a little-endian u64 at `offset`.
    pub fn set_int(&mut self, offset: usize, value: u64) -> Result<()> {
        self.range_mut(offset, INT_SIZE)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    // ========================================================================
    // Byte arrays
    // ========================================================================

    /// Read the length-prefixed byte array stored at `offset`.
    ///
    /// A garbage length prefix surfaces as [`Error::OutOfBounds`] rather than
    /// a huge allocation.
    pub fn get_bytes(&self, offset: usize) -> Result<Vec<u8>> {
        Ok(self.bytes_at(offset)?.to_vec())
    }

    /// Store `bytes` at `offset` behind an 8-byte length prefix.
    pub fn set_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let total = INT_SIZE
            .checked_add(bytes.len())
            .ok_or_else(|| self.out_of_bounds(offset, usize::MAX))?;
        let dst = self.range_mut(offset, total)?;

        dst[..INT_SIZE].copy_from_slice(&(bytes.len() as u64).to_le_bytes());
        dst[INT_SIZE..].copy_from_slice(bytes);
        Ok(())
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// Read the string stored at `offset`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidUtf8`] if the stored bytes are not UTF-8,
    /// which usually means nothing (or something else) was written there.
    pub fn get_string(&self, offset: usize) -> Result<String> {
        let raw = self.bytes_at(offset)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| Error::InvalidUtf8 { offset })
    }

    /// Store `s` at `offset` using the byte-array encoding of its UTF-8 bytes.
    pub fn set_string(&mut self, offset: usize, s: &str) -> Result<()> {
        self.set_bytes(offset, s.as_bytes())
    }

    /// Number of buffer bytes `s` occupies once encoded: the length prefix
    /// plus its byte (not character) length.
    #[inline]
    pub fn max_length_for_string(s: &str) -> usize {
        INT_SIZE + s.len()
    }

    // ========================================================================
    // Bounds checking
    // ========================================================================

    /// Borrow the length-prefixed payload starting at `offset`.
    fn bytes_at(&self, offset: usize) -> Result<&[u8]> {
        let len = self.get_int(offset)?;
        let len = usize::try_from(len).map_err(|_| self.out_of_bounds(offset, usize::MAX))?;
        let start = offset + INT_SIZE; // checked by get_int
        self.range(start, len)
    }

    fn range(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = self.checked_end(offset, len)?;
        Ok(&self.data[offset..end])
    }

    fn range_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        let end = self.checked_end(offset, len)?;
        Ok(&mut self.data[offset..end])
    }

    fn checked_end(&self, offset: usize, len: usize) -> Result<usize> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(end),
            _ => Err(self.out_of_bounds(offset, len)),
        }
    }

    fn out_of_bounds(&self, offset: usize, len: usize) -> Error {
        Error::OutOfBounds {
            offset,
            len,
            capacity: self.data.len(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
