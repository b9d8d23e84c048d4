//! File Manager - block-addressed I/O over a directory of files.
//!
//! The [`FileManager`] handles all direct file operations:
//! - Reading and writing whole blocks into and out of [`Page`]s
//! - Counting the blocks of a file
//! - Allocating new blocks by extending a file
//! - Clearing stale temporary files at startup

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, trace};
use parking_lot::Mutex;

use crate::common::config::TEMP_FILE_PREFIX;
use crate::common::{BlockId, Error, Result};
use crate::storage::Page;

/// Manages block I/O for every file in one database directory.
///
/// # File Layout
/// Each file is a flat run of fixed-size blocks with no header:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Block 0 │ Block 1 │ Block 2 │  ...    │ Block N │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      B       2B      ...      N×B
/// ```
///
/// Block N is located at file offset `N × block_size`. The block size is not
/// stored anywhere; every process opening the directory must agree on it.
///
/// # Thread Safety
/// `FileManager` is `Send + Sync` and meant to be shared behind an `Arc`.
/// A single mutex guards the open-file registry and every positional I/O
/// call, including the size-then-extend sequence in [`append`](Self::append),
/// so concurrent appends always get distinct block numbers.
///
/// # File Handles
/// Each distinct file name touched keeps one descriptor open in the
/// registry until [`close`](Self::close) is called or the manager is
/// dropped. Callers that create many short-lived files (scratch `temp*`
/// files, for instance) should `close` them when done, or the process
/// can run out of descriptors.
///
/// # Example
/// ```no_run
/// use blockfile::{BlockId, FileManager};
///
/// let fm = FileManager::new("dbdir", 400)?;
/// let block = fm.append("students.tbl")?;
///
/// let mut page = fm.new_page();
/// page.set_int(0, 42)?;
/// fm.write(&block, &page)?;
///
/// let mut read_back = fm.new_page();
/// fm.read(&block, &mut read_back)?;
/// assert_eq!(read_back.get_int(0)?, 42);
/// # Ok::<(), blockfile::Error>(())
/// ```
pub struct FileManager {
    /// Directory holding every managed file.
    directory: PathBuf,

    /// Size of every block in every file (immutable after construction).
    block_size: usize,

    /// True iff the directory was created by this instance.
    is_new: bool,

    /// Open handles keyed by full path. Also the I/O lock.
    open_files: Mutex<HashMap<PathBuf, File>>,
}

impl FileManager {
    /// Open the database directory, creating it if needed.
    ///
    /// If the directory already exists, every regular file directly inside
    /// it whose name starts with `"temp"` is deleted.
    ///
    /// # Errors
    /// Returns `Error::Io` if the directory cannot be created or listed, or
    /// a temp file cannot be removed.
    ///
    /// # Panics
    /// Panics if `block_size` is 0.
    pub fn new<P: AsRef<Path>>(directory: P, block_size: usize) -> Result<Self> {
        assert!(block_size > 0, "block_size must be > 0");

        let directory = directory.as_ref().to_path_buf();
        let is_new = !directory.exists();

        if is_new {
            fs::create_dir_all(&directory)?;
            debug!("created database directory {}", directory.display());
        } else {
            Self::remove_temp_files(&directory)?;
        }

        Ok(Self {
            directory,
            block_size,
            is_new,
            open_files: Mutex::new(HashMap::new()),
        })
    }

    // ========================================================================
    // Public API: Block I/O
    // ========================================================================

    /// Read `block` into `page`.
    ///
    /// Creates the file if it does not exist yet. Returns the number of
    /// bytes read, which is always the block size.
    ///
    /// # Errors
    /// - `Error::PageSizeMismatch` if `page` is not exactly one block long
    /// - `Error::BlockNotFound` if the block lies past the end of the file
    /// - `Error::Io` on any file failure
    pub fn read(&self, block: &BlockId, page: &mut Page) -> Result<usize> {
        self.check_page(page)?;

        let mut open_files = self.open_files.lock();
        let file = self.file(&mut open_files, block.file_name())?;

        let block_count = self.block_count(file)?;
        if block.number() >= block_count {
            return Err(Error::BlockNotFound {
                block: block.clone(),
                block_count,
            });
        }

        file.seek(SeekFrom::Start(self.offset_of(block)?))?;
        file.read_exact(page.as_mut_slice())?;

        Ok(self.block_size)
    }

    /// Write `page` into `block`.
    ///
    /// Creates the file if it does not exist yet. Writing past the current
    /// end of the file extends it. Returns the number of bytes written.
    ///
    /// # Errors
    /// - `Error::PageSizeMismatch` if `page` is not exactly one block long
    /// - `Error::BlockOutOfRange` if the block's byte offset overflows `u64`
    /// - `Error::Io` on any file failure
    pub fn write(&self, block: &BlockId, page: &Page) -> Result<usize> {
        self.check_page(page)?;
        let offset = self.offset_of(block)?;

        let mut open_files = self.open_files.lock();
        let file = self.file(&mut open_files, block.file_name())?;

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(page.as_slice())?;

        Ok(self.block_size)
    }

    /// Number of whole blocks in `file_name`, creating the file if absent.
    ///
    /// A partially written trailing block is not counted.
    pub fn size(&self, file_name: &str) -> Result<u64> {
        let mut open_files = self.open_files.lock();
        let file = self.file(&mut open_files, file_name)?;
        self.block_count(file)
    }

    /// Extend `file_name` by one zero-filled block and return its id.
    ///
    /// The size lookup and the extension happen under one lock acquisition.
    pub fn append(&self, file_name: &str) -> Result<BlockId> {
        let mut open_files = self.open_files.lock();
        let file = self.file(&mut open_files, file_name)?;

        let block = BlockId::new(file_name, self.block_count(file)?);
        let zeros = vec![0u8; self.block_size];

        file.seek(SeekFrom::Start(self.offset_of(&block)?))?;
        file.write_all(&zeros)?;

        trace!("appended {}", block);
        Ok(block)
    }

    // ========================================================================
    // Public API: Handle management
    // ========================================================================

    /// Flush `file_name` to stable storage if it is currently open.
    pub fn flush(&self, file_name: &str) -> Result<()> {
        let open_files = self.open_files.lock();
        if let Some(file) = open_files.get(&self.directory.join(file_name)) {
            file.sync_all()?;
        }
        Ok(())
    }

    /// Drop the cached handle for `file_name`, if any.
    ///
    /// The file is reopened on next use.
    pub fn close(&self, file_name: &str) {
        let mut open_files = self.open_files.lock();
        if open_files.remove(&self.directory.join(file_name)).is_some() {
            trace!("closed {}", file_name);
        }
    }

    /// Number of file handles currently cached.
    pub fn open_file_count(&self) -> usize {
        self.open_files.lock().len()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// True if the directory did not exist before this manager created it.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// A zero-filled page sized for this manager's blocks.
    pub fn new_page(&self) -> Page {
        Page::new(self.block_size)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Look up or open the handle for `file_name`. Callers hold the lock.
    fn file<'a>(
        &self,
        open_files: &'a mut HashMap<PathBuf, File>,
        file_name: &str,
    ) -> Result<&'a mut File> {
        match open_files.entry(self.directory.join(file_name)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(entry.key())?;
                trace!("opened {}", entry.key().display());
                Ok(entry.insert(file))
            }
        }
    }

    fn block_count(&self, file: &File) -> Result<u64> {
        Ok(file.metadata()?.len() / self.block_size as u64)
    }

    /// Byte offset of `block`. The whole block must end within `u64` range.
    fn offset_of(&self, block: &BlockId) -> Result<u64> {
        let block_size = self.block_size as u64;
        block
            .number()
            .checked_mul(block_size)
            .filter(|offset| offset.checked_add(block_size).is_some())
            .ok_or_else(|| Error::BlockOutOfRange {
                block: block.clone(),
                block_size: self.block_size,
            })
    }

    fn check_page(&self, page: &Page) -> Result<()> {
        if page.len() != self.block_size {
            return Err(Error::PageSizeMismatch {
                expected: self.block_size,
                actual: page.len(),
            });
        }
        Ok(())
    }

    fn remove_temp_files(directory: &Path) -> Result<()> {
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with(TEMP_FILE_PREFIX) {
                fs::remove_file(entry.path())?;
                debug!("removed stale temp file {}", entry.path().display());
            }
        }
        Ok(())
    }
}
