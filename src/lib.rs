//! blockfile - the block layer of a disk-based storage engine.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Higher layers (not in this crate)               │
//! │        buffer pool · log manager · recovery · transactions      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Storage Layer (storage/)                       │   │
//! │  │   FileManager: (file, block) → offset, locked I/O        │   │
//! │  │   Page: fixed buffer + int / bytes / string codec        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Common (common/)                               │   │
//! │  │        BlockId · Error · config constants                │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, Error, config)
//! - [`storage`] - File manager and page codec
//!
//! # Quick Start
//! ```no_run
//! use blockfile::{BlockId, FileManager, Page};
//!
//! let fm = FileManager::new("dbdir", 400)?;
//! let block = BlockId::new("testfile", 2);
//!
//! let mut page = fm.new_page();
//! page.set_string(88, "abcdefghijklm")?;
//! page.set_int(88 + Page::max_length_for_string("abcdefghijklm"), 345)?;
//! fm.write(&block, &page)?;
//! # Ok::<(), blockfile::Error>(())
//! ```

pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::DEFAULT_BLOCK_SIZE;
pub use common::{BlockId, Error, Result};

pub use storage::{FileManager, Page};
