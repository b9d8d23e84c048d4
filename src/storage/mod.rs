//! Storage layer - block I/O and the page codec.
//!
//! This module handles persistent storage:
//! - [`FileManager`] - Block-addressed file I/O
//! - [`Page`] - Block-sized buffer with typed accessors

mod file_manager;
mod page;

pub use file_manager::FileManager;
pub use page::Page;
