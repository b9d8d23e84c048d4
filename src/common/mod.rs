//! Common types and utilities shared across blockfile.
//!
//! This module contains the primitives every other layer builds on:
//! - Configuration constants
//! - Error types
//! - Identifiers (BlockId)

mod block_id;
pub mod config;
pub mod error;

pub use block_id::BlockId;
pub use error::{Error, Result};
