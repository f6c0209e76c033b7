//! Core types shared by the ignore engine and the archiver
//!
//! This module contains error handling used throughout the crate.

pub mod error;

// Re-export commonly used items
pub use error::{ArchiveError, Result};
