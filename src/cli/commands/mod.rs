//! CLI command implementations

pub mod archive;
