//! ignore-zip - archive a folder while honoring layered ignore files
//!
//! ignore-zip decides, for every file under a root folder, whether it belongs in a zip
//! archive. The decision is driven by `.gitignore` files and `.customignore` override
//! files found anywhere in the tree.
//!
//! # Core Features
//!
//! - **Gitignore Patterns**: glob lines translated once into anchored regular expressions
//! - **Layered Rules**: rules from every directory aggregated in lexical discovery order
//! - **Negation**: `!pattern` re-includes, with "later rule wins" ordering
//! - **Directory Propagation**: an excluded directory excludes everything beneath it
//! - **Overrides**: `.customignore` rules and bare file names always exclude
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ignore_zip::archive::Archiver;
//! use std::path::Path;
//!
//! let archiver = Archiver::new(Path::new("./my-project"))?;
//! let summary = archiver.archive(Path::new("./my-project.zip"))?;
//! println!("{} files archived", summary.files_included);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod core;
pub mod ignore;

// Re-export commonly used types
pub use crate::core::error::{ArchiveError, Result};

pub use archive::{ArchiveSummary, Archiver};

pub use ignore::{CandidatePath, Decision, IgnoreRule, InclusionResolver, Resolution, RuleSet};

/// Current version of ignore-zip
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
