//! Archive production
//!
//! Walks the root folder, resolves each entry against the discovered rules and writes
//! included files into a zip archive with forward-slash entry names.

pub mod writer;

// Re-export commonly used items
pub use writer::{archive, ArchiveSummary, Archiver, EntryEvent, EntryKind, EntryOutcome};
