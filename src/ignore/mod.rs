//! File ignore system with .gitignore and .customignore support
//!
//! Ignore files are discovered throughout the tree and compiled once into a single
//! [`RuleSet`]. Rules from `.gitignore` files follow "later rule wins" ordering, while
//! rules from `.customignore` files form an override tier that always excludes.

pub mod candidate;
pub mod checker;
pub mod discovery;
pub mod parser;
pub mod rules;

// Re-export commonly used items
pub use candidate::CandidatePath;
pub use checker::{Decision, InclusionResolver, Resolution};
pub use discovery::{discover, discover_with_options};
pub use parser::{compile_rule, translate_pattern};
pub use rules::{IgnoreRule, RuleSet, RuleSource, OVERRIDE_PRIORITY};
