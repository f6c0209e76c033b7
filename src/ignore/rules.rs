//! Compiled ignore rules and the rule set built by discovery

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Priority reserved for rules sourced from `.customignore` files
pub const OVERRIDE_PRIORITY: i64 = -1;

/// Name of the standard ignore file
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Name of the override ignore file
pub const CUSTOMIGNORE_FILE: &str = ".customignore";

/// Kind of ignore file a rule was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    /// `.gitignore`, standard priority
    GitIgnore,
    /// `.customignore`, override priority
    CustomIgnore,
}

impl RuleSource {
    /// File name this source is read from
    pub fn file_name(&self) -> &'static str {
        match self {
            RuleSource::GitIgnore => GITIGNORE_FILE,
            RuleSource::CustomIgnore => CUSTOMIGNORE_FILE,
        }
    }
}

/// A single compiled line of an ignore file
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// Anchored matcher over root-relative, `/`-separated paths
    pattern: Regex,
    /// Whether the line started with `!`
    is_negation: bool,
    /// Directory containing the ignore file, relative to root (`""` for root)
    base_path: String,
    /// Line as written, including any leading `!`
    original_text: String,
    /// Lower sorts first; [`OVERRIDE_PRIORITY`] marks override rules
    priority: i64,
    /// Ignore file the rule came from, relative to root
    source_file: PathBuf,
    /// 1-based line number in `source_file`
    line: usize,
}

impl IgnoreRule {
    pub(crate) fn new(
        pattern: Regex,
        is_negation: bool,
        base_path: String,
        original_text: String,
        priority: i64,
        source_file: PathBuf,
        line: usize,
    ) -> Self {
        Self {
            pattern,
            is_negation,
            base_path,
            original_text,
            priority,
            source_file,
            line,
        }
    }

    /// Whether the rule fully matches a root-relative path
    pub fn matches(&self, relative_path: &str) -> bool {
        self.pattern.is_match(relative_path)
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn is_negation(&self) -> bool {
        self.is_negation
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Whether the rule belongs to the override tier
    pub fn is_override(&self) -> bool {
        self.priority == OVERRIDE_PRIORITY
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// Ordered, read-only collection of rules produced by one discovery pass
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<IgnoreRule>,
    /// Trimmed `.customignore` lines keyed by root-relative directory
    named_overrides: BTreeMap<String, BTreeSet<String>>,
    /// Ignore files read, relative to root, in load order
    ignore_files: Vec<PathBuf>,
}

impl RuleSet {
    /// All rules in insertion order
    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Rules sourced from `.customignore`, insertion order
    pub fn override_rules(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter().filter(|rule| rule.is_override())
    }

    /// Rules sourced from `.gitignore`, ascending priority (equal to insertion order)
    pub fn standard_rules(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter().filter(|rule| !rule.is_override())
    }

    /// Exact-name lines of the `.customignore` in `dir`, if that directory has one
    pub fn named_overrides(&self, dir: &str) -> Option<&BTreeSet<String>> {
        self.named_overrides.get(dir)
    }

    pub fn ignore_files(&self) -> &[PathBuf] {
        &self.ignore_files
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Accumulator used while discovery is running; frozen into a [`RuleSet`]
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    inner: RuleSet,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Priority the next `.gitignore` rule receives
    pub fn next_priority(&self) -> i64 {
        self.inner.rules.len() as i64
    }

    pub fn push(&mut self, rule: IgnoreRule) {
        self.inner.rules.push(rule);
    }

    pub fn record_file(&mut self, relative_file: PathBuf) {
        self.inner.ignore_files.push(relative_file);
    }

    /// Register the exact-name lines of a `.customignore` in `dir`
    pub fn add_named_overrides<I>(&mut self, dir: &str, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.inner
            .named_overrides
            .entry(dir.to_string())
            .or_default()
            .extend(names);
    }

    pub fn build(self) -> RuleSet {
        self.inner
    }
}
