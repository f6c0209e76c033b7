//! Ignore-file parser translating gitignore glob lines into anchored regular expressions

use crate::core::error::{ArchiveError, Result};
use crate::ignore::rules::{IgnoreRule, RuleSetBuilder, RuleSource, OVERRIDE_PRIORITY};
use regex::Regex;
use std::path::Path;

/// A line of an ignore file split into its parts, before translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Line with surrounding whitespace removed
    pub text: &'a str,
    /// Whether the line started with `!`
    pub is_negation: bool,
    /// Glob text after the `!`
    pub glob: &'a str,
}

/// Split a raw line, returning `None` for blank lines and comments
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let text = line.trim();

    // Skip empty lines and comments
    if text.is_empty() || text.starts_with('#') {
        return None;
    }

    let (is_negation, glob) = match text.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    if glob.is_empty() || glob == "/" {
        return None;
    }

    Some(ParsedLine {
        text,
        is_negation,
        glob,
    })
}

/// Translate a gitignore glob into a full-match regular expression
///
/// `relative_base` is the root-relative directory holding the ignore file, with `/`
/// separators and `""` for the root. Only globs with a leading `/` are tied to it; all
/// others may match at any depth.
pub fn translate_pattern(glob: &str, relative_base: &str) -> String {
    let (anchored, glob) = match glob.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, glob),
    };

    let mut body = regex::escape(glob);

    // Characters that keep their gitignore meaning
    for (escaped, literal) in [
        (r"\[", "["),
        (r"\]", "]"),
        (r"\-", "-"),
        (r"\#", "#"),
        (r"\!", "!"),
        (r"\ ", " "),
    ] {
        body = body.replace(escaped, literal);
    }
    body = body.replace("[!", "[^");

    body = body.replace(r"\*\*/", "(?:.*/)?");
    body = body.replace(r"\*\*", ".*");
    body = body.replace(r"\*", "[^/]*");
    body = body.replace(r"\?", "[^/]");

    if body.ends_with('/') {
        body = format!("{}(?:/.*)?", body.trim_end_matches('/'));
    }

    let prefix = if anchored {
        if relative_base.is_empty() {
            String::new()
        } else {
            format!("{}/", regex::escape(relative_base))
        }
    } else {
        "(?:.*?/)?".to_string()
    };

    format!("^{prefix}{body}$")
}

/// Compile one ignore-file line into a rule
///
/// Returns `Ok(None)` for blank lines and comments. A line whose translation is not a
/// valid expression fails with [`ArchiveError::PatternCompile`].
pub fn compile_rule(
    raw_line: &str,
    relative_base: &str,
    source_file: &Path,
    line: usize,
    priority: i64,
) -> Result<Option<IgnoreRule>> {
    let parsed = match parse_line(raw_line) {
        Some(parsed) => parsed,
        None => return Ok(None),
    };

    let expression = translate_pattern(parsed.glob, relative_base);
    let pattern = Regex::new(&expression).map_err(|e| {
        ArchiveError::pattern_compile(source_file.to_path_buf(), line, parsed.text, e)
    })?;

    Ok(Some(IgnoreRule::new(
        pattern,
        parsed.is_negation,
        relative_base.to_string(),
        parsed.text.to_string(),
        priority,
        source_file.to_path_buf(),
        line,
    )))
}

/// Compile every line of an ignore file's content into `builder`
///
/// `.gitignore` rules take the next global priority; `.customignore` rules take
/// [`OVERRIDE_PRIORITY`] and also register their trimmed lines as exact-name overrides.
/// Returns the number of rules added.
pub fn parse_ignore_content(
    content: &str,
    relative_base: &str,
    source_file: &Path,
    source: RuleSource,
    builder: &mut RuleSetBuilder,
) -> Result<usize> {
    let mut added = 0;

    for (index, line) in content.lines().enumerate() {
        let priority = match source {
            RuleSource::GitIgnore => builder.next_priority(),
            RuleSource::CustomIgnore => OVERRIDE_PRIORITY,
        };

        if let Some(rule) = compile_rule(line, relative_base, source_file, index + 1, priority)? {
            tracing::info!(
                pattern = rule.original_text(),
                regex = rule.pattern().as_str(),
                file = %source_file.display(),
                "Loaded pattern"
            );
            builder.push(rule);
            added += 1;
        }
    }

    if source == RuleSource::CustomIgnore {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string);
        builder.add_named_overrides(relative_base, names);
    }

    Ok(added)
}
