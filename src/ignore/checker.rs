//! Inclusion resolution over a discovered rule set
//!
//! Every candidate goes through four guards, strictly in order, and the first guard
//! that reaches a decision ends resolution:
//!
//! 1. any `.git` segment excludes the path outright
//! 2. any override rule (from a `.customignore`) matching any prefix excludes the path
//! 3. standard rules are applied prefix by prefix; an ancestor matched by a non-negated
//!    rule excludes the whole subtree, otherwise the last rule matching the full path wins
//! 4. an included path whose bare name is listed in an ancestor `.customignore` is excluded

use crate::ignore::candidate::CandidatePath;
use crate::ignore::discovery::GIT_DIR;
use crate::ignore::rules::{IgnoreRule, RuleSet, CUSTOMIGNORE_FILE};
use std::path::Path;

/// Terminal outcome of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No rule excluded the path
    Included,
    /// Path lies inside a `.git` directory
    ExcludedHardcoded,
    /// An override rule matched the path or one of its ancestors
    ExcludedOverride,
    /// A standard rule matched the path or one of its ancestors
    ExcludedRule,
    /// The bare name is listed in an ancestor `.customignore`
    ExcludedNamedOverride,
}

impl Decision {
    pub fn is_included(&self) -> bool {
        matches!(self, Decision::Included)
    }
}

/// Result of resolving one candidate
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub decision: Decision,
    /// Human-readable explanation
    pub reason: String,
    /// Rule that decided the outcome, if any
    pub matched_rule: Option<&'a IgnoreRule>,
}

impl Resolution<'_> {
    pub fn included(&self) -> bool {
        self.decision.is_included()
    }
}

/// Decides inclusion for candidates against a read-only rule set
#[derive(Debug, Clone, Copy)]
pub struct InclusionResolver<'a> {
    rules: &'a RuleSet,
}

impl<'a> InclusionResolver<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Resolve an absolute path under `root`; the root itself is always included
    pub fn resolve_path(&self, root: &Path, path: &Path) -> Resolution<'a> {
        match CandidatePath::from_path(root, path) {
            Some(candidate) => self.resolve(&candidate),
            None => Resolution {
                decision: Decision::Included,
                reason: "Root folder or path outside of it".to_string(),
                matched_rule: None,
            },
        }
    }

    /// Resolve a root-relative candidate
    pub fn resolve(&self, candidate: &CandidatePath) -> Resolution<'a> {
        if let Some(resolution) = self.check_hardcoded(candidate) {
            return resolution;
        }

        if let Some(resolution) = self.check_overrides(candidate) {
            return resolution;
        }

        let resolution = self.check_standard_rules(candidate);
        if !resolution.included() {
            return resolution;
        }

        self.check_named_overrides(candidate).unwrap_or(resolution)
    }

    fn check_hardcoded(&self, candidate: &CandidatePath) -> Option<Resolution<'a>> {
        if candidate.segments().iter().any(|segment| segment == GIT_DIR) {
            return Some(Resolution {
                decision: Decision::ExcludedHardcoded,
                reason: "Hardcoded rule: reserved version-control directory".to_string(),
                matched_rule: None,
            });
        }
        None
    }

    fn check_overrides(&self, candidate: &CandidatePath) -> Option<Resolution<'a>> {
        for prefix in candidate.prefixes() {
            if let Some(rule) = self.rules.override_rules().find(|rule| rule.matches(&prefix)) {
                return Some(Resolution {
                    decision: Decision::ExcludedOverride,
                    reason: format!(
                        "Custom ignore rule '{}' ({}:{}) matched '{}'",
                        rule.original_text(),
                        rule.source_file().display(),
                        rule.line(),
                        prefix
                    ),
                    matched_rule: Some(rule),
                });
            }
        }
        None
    }

    fn check_standard_rules(&self, candidate: &CandidatePath) -> Resolution<'a> {
        let depth = candidate.depth();
        let mut final_match: Option<&'a IgnoreRule> = None;

        for (index, prefix) in candidate.prefixes().enumerate() {
            // Later rules win at equal priority
            let last_match = self
                .rules
                .standard_rules()
                .filter(|rule| rule.matches(&prefix))
                .last();

            if index + 1 < depth {
                if let Some(rule) = last_match.filter(|rule| !rule.is_negation()) {
                    return Resolution {
                        decision: Decision::ExcludedRule,
                        reason: format!(
                            "Parent directory '{}' is ignored by rule '{}' ({}:{})",
                            prefix,
                            rule.original_text(),
                            rule.source_file().display(),
                            rule.line()
                        ),
                        matched_rule: Some(rule),
                    };
                }
            } else {
                final_match = last_match;
            }
        }

        match final_match {
            Some(rule) if !rule.is_negation() => Resolution {
                decision: Decision::ExcludedRule,
                reason: format!(
                    "Ignored by rule '{}' ({}:{})",
                    rule.original_text(),
                    rule.source_file().display(),
                    rule.line()
                ),
                matched_rule: Some(rule),
            },
            Some(rule) => Resolution {
                decision: Decision::Included,
                reason: format!(
                    "Re-included by rule '{}' ({}:{})",
                    rule.original_text(),
                    rule.source_file().display(),
                    rule.line()
                ),
                matched_rule: Some(rule),
            },
            None => Resolution {
                decision: Decision::Included,
                reason: "No matching rule".to_string(),
                matched_rule: None,
            },
        }
    }

    fn check_named_overrides(&self, candidate: &CandidatePath) -> Option<Resolution<'a>> {
        let name = candidate.file_name();

        for dir in candidate.ancestor_dirs() {
            let listed = self
                .rules
                .named_overrides(&dir)
                .map(|names| names.contains(name))
                .unwrap_or(false);

            if listed {
                let location = if dir.is_empty() {
                    CUSTOMIGNORE_FILE.to_string()
                } else {
                    format!("{dir}/{CUSTOMIGNORE_FILE}")
                };
                return Some(Resolution {
                    decision: Decision::ExcludedNamedOverride,
                    reason: format!("File name '{name}' matched in parent {location}"),
                    matched_rule: None,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore::parser::parse_ignore_content;
    use crate::ignore::rules::{RuleSetBuilder, RuleSource};
    use std::path::PathBuf;

    fn rules(files: &[(&str, RuleSource, &str)]) -> RuleSet {
        let mut builder = RuleSetBuilder::new();
        for (base, source, content) in files {
            let file = if base.is_empty() {
                PathBuf::from(source.file_name())
            } else {
                PathBuf::from(base).join(source.file_name())
            };
            parse_ignore_content(content, base, &file, *source, &mut builder).unwrap();
        }
        builder.build()
    }

    fn decide(rules: &RuleSet, path: &str) -> Decision {
        let candidate = CandidatePath::parse(path).unwrap();
        InclusionResolver::new(rules).resolve(&candidate).decision
    }

    #[test]
    fn test_default_is_included() {
        let rules = RuleSet::default();
        let resolution =
            InclusionResolver::new(&rules).resolve(&CandidatePath::parse("a/b.txt").unwrap());
        assert!(resolution.included());
        assert!(resolution.matched_rule.is_none());
    }

    #[test]
    fn test_git_directory_always_excluded() {
        let rules = rules(&[("", RuleSource::GitIgnore, "!.git/\n!*\n")]);
        assert_eq!(decide(&rules, ".git"), Decision::ExcludedHardcoded);
        assert_eq!(decide(&rules, ".git/config"), Decision::ExcludedHardcoded);
        assert_eq!(decide(&rules, "sub/.git/HEAD"), Decision::ExcludedHardcoded);
        assert_eq!(decide(&rules, ".github/workflow.yml"), Decision::Included);
    }

    #[test]
    fn test_negation_later_rule_wins() {
        let rules = rules(&[("", RuleSource::GitIgnore, "*.log\n!important.log\n")]);
        assert_eq!(decide(&rules, "important.log"), Decision::Included);
        assert_eq!(decide(&rules, "debug.log"), Decision::ExcludedRule);
        assert_eq!(decide(&rules, "logs/debug.log"), Decision::ExcludedRule);
    }

    #[test]
    fn test_negation_order_matters() {
        let rules = rules(&[("", RuleSource::GitIgnore, "!important.log\n*.log\n")]);
        assert_eq!(decide(&rules, "important.log"), Decision::ExcludedRule);
    }

    #[test]
    fn test_ancestor_exclusion_cannot_be_undone() {
        let rules = rules(&[
            ("", RuleSource::GitIgnore, "build/\n!build/sub/deep.txt\n!deep.txt\n"),
            ("build/sub", RuleSource::GitIgnore, "!deep.txt\n"),
        ]);
        assert_eq!(decide(&rules, "build"), Decision::ExcludedRule);
        assert_eq!(decide(&rules, "build/out.bin"), Decision::ExcludedRule);
        assert_eq!(decide(&rules, "build/sub/deep.txt"), Decision::ExcludedRule);

        let candidate = CandidatePath::parse("build/sub/deep.txt").unwrap();
        let resolution = InclusionResolver::new(&rules).resolve(&candidate);
        assert!(resolution.reason.contains("Parent directory 'build'"));
        assert_eq!(resolution.matched_rule.unwrap().original_text(), "build/");
    }

    #[test]
    fn test_negated_ancestor_does_not_exclude() {
        let rules = rules(&[("", RuleSource::GitIgnore, "docs\n!docs\n")]);
        assert_eq!(decide(&rules, "docs/readme.md"), Decision::Included);
    }

    #[test]
    fn test_override_beats_negation() {
        let rules = rules(&[
            ("", RuleSource::GitIgnore, "!*.env\n"),
            ("", RuleSource::CustomIgnore, "*.env\n"),
        ]);
        assert_eq!(decide(&rules, "prod.env"), Decision::ExcludedOverride);
        assert_eq!(decide(&rules, "config/prod.env"), Decision::ExcludedOverride);
    }

    #[test]
    fn test_override_matches_ancestor_prefix() {
        let rules = rules(&[
            ("", RuleSource::CustomIgnore, "/private/\n"),
            ("", RuleSource::GitIgnore, "!private/keep.txt\n"),
        ]);
        assert_eq!(decide(&rules, "private/keep.txt"), Decision::ExcludedOverride);
        assert_eq!(decide(&rules, "public/keep.txt"), Decision::Included);
    }

    #[test]
    fn test_named_override_in_ancestor() {
        let rules = rules(&[("sub", RuleSource::CustomIgnore, "secret.txt\n")]);
        assert_eq!(decide(&rules, "sub/secret.txt"), Decision::ExcludedOverride);
        assert_eq!(decide(&rules, "sub/public.txt"), Decision::Included);
        // Outside the directory holding the .customignore nothing is listed
        assert_eq!(decide(&rules, "other/public.txt"), Decision::Included);
    }

    #[test]
    fn test_named_override_beats_standard_inclusion() {
        // The bracketed name is a character class as a glob, so only the exact-name scan sees it
        let rules = rules(&[
            ("", RuleSource::GitIgnore, "*.txt\n!report*\n"),
            ("docs", RuleSource::CustomIgnore, " report[1].txt \n"),
        ]);

        let candidate = CandidatePath::parse("docs/2024/report[1].txt").unwrap();
        let resolution = InclusionResolver::new(&rules).resolve(&candidate);
        assert_eq!(resolution.decision, Decision::ExcludedNamedOverride);
        assert!(resolution.reason.contains("docs/.customignore"));

        assert_eq!(decide(&rules, "report[1].txt"), Decision::Included);
        assert_eq!(decide(&rules, "docs/notes.txt"), Decision::ExcludedRule);
    }

    #[test]
    fn test_named_override_in_root_customignore() {
        let rules = rules(&[("", RuleSource::CustomIgnore, "report[1].txt\n")]);

        let candidate = CandidatePath::parse("deep/dir/report[1].txt").unwrap();
        let resolution = InclusionResolver::new(&rules).resolve(&candidate);
        assert_eq!(resolution.decision, Decision::ExcludedNamedOverride);
        assert!(resolution.reason.contains("parent .customignore"));

        assert_eq!(decide(&rules, "report[1].txt"), Decision::ExcludedNamedOverride);
        assert_eq!(decide(&rules, "report1.txt"), Decision::ExcludedOverride);
    }

    #[test]
    fn test_rule_from_nested_directory_is_global_unless_anchored() {
        let rules = rules(&[("nested", RuleSource::GitIgnore, "*.tmp\n/local.txt\n")]);
        assert_eq!(decide(&rules, "top.tmp"), Decision::ExcludedRule);
        assert_eq!(decide(&rules, "nested/local.txt"), Decision::ExcludedRule);
        assert_eq!(decide(&rules, "local.txt"), Decision::Included);
    }

    #[test]
    fn test_resolve_path_for_root() {
        let rules = RuleSet::default();
        let root = Path::new("/tmp/root");
        let resolver = InclusionResolver::new(&rules);
        assert!(resolver.resolve_path(root, root).included());
        assert!(resolver.resolve_path(root, &root.join("x.txt")).included());
    }
}
