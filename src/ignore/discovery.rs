//! Hierarchical discovery of `.gitignore` and `.customignore` files

use crate::core::error::{ArchiveError, Result};
use crate::ignore::candidate::relative_dir;
use crate::ignore::parser::parse_ignore_content;
use crate::ignore::rules::{RuleSet, RuleSetBuilder, RuleSource};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Name of the version-control directory that is never descended into
pub const GIT_DIR: &str = ".git";

/// Walk every directory under `root` (root included) and compile all ignore files found
///
/// Directories are visited depth-first in lexical order. Within a directory the
/// `.gitignore` is read before the `.customignore`. Any malformed line or unreadable
/// ignore file aborts discovery.
pub fn discover(root: &Path) -> Result<RuleSet> {
    discover_with_options(root, false)
}

/// Same as [`discover`], optionally following symbolic links to directories
pub fn discover_with_options(root: &Path, follow_links: bool) -> Result<RuleSet> {
    let mut builder = RuleSetBuilder::new();

    let walker = WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_git_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory during discovery: {}", e);
                continue;
            },
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        load_directory(root, entry.path(), &mut builder)?;
    }

    let rules = builder.build();
    tracing::info!(
        rules = rules.len(),
        files = rules.ignore_files().len(),
        "Total ignore patterns loaded"
    );
    Ok(rules)
}

/// Read the ignore files directly inside `dir`
fn load_directory(root: &Path, dir: &Path, builder: &mut RuleSetBuilder) -> Result<()> {
    let relative_base = relative_dir(root, dir);

    for source in [RuleSource::GitIgnore, RuleSource::CustomIgnore] {
        let path = dir.join(source.file_name());
        if !path.is_file() {
            continue;
        }

        let content = fs::read_to_string(&path).map_err(|e| ArchiveError::IgnoreFileRead {
            path: path.clone(),
            source: e,
        })?;

        let relative_file = relative_file(&relative_base, source.file_name());
        tracing::info!("Processing {} file: {}", source.file_name(), relative_file.display());

        parse_ignore_content(&content, &relative_base, &relative_file, source, builder)?;
        builder.record_file(relative_file);
    }

    Ok(())
}

fn relative_file(relative_base: &str, file_name: &str) -> PathBuf {
    if relative_base.is_empty() {
        PathBuf::from(file_name)
    } else {
        PathBuf::from(relative_base).join(file_name)
    }
}

fn is_git_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == GIT_DIR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore::rules::OVERRIDE_PRIORITY;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_discover_nested_files_in_lexical_order() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        fs::write(root.join(".gitignore"), "*.tmp\n")?;
        fs::create_dir_all(root.join("b"))?;
        fs::create_dir_all(root.join("a/inner"))?;
        fs::write(root.join("b/.gitignore"), "*.log\n")?;
        fs::write(root.join("a/.customignore"), "secret.txt\n")?;
        fs::write(root.join("a/inner/.gitignore"), "# nothing but a comment\n/out/\n")?;

        let rules = discover(root)?;

        let texts: Vec<_> = rules.rules().iter().map(|r| r.original_text()).collect();
        assert_eq!(texts, vec!["*.tmp", "secret.txt", "/out/", "*.log"]);

        let priorities: Vec<_> = rules.rules().iter().map(|r| r.priority()).collect();
        assert_eq!(priorities, vec![0, OVERRIDE_PRIORITY, 2, 3]);

        assert_eq!(rules.rules()[2].base_path(), "a/inner");
        assert!(rules.rules()[2].matches("a/inner/out/x.bin"));
        assert!(!rules.rules()[2].matches("out/x.bin"));

        assert_eq!(
            rules.ignore_files(),
            &[
                PathBuf::from(".gitignore"),
                PathBuf::from("a/.customignore"),
                PathBuf::from("a/inner/.gitignore"),
                PathBuf::from("b/.gitignore"),
            ]
        );
        assert!(rules.named_overrides("a").unwrap().contains("secret.txt"));
        Ok(())
    }

    #[test]
    fn test_gitignore_read_before_customignore() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::write(root.join(".customignore"), "private/\n")?;
        fs::write(root.join(".gitignore"), "*.o\n")?;

        let rules = discover(root)?;
        let texts: Vec<_> = rules.rules().iter().map(|r| r.original_text()).collect();
        assert_eq!(texts, vec!["*.o", "private/"]);
        Ok(())
    }

    #[test]
    fn test_malformed_rule_aborts_discovery() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir(root.join("sub"))?;
        fs::write(root.join("sub/.gitignore"), "ok.txt\n[z-a]\n")?;

        match discover(root) {
            Err(ArchiveError::PatternCompile { file, line, .. }) => {
                assert_eq!(file, PathBuf::from("sub/.gitignore"));
                assert_eq!(line, 2);
            },
            other => panic!("expected pattern error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_git_directory_is_not_scanned() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir(root.join(".git"))?;
        fs::write(root.join(".git/.gitignore"), "*\n")?;

        let rules = discover(root)?;
        assert!(rules.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_tree_has_no_rules() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let rules = discover(temp_dir.path())?;
        assert!(rules.is_empty());
        assert!(rules.ignore_files().is_empty());
        Ok(())
    }
}
