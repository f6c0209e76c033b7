//! Root-relative candidate paths

use std::path::{Component, Path};

/// A filesystem entry expressed relative to the archive root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    segments: Vec<String>,
}

impl CandidatePath {
    /// Build a candidate from a path under `root`; `None` when it is the root itself
    /// or lies outside of it
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        Self::from_relative(relative)
    }

    /// Build a candidate from an already root-relative path
    pub fn from_relative(relative: &Path) -> Option<Self> {
        let segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Parse a `/`-separated relative path such as `sub/file.txt`
    pub fn parse(relative: &str) -> Option<Self> {
        let segments: Vec<String> = relative
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First `len` segments joined with `/`
    pub fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())].join("/")
    }

    /// Increasing-length prefixes, ending with the full path
    pub fn prefixes(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.segments.len()).map(move |len| self.prefix(len))
    }

    /// Full path with forward slashes, used as the archive entry name
    pub fn as_slash_path(&self) -> String {
        self.segments.join("/")
    }

    /// Bare name of the entry
    pub fn file_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Root-relative directories from the parent up to the root (`""`)
    pub fn ancestor_dirs(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.segments.len()).rev().map(move |len| self.prefix(len))
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl std::fmt::Display for CandidatePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_slash_path())
    }
}

/// Root-relative form of `dir` with `/` separators, `""` for the root itself
pub fn relative_dir(root: &Path, dir: &Path) -> String {
    CandidatePath::from_path(root, dir)
        .map(|candidate| candidate.as_slash_path())
        .unwrap_or_default()
}
