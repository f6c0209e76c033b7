//! Zip archive production with ignore-rule filtering

use crate::config::ArchiveSettings;
use crate::core::error::{ArchiveError, Result};
use crate::ignore::candidate::CandidatePath;
use crate::ignore::checker::{Decision, InclusionResolver};
use crate::ignore::discovery::discover_with_options;
use crate::ignore::rules::RuleSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Kind of filesystem entry seen during the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// What happened to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// File added to the archive (or would be, on a dry run)
    Included,
    /// Entry excluded by the ignore rules
    Excluded,
    /// Entry could not be read and was left out
    Skipped,
}

/// Per-entry report emitted while archiving
#[derive(Debug, Clone)]
pub struct EntryEvent {
    /// Root-relative path with forward slashes
    pub path: String,
    pub kind: EntryKind,
    pub outcome: EntryOutcome,
    /// Resolver decision, `None` for skipped entries that were never resolved
    pub decision: Option<Decision>,
    pub reason: String,
}

/// Final counts of an archive run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Files written to the archive
    pub files_included: usize,
    /// Files and directories excluded by rules
    pub entries_excluded: usize,
    /// Entries left out because they could not be read
    pub entries_skipped: usize,
    /// Entry names written, in archive order
    pub included_entries: Vec<String>,
    /// Whether nothing was written
    pub dry_run: bool,
}

/// File resolved as included, reported once its outcome is known
#[derive(Debug)]
struct PlannedFile {
    path: PathBuf,
    name: String,
    decision: Decision,
    reason: String,
}

/// Files selected for the archive before anything is written
#[derive(Debug, Default)]
struct ArchivePlan {
    files: Vec<PlannedFile>,
    entries_excluded: usize,
    entries_skipped: usize,
}

/// Failure while copying one file into the archive
#[derive(Debug)]
enum CopyError {
    /// The source file could not be read
    Read(io::Error),
    /// The archive could not be written
    Write(io::Error),
}

const COPY_BUFFER_SIZE: usize = 64 * 1024;

type Reporter = Box<dyn Fn(&EntryEvent) + Send + Sync>;

/// Walks a root folder and writes every included file into a zip archive
pub struct Archiver {
    /// Canonical root folder
    root: PathBuf,
    settings: ArchiveSettings,
    /// Callback receiving one event per entry
    reporter: Option<Reporter>,
    dry_run: bool,
}

impl Archiver {
    /// Create an archiver for `root`, which must be an existing directory
    pub fn new(root: &Path) -> Result<Self> {
        if !root.exists() {
            return Err(ArchiveError::root_not_found(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ArchiveError::root_not_directory(root.to_path_buf()));
        }

        Ok(Self {
            root: dunce::canonicalize(root)?,
            settings: ArchiveSettings::default(),
            reporter: None,
            dry_run: false,
        })
    }

    /// Replace the walk and compression settings
    pub fn with_settings(mut self, settings: ArchiveSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set a callback for per-entry reporting
    pub fn with_reporter<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&EntryEvent) + Send + Sync + 'static,
    {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Resolve and report without writing the archive
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover and compile every ignore file under the root
    pub fn load_rules(&self) -> Result<RuleSet> {
        discover_with_options(&self.root, self.settings.follow_links)
    }

    /// Load the rules, then archive the root into `output`
    pub fn archive(&self, output: &Path) -> Result<ArchiveSummary> {
        let rules = self.load_rules()?;
        self.archive_with_rules(&rules, output)
    }

    /// Archive the root into `output` using already discovered rules
    pub fn archive_with_rules(&self, rules: &RuleSet, output: &Path) -> Result<ArchiveSummary> {
        let output = absolute_output_path(output)?;
        let plan = self.plan(rules, &output);

        let mut summary = ArchiveSummary {
            entries_excluded: plan.entries_excluded,
            entries_skipped: plan.entries_skipped,
            dry_run: self.dry_run,
            ..ArchiveSummary::default()
        };

        if self.dry_run {
            summary.files_included = plan.files.len();
            summary.included_entries = plan
                .files
                .into_iter()
                .map(|file| {
                    self.report_included(&file);
                    file.name
                })
                .collect();
            return Ok(summary);
        }

        let (written, skipped) = self.write_zip(&plan.files, &output)?;
        summary.files_included = written.len();
        summary.entries_skipped += skipped;
        summary.included_entries = written;

        tracing::info!(
            included = summary.files_included,
            excluded = summary.entries_excluded,
            skipped = summary.entries_skipped,
            "Archive created at {}",
            output.display()
        );
        Ok(summary)
    }

    /// Resolve every entry under the root and collect the files to write
    fn plan(&self, rules: &RuleSet, output: &Path) -> ArchivePlan {
        let resolver = InclusionResolver::new(rules);
        let mut plan = ArchivePlan::default();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .and_then(|path| CandidatePath::from_path(&self.root, path))
                        .map(|candidate| candidate.as_slash_path())
                        .unwrap_or_default();
                    tracing::warn!("Skipping unreadable entry {}: {}", path, e);
                    plan.entries_skipped += 1;
                    self.report(EntryEvent {
                        path,
                        kind: EntryKind::File,
                        outcome: EntryOutcome::Skipped,
                        decision: None,
                        reason: e.to_string(),
                    });
                    continue;
                },
            };

            let path = entry.path();
            let candidate = match CandidatePath::from_path(&self.root, path) {
                Some(candidate) => candidate,
                None => continue,
            };
            let name = candidate.as_slash_path();

            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else if entry.file_type().is_file() || path.is_file() {
                EntryKind::File
            } else {
                tracing::warn!("Skipping unsupported entry {}", name);
                plan.entries_skipped += 1;
                self.report(EntryEvent {
                    path: name,
                    kind: EntryKind::File,
                    outcome: EntryOutcome::Skipped,
                    decision: None,
                    reason: "Unsupported entry type".to_string(),
                });
                continue;
            };

            if self.settings.skip_output && kind == EntryKind::File && path == output {
                tracing::debug!("Skipping output archive {}", name);
                continue;
            }

            let resolution = resolver.resolve(&candidate);
            tracing::debug!(path = %name, decision = ?resolution.decision, "{}", resolution.reason);

            let outcome = if resolution.included() {
                EntryOutcome::Included
            } else {
                plan.entries_excluded += 1;
                EntryOutcome::Excluded
            };

            // Included files are reported once written; directories are resolved for reporting only
            if outcome == EntryOutcome::Included && kind == EntryKind::File {
                plan.files.push(PlannedFile {
                    path: path.to_path_buf(),
                    name,
                    decision: resolution.decision,
                    reason: resolution.reason,
                });
                continue;
            }

            self.report(EntryEvent {
                path: name,
                kind,
                outcome,
                decision: Some(resolution.decision),
                reason: resolution.reason,
            });
        }

        plan
    }

    /// Write the planned files, returning the entry names written and the number skipped
    fn write_zip(&self, files: &[PlannedFile], output: &Path) -> Result<(Vec<String>, usize)> {
        if output.exists() {
            tracing::info!("Deleting existing archive at {}", output.display());
            fs::remove_file(output)
                .map_err(|e| ArchiveError::output_write(output.to_path_buf(), e))?;
        }

        let file = File::create(output)
            .map_err(|e| ArchiveError::output_write(output.to_path_buf(), e))?;
        let mut archive = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default()
            .compression_method(self.settings.compression.to_zip_method())
            .compression_level(self.settings.compression_level);

        let mut written = Vec::with_capacity(files.len());
        let mut skipped = 0;

        for planned in files {
            let mut source = match File::open(&planned.path) {
                Ok(source) => source,
                Err(e) => {
                    self.report_skipped(planned, &e);
                    skipped += 1;
                    continue;
                },
            };

            archive
                .start_file(planned.name.as_str(), options)
                .map_err(|e| zip_error(output, e))?;

            match copy_entry(&mut source, &mut archive) {
                Ok(_) => {
                    self.report_included(planned);
                    written.push(planned.name.clone());
                },
                Err(CopyError::Read(e)) => {
                    archive.abort_file().map_err(|e| zip_error(output, e))?;
                    self.report_skipped(planned, &e);
                    skipped += 1;
                },
                Err(CopyError::Write(e)) => {
                    return Err(ArchiveError::output_write(output.to_path_buf(), e));
                },
            }
        }

        let mut inner = archive.finish().map_err(|e| zip_error(output, e))?;
        inner
            .flush()
            .map_err(|e| ArchiveError::output_write(output.to_path_buf(), e))?;

        Ok((written, skipped))
    }

    fn report_included(&self, planned: &PlannedFile) {
        self.report(EntryEvent {
            path: planned.name.clone(),
            kind: EntryKind::File,
            outcome: EntryOutcome::Included,
            decision: Some(planned.decision),
            reason: planned.reason.clone(),
        });
    }

    fn report_skipped(&self, planned: &PlannedFile, error: &io::Error) {
        tracing::warn!("Skipping unreadable file {}: {}", planned.name, error);
        self.report(EntryEvent {
            path: planned.name.clone(),
            kind: EntryKind::File,
            outcome: EntryOutcome::Skipped,
            decision: None,
            reason: error.to_string(),
        });
    }

    fn report(&self, event: EntryEvent) {
        if let Some(reporter) = &self.reporter {
            reporter(&event);
        }
    }
}

/// Archive `root` into `output` with default settings
pub fn archive(root: &Path, output: &Path) -> Result<ArchiveSummary> {
    Archiver::new(root)?.archive(output)
}

/// Copy `source` into `sink`, keeping read failures apart from write failures
fn copy_entry<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
) -> std::result::Result<u64, CopyError> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut copied = 0u64;

    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => return Ok(copied),
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        sink.write_all(&buffer[..read]).map_err(CopyError::Write)?;
        copied += read as u64;
    }
}

fn zip_error(output: &Path, source: zip::result::ZipError) -> ArchiveError {
    ArchiveError::ArchiveFormat {
        path: output.to_path_buf(),
        source,
    }
}

/// Absolute form of the output path with a canonical parent, so it compares equal to
/// walked entries
fn absolute_output_path(output: &Path) -> Result<PathBuf> {
    let absolute = if output.is_absolute() {
        output.to_path_buf()
    } else {
        std::env::current_dir()?.join(output)
    };

    let file_name = match absolute.file_name() {
        Some(name) => name.to_os_string(),
        None => {
            return Err(ArchiveError::output_write(
                absolute.clone(),
                io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
            ))
        },
    };

    match absolute.parent().map(dunce::canonicalize) {
        Some(Ok(parent)) => Ok(parent.join(file_name)),
        _ => Ok(absolute),
    }
}
