use crate::api::FrameHarvester;
use crate::error::{HarvestError, Result};
use crate::extraction::tags::{get_string_value, INSTANCE_NUMBER, SERIES_INSTANCE_UID};
use crate::harvest::identity::IdentityAssigner;
use crate::harvest::record::{harvest_frame, HarvestRecord};
use crate::types::{HarvestConfig, TagSelector};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Everything harvested from one subject directory
#[derive(Debug, Clone, Default)]
pub struct SubjectHarvest {
    pub records: Vec<HarvestRecord>,
    pub sessions: usize,
    pub files: usize,
    pub frames: usize,
}

/// Outcome of a harvesting run over several subjects
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub subjects: usize,
    pub failed_subjects: Vec<FailedSubject>,
    pub sessions: usize,
    pub files: usize,
    pub frames: usize,
    pub records: usize,
}

/// A subject whose output was dropped because processing failed
#[derive(Debug, Clone, Serialize)]
pub struct FailedSubject {
    pub path: PathBuf,
    pub error: String,
}

impl RunSummary {
    fn add(&mut self, harvest: &SubjectHarvest) {
        self.sessions += harvest.sessions;
        self.files += harvest.files;
        self.frames += harvest.frames;
        self.records += harvest.records.len();
    }
}

/// Appends harvested records to a CSV file, one block per subject
///
/// The header row is written only when the file is empty.
pub struct CsvAppender {
    path: PathBuf,
}

impl CsvAppender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one block of records
    pub fn append(&self, records: &[HarvestRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Walks subject directories and harvests the tags of interest
///
/// Layout: `<subject>/<session>/**/<file>.<ext>`. Subjects are processed one
/// at a time; identifiers are assigned per subject and never shared.
pub struct Harvester<'a> {
    config: &'a HarvestConfig,
    selectors: &'a [TagSelector],
}

impl<'a> Harvester<'a> {
    pub fn new(config: &'a HarvestConfig, selectors: &'a [TagSelector]) -> Self {
        Self { config, selectors }
    }

    /// Harvests every subject and appends each subject's records to `sink`
    ///
    /// A subject that fails contributes nothing; the run continues with the
    /// next subject.
    pub fn run(&self, subjects: &[PathBuf], sink: &CsvAppender) -> RunSummary {
        let mut summary = RunSummary::default();

        for (ordinal, subject) in subjects.iter().enumerate() {
            summary.subjects += 1;
            let outcome = self
                .harvest_subject(ordinal, subject)
                .and_then(|harvest| sink.append(&harvest.records).map(|_| harvest));

            match outcome {
                Ok(harvest) => {
                    info!(
                        "Subject {}: {} sessions, {} files, {} frames, {} records",
                        subject.display(),
                        harvest.sessions,
                        harvest.files,
                        harvest.frames,
                        harvest.records.len()
                    );
                    summary.add(&harvest);
                }
                Err(e) => {
                    error!("Subject {} failed: {}", subject.display(), e);
                    summary.failed_subjects.push(FailedSubject {
                        path: subject.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        summary
    }

    /// Harvests all sessions of one subject
    ///
    /// # Errors
    ///
    /// Any unreadable file or malformed frame aborts the whole subject.
    pub fn harvest_subject(&self, ordinal: usize, subject: &Path) -> Result<SubjectHarvest> {
        let subject_name = dir_name(subject);
        let mut ids = IdentityAssigner::new(ordinal);
        let mut harvest = SubjectHarvest::default();

        for session in self.session_dirs(subject)? {
            ids.enter_session(&subject_name, &dir_name(&session));
            harvest.sessions += 1;

            for file in self.session_files(&session) {
                debug!("Reading {}", file.display());
                let frames = FrameHarvester::frames_from_file(&file, self.config)?;
                harvest.files += 1;

                for frame in frames {
                    let series_uid = get_string_value(&frame.attributes, SERIES_INSTANCE_UID)
                        .ok_or_else(|| {
                            HarvestError::TagNotFound(format!(
                                "SeriesInstanceUID in {}",
                                file.display()
                            ))
                        })?;
                    let instance_number =
                        get_string_value(&frame.attributes, INSTANCE_NUMBER).unwrap_or_default();
                    let id = ids.identify_frame(&series_uid, &instance_number, frame.index)?;

                    harvest.frames += 1;
                    harvest
                        .records
                        .extend(harvest_frame(&frame.attributes, self.selectors, &id));
                }
            }
        }

        Ok(harvest)
    }

    /// Session directories directly below a subject
    fn session_dirs(&self, subject: &Path) -> Result<Vec<PathBuf>> {
        let mut sessions = Vec::new();
        for entry in std::fs::read_dir(subject)? {
            let path = entry?.path();
            if path.is_dir() {
                sessions.push(path);
            } else {
                debug!("Ignoring non-directory {}", path.display());
            }
        }
        if self.config.sorted_traversal {
            sessions.sort();
        }
        Ok(sessions)
    }

    /// Files below a session with an accepted extension, recursively
    fn session_files(&self, session: &Path) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(session).min_depth(1);
        if self.config.sorted_traversal {
            walker = walker.sort_by_file_name();
        }

        walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry below {}: {}", session.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| self.config.accepts_extension(ext))
            })
            .map(|entry| entry.into_path())
            .collect()
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
