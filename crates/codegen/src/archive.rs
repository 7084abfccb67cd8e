//! # Archive Writer
//!
//! Collects generated files into one zip archive. The writer is opened on the
//! first write, accepts entries until it is closed, and is closed once per
//! run.
//!
//! Entries go to a temporary file created next to the target. Closing
//! finishes the zip and renames it over the target, replacing any stale
//! archive. A run that fails before closing leaves nothing at the target:
//! dropping an unclosed writer deletes the temporary file.

use std::io::Write;
use std::path::{Path, PathBuf};

use schemer_core::{EngineError, EngineResult};
use tempfile::NamedTempFile;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::{ArtifactSink, GeneratedFile};

enum ArchiveState {
    Idle,
    Open(ZipWriter<NamedTempFile>),
    Closed,
}

pub struct ArchiveWriter {
    target: PathBuf,
    state: ArchiveState,
    /// Entry names in write order
    entries: Vec<String>,
}

impl std::fmt::Debug for ArchiveWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            ArchiveState::Idle => "idle",
            ArchiveState::Open(_) => "open",
            ArchiveState::Closed => "closed",
        };
        f.debug_struct("ArchiveWriter")
            .field("target", &self.target)
            .field("state", &state)
            .field("entries", &self.entries)
            .finish()
    }
}

impl ArchiveWriter {
    /// Create a writer for `target`. Nothing touches the disk until the
    /// first write.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            state: ArchiveState::Idle,
            entries: Vec::new(),
        }
    }

    /// Final archive location
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Entry names written so far
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Check whether the archive has been closed
    pub fn is_closed(&self) -> bool {
        matches!(self.state, ArchiveState::Closed)
    }

    /// Start the archive. Opening an open archive does nothing.
    pub fn open(&mut self) -> EngineResult<()> {
        match self.state {
            ArchiveState::Open(_) => Ok(()),
            ArchiveState::Closed => Err(EngineError::ArchiveClosed(self.target.clone())),
            ArchiveState::Idle => {
                let dir = match self.target.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };

                std::fs::create_dir_all(&dir)
                    .map_err(|e| EngineError::archive_io(&dir, e.to_string()))?;

                let temp = NamedTempFile::new_in(&dir)
                    .map_err(|e| EngineError::archive_io(&self.target, e.to_string()))?;

                tracing::debug!(target = %self.target.display(), temp = %temp.path().display(), "archive opened");

                self.state = ArchiveState::Open(ZipWriter::new(temp));
                Ok(())
            }
        }
    }

    /// Add an entry. Entry names must be unique within the archive.
    pub fn write(&mut self, path: &str, contents: &str) -> EngineResult<()> {
        if self.is_closed() {
            return Err(EngineError::ArchiveClosed(self.target.clone()));
        }

        if self.entries.iter().any(|e| e == path) {
            return Err(EngineError::duplicate(
                path,
                "an entry with this name is already in the archive",
            ));
        }

        self.open()?;

        let ArchiveState::Open(zip) = &mut self.state else {
            return Err(EngineError::internal("archive not open after open()"));
        };

        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file(path, options)
            .map_err(|e| EngineError::archive_io(&self.target, e.to_string()))?;
        zip.write_all(contents.as_bytes())
            .map_err(|e| EngineError::archive_io(&self.target, e.to_string()))?;

        self.entries.push(path.to_string());
        Ok(())
    }

    /// Finish the archive and move it into place.
    ///
    /// Closing an archive that was never written produces an empty archive.
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> EngineResult<PathBuf> {
        if matches!(self.state, ArchiveState::Idle) {
            self.open()?;
        }

        match std::mem::replace(&mut self.state, ArchiveState::Closed) {
            ArchiveState::Open(zip) => {
                let temp = zip
                    .finish()
                    .map_err(|e| EngineError::archive_io(&self.target, e.to_string()))?;

                temp.as_file()
                    .sync_all()
                    .map_err(|e| EngineError::archive_io(&self.target, e.to_string()))?;

                temp.persist(&self.target)
                    .map_err(|e| EngineError::archive_io(&self.target, e.error.to_string()))?;

                tracing::info!(
                    archive = %self.target.display(),
                    entries = self.entries.len(),
                    "archive closed",
                );
                Ok(self.target.clone())
            }
            ArchiveState::Closed => Ok(self.target.clone()),
            ArchiveState::Idle => Err(EngineError::internal("archive still idle on close")),
        }
    }
}

impl ArtifactSink for ArchiveWriter {
    fn accept(&mut self, file: &GeneratedFile) -> EngineResult<()> {
        self.write(&file.path, &file.content)
    }
}

// ============================================================================
// Tests
// ============================================================================
