//! Materializing rendered option files on disk.
//!
//! [`FileSink`] writes a [`RenderedConfig`] below a root directory and
//! reports whether anything changed, which is what decides whether the
//! file's notify targets need a refresh.
//!
//! # Atomic Writes
//!
//! Uses write-to-temp-then-rename:
//! 1. Write to `{path}.tmp`
//! 2. Rename `{path}.tmp` to `{path}`

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::render::RenderedConfig;

/// Errors that can occur while writing rendered files.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Failed to read the current file content.
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to write the new file content.
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        /// Path that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Result of writing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist and was created.
    Created,
    /// The file existed with different content and was replaced.
    Updated,
    /// The file already had the rendered content; nothing was written.
    Unchanged,
}

impl WriteOutcome {
    /// Returns true if the file content changed.
    #[must_use]
    pub const fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Writes rendered files below a root directory.
///
/// Absolute target paths are re-rooted, so `/etc/mysql/conf.d/x.cnf` with
/// root `/srv/chroot` lands in `/srv/chroot/etc/mysql/conf.d/x.cnf`.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
    dry_run: bool,
}

impl FileSink {
    /// Creates a sink writing below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
        }
    }

    /// Computes outcomes without touching the filesystem.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns where a target path lands below the root.
    ///
    /// Only normal components are kept, so `..` and prefixes cannot escape the root.
    #[must_use]
    pub fn target_path(&self, path: &Path) -> PathBuf {
        let relative: PathBuf = path
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        self.root.join(relative)
    }

    /// Writes the rendered file unless it already has the same content.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file cannot be read or the new
    /// content cannot be written.
    pub fn write(&self, rendered: &RenderedConfig) -> Result<WriteOutcome, ApplyError> {
        let target = self.target_path(&rendered.path);

        let outcome = match std::fs::read(&target) {
            Ok(existing) if existing == rendered.content.as_bytes() => WriteOutcome::Unchanged,
            Ok(_) => WriteOutcome::Updated,
            Err(e) if e.kind() == ErrorKind::NotFound => WriteOutcome::Created,
            Err(e) => {
                return Err(ApplyError::Read {
                    path: target,
                    source: e,
                });
            }
        };

        if outcome.is_changed() && !self.dry_run {
            write_atomic(&target, &rendered.content)?;
        }

        tracing::debug!("{}: {outcome:?}", target.display());
        Ok(outcome)
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), ApplyError> {
    let write_err = |source| ApplyError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    // Append .tmp instead of replacing the extension (x.cnf -> x.cnf.tmp)
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));

    std::fs::write(&temp_path, content).map_err(write_err)?;
    std::fs::rename(&temp_path, path).map_err(write_err)?;

    Ok(())
}
