//! Patch applicator: exact match, replace every occurrence, or diagnose.
//!
//! A run either produces patched content (the target block occurred at least
//! once) and writes it back, or leaves the file untouched and reports a
//! [`Diagnosis`]. There is no partial application.

use crate::config::PatchConfig;
use crate::diagnose::{diagnose, Diagnosis};
use crate::fsio;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. A missing target block is not one of these; it is reported
/// through [`ApplyOutcome::NoExactMatch`].
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Compute the patched content but never write it
    pub dry_run: bool,
}

/// Result of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub file: PathBuf,
    /// Occurrences of the target block that were replaced
    pub occurrences: usize,
    /// False for dry runs
    pub written: bool,
    pub original: String,
    pub patched: String,
}

#[derive(Debug, Clone, PartialEq)]
#[must_use = "ApplyOutcome should be checked for success/failure"]
pub enum ApplyOutcome {
    Applied(Applied),
    /// The target block is not in the file; the file was left untouched
    NoExactMatch { file: PathBuf, diagnosis: Diagnosis },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_))
    }
}

/// Read-only evaluation of a patch against the current file.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum CheckStatus {
    WouldApply { file: PathBuf, occurrences: usize },
    NoExactMatch { file: PathBuf, diagnosis: Diagnosis },
}

/// Replace every non-overlapping occurrence of `target`, left to right.
///
/// Returns `None` when `target` does not occur (or is empty), otherwise the
/// new content and the number of occurrences replaced.
pub fn replace_all(content: &str, target: &str, replacement: &str) -> Option<(String, usize)> {
    if target.is_empty() {
        return None;
    }
    let occurrences = content.matches(target).count();
    if occurrences == 0 {
        return None;
    }
    Some((content.replace(target, replacement), occurrences))
}

/// Applies one [`PatchConfig`] to its file.
#[derive(Debug, Clone)]
pub struct PatchApplier {
    config: PatchConfig,
}

impl PatchApplier {
    pub fn new(config: PatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Apply the patch, rewriting the file when the target block matches.
    pub fn apply(&self) -> Result<ApplyOutcome, ApplyError> {
        self.apply_with(ApplyOptions::default())
    }

    pub fn apply_with(&self, options: ApplyOptions) -> Result<ApplyOutcome, ApplyError> {
        let file = self.config.file().to_path_buf();
        let original = self.read()?;

        let Some((patched, occurrences)) =
            replace_all(&original, self.config.target(), self.config.replacement())
        else {
            tracing::debug!(file = %file.display(), "target block not found");
            let diagnosis = diagnose(&original, &self.config);
            return Ok(ApplyOutcome::NoExactMatch { file, diagnosis });
        };

        tracing::debug!(
            file = %file.display(),
            occurrences,
            dry_run = options.dry_run,
            "target block matched"
        );

        if !options.dry_run {
            fsio::write_text(&file, &patched).map_err(|source| ApplyError::Write {
                path: file.clone(),
                source,
            })?;
        }

        Ok(ApplyOutcome::Applied(Applied {
            file,
            occurrences,
            written: !options.dry_run,
            original,
            patched,
        }))
    }

    /// Evaluate the patch without touching the file.
    pub fn check(&self) -> Result<CheckStatus, ApplyError> {
        let file = self.config.file().to_path_buf();
        let content = self.read()?;

        let occurrences = content.matches(self.config.target()).count();
        if occurrences > 0 {
            Ok(CheckStatus::WouldApply { file, occurrences })
        } else {
            let diagnosis = diagnose(&content, &self.config);
            Ok(CheckStatus::NoExactMatch { file, diagnosis })
        }
    }

    fn read(&self) -> Result<String, ApplyError> {
        let path = self.config.file();
        fsio::read_text(path).map_err(|source| ApplyError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}
