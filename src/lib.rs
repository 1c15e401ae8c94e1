//! Blockpatch: one-shot exact-match source patching
//!
//! Loads a file, looks for one verbatim block of text and, only when that
//! block is present, replaces every occurrence of it and rewrites the file.
//! When the block is missing the file is left byte-for-byte untouched and a
//! [`Diagnosis`] explains what the file holds instead.
//!
//! # Architecture
//!
//! - [`config`]: the immutable, validated [`PatchConfig`] (target, replacement,
//!   anchor, file, context window), built in code or loaded from TOML
//! - [`applier`]: [`PatchApplier`], match-or-no-op semantics
//! - [`diagnose`]: the anchor-based fallback used when the match fails
//! - [`fsio`]: whole-file UTF-8 read and crash-safe whole-file write
//! - [`report`]: console rendering of outcomes
//!
//! # Example
//!
//! ```no_run
//! use blockpatch::{ApplyOutcome, PatchApplier, PatchConfig};
//!
//! let config = PatchConfig::new("src/main.rs", "old_call()", "new_call()", "old_")?;
//!
//! match PatchApplier::new(config).apply()? {
//!     ApplyOutcome::Applied(applied) => println!("{} occurrences", applied.occurrences),
//!     ApplyOutcome::NoExactMatch { diagnosis, .. } => eprintln!("{:?}", diagnosis.anchor),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod applier;
pub mod config;
pub mod diagnose;
pub mod fsio;
pub mod report;

// Re-exports
pub use applier::{
    replace_all, Applied, ApplyError, ApplyOptions, ApplyOutcome, CheckStatus, PatchApplier,
};
pub use config::{
    builtin, load_from_path, load_from_str, ConfigError, PatchConfig, ValidationError,
};
pub use diagnose::{diagnose, AnchorWindow, Diagnosis, Divergence};
