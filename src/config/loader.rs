use crate::config::schema::{PatchConfig, PatchDefinition, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Definition compiled into the binary; applied when no `--patch` is given.
pub const BUILTIN_DEFINITION: &str = include_str!("../../patches/compress-chunk-buffer.toml");

/// Why a patch definition could not be turned into a [`PatchConfig`].
///
/// `path` is `None` for definitions parsed from a string.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read patch definition {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Patch definition{} is not valid TOML", origin(path))]
    Toml {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("Patch definition{} is invalid", origin(path))]
    Validation {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

fn parse(input: &str, path: Option<&Path>) -> Result<PatchConfig, ConfigError> {
    let path = path.map(Path::to_path_buf);
    let definition: PatchDefinition =
        toml_edit::de::from_str(input).map_err(|source| ConfigError::Toml {
            path: path.clone(),
            source,
        })?;
    PatchConfig::try_from(definition).map_err(|source| ConfigError::Validation { path, source })
}

pub fn load_from_str(input: &str) -> Result<PatchConfig, ConfigError> {
    parse(input, None)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<PatchConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, Some(path))
}

/// The patch this tool ships with.
pub fn builtin() -> Result<PatchConfig, ConfigError> {
    load_from_str(BUILTIN_DEFINITION)
}
