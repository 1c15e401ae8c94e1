use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Characters of context printed at the anchor when no value is given.
pub const DEFAULT_CONTEXT_WINDOW: usize = 500;

/// On-disk shape of a patch definition file.
#[derive(Debug, Deserialize, Clone)]
pub struct PatchDefinition {
    #[serde(default)]
    pub meta: Metadata,
    pub patch: PatchSpec,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PatchSpec {
    pub file: String,
    /// Exact block that must be present for the patch to apply
    pub target: String,
    /// Text substituted for every occurrence of `target`
    pub replacement: String,
    /// Shorter locator used only for diagnostics when `target` is absent
    pub anchor: String,
    #[serde(default = "default_context_window")]
    pub context_window: usize,
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

/// Validated, immutable description of one patch run.
///
/// Every constructor validates, so a `PatchConfig` in hand always has a
/// non-empty target, a non-empty anchor, a file path and a positive context
/// window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    name: String,
    description: Option<String>,
    file: PathBuf,
    target: String,
    replacement: String,
    anchor: String,
    context_window: usize,
}

impl PatchConfig {
    /// Build a config in code with the default context window.
    pub fn new(
        file: impl Into<PathBuf>,
        target: impl Into<String>,
        replacement: impl Into<String>,
        anchor: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            name: String::new(),
            description: None,
            file: file.into(),
            target: target.into(),
            replacement: replacement.into(),
            anchor: anchor.into(),
            context_window: DEFAULT_CONTEXT_WINDOW,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Point the patch at a different file.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Result<Self, ValidationError> {
        self.file = file.into();
        self.validate()?;
        Ok(self)
    }

    pub fn with_context_window(mut self, chars: usize) -> Result<Self, ValidationError> {
        self.context_window = chars;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.file.as_os_str().is_empty() {
            issues.push(ValidationIssue::MissingField { field: "file" });
        }
        if self.target.is_empty() {
            issues.push(ValidationIssue::MissingField { field: "target" });
        }
        if self.anchor.is_empty() {
            issues.push(ValidationIssue::MissingField { field: "anchor" });
        }
        if self.context_window == 0 {
            issues.push(ValidationIssue::InvalidValue {
                field: "context_window",
                message: "must be at least 1 character".to_string(),
            });
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Display name, falling back to the file name for unnamed patches.
    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            self.file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("patch")
        } else {
            &self.name
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    /// Whether a successful run can match again on the patched output.
    pub fn reapplies(&self) -> bool {
        self.replacement.contains(&self.target)
    }
}

impl TryFrom<PatchDefinition> for PatchConfig {
    type Error = ValidationError;

    fn try_from(definition: PatchDefinition) -> Result<Self, Self::Error> {
        let PatchDefinition { meta, patch } = definition;
        let config = Self {
            name: meta.name.trim().to_string(),
            description: meta.description,
            file: PathBuf::from(patch.file.trim()),
            target: patch.target,
            replacement: patch.replacement,
            anchor: patch.anchor,
            context_window: patch.context_window,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingField {
        field: &'static str,
    },
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => {
                write!(f, "patch missing required field '{field}'")
            }
            ValidationIssue::InvalidValue { field, message } => {
                write!(f, "patch field '{field}' {message}")
            }
        }
    }
}
