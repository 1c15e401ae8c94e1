pub mod loader;
pub mod schema;

pub use loader::{builtin, load_from_path, load_from_str, ConfigError, BUILTIN_DEFINITION};
pub use schema::{
    Metadata, PatchConfig, PatchDefinition, PatchSpec, ValidationError, ValidationIssue,
    DEFAULT_CONTEXT_WINDOW,
};
