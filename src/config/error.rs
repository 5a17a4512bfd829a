//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::settings::ValidationError;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the definitions file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML definitions.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// A `--setting` flag is not in `section/key=value` form.
    #[error("Invalid setting '{value}': {reason}")]
    InvalidSetting {
        /// The raw flag value
        value: String,
        /// Reason for invalidity
        reason: &'static str,
    },

    /// The settings of a definition are malformed.
    #[error("Invalid settings for '{title}': {source}")]
    InvalidDefinition {
        /// Title of the offending definition
        title: String,
        /// Underlying validation error
        #[source]
        source: ValidationError,
    },

    /// Two definitions share a title.
    #[error("Duplicate definition for title '{0}'")]
    DuplicateTitle(String),

    /// A collaborator path is not absolute.
    #[error("Invalid path for {field} '{}': must be absolute", path.display())]
    RelativePath {
        /// Name of the field
        field: &'static str,
        /// The rejected path
        path: PathBuf,
    },

    /// The restart action name is empty.
    #[error("Restart action name must not be empty")]
    EmptyRestartExec,
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// At least one definition (TOML `[[config]]` or `--title`).
    pub const DEFINITIONS: &str = "config";
    /// The title of a CLI-built definition.
    pub const TITLE: &str = "title";
    /// The configuration directory.
    pub const CONF_DIR: &str = "conf_dir";
    /// The base option file.
    pub const BASE_CONFIG: &str = "base_config";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
