//! Error types for settings validation.

use thiserror::Error;

/// Error type for malformed settings input.
///
/// Raised before anything is rendered, so a failed validation never
/// produces a partial option file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The top-level settings value is not a mapping of sections.
    #[error("Settings must be a mapping of sections, found {found}")]
    NotAMapping {
        /// JSON type name of the rejected value
        found: &'static str,
    },

    /// A section's value is not a mapping of options.
    #[error("Section '{section}' must be a mapping of options, found {found}")]
    SectionNotAMapping {
        /// Section name
        section: String,
        /// JSON type name of the rejected value
        found: &'static str,
    },

    /// An option value is not a scalar.
    #[error("Option '{key}' in section '{section}' has unsupported value type {found}")]
    UnsupportedValue {
        /// Section name
        section: String,
        /// Option key
        key: String,
        /// JSON type name of the rejected value
        found: &'static str,
    },

    /// A section name cannot be written as an INI header.
    #[error("Invalid section name '{section}': {reason}")]
    InvalidSectionName {
        /// The rejected section name
        section: String,
        /// Reason for invalidity
        reason: &'static str,
    },

    /// An option key cannot be written as an INI key.
    #[error("Invalid option key '{key}' in section '{section}': {reason}")]
    InvalidKey {
        /// Section name
        section: String,
        /// The rejected key
        key: String,
        /// Reason for invalidity
        reason: &'static str,
    },

    /// An option value cannot be written on a single INI line.
    #[error("Invalid value for option '{key}' in section '{section}': {reason}")]
    InvalidValue {
        /// Section name
        section: String,
        /// Option key
        key: String,
        /// Reason for invalidity
        reason: &'static str,
    },
}
