//! Ordered option-file settings.
//!
//! This module provides:
//! - [`Settings`]: ordered mapping of section name to [`Section`]
//! - [`Section`]: ordered mapping of option key to option value
//! - [`ValidationError`]: rejection of malformed settings input
//!
//! # Ordering
//!
//! Both levels keep insertion order. The rendered option file lists sections
//! and keys exactly as they were given; nothing is sorted.
//!
//! # Accepted Input
//!
//! Loosely typed input (JSON or TOML tables) goes through
//! [`Settings::from_value`], which enforces the `{section: {key: value}}`
//! shape. Strings are kept verbatim; integers, floats and booleans are
//! stringified. Arrays, nested tables and null are rejected.
//!
//! Names and values are never escaped or quoted. Anything that cannot be
//! written on a single INI line is rejected instead:
//! - section names: non-empty, no `[`, `]` or line breaks
//! - keys: non-empty, no `=` or line breaks, no leading `[`, `#` or `;`
//! - values: no line breaks

mod error;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use error::ValidationError;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options of a single `[section]`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Section {
    options: IndexMap<String, String>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, keeping the original position if the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    /// Returns the value of an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if the section has no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Section
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut section = Self::new();
        for (key, value) in iter {
            section.insert(key, value);
        }
        section
    }
}

/// Ordered mapping of section names to their options.
///
/// Deserializes from any self-describing format through
/// [`Settings::from_value`], so shape errors surface as
/// [`ValidationError`]s at the boundary.
///
/// # Examples
///
/// ```
/// use mysql_confd::settings::Settings;
///
/// let settings = Settings::new()
///     .with_section("mysqld", [("bind-address", "0.0.0.0"), ("port", "3306")])
///     .with_section("client", [("socket", "/run/mysqld/mysqld.sock")]);
///
/// let names: Vec<_> = settings.iter().map(|(name, _)| name).collect();
/// assert_eq!(names, ["mysqld", "client"]);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    #[serde(deserialize_with = "deserialize_sections")]
    sections: IndexMap<String, Section>,
}

impl Settings {
    /// Creates empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section built from `(key, value)` pairs.
    ///
    /// Replaces the options of an existing section with the same name
    /// while keeping its position.
    #[must_use]
    pub fn with_section<I, K, V>(mut self, name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.sections
            .insert(name.into(), options.into_iter().collect());
        self
    }

    /// Sets a single option, creating the section on first use.
    pub fn insert(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key, value);
    }

    /// Returns a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Iterates over `(name, section)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// Returns the number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if there are no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Builds settings from loosely typed input.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The value is not an object of objects
    /// - An option value is an array, object or null
    /// - A name or value fails the single-line checks
    ///
    /// `serde_json` has no representation for non-finite floats, so a TOML
    /// `nan` or `inf` reaches this function as null and is rejected with it.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let Value::Object(sections) = value else {
            return Err(ValidationError::NotAMapping {
                found: json_type(value),
            });
        };

        let mut settings = Self::new();
        for (name, options) in sections {
            let Value::Object(options) = options else {
                return Err(ValidationError::SectionNotAMapping {
                    section: name.clone(),
                    found: json_type(options),
                });
            };

            let mut section = Section::new();
            for (key, value) in options {
                section.insert(key.clone(), scalar_to_string(name, key, value)?);
            }
            settings.sections.insert(name.clone(), section);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every name and value can be written verbatim.
    ///
    /// # Errors
    ///
    /// Returns the first offending section name, key or value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, section) in &self.sections {
            validate_section_name(name)?;
            for (key, value) in section.iter() {
                validate_key(name, key)?;
                validate_value(name, key, value)?;
            }
        }
        Ok(())
    }
}

impl TryFrom<&Value> for Settings {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn deserialize_sections<'de, D>(deserializer: D) -> Result<IndexMap<String, Section>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Settings::from_value(&value)
        .map(|settings| settings.sections)
        .map_err(serde::de::Error::custom)
}

fn scalar_to_string(section: &str, key: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(ValidationError::UnsupportedValue {
            section: section.to_string(),
            key: key.to_string(),
            found: "null (or a non-finite float such as nan or inf)",
        }),
        Value::Array(_) | Value::Object(_) => {
            Err(ValidationError::UnsupportedValue {
                section: section.to_string(),
                key: key.to_string(),
                found: json_type(value),
            })
        }
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

fn validate_section_name(name: &str) -> Result<(), ValidationError> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.trim() != name {
        "must not have leading or trailing whitespace"
    } else if name.contains(['[', ']']) {
        "must not contain brackets"
    } else if has_line_break(name) {
        "must not contain line breaks"
    } else {
        return Ok(());
    };

    Err(ValidationError::InvalidSectionName {
        section: name.to_string(),
        reason,
    })
}

fn validate_key(section: &str, key: &str) -> Result<(), ValidationError> {
    let reason = if key.is_empty() {
        "must not be empty"
    } else if key.trim() != key {
        "must not have leading or trailing whitespace"
    } else if key.contains('=') {
        "must not contain '='"
    } else if has_line_break(key) {
        "must not contain line breaks"
    } else if key.starts_with(['[', '#', ';']) {
        "must not start with '[', '#' or ';'"
    } else {
        return Ok(());
    };

    Err(ValidationError::InvalidKey {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    })
}

fn validate_value(section: &str, key: &str, value: &str) -> Result<(), ValidationError> {
    if has_line_break(value) {
        return Err(ValidationError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            reason: "must not contain line breaks",
        });
    }
    Ok(())
}
