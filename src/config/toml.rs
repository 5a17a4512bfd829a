//! TOML definitions file parsing.
//!
//! Defines the structure of the definitions file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::render::ConfigDefinition;

use super::ConfigError;

/// Root structure of the definitions file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Renderer collaborators section
    #[serde(default)]
    pub renderer: RendererSection,

    /// Option files to render, in declaration order
    #[serde(default)]
    pub config: Vec<ConfigDefinition>,
}

/// Renderer collaborators section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererSection {
    /// Directory rendered files are placed in
    pub conf_dir: Option<PathBuf>,

    /// Base option file every rendered file requires
    pub base_config: Option<PathBuf>,

    /// Name of the restart action notified on change
    pub restart_exec: Option<String>,
}

impl TomlConfig {
    /// Loads definitions from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses definitions from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a definition's settings
    /// do not have the `{section: {key: value}}` shape.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default definitions file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# mysql-confd definitions file
#
# Each [[config]] entry renders <conf_dir>/<title>.cnf.
# Sections and keys are written in the order they appear here.

[renderer]
# Directory rendered files are placed in (default: /etc/mysql/conf.d)
# conf_dir = "/etc/mysql/conf.d"

# Base option file every rendered file is ordered after (default: /etc/mysql/my.cnf)
# base_config = "/etc/mysql/my.cnf"

# Restart action notified when a rendered file changes (default: mysqld-restart)
# restart_exec = "mysqld-restart"

[[config]]
# Base name of the rendered file (letters, digits, '_', '.', '-')
title = "bind_address"

# Notify the restart action on change (default: true)
# notify_service = true

[config.settings.mysqld]
bind-address = "0.0.0.0"
# Integers, floats and booleans are written as-is
# port = 3306
"#
    .to_string()
}
