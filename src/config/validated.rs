//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::render::{ConfigDefinition, RendererOptions};
use crate::settings::Settings;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Renderer collaborators
    pub renderer: RendererOptions,

    /// Definitions to render, in declaration order
    pub definitions: Vec<ConfigDefinition>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let titles: Vec<&str> = self.definitions.iter().map(|d| d.title.as_str()).collect();

        write!(
            f,
            "Config {{ conf_dir: {}, base_config: {}, restart_exec: {}, definitions: [{}] }}",
            self.renderer.conf_dir.display(),
            self.renderer.base_config.display(),
            self.renderer.restart_exec,
            titles.join(", "),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values. A definition
    /// built from `--title`/`--setting` replaces a TOML definition with the
    /// same title.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No definition is given at all
    /// - `--setting` is used without `--title`, or is malformed
    /// - Two TOML definitions share a title
    /// - Settings fail validation
    /// - Collaborator paths are relative or the restart action is empty
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let renderer = Self::resolve_renderer(cli, toml)?;
        let definitions = Self::resolve_definitions(cli, toml)?;

        Ok(Self {
            renderer,
            definitions,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_renderer(cli: &Cli, toml: Option<&TomlConfig>) -> Result<RendererOptions, ConfigError> {
        let section = toml.map(|t| &t.renderer);

        // Priority: CLI explicit > TOML > default
        let conf_dir = cli
            .conf_dir
            .clone()
            .or_else(|| section.and_then(|s| s.conf_dir.clone()))
            .unwrap_or_else(defaults::conf_dir);
        require_absolute(field::CONF_DIR, &conf_dir)?;

        let base_config = cli
            .base_config
            .clone()
            .or_else(|| section.and_then(|s| s.base_config.clone()))
            .unwrap_or_else(defaults::base_config);
        require_absolute(field::BASE_CONFIG, &base_config)?;

        let restart_exec = cli
            .restart_exec
            .as_deref()
            .or_else(|| section.and_then(|s| s.restart_exec.as_deref()))
            .unwrap_or(defaults::RESTART_EXEC);
        if restart_exec.trim().is_empty() {
            return Err(ConfigError::EmptyRestartExec);
        }

        Ok(RendererOptions {
            conf_dir,
            base_config,
            restart_exec: restart_exec.to_string(),
        })
    }

    fn resolve_definitions(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<ConfigDefinition>, ConfigError> {
        let mut definitions: IndexMap<String, ConfigDefinition> = IndexMap::new();

        if let Some(toml) = toml {
            for definition in &toml.config {
                if definitions.contains_key(&definition.title) {
                    return Err(ConfigError::DuplicateTitle(definition.title.clone()));
                }
                definitions.insert(definition.title.clone(), definition.clone());
            }
        }

        // CLI definition replaces a TOML one with the same title, keeping its slot.
        if let Some(definition) = Self::cli_definition(cli)? {
            definitions.insert(definition.title.clone(), definition);
        }

        if definitions.is_empty() {
            return Err(ConfigError::missing(
                field::DEFINITIONS,
                "Use --title/--setting or add [[config]] entries to the config file",
            ));
        }

        for definition in definitions.values() {
            definition
                .settings
                .validate()
                .map_err(|e| ConfigError::InvalidDefinition {
                    title: definition.title.clone(),
                    source: e,
                })?;
        }

        Ok(definitions.into_values().collect())
    }

    fn cli_definition(cli: &Cli) -> Result<Option<ConfigDefinition>, ConfigError> {
        let Some(ref title) = cli.title else {
            if cli.settings.is_empty() {
                return Ok(None);
            }
            return Err(ConfigError::missing(
                field::TITLE,
                "--setting requires --title to name the rendered file",
            ));
        };

        let mut settings = Settings::new();
        for raw in &cli.settings {
            let (section, key, value) = parse_setting(raw)?;
            settings.insert(section, key, value);
        }

        Ok(Some(
            ConfigDefinition::new(title.clone(), settings).with_notify_service(!cli.no_notify),
        ))
    }
}

/// Writes the default definitions template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn require_absolute(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ConfigError::RelativePath {
            field,
            path: PathBuf::from(path),
        })
    }
}

/// Splits `section/key=value` at the first `=` and the first `/` before it.
///
/// Group names such as `mysqld-8.0` and keys such as `validate_password.length`
/// both contain dots, so `/` separates them.
fn parse_setting(s: &str) -> Result<(&str, &str, &str), ConfigError> {
    let invalid = |reason| ConfigError::InvalidSetting {
        value: s.to_string(),
        reason,
    };

    let (path, value) = s
        .split_once('=')
        .ok_or_else(|| invalid("expected 'section/key=value'"))?;
    let (section, key) = path
        .split_once('/')
        .ok_or_else(|| invalid("expected a '/' between section and key"))?;

    let section = section.trim();
    let key = key.trim();
    if section.is_empty() || key.is_empty() {
        return Err(invalid("section and key must not be empty"));
    }

    Ok((section, key, value.trim()))
}
