//! Configuration layer for mysql-confd.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML definitions file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Definitions file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Renderer collaborators (`conf_dir`, `base_config`, `restart_exec`) are
//! resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file** - the `[renderer]` section
//! 3. **Built-in defaults**
//!
//! # Definitions
//!
//! Definitions come from `[[config]]` entries in the TOML file, plus at
//! most one definition built from `--title` and `--setting` flags. The CLI
//! definition replaces a TOML entry with the same title in place; otherwise
//! it is appended. `--no-notify` only affects the CLI definition.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{ConfigError, field};
pub use toml::{RendererSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
