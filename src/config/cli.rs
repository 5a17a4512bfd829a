//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use super::defaults;

/// mysql-confd: MySQL option file renderer
///
/// Renders `conf.d` option files from ordered settings and reports
/// the restart and ordering relationships each file declares.
#[derive(Debug, Parser)]
#[command(name = "mysql-confd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: render)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to TOML definitions file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Title of a definition built from the command line
    #[arg(long, global = true)]
    pub title: Option<String>,

    /// Option in 'section/key=value' format (can be specified multiple times)
    #[arg(long = "setting", value_name = "SECTION/KEY=VALUE", global = true)]
    pub settings: Vec<String>,

    /// Do not notify the restart action for the command-line definition
    #[arg(long = "no-notify", global = true)]
    pub no_notify: bool,

    /// Directory rendered files are placed in
    #[arg(long = "conf-dir", global = true)]
    pub conf_dir: Option<PathBuf>,

    /// Base option file every rendered file requires
    #[arg(long = "base-config", global = true)]
    pub base_config: Option<PathBuf>,

    /// Name of the restart action notified on change
    #[arg(long = "restart-exec", global = true)]
    pub restart_exec: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for mysql-confd
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print rendered option files
    Render {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print declared relationships and the apply order
    Graph,

    /// Write rendered option files below a root directory
    Apply {
        /// Directory the absolute target paths are placed under
        #[arg(long)]
        root: PathBuf,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a default definitions file
    Init {
        /// Output path for the definitions file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Output format for the render command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// File content, each preceded by a path banner
    #[value(name = "text")]
    Text,
    /// Rendered artifacts as a JSON array
    #[value(name = "json")]
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns the subcommand, defaulting to `render --format text`.
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Render {
            format: OutputFormat::Text,
        })
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
