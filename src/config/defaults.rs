//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

use std::path::PathBuf;

/// Directory holding rendered option files.
pub const CONF_DIR: &str = "/etc/mysql/conf.d";

/// Base option file every rendered file is ordered after.
pub const BASE_CONFIG: &str = "/etc/mysql/my.cnf";

/// Name of the restart action notified when a rendered file changes.
pub const RESTART_EXEC: &str = "mysqld-restart";

/// Extension of rendered option files (without the dot).
pub const CONFIG_EXTENSION: &str = "cnf";

/// Whether rendered files notify the restart action unless told otherwise.
pub const NOTIFY_SERVICE: bool = true;

/// Header written at the top of every rendered file.
pub const DISCLAIMER: [&str; 2] = [
    "# ***   This file is managed by Puppet    ***",
    "# *** Automatically generated, don't edit ***",
];

/// Default path of the definitions file written by `init`.
pub const CONFIG_FILE: &str = "mysql-confd.toml";

/// Default directory of rendered option files as a path.
#[must_use]
pub fn conf_dir() -> PathBuf {
    PathBuf::from(CONF_DIR)
}

/// Default base option file as a path.
#[must_use]
pub fn base_config() -> PathBuf {
    PathBuf::from(BASE_CONFIG)
}

/// Default notify flag, for serde.
#[must_use]
pub const fn notify_service() -> bool {
    NOTIFY_SERVICE
}
