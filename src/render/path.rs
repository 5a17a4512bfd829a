//! Title to file path derivation.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::defaults;

/// Longest title accepted, leaving room for the extension in a 255-byte file name.
pub const MAX_TITLE_LEN: usize = 250;

static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*$").expect("title pattern is valid")
});

/// Error type for titles that cannot become a file name.
///
/// Titles are rejected rather than sanitized, so two different titles
/// can never collapse onto the same file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The title is empty.
    #[error("Title must not be empty")]
    Empty,

    /// The title is longer than [`MAX_TITLE_LEN`] bytes.
    #[error("Title '{title}' is {len} bytes long, maximum is {max}", max = MAX_TITLE_LEN)]
    TooLong {
        /// The rejected title
        title: String,
        /// Its length in bytes
        len: usize,
    },

    /// The title contains characters outside `[A-Za-z0-9_.-]` or starts with `.`/`-`.
    #[error("Title '{title}' may only contain letters, digits, '_', '.' and '-' and must not start with '.' or '-'")]
    InvalidCharacters {
        /// The rejected title
        title: String,
    },

    /// The title contains a `..` sequence.
    #[error("Title '{title}' must not contain '..'")]
    Traversal {
        /// The rejected title
        title: String,
    },
}

/// Checks that a title can be used as a file base name.
///
/// # Errors
///
/// Returns a [`PathError`] describing the first violated rule.
pub fn validate_title(title: &str) -> Result<(), PathError> {
    if title.is_empty() {
        return Err(PathError::Empty);
    }

    if title.len() > MAX_TITLE_LEN {
        return Err(PathError::TooLong {
            title: title.to_string(),
            len: title.len(),
        });
    }

    if title.contains("..") {
        return Err(PathError::Traversal {
            title: title.to_string(),
        });
    }

    if !TITLE_PATTERN.is_match(title) {
        return Err(PathError::InvalidCharacters {
            title: title.to_string(),
        });
    }

    Ok(())
}

/// Derives `<conf_dir>/<title>.cnf`.
///
/// # Errors
///
/// Returns an error if the title is not a safe file base name.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use mysql_confd::render::config_path;
///
/// let path = config_path(Path::new("/etc/mysql/conf.d"), "test_config").unwrap();
/// assert_eq!(path, Path::new("/etc/mysql/conf.d/test_config.cnf"));
/// ```
pub fn config_path(conf_dir: &Path, title: &str) -> Result<PathBuf, PathError> {
    validate_title(title)?;
    Ok(conf_dir.join(format!("{title}.{}", defaults::CONFIG_EXTENSION)))
}
