//! Option file rendering.
//!
//! [`ConfigRenderer`] turns a title, [`Settings`] and a notify flag into a
//! [`RenderedConfig`]: the target path, the file content, and the edges the
//! file declares towards its collaborators.
//!
//! Rendering is a pure function of its inputs. Nothing is written to disk
//! and nothing is registered globally; see [`crate::apply`] and
//! [`crate::graph`] for those concerns.
//!
//! # Output Format
//!
//! ```text
//! # ***   This file is managed by Puppet    ***
//! # *** Automatically generated, don't edit ***
//!
//! [mysqld]
//! bind-address = 0.0.0.0
//!
//! ```

mod path;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use path::{MAX_TITLE_LEN, PathError, config_path, validate_title};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::defaults;
use crate::graph::{Edge, ResourceRef};
use crate::settings::{Settings, ValidationError};

/// Error type for a failed render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The settings are malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The title cannot be turned into a file path.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// A single option file the caller wants rendered.
///
/// Mirrors the shape of a `[[config]]` entry in the definitions file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDefinition {
    /// Base name of the rendered file
    pub title: String,

    /// Sections and options to write
    #[serde(default)]
    pub settings: Settings,

    /// Whether a change should notify the restart action
    #[serde(default = "defaults::notify_service")]
    pub notify_service: bool,
}

impl ConfigDefinition {
    /// Creates a definition that notifies the restart action.
    #[must_use]
    pub fn new(title: impl Into<String>, settings: Settings) -> Self {
        Self {
            title: title.into(),
            settings,
            notify_service: defaults::NOTIFY_SERVICE,
        }
    }

    /// Sets the notify flag.
    #[must_use]
    pub const fn with_notify_service(mut self, notify_service: bool) -> Self {
        self.notify_service = notify_service;
        self
    }
}

/// Locations and names of the renderer's collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererOptions {
    /// Directory rendered files are placed in
    pub conf_dir: PathBuf,
    /// Base option file every rendered file requires
    pub base_config: PathBuf,
    /// Restart action notified on change
    pub restart_exec: String,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            conf_dir: defaults::conf_dir(),
            base_config: defaults::base_config(),
            restart_exec: defaults::RESTART_EXEC.to_string(),
        }
    }
}

/// Desired state of one rendered option file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedConfig {
    /// Title the file was rendered for
    pub title: String,
    /// Absolute path of the file
    pub path: PathBuf,
    /// Full file content
    pub content: String,
    /// Action refreshed when the file changes, if any
    pub notify: Option<ResourceRef>,
    /// Resource that must be applied before the file
    pub require: ResourceRef,
}

impl RenderedConfig {
    /// Returns the file resource this artifact manages.
    #[must_use]
    pub fn resource(&self) -> ResourceRef {
        ResourceRef::File(self.path.clone())
    }

    /// Returns the declared edges: always a require, plus a notify when enabled.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        let source = self.resource();
        let mut edges = vec![Edge::require(source.clone(), self.require.clone())];
        if let Some(ref target) = self.notify {
            edges.push(Edge::notify(source, target.clone()));
        }
        edges
    }
}

/// Renders option files against a fixed set of collaborators.
///
/// # Examples
///
/// ```
/// use mysql_confd::render::ConfigRenderer;
/// use mysql_confd::settings::Settings;
///
/// let settings = Settings::new().with_section("mysqld", [("bind-address", "0.0.0.0")]);
/// let rendered = ConfigRenderer::default()
///     .render("test_config", &settings, true)
///     .unwrap();
///
/// assert_eq!(rendered.path.to_str(), Some("/etc/mysql/conf.d/test_config.cnf"));
/// assert!(rendered.content.ends_with("[mysqld]\nbind-address = 0.0.0.0\n\n"));
/// assert_eq!(rendered.notify.unwrap().to_string(), "Exec[mysqld-restart]");
/// assert_eq!(rendered.require.to_string(), "File[/etc/mysql/my.cnf]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigRenderer {
    options: RendererOptions,
}

impl ConfigRenderer {
    /// Creates a renderer with custom collaborators.
    #[must_use]
    pub const fn new(options: RendererOptions) -> Self {
        Self { options }
    }

    /// Returns the renderer's options.
    #[must_use]
    pub const fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Renders one option file.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is not a safe file name or the
    /// settings cannot be written verbatim. Nothing is produced on error.
    pub fn render(
        &self,
        title: &str,
        settings: &Settings,
        notify_service: bool,
    ) -> Result<RenderedConfig, RenderError> {
        let path = config_path(&self.options.conf_dir, title)?;
        settings.validate()?;

        if settings.is_empty() {
            tracing::warn!("No settings for '{title}', rendering header only");
        }

        let notify = notify_service.then(|| ResourceRef::exec(&self.options.restart_exec));

        Ok(RenderedConfig {
            title: title.to_string(),
            path,
            content: render_content(settings),
            notify,
            require: ResourceRef::file(&self.options.base_config),
        })
    }

    /// Renders a [`ConfigDefinition`].
    ///
    /// # Errors
    ///
    /// See [`ConfigRenderer::render`].
    pub fn render_definition(
        &self,
        definition: &ConfigDefinition,
    ) -> Result<RenderedConfig, RenderError> {
        self.render(
            &definition.title,
            &definition.settings,
            definition.notify_service,
        )
    }
}

/// Produces the option file text: disclaimer, blank line, then each section
/// followed by a blank line.
///
/// Assumes `settings` already passed [`Settings::validate`].
#[must_use]
pub fn render_content(settings: &Settings) -> String {
    let mut out = String::new();

    for line in defaults::DISCLAIMER {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    for (name, section) in settings.iter() {
        tracing::debug!("Rendering [{name}] with {} option(s)", section.len());

        out.push('[');
        out.push_str(name);
        out.push_str("]\n");
        for (key, value) in section.iter() {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}
