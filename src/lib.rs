//! mysql-confd: MySQL option file renderer
//!
//! A library for rendering `conf.d` option files from ordered settings
//! and declaring the restart and ordering relationships each file has
//! with the rest of a configuration-management run.
//!
//! - [`settings`]: ordered, validated section/key/value input
//! - [`render`]: pure rendering of one option file
//! - [`graph`]: explicit dependency graph of rendered files
//! - [`apply`]: writing rendered files with change detection
//! - [`config`]: CLI and TOML configuration

pub mod apply;
pub mod config;
pub mod graph;
pub mod render;
pub mod settings;
