//! Command execution logic.
//!
//! Renders every configured definition, collects the results into a
//! dependency graph, and then prints, reports, or writes them depending
//! on the subcommand.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use mysql_confd::apply::{ApplyError, FileSink};
use mysql_confd::config::{Command, OutputFormat, ValidatedConfig};
use mysql_confd::graph::{DependencyGraph, GraphError, ResourceRef};
use mysql_confd::render::{ConfigRenderer, RenderError, RenderedConfig};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A definition could not be rendered.
    #[error("Failed to render '{title}': {source}")]
    Render {
        /// Title of the failed definition
        title: String,
        /// Underlying render error
        #[source]
        source: RenderError,
    },

    /// The rendered files do not form a valid graph.
    #[error("Invalid resource graph: {0}")]
    Graph(#[from] GraphError),

    /// A rendered file could not be written.
    #[error("Failed to apply: {0}")]
    Apply(#[from] ApplyError),

    /// JSON output could not be produced.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RunError {
    /// Returns true if the error stems from invalid input rather than the environment.
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Render { .. } | Self::Graph(_))
    }
}

/// Outcome of the apply command.
#[derive(Debug, Default)]
struct ApplySummary {
    changed: Vec<ResourceRef>,
    unchanged: usize,
    refresh: Vec<ResourceRef>,
}

impl fmt::Display for ApplySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed, {} unchanged, {} refresh(es)",
            self.changed.len(),
            self.unchanged,
            self.refresh.len()
        )
    }
}

/// Executes a subcommand against the validated configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Any definition fails to render (nothing is printed or written)
/// - The resource graph has duplicates or cycles
/// - Writing a file fails (apply only)
pub fn execute(config: &ValidatedConfig, command: &Command) -> Result<(), RunError> {
    let renderer = ConfigRenderer::new(config.renderer.clone());
    let rendered = render_all(&renderer, config)?;
    let graph = build_graph(&rendered)?;

    match command {
        Command::Render { format } => print!("{}", render_report(&rendered, *format)?),
        Command::Graph => print!("{}", graph_report(&graph)?),
        Command::Apply { root, dry_run } => {
            let summary = apply_all(&rendered, &graph, root, *dry_run)?;
            tracing::info!("Apply finished: {summary}");
        }
        Command::Init { .. } => tracing::debug!("init is handled before configuration loading"),
    }

    Ok(())
}

fn render_all(
    renderer: &ConfigRenderer,
    config: &ValidatedConfig,
) -> Result<Vec<RenderedConfig>, RunError> {
    tracing::debug!(
        "Rendering {} definition(s) into {}",
        config.definitions.len(),
        renderer.options().conf_dir.display()
    );
    config
        .definitions
        .iter()
        .map(|definition| {
            renderer
                .render_definition(definition)
                .map_err(|source| RunError::Render {
                    title: definition.title.clone(),
                    source,
                })
        })
        .collect()
}

fn build_graph(rendered: &[RenderedConfig]) -> Result<DependencyGraph, RunError> {
    let mut graph = DependencyGraph::new();
    for config in rendered {
        graph.declare(config)?;
    }
    for resource in graph.resources().filter(|r| !graph.is_declared(r)) {
        tracing::debug!("{resource} is managed elsewhere");
    }
    Ok(graph)
}

/// Formats rendered files for stdout.
fn render_report(rendered: &[RenderedConfig], format: OutputFormat) -> Result<String, RunError> {
    match format {
        OutputFormat::Text => Ok(rendered
            .iter()
            .map(|config| format!("==> {} <==\n{}", config.path.display(), config.content))
            .collect()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rendered)? + "\n"),
    }
}

/// Formats the edges and apply order for stdout.
fn graph_report(graph: &DependencyGraph) -> Result<String, RunError> {
    let order = graph.apply_order()?;

    let mut out = String::from("Relationships:\n");
    for edge in graph.edges() {
        out.push_str(&format!("  {edge}\n"));
    }

    out.push_str("Apply order:\n");
    for (i, resource) in order.iter().enumerate() {
        out.push_str(&format!("  {}. {resource}\n", i + 1));
    }

    Ok(out)
}

/// Writes rendered files in apply order and collects the actions to refresh.
///
/// Refreshes are only reported; running them belongs to the surrounding system.
fn apply_all(
    rendered: &[RenderedConfig],
    graph: &DependencyGraph,
    root: &Path,
    dry_run: bool,
) -> Result<ApplySummary, RunError> {
    let sink = FileSink::new(root).with_dry_run(dry_run);
    tracing::info!("Applying {} file(s) below {}", rendered.len(), sink.root().display());
    if dry_run {
        tracing::info!("Dry-run mode enabled - files will be compared but not written");
    }

    let mut summary = ApplySummary::default();
    for resource in graph.apply_order()? {
        let Some(config) = rendered.iter().find(|c| c.resource() == resource) else {
            continue;
        };

        let outcome = sink.write(config)?;
        if outcome.is_changed() {
            tracing::info!("{resource}: {outcome:?}");
            summary.changed.push(resource);
        } else {
            tracing::debug!("{resource}: unchanged");
            summary.unchanged += 1;
        }
    }

    summary.refresh = graph.refresh_targets(&summary.changed);
    for target in &summary.refresh {
        if dry_run {
            tracing::info!("Would notify {target}");
        } else {
            tracing::info!("Notify {target}");
        }
    }

    Ok(summary)
}
