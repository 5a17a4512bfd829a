//! Dependency graph of declared resources.
//!
//! The renderer never registers anything globally. It returns a
//! [`RenderedConfig`] carrying its edges, and callers collect those into an
//! explicit [`DependencyGraph`] value.
//!
//! # Ordering
//!
//! - `require`: the target is applied before the declaring resource
//! - `notify`: the declaring resource is applied before the target, and a
//!   change to it refreshes the target
//!
//! [`DependencyGraph::apply_order`] is a topological sort over both kinds.
//! Ties are broken by declaration order, so the result is deterministic.

mod resource;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use resource::{Edge, Relationship, ResourceRef};

use indexmap::IndexSet;
use thiserror::Error;

use crate::render::RenderedConfig;

/// Errors raised while building or ordering the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The same resource was declared twice.
    #[error("Duplicate declaration of {0}")]
    DuplicateResource(ResourceRef),

    /// The ordering edges form a cycle.
    #[error("Dependency cycle detected among: {}", format_refs(.0))]
    Cycle(Vec<ResourceRef>),
}

fn format_refs(refs: &[ResourceRef]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collection of declared resources and the edges between them.
///
/// Resources referenced only as edge targets (the base option file, the
/// restart action) are tracked as nodes but not as declarations; any number
/// of rendered files may point at them.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    declared: IndexSet<ResourceRef>,
    nodes: IndexSet<ResourceRef>,
    edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rendered file and its edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateResource`] if a file with the same
    /// path was already declared. The graph is left unchanged.
    pub fn declare(&mut self, rendered: &RenderedConfig) -> Result<(), GraphError> {
        let resource = rendered.resource();
        if !self.declared.insert(resource.clone()) {
            return Err(GraphError::DuplicateResource(resource));
        }

        for edge in rendered.edges() {
            self.nodes.insert(edge.target.clone());
        }
        self.nodes.insert(resource);
        self.edges.extend(rendered.edges());
        Ok(())
    }

    /// Returns all edges in declaration order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterates over every known resource in first-seen order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceRef> {
        self.nodes.iter()
    }

    /// Returns true if the resource was declared (not merely referenced).
    #[must_use]
    pub fn is_declared(&self, resource: &ResourceRef) -> bool {
        self.declared.contains(resource)
    }

    /// Returns the number of known resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the resources `resource` requires.
    #[must_use]
    pub fn requires_of(&self, resource: &ResourceRef) -> Vec<&ResourceRef> {
        self.targets_of(resource, Relationship::Require)
    }

    /// Returns the resources `resource` notifies.
    #[must_use]
    pub fn notifies_of(&self, resource: &ResourceRef) -> Vec<&ResourceRef> {
        self.targets_of(resource, Relationship::Notify)
    }

    fn targets_of(&self, resource: &ResourceRef, relationship: Relationship) -> Vec<&ResourceRef> {
        self.edges
            .iter()
            .filter(|e| e.relationship == relationship && &e.source == resource)
            .map(|e| &e.target)
            .collect()
    }

    /// Returns the resources in an order that honors every edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] with the unorderable resources if the
    /// edges form a cycle.
    pub fn apply_order(&self) -> Result<Vec<ResourceRef>, GraphError> {
        let n = self.nodes.len();
        let mut indegree = vec![0usize; n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];

        for edge in &self.edges {
            let (before, after) = edge.ordering();
            let (Some(b), Some(a)) = (self.nodes.get_index_of(before), self.nodes.get_index_of(after))
            else {
                continue;
            };
            successors[b].push(a);
            indegree[a] += 1;
        }

        let mut placed = vec![false; n];
        let mut order = Vec::with_capacity(n);

        // Always take the earliest-declared ready node to keep ties stable.
        while let Some(next) = (0..n).find(|&i| !placed[i] && indegree[i] == 0) {
            placed[next] = true;
            order.push(self.nodes[next].clone());
            for &succ in &successors[next] {
                indegree[succ] -= 1;
            }
        }

        if order.len() < n {
            let stuck = (0..n)
                .filter(|&i| !placed[i])
                .map(|i| self.nodes[i].clone())
                .collect();
            return Err(GraphError::Cycle(stuck));
        }

        Ok(order)
    }

    /// Returns the actions to refresh after the given resources changed.
    ///
    /// Each target appears once, in the order its first notify edge was declared.
    #[must_use]
    pub fn refresh_targets(&self, changed: &[ResourceRef]) -> Vec<ResourceRef> {
        let targets: IndexSet<&ResourceRef> = self
            .edges
            .iter()
            .filter(|e| e.relationship == Relationship::Notify && changed.contains(&e.source))
            .map(|e| &e.target)
            .collect();

        targets.into_iter().cloned().collect()
    }
}
