//! Resource references and relationship edges.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// Reference to a resource managed by the surrounding configuration system.
///
/// Displays in the canonical `Type[title]` form, e.g. `File[/etc/mysql/my.cnf]`
/// or `Exec[mysqld-restart]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    /// A managed file, identified by its absolute path.
    File(PathBuf),
    /// A named executable action.
    Exec(String),
}

impl ResourceRef {
    /// Creates a file reference.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Creates an exec reference.
    #[must_use]
    pub fn exec(name: impl Into<String>) -> Self {
        Self::Exec(name.into())
    }

    /// Returns the resource type name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "File",
            Self::Exec(_) => "Exec",
        }
    }

    /// Returns the file path for file references.
    #[must_use]
    pub fn as_file(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Exec(_) => None,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "File[{}]", path.display()),
            Self::Exec(name) => write!(f, "Exec[{name}]"),
        }
    }
}

impl Serialize for ResourceRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Kind of relationship between two resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// The target must be applied before the source.
    Require,
    /// The source is applied before the target, and a change to the
    /// source triggers a refresh of the target.
    Notify,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Require => write!(f, "require"),
            Self::Notify => write!(f, "notify"),
        }
    }
}

/// Declarative edge from a resource to one of its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    /// Resource declaring the relationship
    pub source: ResourceRef,
    /// Relationship kind
    pub relationship: Relationship,
    /// Collaborator the relationship points at
    pub target: ResourceRef,
}

impl Edge {
    /// Creates a require edge: `target` is applied before `source`.
    #[must_use]
    pub const fn require(source: ResourceRef, target: ResourceRef) -> Self {
        Self {
            source,
            relationship: Relationship::Require,
            target,
        }
    }

    /// Creates a notify edge: `source` is applied before `target` and refreshes it.
    #[must_use]
    pub const fn notify(source: ResourceRef, target: ResourceRef) -> Self {
        Self {
            source,
            relationship: Relationship::Notify,
            target,
        }
    }

    /// Returns `(before, after)` in apply order.
    #[must_use]
    pub const fn ordering(&self) -> (&ResourceRef, &ResourceRef) {
        match self.relationship {
            Relationship::Require => (&self.target, &self.source),
            Relationship::Notify => (&self.source, &self.target),
        }
    }
}

impl fmt::Display for Edge {
    /// Uses chaining arrows: `->` for ordering, `~>` for notification.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (before, after) = self.ordering();
        let arrow = match self.relationship {
            Relationship::Require => "->",
            Relationship::Notify => "~>",
        };
        write!(f, "{before} {arrow} {after}")
    }
}
