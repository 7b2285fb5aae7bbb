//! Error taxonomy for graph construction and analysis.
//!
//! Two categories, deliberately kept distinct:
//!
//! - **Contract violations** ([`GraphError::MissingNode`]): a node the
//!   closure invariant guarantees to exist was absent, or a caller queried a
//!   node the analysis never saw. These indicate a defect upstream, not a
//!   recoverable runtime condition — callers should abort, not degrade.
//! - **Malformed input** ([`GraphError::NoSource`], [`GraphError::Cycle`]):
//!   the graph is cyclic (or empty). Recoverable in the sense that the
//!   caller can report "cyclic dependency graph" instead of emitting an
//!   incorrect partial ranking.

use thiserror::Error;

/// Failure modes surfaced by [`DirectedGraph`](crate::DirectedGraph) and
/// [`LongestPathFinder`](crate::LongestPathFinder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node expected by the closure invariant (or by a finder query) is
    /// missing from the edge map. Always a caller defect.
    #[error("node {0} is missing from the graph (closure invariant violated)")]
    MissingNode(String),

    /// No node with in-degree zero exists, so a topological ordering has no
    /// valid starting point. Every non-empty DAG has at least one source, so
    /// this means the graph is cyclic or empty.
    #[error("graph has no source node (every node has incoming edges)")]
    NoSource,

    /// Kahn's algorithm ordered fewer nodes than the graph contains, which
    /// means the residue is cyclic.
    #[error("no topological ordering exists: ordered {ordered} of {total} nodes (cycle present)")]
    Cycle {
        /// Nodes successfully ordered before the algorithm stalled.
        ordered: usize,
        /// Total node count of the graph.
        total: usize,
    },
}

impl GraphError {
    /// Build a [`GraphError::MissingNode`] from any debuggable node id.
    pub(crate) fn missing_node(node: &impl std::fmt::Debug) -> Self {
        Self::MissingNode(format!("{node:?}"))
    }

    /// `true` when the error indicates a defect (invariant breach) rather
    /// than malformed input the caller can report and recover from.
    #[must_use]
    pub const fn is_defect(&self) -> bool {
        matches!(self, Self::MissingNode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::GraphError;

    #[test]
    fn missing_node_is_a_defect() {
        assert!(GraphError::missing_node(&"pkg/a").is_defect());
    }

    #[test]
    fn cycle_errors_are_reportable_not_defects() {
        assert!(!GraphError::NoSource.is_defect());
        assert!(
            !GraphError::Cycle {
                ordered: 2,
                total: 4
            }
            .is_defect()
        );
    }

    #[test]
    fn display_includes_counts() {
        let err = GraphError::Cycle {
            ordered: 3,
            total: 5,
        };
        let text = err.to_string();
        assert!(text.contains('3') && text.contains('5'), "got: {text}");
    }
}
