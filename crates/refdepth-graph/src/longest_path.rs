//! Longest dependency chain per node, by topological-order DP.
//!
//! # Overview
//!
//! Input is a DAG whose edges run **prerequisite → dependent**: an edge
//! `c → b` means `b` must be built after `c`. (Graph assembly produces the
//! opposite orientation, `project → its references`, and inverts once before
//! handing the graph here.)
//!
//! Construction inverts the input once more, recovering `node → its direct
//! prerequisites`, then walks the input in topological order. By the time a
//! node is visited, every one of its prerequisites already carries a
//! finalized length, so a single pass of
//! `len(p) = 1 + max(len(q) for q in prereqs(p))` suffices; a node with no
//! prerequisites has length 1. Lengths count nodes, so they equal the number
//! of sequential build steps the chain forces.
//!
//! Both derived structures are computed eagerly at construction and never
//! mutated; the finder is a throwaway query object for one analysis session.
//!
//! Cyclic input is rejected by the topological sort during construction.
//! Querying a node the finder never saw is a contract violation, reported as
//! [`GraphError::MissingNode`], never a silent empty result.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::error::GraphError;
use crate::graph::DirectedGraph;

/// Per-node longest-chain lengths over a DAG, with path reconstruction.
#[derive(Debug, Clone)]
pub struct LongestPathFinder<T> {
    /// `node → its direct prerequisites` (the input graph, inverted).
    prereqs: DirectedGraph<T>,
    /// `node → length of the longest prerequisite chain ending at it`,
    /// counting the node itself. Always ≥ 1.
    lengths: HashMap<T, usize>,
}

impl<T> LongestPathFinder<T>
where
    T: Eq + Hash + Clone + fmt::Debug,
{
    /// Analyze `graph` (edges prerequisite → dependent) and record every
    /// node's longest-chain length.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NoSource`] / [`GraphError::Cycle`] when the input is
    ///   cyclic (or empty) — malformed input the caller should report.
    /// - [`GraphError::MissingNode`] on a closure-invariant breach — a
    ///   defect in graph construction.
    pub fn new(graph: &DirectedGraph<T>) -> Result<Self, GraphError> {
        let prereqs = graph.invert();
        let order = graph.topo_sort()?;

        let mut lengths: HashMap<T, usize> = HashMap::with_capacity(order.len());
        for node in order {
            let mut longest_prereq = 0;
            for prereq in prereqs.successors(&node)? {
                // Topological order guarantees prereq was finalized already;
                // a miss here is an invariant breach.
                let len = lengths
                    .get(prereq)
                    .copied()
                    .ok_or_else(|| GraphError::missing_node(prereq))?;
                longest_prereq = longest_prereq.max(len);
            }
            lengths.insert(node, longest_prereq + 1);
        }

        debug!(nodes = lengths.len(), "longest-chain lengths computed");
        Ok(Self { prereqs, lengths })
    }

    /// Every node's longest-chain length. Lengths are ≥ 1; a node with no
    /// prerequisites has length 1.
    #[must_use]
    pub const fn lengths(&self) -> &HashMap<T, usize> {
        &self.lengths
    }

    /// Longest-chain length for one node.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingNode`] if `node` was not part of the analyzed
    /// graph — a contract violation, not an empty result.
    pub fn length_of(&self, node: &T) -> Result<usize, GraphError> {
        self.lengths
            .get(node)
            .copied()
            .ok_or_else(|| GraphError::missing_node(node))
    }

    /// Reconstruct the longest chain in the whole graph.
    ///
    /// When several chains share the maximum length, which one is returned
    /// is arbitrary.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSource`] if the finder tracks no nodes. Construction
    /// rejects empty graphs, so this cannot happen for a finder obtained
    /// from [`LongestPathFinder::new`].
    pub fn longest_path(&self) -> Result<Vec<T>, GraphError> {
        let terminal = self
            .lengths
            .iter()
            .max_by_key(|&(_, &len)| len)
            .map(|(node, _)| node)
            .ok_or(GraphError::NoSource)?;
        self.longest_path_ending_with(terminal)
    }

    /// Reconstruct one longest chain ending at `terminal`.
    ///
    /// Greedy traceback: step to the prerequisite with the greatest recorded
    /// length until a node with no prerequisites is reached. The result is
    /// ordered from `terminal` back to the chain's root, includes both ends,
    /// and its length equals [`length_of(terminal)`](Self::length_of). Ties
    /// among equally long prerequisites break arbitrarily.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingNode`] if `terminal` (or, on invariant breach,
    /// any node reached during traceback) is untracked.
    pub fn longest_path_ending_with(&self, terminal: &T) -> Result<Vec<T>, GraphError> {
        if !self.lengths.contains_key(terminal) {
            return Err(GraphError::missing_node(terminal));
        }

        let mut path = vec![terminal.clone()];
        let mut current = terminal;
        loop {
            let mut deepest: Option<(&T, usize)> = None;
            for prereq in self.prereqs.successors(current)? {
                let len = self.length_of(prereq)?;
                if deepest.is_none_or(|(_, best)| len > best) {
                    deepest = Some((prereq, len));
                }
            }
            match deepest {
                Some((next, _)) => {
                    path.push(next.clone());
                    current = next;
                }
                None => break,
            }
        }
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
