//! Generic adjacency-set directed graph.
//!
//! # Design
//!
//! - **Opaque node ids**: the graph is generic over any `Eq + Hash + Clone`
//!   key. Build-unit ids are normalized path strings, not dense integers, so
//!   the adjacency structure is a hash map of hash sets rather than an
//!   index-addressed arena.
//! - **Closure invariant**: every node that appears anywhere — as an edge
//!   source *or* target — has its own key in the map, with an empty
//!   successor set if nothing points out of it. [`DirectedGraph::add`]
//!   maintains this; every traversal relies on it.
//! - **Builder then analyze**: callers accumulate edges with `add`, then
//!   treat the graph as immutable input to [`invert`](DirectedGraph::invert),
//!   [`topo_sort`](DirectedGraph::topo_sort), and friends. There is no
//!   concurrent mutation; the whole pipeline is single-threaded.
//!
//! Missing-node lookups that the closure invariant rules out are contract
//! violations and fail loudly (see [`GraphError::MissingNode`]); they are
//! never treated as an implicit empty successor set.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use crate::error::GraphError;

/// A directed graph stored as `node → set of successors`.
///
/// Edge sets are unordered and deduplicated; inserting the same edge twice
/// is a no-op. Self-loops are representable (and detected by
/// [`is_cyclic`](Self::is_cyclic)), but cyclic graphs fail topological
/// ordering and must be rejected before longest-path analysis.
#[derive(Debug, Clone)]
pub struct DirectedGraph<T> {
    edges: HashMap<T, HashSet<T>>,
}

impl<T: Eq + Hash> PartialEq for DirectedGraph<T> {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl<T: Eq + Hash> Eq for DirectedGraph<T> {}

impl<T> Default for DirectedGraph<T> {
    fn default() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }
}

impl<T> DirectedGraph<T>
where
    T: Eq + Hash + Clone + fmt::Debug,
{
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node`, with an empty successor set if it is new.
    pub fn add_node(&mut self, node: T) {
        self.edges.entry(node).or_default();
    }

    /// Insert edges from `from` to every node in `to`, with union semantics.
    ///
    /// Every target (and `from` itself) is registered as a node, keeping the
    /// graph closed over its own nodes. Passing an empty iterator registers
    /// `from` alone. Repeated calls with the same arguments leave the graph
    /// unchanged.
    pub fn add(&mut self, from: T, to: impl IntoIterator<Item = T>) {
        for target in to {
            self.edges.entry(target.clone()).or_default();
            self.edges.entry(from.clone()).or_default().insert(target);
        }
        self.edges.entry(from).or_default();
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(HashSet::len).sum()
    }

    /// `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// `true` if `node` is registered in the graph.
    #[must_use]
    pub fn contains(&self, node: &T) -> bool {
        self.edges.contains_key(node)
    }

    /// Iterate over all registered nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.keys()
    }

    /// The successor set of `node`.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingNode`] if `node` is not registered — a contract
    /// violation, since the closure invariant guarantees every referenced
    /// node has an entry.
    pub fn successors(&self, node: &T) -> Result<&HashSet<T>, GraphError> {
        self.edges
            .get(node)
            .ok_or_else(|| GraphError::missing_node(node))
    }

    /// Return a new graph with every edge reversed.
    ///
    /// Isolated nodes are preserved. The receiver is not mutated.
    #[must_use]
    pub fn invert(&self) -> Self {
        let mut inverted = Self::new();
        for (node, successors) in &self.edges {
            inverted.add_node(node.clone());
            for successor in successors {
                inverted.add(successor.clone(), [node.clone()]);
            }
        }
        inverted
    }

    /// In-degree of every node. Nodes with no incoming edges are included
    /// with a count of zero.
    #[must_use]
    pub fn indegrees(&self) -> HashMap<T, usize> {
        let mut degrees: HashMap<T, usize> =
            self.edges.keys().map(|node| (node.clone(), 0)).collect();
        for successors in self.edges.values() {
            for successor in successors {
                // Closure invariant: every successor is already keyed.
                *degrees.entry(successor.clone()).or_insert(0) += 1;
            }
        }
        degrees
    }

    /// `true` iff the graph contains at least one cycle, including
    /// self-loops and cycles in components unreachable from any given start.
    ///
    /// Every node is tried as a walk start; nodes fully explored by an
    /// earlier walk are skipped, so each node and edge is visited once
    /// overall. A cycle is reported when a walk re-enters a node that is
    /// still on its own path — re-convergent edges to already-explored
    /// nodes (diamonds) are not cycles.
    ///
    /// # Panics
    ///
    /// Panics if the closure invariant is violated (an edge targets an
    /// unregistered node). That is a defect in graph construction.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        enum Step<'a, T> {
            Enter(&'a T),
            Leave(&'a T),
        }

        let mut explored: HashSet<&T> = HashSet::new();
        for start in self.edges.keys() {
            if explored.contains(start) {
                continue;
            }

            let mut on_path: HashSet<&T> = HashSet::new();
            let mut stack = vec![Step::Enter(start)];
            while let Some(step) = stack.pop() {
                match step {
                    Step::Enter(node) => {
                        if on_path.contains(node) {
                            return true; // walk re-entered its own path
                        }
                        if explored.contains(node) {
                            continue;
                        }
                        on_path.insert(node);
                        stack.push(Step::Leave(node));
                        let successors = self
                            .edges
                            .get(node)
                            .expect("closure invariant: edge target must be registered");
                        for successor in successors {
                            stack.push(Step::Enter(successor));
                        }
                    }
                    Step::Leave(node) => {
                        on_path.remove(node);
                        explored.insert(node);
                    }
                }
            }
        }
        false
    }

    /// Topological ordering via Kahn's algorithm.
    ///
    /// Which source is dequeued first when several have in-degree zero is
    /// implementation-defined; callers may rely only on the partial order
    /// (every edge points from an earlier to a later position), never on a
    /// specific tie-break.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NoSource`] if no node has in-degree zero (cyclic or
    ///   empty graph).
    /// - [`GraphError::Cycle`] if the ordering comes up shorter than the
    ///   node count — a residual cycle. The partial ordering is never
    ///   returned silently.
    pub fn topo_sort(&self) -> Result<Vec<T>, GraphError> {
        let mut indegrees = self.indegrees();
        let mut sources: Vec<T> = indegrees
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(node, _)| node.clone())
            .collect();
        if sources.is_empty() {
            return Err(GraphError::NoSource);
        }

        let mut ordering = Vec::with_capacity(self.edges.len());
        while let Some(node) = sources.pop() {
            for successor in self.successors(&node)? {
                let degree = indegrees
                    .get_mut(successor)
                    .ok_or_else(|| GraphError::missing_node(successor))?;
                *degree -= 1;
                if *degree == 0 {
                    sources.push(successor.clone());
                }
            }
            ordering.push(node);
        }

        if ordering.len() < self.edges.len() {
            return Err(GraphError::Cycle {
                ordered: ordering.len(),
                total: self.edges.len(),
            });
        }
        Ok(ordering)
    }

    /// Breadth-first reachability closure from `start`, following outgoing
    /// edges. The result includes `start` itself.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingNode`] if `start` (or, on invariant breach, any
    /// reached node) is not registered.
    pub fn walk(&self, start: &T) -> Result<HashSet<T>, GraphError> {
        let mut seen: HashSet<T> = HashSet::new();
        let mut to_visit: VecDeque<T> = VecDeque::from([start.clone()]);
        while let Some(node) = to_visit.pop_front() {
            for successor in self.successors(&node)? {
                if !seen.contains(successor) {
                    to_visit.push_back(successor.clone());
                }
            }
            seen.insert(node);
        }
        Ok(seen)
    }

    /// Restrict the graph to the nodes in `keep`, dropping every edge whose
    /// source or target falls outside the set.
    #[must_use]
    pub fn subgraph(&self, keep: &HashSet<T>) -> Self {
        let mut sub = Self::new();
        for (node, successors) in &self.edges {
            if !keep.contains(node) {
                continue;
            }
            sub.add(
                node.clone(),
                successors
                    .iter()
                    .filter(|successor| keep.contains(*successor))
                    .cloned(),
            );
        }
        sub
    }
}

impl<T> DirectedGraph<T>
where
    T: Eq + Hash + Clone + fmt::Debug + fmt::Display,
{
    /// Render the graph as Graphviz DOT text, nodes and edges sorted for
    /// stable output. Debugging aid only; nothing parses this back.
    #[must_use]
    pub fn to_graphviz(&self) -> String {
        use std::fmt::Write as _;

        let mut nodes: Vec<&T> = self.edges.keys().collect();
        nodes.sort_by_key(|node| node.to_string());

        let mut out = String::from("digraph G {\n");
        for node in nodes {
            let _ = writeln!(out, "  \"{node}\"");
            let mut successors: Vec<String> =
                self.edges[node].iter().map(ToString::to_string).collect();
            successors.sort();
            for successor in successors {
                let _ = writeln!(out, "  \"{node}\" -> \"{successor}\"");
            }
        }
        out.push_str("}\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
