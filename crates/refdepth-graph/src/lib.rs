//! refdepth-graph: the analysis core behind `refdepth`.
//!
//! # Overview
//!
//! A TypeScript workspace built with project references compiles projects in
//! dependency order, so the longest chain of prerequisite builds lower-bounds
//! the achievable build latency no matter how wide the build farm is. This
//! crate holds the two pieces with actual algorithmic content:
//!
//! - [`DirectedGraph`] — a generic adjacency-set graph (hash map of hash
//!   sets) with inversion, cycle detection, Kahn topological ordering,
//!   reachability walks, and subgraph extraction.
//! - [`LongestPathFinder`] — topological-order dynamic programming over a
//!   DAG that records, for every node, the length of the longest prerequisite
//!   chain ending at it, and reconstructs one such chain on demand.
//!
//! Everything is pure in-memory computation: no I/O, no async, no shared
//! mutable state. The graph is built once per invocation, analyzed, and
//! dropped.
//!
//! # Conventions
//!
//! - **Errors**: fallible operations return [`GraphError`]. Variants split
//!   into contract violations (caller defects, see
//!   [`GraphError::is_defect`]) and malformed input the caller can report.
//! - **Logging**: `tracing` macros (`debug!`, `trace!`) on the hot analysis
//!   paths; no output formatting lives here.

#![forbid(unsafe_code)]

pub mod error;
pub mod graph;
pub mod longest_path;

pub use error::GraphError;
pub use graph::DirectedGraph;
pub use longest_path::LongestPathFinder;
