//! Property tests for the graph core, cross-checked against petgraph.
//!
//! DAGs are generated by only ever drawing edges from a lower index to a
//! higher one, so acyclicity holds by construction. Cycle properties then
//! perturb those DAGs with a deliberate back-edge.
//!
//! Paths are asserted by length and edge-validity, not by exact node
//! sequence: tie-breaking in source selection and traceback is arbitrary by
//! contract.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;

use refdepth_graph::{DirectedGraph, GraphError, LongestPathFinder};

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// A random DAG: node count plus forward-only edges (`from < to`).
fn arb_dag() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2_usize..24).prop_flat_map(|n| {
        let edge = (0..n - 1).prop_flat_map(move |from| {
            ((from + 1)..n).prop_map(move |to| (from, to))
        });
        (Just(n), prop::collection::vec(edge, 0..64))
    })
}

/// A random DAG guaranteed to contain at least one edge.
fn arb_dag_with_edge() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    arb_dag().prop_filter("needs at least one edge", |(_, edges)| !edges.is_empty())
}

fn build_graph(n: usize, edges: &[(usize, usize)]) -> DirectedGraph<usize> {
    let mut g = DirectedGraph::new();
    for node in 0..n {
        g.add_node(node);
    }
    for &(from, to) in edges {
        g.add(from, [to]);
    }
    g
}

/// Independent recomputation of per-node chain lengths using petgraph.
///
/// Orientation matches the finder's input: edges run prerequisite →
/// dependent, so a node's chain extends through its `Incoming` neighbors.
fn oracle_lengths(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut pg = DiGraph::<usize, ()>::new();
    let indices: Vec<NodeIndex> = (0..n).map(|node| pg.add_node(node)).collect();
    for &(from, to) in edges {
        pg.update_edge(indices[from], indices[to], ());
    }

    let order = toposort(&pg, None).expect("forward-only edges cannot cycle");
    let mut lengths = vec![0_usize; n];
    for v in order {
        let deepest_prereq = pg
            .neighbors_directed(v, Direction::Incoming)
            .map(|p| lengths[p.index()])
            .max()
            .unwrap_or(0);
        lengths[v.index()] = deepest_prereq + 1;
    }
    lengths
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn topo_sort_is_complete_and_respects_edges((n, edges) in arb_dag()) {
        let g = build_graph(n, &edges);
        let order = g.topo_sort().expect("DAG by construction");
        prop_assert_eq!(order.len(), g.node_count());

        let position: HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(at, &node)| (node, at))
            .collect();
        for (from, to) in edges {
            prop_assert!(position[&from] < position[&to], "edge {}→{} out of order", from, to);
        }
    }

    #[test]
    fn dags_are_never_cyclic((n, edges) in arb_dag()) {
        prop_assert!(!build_graph(n, &edges).is_cyclic());
    }

    #[test]
    fn double_inversion_is_identity((n, edges) in arb_dag()) {
        let g = build_graph(n, &edges);
        prop_assert_eq!(g.invert().invert(), g);
    }

    #[test]
    fn indegrees_sum_to_edge_count((n, edges) in arb_dag()) {
        let g = build_graph(n, &edges);
        let degrees = g.indegrees();
        prop_assert_eq!(degrees.len(), g.node_count());
        prop_assert_eq!(degrees.values().sum::<usize>(), g.edge_count());
    }

    #[test]
    fn lengths_match_petgraph_oracle((n, edges) in arb_dag()) {
        let g = build_graph(n, &edges);
        let finder = LongestPathFinder::new(&g).expect("DAG by construction");
        let expected = oracle_lengths(n, &edges);
        for node in 0..n {
            prop_assert_eq!(
                finder.length_of(&node).expect("tracked"),
                expected[node],
                "length mismatch at node {}", node
            );
        }
    }

    #[test]
    fn reconstructed_paths_are_edge_valid((n, edges) in arb_dag()) {
        let g = build_graph(n, &edges);
        let finder = LongestPathFinder::new(&g).expect("DAG by construction");
        let inverted = g.invert();
        for node in 0..n {
            let path = finder.longest_path_ending_with(&node).expect("tracked");
            prop_assert_eq!(path.len(), finder.length_of(&node).expect("tracked"));
            prop_assert_eq!(path[0], node);
            // Each step goes to a direct prerequisite of the previous node.
            for pair in path.windows(2) {
                prop_assert!(
                    inverted.successors(&pair[0]).expect("tracked").contains(&pair[1]),
                    "{} is not a prerequisite of {}", pair[1], pair[0]
                );
            }
        }
    }

    #[test]
    fn global_longest_path_has_maximum_length((n, edges) in arb_dag()) {
        let g = build_graph(n, &edges);
        let finder = LongestPathFinder::new(&g).expect("DAG by construction");
        let longest = finder.longest_path().expect("non-empty graph");
        let max_len = finder.lengths().values().copied().max().expect("non-empty");
        prop_assert_eq!(longest.len(), max_len);
    }

    #[test]
    fn back_edge_makes_the_graph_cyclic(
        (n, edges) in arb_dag_with_edge(),
        pick in any::<prop::sample::Index>(),
    ) {
        let (from, to) = edges[pick.index(edges.len())];
        let mut g = build_graph(n, &edges);
        g.add(to, [from]); // closes a 2-cycle with the existing from→to

        prop_assert!(g.is_cyclic());
        match g.topo_sort() {
            Err(GraphError::NoSource | GraphError::Cycle { .. }) => {}
            other => prop_assert!(false, "cyclic graph must fail topo_sort, got {:?}", other),
        }
    }

    #[test]
    fn self_loop_is_always_detected((n, edges) in arb_dag(), pick in any::<prop::sample::Index>()) {
        let mut g = build_graph(n, &edges);
        let node = pick.index(n);
        g.add(node, [node]);
        prop_assert!(g.is_cyclic());
    }

    #[test]
    fn walk_agrees_with_oracle_reachability((n, edges) in arb_dag(), pick in any::<prop::sample::Index>()) {
        let g = build_graph(n, &edges);
        let start = pick.index(n);
        let reached = g.walk(&start).expect("registered start");
        prop_assert!(reached.contains(&start));

        // Brute-force closure over the raw edge list.
        let mut expected: HashSet<usize> = HashSet::from([start]);
        loop {
            let before = expected.len();
            for &(from, to) in &edges {
                if expected.contains(&from) {
                    expected.insert(to);
                }
            }
            if expected.len() == before {
                break;
            }
        }
        prop_assert_eq!(reached, expected);
    }
}
