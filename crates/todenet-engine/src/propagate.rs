//! The activation propagation computation.

use std::collections::HashMap;

use todenet_graph::{Graph, NodeId};

use crate::config::PropagationConfig;
use crate::error::Result;

/// Spread commit values through the graph, overwriting every node's
/// `activation`.
///
/// The computation is a synchronous (Jacobi-style) fixed-point iteration:
/// within a round, every edge reads its source's activation as it stood at
/// the *start* of the round, and all increments are applied together at the
/// end. Propagation order among nodes therefore cannot bias the result - an
/// A->B and B->A pair in the same round both see pre-round state.
///
/// Each round, every edge `source -> target` with weight `w` contributes
///
/// ```text
/// w * (source.commit + source.activation * rate) / iterations
/// ```
///
/// to the target, and every node unconditionally receives
/// `commit / iterations` from itself. The divisions keep the result's scale
/// independent of the round count, and the self term means a node with no
/// incoming edges lands exactly on its own commit.
///
/// Activations are reset to zero up front, so a run depends only on the
/// current commit/link snapshot and the configuration, never on history.
/// Edges whose target id matches no node are skipped silently. Nothing but
/// `activation` is mutated, and on `Err` nothing is mutated at all.
///
/// Runtime is O(iterations x edges) on the calling thread; the caller is
/// responsible for not starting two runs over the same graph at once.
pub fn propagate(graph: &mut Graph, config: &PropagationConfig) -> Result<()> {
    config.validate()?;

    let iterations = f64::from(config.iterations);
    let rate = config.rate;

    for node in graph.nodes_mut() {
        node.activation = 0.0;
    }

    // One accumulator per node id. Doubles as the existence check that
    // drops edges pointing at deleted nodes.
    let mut increments: HashMap<NodeId, f64> =
        graph.iter().map(|n| (n.id.clone(), 0.0)).collect();

    for _ in 0..config.iterations {
        for value in increments.values_mut() {
            *value = 0.0;
        }

        for source in graph.iter() {
            let outflow = source.commit + source.activation * rate;
            for (target, &weight) in &source.links {
                if let Some(acc) = increments.get_mut(target) {
                    *acc += f64::from(weight) * outflow / iterations;
                }
            }
        }

        for node in graph.nodes_mut() {
            let increment = increments.get(&node.id).copied().unwrap_or(0.0);
            node.activation += increment + node.commit / iterations;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;
    use todenet_graph::Node;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= TOLERANCE * scale,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn activation(graph: &Graph, id: &str) -> f64 {
        graph.node(&id.into()).unwrap().activation
    }

    /// The three-node scenario from the original board's seed data:
    /// A(50) -> B w1, B(30) -> A w2, C(80) -> A w1.
    fn seed_graph() -> Graph {
        Graph::from_nodes([
            Node::new("a", "A").with_commit(50.0).with_link("b", 1),
            Node::new("b", "B").with_commit(30.0).with_link("a", 2),
            Node::new("c", "C").with_commit(80.0).with_link("a", 1),
        ])
        .unwrap()
    }

    #[test]
    fn golden_three_node_scenario() {
        let mut graph = seed_graph();
        propagate(&mut graph, &PropagationConfig::new(3, 0.2)).unwrap();

        // Worked by hand, round by round, with rate 1/5:
        //   round 1: a = 190/3, b = 80/3, c = 80/3
        //   round 2: a = 132,   b = 518/9, c = 160/3
        //   round 3: a = 27886/135, b = 4186/45, c = 80
        assert_close(activation(&graph, "a"), 27886.0 / 135.0);
        assert_close(activation(&graph, "b"), 4186.0 / 45.0);
        assert_close(activation(&graph, "c"), 80.0);
    }

    #[test]
    fn isolated_node_reaches_exactly_its_commit() {
        for iterations in 1..=10 {
            for rate in [0.0, 0.01, 0.2, 1.5] {
                let mut graph =
                    Graph::from_nodes([Node::new("solo", "Solo").with_commit(50.0)]).unwrap();
                propagate(&mut graph, &PropagationConfig::new(iterations, rate)).unwrap();
                assert_close(activation(&graph, "solo"), 50.0);
            }
        }
    }

    #[test]
    fn no_incoming_edges_still_lands_on_commit() {
        // C links out but nothing links to C; its own outflow must not
        // disturb its self-contribution.
        let mut graph = seed_graph();
        propagate(&mut graph, &PropagationConfig::new(3, 0.2)).unwrap();
        assert_close(activation(&graph, "c"), 80.0);
    }

    #[test]
    fn rerun_is_idempotent() {
        let config = PropagationConfig::new(3, 0.2);

        let mut graph = seed_graph();
        propagate(&mut graph, &config).unwrap();
        let first: Vec<f64> = graph.iter().map(|n| n.activation).collect();

        propagate(&mut graph, &config).unwrap();
        let second: Vec<f64> = graph.iter().map(|n| n.activation).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn dangling_edge_is_ignored() {
        let config = PropagationConfig::new(3, 0.2);

        let mut with_dangling = seed_graph();
        with_dangling
            .set_link(&"a".into(), &"deleted".into(), 3)
            .unwrap();
        propagate(&mut with_dangling, &config).unwrap();

        let mut without = seed_graph();
        propagate(&mut without, &config).unwrap();

        for node in without.iter() {
            assert_eq!(node.activation, activation(&with_dangling, node.id.as_str()));
        }
    }

    #[test]
    fn zero_iterations_leaves_activation_untouched() {
        let mut graph = seed_graph();
        // Sentinel values that a (forbidden) reset would wipe.
        for node in graph.nodes_mut() {
            node.activation = -1.0;
        }

        let err = propagate(&mut graph, &PropagationConfig::new(0, 0.2)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        for node in graph.iter() {
            assert_eq!(node.activation, -1.0);
        }
    }

    #[test]
    fn non_finite_rate_leaves_activation_untouched() {
        let mut graph = seed_graph();
        for node in graph.nodes_mut() {
            node.activation = -1.0;
        }

        let err = propagate(&mut graph, &PropagationConfig::new(3, f64::NAN)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        for node in graph.iter() {
            assert_eq!(node.activation, -1.0);
        }
    }

    #[test]
    fn only_activation_is_mutated() {
        let mut graph = seed_graph();
        let before: Vec<_> = graph
            .iter()
            .map(|n| (n.id.clone(), n.commit, n.links.clone()))
            .collect();

        propagate(&mut graph, &PropagationConfig::new(3, 0.2)).unwrap();

        let after: Vec<_> = graph
            .iter()
            .map(|n| (n.id.clone(), n.commit, n.links.clone()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn self_loop_feeds_back_without_crashing() {
        // The editing surface refuses self-loops, but loaded data may carry
        // one. With one round: increment = commit, then + commit self term.
        let mut node = Node::new("loop", "Loop").with_commit(10.0);
        node.links.insert("loop".into(), 1);
        let mut graph = Graph::from_nodes([node]).unwrap();

        propagate(&mut graph, &PropagationConfig::new(1, 0.5)).unwrap();
        assert_close(activation(&graph, "loop"), 20.0);
    }

    #[test]
    fn empty_graph_is_not_an_error() {
        let mut graph = Graph::new();
        propagate(&mut graph, &PropagationConfig::default()).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn negative_commit_contributes_negatively() {
        let mut graph =
            Graph::from_nodes([Node::new("debt", "Debt").with_commit(-5.0)]).unwrap();
        propagate(&mut graph, &PropagationConfig::new(4, 0.2)).unwrap();
        assert_close(activation(&graph, "debt"), -5.0);
    }

    proptest! {
        /// Doubling a single edge's weight exactly doubles that edge's
        /// contribution to the target. The source has no incoming edges, so
        /// its trajectory is independent of the weight under test.
        #[test]
        fn doubling_weight_doubles_contribution(
            commit_a in 0.0..1000.0f64,
            commit_b in 0.0..1000.0f64,
            weight in 1u32..100,
            iterations in 1u32..8,
            rate in 0.0..1.0f64,
        ) {
            let run = |w: u32| {
                let mut graph = Graph::from_nodes([
                    Node::new("a", "A").with_commit(commit_a).with_link("b", w),
                    Node::new("b", "B").with_commit(commit_b),
                ])
                .unwrap();
                propagate(&mut graph, &PropagationConfig::new(iterations, rate)).unwrap();
                graph.node(&"b".into()).unwrap().activation
            };

            // B's own share is exactly its commit; the rest came over the edge.
            let single = run(weight) - commit_b;
            let doubled = run(weight * 2) - commit_b;

            let scale = single.abs().max(1.0);
            prop_assert!((doubled - 2.0 * single).abs() <= 1e-9 * scale);
        }

        /// Any linkless node converges to its own commit, whatever the
        /// configuration.
        #[test]
        fn linkless_node_converges_to_commit(
            commit in -1000.0..1000.0f64,
            iterations in 1u32..20,
            rate in 0.0..2.0f64,
        ) {
            let mut graph =
                Graph::from_nodes([Node::new("n", "N").with_commit(commit)]).unwrap();
            propagate(&mut graph, &PropagationConfig::new(iterations, rate)).unwrap();

            let activation = graph.node(&"n".into()).unwrap().activation;
            let scale = commit.abs().max(1.0);
            prop_assert!((activation - commit).abs() <= 1e-9 * scale);
        }
    }
}
