//! Property tests for mwcs-preprocess: reductions are lossless on random
//! small instances.

use std::collections::BTreeSet;

use proptest::prelude::*;

use mwcs_preprocess::{GraphState, OrigNode, OriginalGraph, PreNode, Scheduler};

/// Build a working graph over `n{i}` nodes; self-loops are skipped and
/// repeated edges collapse.
fn build_state(scores: &[i32], edges: &[(usize, usize)]) -> GraphState {
    let mut builder = OriginalGraph::builder();
    let nodes: Vec<OrigNode> = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| builder.add_node(&format!("n{i}"), f64::from(s)).unwrap())
        .collect();
    for &(a, b) in edges {
        if a != b {
            builder.add_edge(nodes[a], nodes[b]).unwrap();
        }
    }
    GraphState::new(builder.build())
}

fn is_connected<N: Copy + Ord>(set: &BTreeSet<N>, adjacent: &impl Fn(N, N) -> bool) -> bool {
    let Some(&start) = set.iter().next() else {
        return true;
    };
    let mut seen = BTreeSet::from([start]);
    let mut stack = vec![start];
    while let Some(u) = stack.pop() {
        for &w in set {
            if !seen.contains(&w) && adjacent(u, w) {
                seen.insert(w);
                stack.push(w);
            }
        }
    }
    seen.len() == set.len()
}

/// Best connected selection containing `required`, by enumeration. The empty
/// selection (score 0) counts only when nothing is required.
fn best_connected<N: Copy + Ord>(
    nodes: &[N],
    score: impl Fn(N) -> f64,
    adjacent: impl Fn(N, N) -> bool,
    required: &BTreeSet<N>,
) -> (f64, BTreeSet<N>) {
    let mut best: Option<(f64, BTreeSet<N>)> = required.is_empty().then(|| (0.0, BTreeSet::new()));
    for mask in 1u32..(1 << nodes.len()) {
        let chosen: BTreeSet<N> = (0..nodes.len())
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| nodes[i])
            .collect();
        if !required.is_subset(&chosen) || !is_connected(&chosen, &adjacent) {
            continue;
        }
        let total: f64 = chosen.iter().map(|&n| score(n)).sum();
        if best.as_ref().map_or(true, |(b, _)| total > *b) {
            best = Some((total, chosen));
        }
    }
    best.expect("a required node is always a feasible selection on its own")
}

fn original_optimum(state: &GraphState, roots: &BTreeSet<OrigNode>) -> f64 {
    let original = state.original();
    let nodes: Vec<OrigNode> = original.nodes().collect();
    best_connected(&nodes, |o| original.score(o), |a, b| original.has_edge(a, b), roots).0
}

fn reduced_optimum(state: &GraphState, roots: &BTreeSet<PreNode>) -> (f64, BTreeSet<PreNode>) {
    let nodes: Vec<PreNode> = state.pre_nodes().collect();
    best_connected(
        &nodes,
        |p| state.score(p),
        |a, b| state.find_edge(a, b).is_some(),
        roots,
    )
}

// Random instance: up to 8 nodes, integer scores in [-5, 5], sparse edges.
fn instance_strategy() -> impl Strategy<Value = (Vec<i32>, Vec<(usize, usize)>)> {
    (1_usize..=8).prop_flat_map(|n| {
        (
            prop::collection::vec(-5_i32..=5, n),
            prop::collection::vec((0..n, 0..n), 0..n * 2),
        )
    })
}

/// Run the default layout with verification and return (pre, original) roots.
fn reduce(
    state: &mut GraphState,
    root: Option<usize>,
) -> (BTreeSet<PreNode>, BTreeSet<OrigNode>) {
    let roots: BTreeSet<PreNode> = root
        .map(|r| state.pre_nodes_by_label(&format!("n{r}")))
        .unwrap_or_default();
    let orig_roots: BTreeSet<OrigNode> = state.expand(roots.iter().copied());
    Scheduler::default()
        .with_verification(true)
        .preprocess(state, &roots);
    (roots, orig_roots)
}

// =============================================================================
// Optimum preservation
// =============================================================================
proptest! {
    #[test]
    fn reduction_preserves_the_optimum(
        (scores, edges) in instance_strategy(),
        root in prop::option::of(0_usize..8),
    ) {
        let root = root.map(|r| r % scores.len());
        let mut state = build_state(&scores, &edges);

        let (roots, orig_roots) = reduce(&mut state, root);
        let before = original_optimum(&state, &orig_roots);
        let (after, best) = reduced_optimum(&state, &roots);

        prop_assert!(
            (before - after).abs() < 1e-9,
            "optimum changed: original {before}, reduced {after}"
        );

        // The reduced solution maps back onto a connected original subgraph
        // with the same score.
        let expanded = state.expand(best.iter().copied());
        let original = state.original();
        prop_assert!(is_connected(&expanded, &|a: OrigNode, b: OrigNode| original.has_edge(a, b)));
        prop_assert!(orig_roots.is_subset(&expanded));
        let lifted: f64 = expanded.iter().map(|&o| original.score(o)).sum();
        prop_assert!((lifted - after).abs() < 1e-9);
    }
}

// =============================================================================
// Structural soundness
// =============================================================================
proptest! {
    #[test]
    fn reduction_keeps_roots_and_conserves_score(
        (scores, edges) in instance_strategy(),
        root in prop::option::of(0_usize..8),
    ) {
        let root = root.map(|r| r % scores.len());
        let mut state = build_state(&scores, &edges);
        let initial = state.node_count();

        let (roots, _) = reduce(&mut state, root);

        prop_assert!(state.check_invariants().is_ok());
        for &r in &roots {
            prop_assert!(state.contains(r));
        }
        let accounted = state.total_score() + state.eliminated_score();
        prop_assert!((accounted - state.original().total_score()).abs() < 1e-9);
        prop_assert!(state.node_count() <= initial);
    }
}

proptest! {
    #[test]
    fn reduction_reaches_a_fixed_point(
        (scores, edges) in instance_strategy(),
        root in prop::option::of(0_usize..8),
    ) {
        let root = root.map(|r| r % scores.len());
        let mut state = build_state(&scores, &edges);

        let (roots, _) = reduce(&mut state, root);
        let counts = state.counts();
        let again = Scheduler::default().preprocess(&mut state, &roots);

        prop_assert_eq!(again.eliminated, 0);
        prop_assert_eq!(state.counts(), counts);
    }
}
