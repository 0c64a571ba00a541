//! Behaviour of each reduction rule in isolation.

use std::collections::BTreeSet;

use mwcs_core::config::RuleKind;
use mwcs_preprocess::rules::{
    NegBicomponent, NegCircuit, NegDeg01, NegDiamond, NegEdge, NegMirroredHubs, NegTricomponent,
    PosDeg01, PosDiamond, PosEdge,
};
use mwcs_preprocess::{build_rule, GraphState, Indices, OriginalGraph, PreNode, Rule, RuleContext};

fn build(nodes: &[(&str, f64)], edges: &[(&str, &str)]) -> GraphState {
    let mut builder = OriginalGraph::builder();
    for &(label, score) in nodes {
        builder.add_node(label, score).unwrap();
    }
    for &(a, b) in edges {
        builder.add_edge_by_label(a, b).unwrap();
    }
    GraphState::new(builder.build())
}

fn pre(state: &GraphState, label: &str) -> PreNode {
    *state.pre_nodes_by_label(label).iter().next().unwrap()
}

fn live(state: &GraphState, label: &str) -> bool {
    !state.pre_nodes_by_label(label).is_empty()
}

/// Run one pass of `rule`, then check the indices and graph bookkeeping.
fn apply(rule: &dyn Rule, state: &mut GraphState, roots: &[&str]) -> usize {
    let roots: BTreeSet<PreNode> = roots.iter().map(|l| pre(state, l)).collect();
    let mut indices = Indices::build(state);
    let mut lower_bound = state.max_score().unwrap_or(0.0).max(0.0);

    let mut ctx = RuleContext::new(state, &mut indices, &roots, &mut lower_bound);
    let eliminated = rule.apply(&mut ctx);

    indices.verify(state).unwrap();
    state.check_invariants().unwrap();
    for &root in &roots {
        assert!(state.contains(root), "{} eliminated a root", rule.name());
    }
    eliminated
}

// ---- neg_deg01 ----

#[test]
fn neg_deg01_peels_tails_and_hopeless_isolates() {
    let mut state = build(
        &[("H", 3.0), ("X", -1.0), ("Y", -2.0), ("N", -1.0), ("P", 0.5), ("Q", 2.0)],
        &[("H", "X"), ("X", "Y"), ("H", "Q")],
    );

    // Y, then X once it becomes a pendant, then the isolates N and P (below LB = 3).
    assert_eq!(apply(&NegDeg01, &mut state, &[]), 4);
    assert!(live(&state, "H") && live(&state, "Q"));
    assert_eq!(state.node_count(), 2);
}

#[test]
fn neg_deg01_drops_isolates_unreachable_from_roots() {
    let mut state = build(
        &[("R", -1.0), ("A", 2.0), ("Z", 9.0)],
        &[("R", "A")],
    );
    assert_eq!(apply(&NegDeg01, &mut state, &["R"]), 1);
    assert!(!live(&state, "Z"));
    assert!(live(&state, "R"));
}

// ---- pos_edge ----

#[test]
fn pos_edge_collapses_non_negative_runs() {
    let mut state = build(
        &[("a", 1.0), ("b", 0.0), ("c", 2.0), ("d", -1.0)],
        &[("a", "b"), ("b", "c"), ("c", "d")],
    );
    assert_eq!(apply(&PosEdge, &mut state, &[]), 2);
    assert_eq!(state.node_count(), 2);
    assert_eq!(state.pre_nodes_by_label("a"), state.pre_nodes_by_label("c"));
    assert_eq!(state.score(pre(&state, "a")), 3.0);
}

#[test]
fn pos_edge_keeps_root_handles_and_skips_root_pairs() {
    let mut state = build(
        &[("a", 1.0), ("b", 1.0), ("c", 2.0)],
        &[("a", "b"), ("b", "c")],
    );
    let (a, c) = (pre(&state, "a"), pre(&state, "c"));

    assert_eq!(apply(&PosEdge, &mut state, &["a", "c"]), 1);
    assert!(state.contains(a) && state.contains(c));
    assert!(state.find_edge(a, c).is_some());
}

// ---- neg_edge ----

#[test]
fn neg_edge_contracts_degree_two_chain() {
    let mut state = build(
        &[("A", 5.0), ("B", -1.0), ("C", -1.0), ("D", -1.0), ("E", 5.0)],
        &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")],
    );
    assert_eq!(apply(&NegEdge, &mut state, &[]), 2);

    let chain = pre(&state, "B");
    assert_eq!(state.pre_nodes_by_label("D"), BTreeSet::from([chain]));
    assert_eq!(state.score(chain), -3.0);
    assert_eq!(state.node_count(), 3);
    assert_eq!(state.edge_count(), 2);
}

#[test]
fn neg_edge_leaves_roots_alone() {
    let mut state = build(
        &[("A", 5.0), ("B", -1.0), ("C", -1.0), ("D", -1.0), ("E", 5.0)],
        &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")],
    );
    assert_eq!(apply(&NegEdge, &mut state, &["C"]), 0);
    assert_eq!(state.node_count(), 5);
}

// ---- neg_circuit ----

#[test]
fn neg_circuit_removes_triangle_and_k4_apexes() {
    let mut state = build(
        &[
            ("a", 2.0),
            ("b", 2.0),
            ("x", -1.0),
            ("p", 1.0),
            ("q", 1.0),
            ("r", 1.0),
            ("y", 0.0),
        ],
        &[
            ("a", "b"),
            ("x", "a"),
            ("x", "b"),
            ("p", "q"),
            ("q", "r"),
            ("p", "r"),
            ("y", "p"),
            ("y", "q"),
            ("y", "r"),
        ],
    );
    assert_eq!(apply(&NegCircuit, &mut state, &[]), 2);
    assert!(!live(&state, "x"));
    assert!(!live(&state, "y"));
}

#[test]
fn neg_circuit_needs_a_clique_and_a_non_root() {
    let mut state = build(
        &[("a", 2.0), ("b", 2.0), ("x", -1.0), ("t", -1.0)],
        &[("x", "a"), ("x", "b"), ("a", "t"), ("t", "b")],
    );
    // a and b are not adjacent: nothing closes a circuit.
    assert_eq!(apply(&NegCircuit, &mut state, &[]), 0);

    let mut state = build(
        &[("a", 2.0), ("b", 2.0), ("x", -1.0)],
        &[("a", "b"), ("x", "a"), ("x", "b")],
    );
    assert_eq!(apply(&NegCircuit, &mut state, &["x"]), 0);
}

// ---- neg_diamond / pos_diamond ----

fn parallel_bridges(bridges: &[(&'static str, f64)]) -> GraphState {
    let mut nodes = vec![("S", 3.0), ("T", 3.0)];
    nodes.extend_from_slice(bridges);
    let edges: Vec<(&str, &str)> = bridges
        .iter()
        .flat_map(|&(m, _)| [("S", m), (m, "T")])
        .collect();
    build(&nodes, &edges)
}

#[test]
fn neg_diamond_keeps_cheapest_bridge() {
    let mut state = parallel_bridges(&[("M1", -1.0), ("M2", -2.0), ("M3", -4.0)]);
    assert_eq!(apply(&NegDiamond, &mut state, &[]), 2);
    assert!(live(&state, "M1"));
    assert!(!live(&state, "M2") && !live(&state, "M3"));
}

#[test]
fn neg_diamond_ignores_root_bridges() {
    let mut state = parallel_bridges(&[("M1", -1.0), ("M2", -2.0), ("M3", -4.0)]);
    assert_eq!(apply(&NegDiamond, &mut state, &["M2"]), 1);
    assert!(live(&state, "M1") && live(&state, "M2"));
    assert!(!live(&state, "M3"));
}

#[test]
fn pos_diamond_drops_bridges_beaten_by_a_positive_one() {
    let mut state = parallel_bridges(&[("P", 2.0), ("M", -1.0), ("N", -3.0)]);
    assert_eq!(apply(&PosDiamond, &mut state, &[]), 2);
    assert!(live(&state, "P"));

    let mut state = parallel_bridges(&[("M", -1.0), ("N", -3.0)]);
    assert_eq!(apply(&PosDiamond, &mut state, &[]), 0);
}

// ---- pos_deg01 ----

#[test]
fn pos_deg01_folds_pendants_into_non_negative_neighbors() {
    let mut state = build(&[("h", 2.0), ("p", 1.0), ("n", -3.0)], &[("h", "p"), ("h", "n")]);
    assert_eq!(apply(&PosDeg01, &mut state, &[]), 1);
    assert_eq!(state.pre_nodes_by_label("p"), state.pre_nodes_by_label("h"));
}

#[test]
fn pos_deg01_needs_roots_to_cross_a_negative_neighbor() {
    let nodes = [("h", -2.0), ("p", 1.0), ("r", -1.0)];
    let edges = [("h", "p"), ("h", "r")];

    let mut state = build(&nodes, &edges);
    assert_eq!(apply(&PosDeg01, &mut state, &[]), 0);

    let mut state = build(&nodes, &edges);
    assert_eq!(apply(&PosDeg01, &mut state, &["r"]), 1);
    assert_eq!(state.score(pre(&state, "p")), -1.0);
}

// ---- neg_mirrored_hubs ----

fn complete_bipartite(hubs: &[(&'static str, f64)]) -> GraphState {
    let mut nodes = vec![("a", 5.0), ("b", 5.0), ("c", 5.0)];
    nodes.extend_from_slice(hubs);
    let edges: Vec<(&str, &str)> = hubs
        .iter()
        .flat_map(|&(h, _)| [("a", h), ("b", h), ("c", h)])
        .collect();
    build(&nodes, &edges)
}

#[test]
fn mirrored_hubs_keep_the_best_when_all_are_negative() {
    let mut state = complete_bipartite(&[("H1", -1.0), ("H2", -2.0), ("H3", -3.0)]);
    assert_eq!(apply(&NegMirroredHubs, &mut state, &[]), 2);
    assert!(live(&state, "H1"));
}

#[test]
fn mirrored_hubs_defer_to_a_positive_twin() {
    let mut state = complete_bipartite(&[("H1", -1.0), ("H2", -2.0), ("H3", -3.0), ("H4", 1.0)]);
    assert_eq!(apply(&NegMirroredHubs, &mut state, &[]), 3);
    assert!(live(&state, "H4"));
    assert_eq!(state.node_count(), 4);
}

#[test]
fn mirrored_hubs_defer_to_a_root_twin() {
    let mut state = complete_bipartite(&[("H1", -1.0), ("H2", -2.0)]);
    assert_eq!(apply(&NegMirroredHubs, &mut state, &["H2"]), 1);
    assert!(live(&state, "H2"));
    assert!(!live(&state, "H1"));
}

// ---- neg_bicomponent ----

#[test]
fn bicomponent_cuts_non_positive_blocks_and_components() {
    let mut state = build(
        &[
            ("a", 3.0),
            ("b", 3.0),
            ("c", 3.0),
            ("x", -1.0),
            ("y", -2.0),
            ("z", -1.0),
            ("p", -1.0),
            ("q", -1.0),
        ],
        &[
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("a", "x"),
            ("x", "y"),
            ("y", "z"),
            ("z", "x"),
            ("p", "q"),
        ],
    );
    assert_eq!(apply(&NegBicomponent, &mut state, &[]), 5);
    assert_eq!(state.node_count(), 3);
}

#[test]
fn bicomponent_spares_blocks_with_positive_nodes() {
    let mut state = build(
        &[("a", 3.0), ("b", 3.0), ("x", -1.0), ("y", -2.0), ("z", 1.0)],
        &[("a", "b"), ("a", "x"), ("x", "y"), ("y", "z"), ("z", "x")],
    );
    assert_eq!(apply(&NegBicomponent, &mut state, &[]), 0);
}

#[test]
fn bicomponent_drops_rootless_components_when_rooted() {
    let mut state = build(
        &[("r", -1.0), ("a", 2.0), ("s", 4.0), ("t", 1.0)],
        &[("r", "a"), ("s", "t")],
    );
    assert_eq!(apply(&NegBicomponent, &mut state, &["r"]), 2);
    assert!(!live(&state, "s") && !live(&state, "t"));
    assert!(live(&state, "r") && live(&state, "a"));
}

// ---- neg_tricomponent ----

#[test]
fn tricomponent_keeps_only_the_cheapest_connecting_path() {
    let mut state = build(
        &[
            ("S", 5.0),
            ("T", 5.0),
            ("r1", -1.0),
            ("r2", -5.0),
            ("r3", -1.0),
            ("r4", -1.0),
        ],
        &[
            ("S", "r1"),
            ("r1", "r3"),
            ("r3", "T"),
            ("S", "r2"),
            ("r2", "T"),
            ("r2", "r3"),
            ("r1", "r4"),
        ],
    );
    assert_eq!(apply(&NegTricomponent, &mut state, &[]), 2);
    assert!(live(&state, "r1") && live(&state, "r3"));
    assert!(!live(&state, "r2") && !live(&state, "r4"));
}

#[test]
fn tricomponent_removes_singly_attached_and_shortcut_regions() {
    let mut state = build(
        &[
            ("H", 2.0),
            ("n1", -1.0),
            ("n2", -1.0),
            ("n3", -1.0),
            ("S", 1.0),
            ("T", 1.0),
            ("m", -1.0),
        ],
        &[
            ("H", "n1"),
            ("n1", "n2"),
            ("n2", "n3"),
            ("n3", "n1"),
            ("H", "S"),
            ("S", "T"),
            ("S", "m"),
            ("m", "T"),
        ],
    );
    // {n1,n2,n3} hangs off H alone; m bridges S and T, which are adjacent.
    assert_eq!(apply(&NegTricomponent, &mut state, &[]), 4);
    assert_eq!(state.node_count(), 3);
}

#[test]
fn tricomponent_skips_regions_with_many_attachments() {
    let mut state = build(
        &[("a", 1.0), ("b", 1.0), ("c", 1.0), ("m", -1.0)],
        &[("a", "m"), ("b", "m"), ("c", "m")],
    );
    assert_eq!(apply(&NegTricomponent, &mut state, &[]), 0);
}

// ---- shared guarantees ----

#[test]
fn every_rule_is_a_no_op_without_matches() {
    // All-positive triangle: nothing to prune. pos_edge merges any positive
    // edge, so it sits this one out.
    for kind in RuleKind::ALL {
        if kind == RuleKind::PosEdge {
            continue;
        }
        let mut state = build(
            &[("a", 1.0), ("b", 2.0), ("c", 3.0)],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        );
        let before: Vec<_> = state.pre_nodes().map(|p| state.data(p).clone()).collect();
        let counts = state.counts();

        assert_eq!(apply(build_rule(kind).as_ref(), &mut state, &[]), 0, "{kind}");

        let after: Vec<_> = state.pre_nodes().map(|p| state.data(p).clone()).collect();
        assert_eq!(before, after, "{kind} changed node data");
        assert_eq!(counts, state.counts(), "{kind} changed counts");
    }
}

#[test]
fn positive_rules_are_no_ops_on_negative_graphs() {
    for rule in [&PosEdge as &dyn Rule, &PosDeg01, &PosDiamond] {
        let mut state = build(
            &[("a", -1.0), ("b", -2.0), ("c", -3.0)],
            &[("a", "b"), ("b", "c")],
        );
        let counts = state.counts();
        assert_eq!(apply(rule, &mut state, &[]), 0, "{}", rule.name());
        assert_eq!(counts, state.counts());
    }
}

#[test]
#[should_panic(expected = "root")]
fn context_refuses_to_remove_a_root() {
    let mut state = build(&[("r", -1.0)], &[]);
    let roots = BTreeSet::from([pre(&state, "r")]);
    let mut indices = Indices::build(&state);
    let mut lower_bound = 0.0;
    let r = pre(&state, "r");
    let mut ctx = RuleContext::new(&mut state, &mut indices, &roots, &mut lower_bound);
    ctx.remove(r);
}
