use ntree::util::testing;
use ntree::{NodeId, Sibling, Tree, TreeError, TreeResult};
use rstest::{fixture, rstest};

struct Sample {
    tree: Tree<&'static str>,
    a: NodeId,
    b: NodeId,
    c: NodeId,
    d: NodeId,
    e: NodeId,
}

/// A(B(D, E), C)
#[fixture]
fn sample() -> Sample {
    testing::init_test_setup();
    let mut tree = Tree::new();
    let a = tree.set_root("A");
    let b = tree.append_child(a, "B");
    let c = tree.append_child(a, "C");
    let d = tree.append_child(b, "D");
    let e = tree.append_child(b, "E");
    Sample { tree, a, b, c, d, e }
}

/// Two top-level trees: X(Y) and Z
#[fixture]
fn incoming() -> Tree<&'static str> {
    let mut tree = Tree::new();
    let x = tree.set_root("X");
    tree.append_child(x, "Y");
    let feet = tree.feet();
    tree.insert(feet, "Z");
    tree
}

fn outline(tree: &Tree<&'static str>) -> Vec<String> {
    tree.iter()
        .map(|(id, value)| format!("{}{}", ".".repeat(tree.depth(id)), value))
        .collect()
}

// ============================================================
// Between trees
// ============================================================

#[rstest]
fn given_subtree_when_moving_out_then_new_tree_owns_it(mut sample: Sample) -> TreeResult<()> {
    let out = sample.tree.move_out(sample.b);
    assert_eq!(outline(&out), ["B", ".D", ".E"]);
    assert_eq!(outline(&sample.tree), ["A", ".C"]);
    assert_eq!(sample.tree.size(), 2);
    assert!(!sample.tree.is_valid(sample.d));
    out.verify_consistency()?;
    sample.tree.verify_consistency()
}

#[rstest]
fn given_moved_subtree_when_using_handles_from_before_the_move_then_they_follow_their_nodes(
    mut sample: Sample,
) -> TreeResult<()> {
    let mut out = sample.tree.move_out(sample.b);
    assert_eq!(out.first_root(), Some(sample.b));
    assert_eq!(out[sample.b], "B");
    assert_eq!(out[sample.d], "D");
    assert_eq!(out.parent(sample.e), Some(sample.b));
    assert!(!sample.tree.is_valid(sample.b));

    let first = sample.tree.move_in(sample.c, &mut out);
    assert_eq!(first, sample.b);
    assert_eq!(sample.tree[sample.b], "B");
    assert_eq!(sample.tree.parent(sample.d), Some(sample.b));
    assert!(!out.is_valid(sample.b));
    assert_eq!(outline(&sample.tree), ["A", ".B", "..D", "..E", ".C"]);
    out.verify_consistency()?;
    sample.tree.verify_consistency()
}

#[rstest]
fn given_incoming_roots_when_moving_in_then_their_handles_stay_valid(
    mut sample: Sample,
    mut incoming: Tree<&'static str>,
) -> TreeResult<()> {
    let handles: Vec<NodeId> = incoming.iter().map(|(id, _)| id).collect();
    sample.tree.move_in_below(sample.c, &mut incoming);
    let payloads: Vec<&str> = handles.iter().map(|&id| sample.tree[id]).collect();
    assert_eq!(payloads, ["X", "Y", "Z"]);
    assert_eq!(sample.tree.parent(handles[1]), Some(handles[0]));
    assert_eq!(sample.tree.parent(handles[2]), Some(sample.c));
    sample.tree.verify_consistency()
}

#[rstest]
#[should_panic(expected = "stale or foreign node handle")]
fn given_node_moved_out_when_reading_it_through_old_tree_then_panics(mut sample: Sample) {
    let _out = sample.tree.move_out(sample.b);
    let _ = sample.tree.get(sample.d);
}

#[rstest]
#[should_panic(expected = "stale or foreign node handle")]
fn given_handle_of_another_tree_when_reading_then_panics(sample: Sample, incoming: Tree<&'static str>) {
    let x = incoming.first_root().unwrap();
    let _ = sample.tree.get(x);
}

#[rstest]
fn given_collapsed_subtree_when_moving_out_then_state_travels_along(mut sample: Sample) -> TreeResult<()> {
    sample.tree.collapse(sample.b);
    let out = sample.tree.move_out(sample.b);
    let root = out.first_root().unwrap();
    assert!(!out.is_expanded(root));
    assert_eq!(out.count_expanded(), 1);
    assert_eq!(out.count_expandable(), 3);
    assert_eq!(sample.tree.count_expanded(), 2);
    out.verify_consistency()
}

#[rstest]
fn given_other_tree_when_moving_in_then_its_roots_land_before_location(
    mut sample: Sample,
    mut incoming: Tree<&'static str>,
) -> TreeResult<()> {
    let first = sample.tree.move_in(sample.c, &mut incoming);
    assert_eq!(sample.tree[first], "X");
    assert_eq!(outline(&sample.tree), ["A", ".B", "..D", "..E", ".X", "..Y", ".Z", ".C"]);
    assert!(incoming.is_empty());
    assert_eq!(sample.tree.size(), 8);
    incoming.verify_consistency()?;
    sample.tree.verify_consistency()
}

#[rstest]
fn given_other_tree_when_moving_in_below_then_roots_become_last_children(
    mut sample: Sample,
    mut incoming: Tree<&'static str>,
) -> TreeResult<()> {
    sample.tree.move_in_below(sample.c, &mut incoming);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..D", "..E", ".C", "..X", "...Y", "..Z"]);
    assert_eq!(sample.tree.size_of(sample.c), 4);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_empty_other_tree_when_moving_in_then_location_is_returned(mut sample: Sample) {
    let mut empty = Tree::new();
    assert_eq!(sample.tree.move_in(sample.c, &mut empty), sample.c);
    assert_eq!(sample.tree.size(), 5);
}

#[rstest]
#[case(0, &["A", ".X", "..Y", ".Z", ".B", "..D", "..E", ".C"])]
#[case(1, &["A", ".B", "..D", "..E", ".X", "..Y", ".Z", ".C"])]
#[case(2, &["A", ".B", "..D", "..E", ".C", ".X", "..Y", ".Z"])]
fn given_index_when_moving_in_as_nth_child_then_first_root_takes_that_index(
    mut sample: Sample,
    mut incoming: Tree<&'static str>,
    #[case] n: usize,
    #[case] expected: &[&str],
) -> TreeResult<()> {
    let first = sample.tree.move_in_as_nth_child(sample.a, n, &mut incoming)?;
    assert_eq!(sample.tree.index(first), n);
    assert_eq!(outline(&sample.tree), expected);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_index_past_children_when_moving_in_as_nth_child_then_errors_and_changes_nothing(
    mut sample: Sample,
    mut incoming: Tree<&'static str>,
) {
    let result = sample.tree.move_in_as_nth_child(sample.a, 3, &mut incoming);
    assert_eq!(result, Err(TreeError::ChildOutOfRange { index: 3, available: 2 }));
    assert_eq!(sample.tree.size(), 5);
    assert_eq!(incoming.size(), 3);
    assert_eq!(outline(&incoming), ["X", ".Y", "Z"]);
}

// ============================================================
// Within one tree
// ============================================================

#[rstest]
fn given_siblings_when_moving_before_and_after_then_handles_survive(mut sample: Sample) -> TreeResult<()> {
    let moved = sample.tree.move_before(sample.b, sample.c);
    assert_eq!(moved, sample.c);
    assert_eq!(outline(&sample.tree), ["A", ".C", ".B", "..D", "..E"]);

    sample.tree.move_after(sample.e, sample.d);
    assert_eq!(outline(&sample.tree), ["A", ".C", ".B", "..E", "..D"]);

    // already in place
    sample.tree.move_after(sample.e, sample.d);
    assert_eq!(sample.tree.index(sample.d), 1);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_deep_node_when_moving_across_levels_then_counters_follow(mut sample: Sample) -> TreeResult<()> {
    sample.tree.move_after(sample.c, sample.d);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..E", ".C", ".D"]);
    assert_eq!(sample.tree.size_of(sample.b), 2);
    assert_eq!(sample.tree.size_of(sample.a), 5);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_end_position_when_moving_to_then_source_becomes_last_child(mut sample: Sample) -> TreeResult<()> {
    sample.tree.move_to(&Sibling::end_of(sample.c), sample.d);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..E", ".C", "..D"]);
    sample.tree.move_to(&Sibling::at(&sample.tree, sample.e), sample.d);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..D", "..E", ".C"]);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_feet_when_moving_before_then_source_becomes_last_root(mut sample: Sample) -> TreeResult<()> {
    let feet = sample.tree.feet();
    sample.tree.move_before(feet, sample.b);
    assert_eq!(sample.tree.roots().map(|(id, _)| id).collect::<Vec<_>>(), [sample.a, sample.b]);
    assert_eq!(sample.tree.size(), 5);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_target_when_moving_ontop_then_target_subtree_is_destroyed(mut sample: Sample) -> TreeResult<()> {
    sample.tree.move_ontop(sample.c, sample.d);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..E", ".D"]);
    assert!(!sample.tree.is_valid(sample.c));
    assert_eq!(sample.tree.size(), 4);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_descendant_source_when_moving_ontop_then_it_replaces_its_ancestor(mut sample: Sample) -> TreeResult<()> {
    sample.tree.move_ontop(sample.b, sample.d);
    assert_eq!(outline(&sample.tree), ["A", ".D", ".C"]);
    assert!(!sample.tree.is_valid(sample.e));
    sample.tree.verify_consistency()
}

#[rstest]
#[should_panic(expected = "into its own subtree")]
fn given_ancestor_source_when_moving_below_descendant_then_panics(mut sample: Sample) {
    sample.tree.move_before(sample.d, sample.b);
}

#[rstest]
#[case::head_before_first_root(true)]
#[case::feet_after_last_root(false)]
#[should_panic(expected = "cannot move sentinel")]
fn given_sentinel_source_already_in_place_when_moving_then_panics(mut sample: Sample, #[case] before: bool) {
    if before {
        let head = sample.tree.head();
        sample.tree.move_before(sample.a, head);
    } else {
        let feet = sample.tree.feet();
        sample.tree.move_after(sample.a, feet);
    }
}

#[rstest]
fn given_node_as_its_own_target_when_moving_then_nothing_changes(mut sample: Sample) -> TreeResult<()> {
    assert_eq!(sample.tree.move_before(sample.b, sample.b), sample.b);
    assert_eq!(sample.tree.move_after(sample.c, sample.c), sample.c);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..D", "..E", ".C"]);
    sample.tree.verify_consistency()
}

// ============================================================
// Restructuring
// ============================================================

#[rstest]
fn given_node_when_wrapping_then_new_parent_takes_its_place(mut sample: Sample) -> TreeResult<()> {
    let w = sample.tree.wrap(sample.b, "W");
    assert_eq!(outline(&sample.tree), ["A", ".W", "..B", "...D", "...E", ".C"]);
    assert_eq!(sample.tree.parent(sample.b), Some(w));
    sample.tree.verify_consistency()
}

#[rstest]
fn given_sibling_run_when_wrapping_range_then_run_moves_below_new_node(mut sample: Sample) -> TreeResult<()> {
    sample.tree.wrap_range(sample.b, &Sibling::end_of(sample.a), "W");
    assert_eq!(outline(&sample.tree), ["A", ".W", "..B", "...D", "...E", "..C"]);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_node_with_children_when_flattening_then_children_become_siblings(mut sample: Sample) -> TreeResult<()> {
    sample.tree.flatten(sample.b);
    assert_eq!(outline(&sample.tree), ["A", ".B", ".D", ".E", ".C"]);
    assert_eq!(sample.tree.number_of_children(sample.a), 4);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_children_when_reparenting_then_they_move_below_new_parent(mut sample: Sample) -> TreeResult<()> {
    let first = sample.tree.reparent_children(sample.c, sample.b);
    assert_eq!(first, Some(sample.d));
    assert_eq!(outline(&sample.tree), ["A", ".B", ".C", "..D", "..E"]);

    let begin = Sibling::at(&sample.tree, sample.e);
    let moved = sample.tree.reparent(sample.b, &begin, &Sibling::end_of(sample.c));
    assert_eq!(moved, Some(sample.e));
    assert_eq!(outline(&sample.tree), ["A", ".B", "..E", ".C", "..D"]);

    assert_eq!(sample.tree.reparent_children(sample.b, sample.b), None);
    sample.tree.verify_consistency()
}

#[rstest]
#[should_panic(expected = "below itself")]
fn given_run_containing_target_when_reparenting_then_panics(mut sample: Sample) {
    let begin = sample.tree.begin_children(sample.a);
    sample.tree.reparent(sample.d, &begin, &Sibling::end_of(sample.a));
}

#[rstest]
fn given_siblings_when_swapping_with_next_then_order_flips(mut sample: Sample) -> TreeResult<()> {
    sample.tree.swap_with_next(sample.b);
    assert_eq!(outline(&sample.tree), ["A", ".C", ".B", "..D", "..E"]);
    sample.tree.swap_with_next(sample.b);
    assert_eq!(outline(&sample.tree), ["A", ".C", ".B", "..D", "..E"]);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_unrelated_nodes_when_swapping_then_positions_exchange(mut sample: Sample) -> TreeResult<()> {
    sample.tree.swap_nodes(sample.d, sample.c);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..C", "..E", ".D"]);
    sample.tree.swap_nodes(sample.e, sample.c);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..E", "..C", ".D"]);
    sample.tree.verify_consistency()
}

#[rstest]
fn given_collapsed_parent_when_moving_child_out_then_shown_rows_grow(mut sample: Sample) -> TreeResult<()> {
    sample.tree.collapse(sample.b);
    assert_eq!(sample.tree.count_expanded(), 3);
    sample.tree.move_after(sample.c, sample.d);
    assert_eq!(sample.tree.count_expanded(), 4);
    assert_eq!(sample.tree.count_expandable(), 5);
    assert_eq!(sample.tree.count_expanded_of(sample.b), 1);
    sample.tree.verify_consistency()
}
