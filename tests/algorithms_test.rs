use ntree::util::testing;
use ntree::{NodeId, Sibling, Tree, TreeError, TreeResult};
use rstest::{fixture, rstest};

struct Sample {
    tree: Tree<&'static str>,
    a: NodeId,
    b: NodeId,
    c: NodeId,
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
    tree.append_child(b, "D");
    let e = tree.append_child(b, "E");
    Sample { tree, a, b, c, e }
}

fn outline<T: std::fmt::Display>(tree: &Tree<T>) -> Vec<String> {
    tree.iter()
        .map(|(id, value)| format!("{}{}", ".".repeat(tree.depth(id)), value))
        .collect()
}

/// Builds a tree from `(depth, label)` pairs listed in pre-order.
fn build(rows: &[(usize, &'static str)]) -> Tree<&'static str> {
    let mut tree = Tree::new();
    let mut spine: Vec<NodeId> = Vec::new();
    for &(depth, label) in rows {
        spine.truncate(depth);
        let id = match spine.last() {
            Some(&parent) => tree.append_child(parent, label),
            None => {
                let feet = tree.feet();
                tree.insert(feet, label)
            }
        };
        spine.push(id);
    }
    tree
}

// ============================================================
// Sorting
// ============================================================

#[rstest]
fn given_equal_keys_when_sorting_then_original_order_is_kept() -> TreeResult<()> {
    testing::init_test_setup();
    let mut tree = Tree::new();
    let root = tree.set_root((0, 'r'));
    let handles: Vec<NodeId> = [(3, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]
        .into_iter()
        .map(|payload| tree.append_child(root, payload))
        .collect();

    tree.sort_children_by(root, |x, y| x.0.cmp(&y.0), false);

    let sorted: Vec<(u32, char)> = tree.children(root).map(|(_, v)| *v).collect();
    assert_eq!(sorted, [(1, 'b'), (1, 'd'), (2, 'c'), (3, 'a')]);
    // nodes were relinked, not rewritten
    assert_eq!(tree[handles[1]], (1, 'b'));
    assert_eq!(tree.first_child(root), Some(handles[1]));
    assert_eq!(tree.last_child(root), Some(handles[0]));
    tree.verify_consistency()
}

#[rstest]
fn given_nested_tree_when_sorting_deep_then_every_level_is_ordered() -> TreeResult<()> {
    testing::init_test_setup();
    let mut tree = build(&[(0, "r"), (1, "c"), (2, "z"), (2, "y"), (1, "a"), (1, "b"), (2, "x"), (2, "w")]);
    let root = tree.first_root().unwrap();

    let mut shallow = tree.clone();
    let shallow_root = shallow.first_root().unwrap();
    shallow.sort_children(shallow_root, false);
    assert_eq!(outline(&shallow), ["r", ".a", ".b", "..x", "..w", ".c", "..z", "..y"]);

    tree.sort_children(root, true);
    assert_eq!(outline(&tree), ["r", ".a", ".b", "..w", "..x", ".c", "..y", "..z"]);
    tree.verify_consistency()
}

#[rstest]
fn given_top_level_trees_when_sorting_roots_then_sentinels_stay_outside() -> TreeResult<()> {
    testing::init_test_setup();
    let mut tree = build(&[(0, "3"), (0, "1"), (1, "1a"), (0, "2")]);
    let (begin, end) = (tree.begin_roots(), tree.end_roots());
    tree.sort(&begin, &end, false);
    assert_eq!(outline(&tree), ["1", ".1a", "2", "3"]);
    assert_eq!(tree.node(tree.head()).next_sibling(), tree.first_root());
    tree.verify_consistency()
}

// ============================================================
// Merging
// ============================================================

#[rstest]
fn given_overlapping_trees_when_merging_then_matches_fold_and_rest_is_copied() -> TreeResult<()> {
    testing::init_test_setup();
    let mut target = build(&[(0, "A"), (1, "B"), (2, "D"), (1, "C")]);
    let source = build(&[(0, "A"), (1, "B"), (2, "E"), (1, "F"), (2, "G")]);
    let (to, from) = (target.first_root().unwrap(), source.first_root().unwrap());

    target.merge_nodes(to, &source, from, false);

    assert_eq!(outline(&target), ["A", ".B", "..D", "..E", ".C", ".F", "..G"]);
    assert_eq!(source.size(), 5);
    target.verify_consistency()
}

#[rstest]
#[case::dropped(false, &["A", ".B"])]
#[case::duplicated(true, &["A", ".B", ".B"])]
fn given_matching_leaf_when_merging_then_duplicate_flag_decides(
    #[case] duplicate_leaves: bool,
    #[case] expected: &[&str],
) -> TreeResult<()> {
    testing::init_test_setup();
    let mut target = build(&[(0, "A"), (1, "B")]);
    let source = build(&[(0, "A"), (1, "B")]);
    let (to, from) = (target.first_root().unwrap(), source.first_root().unwrap());

    target.merge_nodes(to, &source, from, duplicate_leaves);

    assert_eq!(outline(&target), expected);
    target.verify_consistency()
}

#[rstest]
fn given_two_equal_targets_when_merging_then_first_one_wins() -> TreeResult<()> {
    testing::init_test_setup();
    let mut target = build(&[(0, "A"), (1, "X"), (2, "P"), (1, "X"), (2, "Q")]);
    let source = build(&[(0, "A"), (1, "X"), (2, "R")]);
    let (to, from) = (target.first_root().unwrap(), source.first_root().unwrap());

    target.merge_nodes(to, &source, from, false);

    assert_eq!(outline(&target), ["A", ".X", "..P", "..R", ".X", "..Q"]);
    target.verify_consistency()
}

#[rstest]
fn given_sources_matching_same_target_when_merging_then_result_matches_one_by_one() -> TreeResult<()> {
    testing::init_test_setup();
    let source = build(&[(0, "X"), (1, "a"), (0, "X"), (1, "a"), (1, "b")]);

    let mut at_once = build(&[(0, "X")]);
    let (begin, end) = (at_once.begin_roots(), at_once.end_roots());
    at_once.merge(&begin, &end, &source, &source.begin_roots(), &source.end_roots(), false);

    let mut one_by_one = build(&[(0, "X")]);
    let to = one_by_one.first_root().unwrap();
    for (from, _) in source.roots() {
        one_by_one.merge_nodes(to, &source, from, false);
    }

    assert_eq!(outline(&at_once), ["X", ".a", ".b"]);
    assert_eq!(outline(&at_once), outline(&one_by_one));
    at_once.verify_consistency()
}

#[rstest]
fn given_empty_target_range_when_merging_then_all_sources_are_copied(mut sample: Sample) -> TreeResult<()> {
    let source = build(&[(0, "Y"), (1, "Y1"), (0, "Z")]);
    let (begin, end) = (sample.tree.begin_children(sample.c), Sibling::end_of(sample.c));
    sample.tree.merge(&begin, &end, &source, &source.begin_roots(), &source.end_roots(), false);
    assert_eq!(outline(&sample.tree), ["A", ".B", "..D", "..E", ".C", "..Y", "...Y1", "..Z"]);
    sample.tree.verify_consistency()
}

// ============================================================
// Equality
// ============================================================

#[rstest]
fn given_copies_when_comparing_then_equal_until_one_changes(sample: Sample) {
    let mut copy = sample.tree.clone();
    let tree = &sample.tree;
    assert!(tree.equal(&tree.begin_roots(), &tree.end_roots(), &copy, &copy.begin_roots()));

    let copy_root = copy.first_root().unwrap();
    assert!(tree.equal_subtree(sample.a, &copy, copy_root));
    let copy_b = copy.child(copy_root, 0).unwrap();
    assert!(tree.equal_subtree(sample.b, &copy, copy_b));
    assert!(!tree.equal_subtree(sample.b, &copy, copy_root));

    let copy_d = copy.first_child(copy_b).unwrap();
    copy.append_child(copy_d, "F");
    assert!(!tree.equal_subtree(sample.a, &copy, copy_root));
}

#[rstest]
fn given_custom_predicate_when_comparing_then_it_decides_payload_equality(sample: Sample) {
    let lower = build(&[(0, "a"), (1, "b"), (2, "d"), (2, "e"), (1, "c")]);
    let tree = &sample.tree;
    let lower_root = lower.first_root().unwrap();
    assert!(!tree.equal_subtree(sample.a, &lower, lower_root));
    assert!(tree.equal_subtree_by(sample.a, &lower, lower_root, |x, y| x.eq_ignore_ascii_case(y)));
    assert!(tree.equal_by(
        &tree.begin_children(sample.a),
        &Sibling::end_of(sample.a),
        &lower,
        &lower.begin_children(lower_root),
        |x, y| x.eq_ignore_ascii_case(y),
    ));
}

#[rstest]
fn given_shorter_other_run_when_comparing_ranges_then_not_equal(sample: Sample) {
    let other = build(&[(0, "A"), (1, "B"), (2, "D"), (2, "E")]);
    let tree = &sample.tree;
    let other_root = other.first_root().unwrap();
    assert!(!tree.equal(
        &tree.begin_children(sample.a),
        &Sibling::end_of(sample.a),
        &other,
        &other.begin_children(other_root),
    ));
}

// ============================================================
// Paths
// ============================================================

#[rstest]
fn given_every_node_when_encoding_path_then_decoding_finds_it_again(sample: Sample) -> TreeResult<()> {
    let tree = &sample.tree;
    for (id, _) in tree.iter() {
        let path = tree.path_from_node(id, sample.a);
        assert_eq!(tree.node_from_path(&path, sample.a)?, id);
    }
    assert_eq!(tree.path_from_node(sample.e, sample.a), [0, 0, 1]);
    assert_eq!(tree.path_from_node(sample.a, sample.a), [0]);
    Ok(())
}

#[rstest]
fn given_top_as_left_sibling_when_encoding_path_then_first_entry_counts_steps_right(sample: Sample) {
    let tree = &sample.tree;
    assert_eq!(tree.path_from_node(sample.c, sample.b), [1]);
    assert_eq!(tree.node_from_path(&[1], sample.b), Ok(sample.c));
}

#[rstest]
#[case::too_wide(&[0, 5], TreeError::PathNoSibling { step: 1 })]
#[case::too_deep(&[0, 0, 0, 0], TreeError::PathNoChild { step: 3 })]
fn given_invalid_path_when_decoding_then_reports_failing_step(
    sample: Sample,
    #[case] path: &[usize],
    #[case] expected: TreeError,
) {
    assert_eq!(sample.tree.node_from_path(path, sample.a), Err(expected));
}

#[rstest]
fn given_second_root_when_encoding_from_first_root_then_steps_across_top_level(mut sample: Sample) {
    let feet = sample.tree.feet();
    let r = sample.tree.insert(feet, "R");
    assert_eq!(sample.tree.path_from_node(r, sample.a), [1]);
    assert_eq!(sample.tree.node_from_path(&[1], sample.a), Ok(r));
}

// ============================================================
// Extracting
// ============================================================

#[rstest]
fn given_sibling_run_when_extracting_subtree_then_copy_has_it_as_top_level(sample: Sample) -> TreeResult<()> {
    let tree = &sample.tree;
    let extracted = tree.subtree(&tree.begin_children(sample.a), &Sibling::end_of(sample.a));
    assert_eq!(outline(&extracted), ["B", ".D", ".E", "C"]);
    assert_eq!(extracted.size(), 4);
    assert_eq!(tree.size(), 5);
    extracted.verify_consistency()
}
