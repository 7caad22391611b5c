//! Tests for PivotGroupBuilder

use rstest::rstest;

use pivot_groups::domain::{
    build_pivot_groups, ColumnForest, DomainError, DomainResult, HeaderPosition, LeafColumn,
    NodeData, PivotGroupBuilder,
};
use pivot_groups::util::testing::init_test_setup;

fn leaf(col_id: &str, path: &[&str]) -> LeafColumn {
    LeafColumn::with_path(col_id, path.iter().copied())
}

fn build(leaves: &[LeafColumn]) -> ColumnForest {
    init_test_setup();
    build_pivot_groups(leaves, false, HeaderPosition::Top).expect("build forest")
}

/// Group id or leaf key of each root-level node.
fn root_keys(forest: &ColumnForest) -> Vec<String> {
    forest
        .roots()
        .iter()
        .map(|&idx| node_key(&forest.get_node(idx).unwrap().data))
        .collect()
}

fn child_keys(forest: &ColumnForest, group_id: &str) -> Vec<String> {
    let idx = forest.group_index(group_id).expect("group exists");
    forest
        .get_node(idx)
        .unwrap()
        .children
        .iter()
        .map(|&child| node_key(&forest.get_node(child).unwrap().data))
        .collect()
}

fn node_key(data: &NodeData) -> String {
    match data {
        NodeData::Group { group_id, .. } => group_id.clone(),
        NodeData::Leaf { column, .. } => column.col_id.clone(),
    }
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_flat_columns_when_building_then_creates_no_groups() {
    let forest = build(&[leaf("a", &["A"]), leaf("b", &["B"])]);

    assert_eq!(root_keys(&forest), vec!["a", "b"]);
    assert_eq!(forest.group_count(), 0);
    assert_eq!(forest.depth(), 1);
}

#[test]
fn given_shared_parent_when_building_then_groups_both_columns() {
    let forest = build(&[leaf("a1", &["G", "A1"]), leaf("a2", &["G", "A2"])]);

    assert_eq!(root_keys(&forest), vec!["G"]);
    assert_eq!(child_keys(&forest, "G"), vec!["a1", "a2"]);
}

#[test]
fn given_three_level_path_when_building_then_nests_groups_with_prefix_ids() {
    let forest = build(&[leaf("x", &["Top", "Mid", "X"])]);

    assert_eq!(root_keys(&forest), vec!["Top"]);
    assert_eq!(child_keys(&forest, "Top"), vec!["Top/Mid"]);
    assert_eq!(child_keys(&forest, "Top/Mid"), vec!["x"]);

    let mid = forest.group_index("Top/Mid").unwrap();
    match &forest.get_node(mid).unwrap().data {
        NodeData::Group {
            header_name, depth, ..
        } => {
            assert_eq!(header_name, "Mid");
            assert_eq!(*depth, 1);
        }
        other => panic!("expected group, got {:?}", other),
    }
    assert_eq!(forest.depth(), 3);
}

#[test]
fn given_interleaved_groups_when_building_then_keeps_first_seen_order() {
    let forest = build(&[
        leaf("a", &["G1", "A"]),
        leaf("b", &["G2", "B"]),
        leaf("c", &["G1", "C"]),
    ]);

    assert_eq!(root_keys(&forest), vec!["G1", "G2"]);
    assert_eq!(child_keys(&forest, "G1"), vec!["a", "c"]);
    assert_eq!(child_keys(&forest, "G2"), vec!["b"]);
}

#[test]
fn given_no_columns_when_building_then_returns_empty_forest() {
    let forest = build(&[]);

    assert!(forest.is_empty());
    assert!(forest.to_col_defs().is_empty());
}

// ============================================================
// Properties
// ============================================================

#[test]
fn given_columns_when_building_then_every_column_appears_once_under_its_path() {
    let leaves = vec![
        leaf("r", &["Region"]),
        leaf("c1", &["2024", "Q1", "Revenue"]),
        leaf("c2", &["2024", "Q1", "Cost"]),
        leaf("c3", &["2024", "Q2", "Revenue"]),
        leaf("c4", &["2025", "Q1", "Revenue"]),
    ];
    let forest = build(&leaves);

    let placed: Vec<&str> = forest.leaves().iter().map(|c| c.key()).collect();
    assert_eq!(placed, vec!["r", "c1", "c2", "c3", "c4"]);
    assert_eq!(forest.leaf_count(), leaves.len());

    for (idx, node) in forest.iter() {
        if let NodeData::Leaf { column, .. } = &node.data {
            let expected = match &column.context {
                pivot_groups::domain::ColumnContext::Explicit { path } => path.clone(),
                other => panic!("unexpected context {:?}", other),
            };
            assert_eq!(forest.path_of(idx), expected);
            assert_eq!(column, leaves.iter().find(|l| l.col_id == column.col_id).unwrap());
        }
    }
}

#[test]
fn given_same_columns_when_building_twice_then_forests_are_identical() {
    let leaves = vec![
        leaf("a", &["G1", "S", "A"]),
        leaf("b", &["G2", "B"]),
        leaf("c", &["G1", "S", "C"]),
    ];

    let first = build(&leaves);
    let second = build(&leaves);

    assert_eq!(first.to_col_defs(), second.to_col_defs());
}

#[test]
fn given_duplicate_key_on_same_path_when_building_then_keeps_single_leaf() {
    let forest = build(&[
        leaf("a", &["G", "A"]),
        leaf("a", &["G", "A"]),
        leaf("b", &["G", "B"]),
    ]);

    assert_eq!(child_keys(&forest, "G"), vec!["a", "b"]);
    assert_eq!(forest.leaf_count(), 2);
}

#[test]
fn given_same_key_under_different_groups_when_building_then_keeps_both() {
    let forest = build(&[leaf("m", &["G1", "M"]), leaf("m", &["G2", "M"])]);

    assert_eq!(child_keys(&forest, "G1"), vec!["m"]);
    assert_eq!(child_keys(&forest, "G2"), vec!["m"]);
}

#[test]
fn given_common_prefix_when_building_then_columns_share_group_node() {
    let forest = build(&[
        leaf("a", &["Top", "Mid", "A"]),
        leaf("b", &["Top", "Other", "B"]),
        leaf("c", &["Top", "Mid", "C"]),
    ]);

    let parent_of = |key: &str| {
        forest
            .iter()
            .find(|(_, n)| n.data.as_leaf().map(|c| c.key()) == Some(key))
            .and_then(|(_, n)| n.parent)
            .unwrap()
    };
    let grandparent_of = |key: &str| forest.get_node(parent_of(key)).unwrap().parent.unwrap();

    assert_eq!(parent_of("a"), parent_of("c"));
    assert_ne!(parent_of("a"), parent_of("b"));
    assert_eq!(grandparent_of("a"), grandparent_of("b"));
    assert_eq!(Some(grandparent_of("a")), forest.group_index("Top"));
    assert_eq!(forest.group_count(), 3);
}

#[test]
fn given_same_label_under_different_ancestors_when_building_then_groups_are_distinct() {
    let forest = build(&[
        leaf("a", &["2024", "Q1", "A"]),
        leaf("b", &["2025", "Q1", "B"]),
    ]);

    let q1_2024 = forest.group_index("2024/Q1").unwrap();
    let q1_2025 = forest.group_index("2025/Q1").unwrap();
    assert_ne!(q1_2024, q1_2025);
    assert!(forest.group_index("Q1").is_none());
}

#[test]
fn given_label_containing_separator_when_building_then_places_leaf_beside_nested_group() {
    let forest = build(&[leaf("y", &["A", "B", "Y"]), leaf("z", &["A/B"])]);

    assert_eq!(root_keys(&forest), vec!["A", "z"]);
    assert_eq!(child_keys(&forest, "A"), vec!["A/B"]);
    assert_eq!(forest.leaf_count(), 2);
}

#[test]
fn given_flat_group_joining_like_nested_path_when_building_then_keeps_branches_apart() {
    let forest = build(&[leaf("x", &["A/B", "X"]), leaf("y", &["A", "B", "Y"])]);

    let path_of = |key: &str| {
        forest
            .iter()
            .find(|(_, n)| n.data.as_leaf().map(|c| c.key()) == Some(key))
            .map(|(idx, _)| forest.path_of(idx))
            .unwrap()
    };
    assert_eq!(path_of("x"), vec!["A/B", "X"]);
    assert_eq!(path_of("y"), vec!["A", "B", "Y"]);

    assert_eq!(root_keys(&forest), vec!["A/B", "A"]);
    let outer = forest.group_index("A").unwrap();
    assert_eq!(forest.leaves_under(outer).len(), 1);
    assert_eq!(forest.group_count(), 3);
    for (_, node) in forest.iter() {
        if let NodeData::Group { group_id, .. } = &node.data {
            assert!(!node.children.is_empty(), "empty group {}", group_id);
        }
    }
}

#[rstest]
#[case::flat(&[("a", &["A"][..]), ("b", &["B"][..])], 0, 1)]
#[case::shared(&[("a", &["G", "A"][..]), ("b", &["G", "B"][..])], 1, 2)]
#[case::mixed_depths(&[("a", &["A"][..]), ("b", &["G", "H", "B"][..])], 2, 3)]
fn given_paths_when_building_then_counts_groups_and_depth(
    #[case] columns: &[(&str, &[&str])],
    #[case] groups: usize,
    #[case] depth: usize,
) {
    let leaves: Vec<_> = columns.iter().map(|(key, path)| leaf(key, path)).collect();
    let forest = build(&leaves);

    assert_eq!(forest.group_count(), groups);
    assert_eq!(forest.depth(), depth);
}

// ============================================================
// Invalid input
// ============================================================

#[test]
fn given_empty_path_when_building_then_errors() {
    init_test_setup();
    let result = build_pivot_groups(&[leaf("a", &[])], false, HeaderPosition::Top);

    assert_eq!(
        result.err(),
        Some(DomainError::EmptyPath {
            col_id: "a".to_string()
        })
    );
}

#[test]
fn given_leaf_at_existing_group_path_when_building_then_errors() {
    init_test_setup();
    let result = build_pivot_groups(
        &[leaf("a", &["G", "A"]), leaf("g", &["G"])],
        false,
        HeaderPosition::Top,
    );

    assert_eq!(
        result.err(),
        Some(DomainError::PathConflict {
            group_id: "G".to_string(),
            col_id: "g".to_string()
        })
    );
}

#[test]
fn given_group_at_existing_leaf_path_when_building_then_errors() {
    init_test_setup();
    let result = build_pivot_groups(
        &[leaf("g", &["G"]), leaf("a", &["G", "A"])],
        false,
        HeaderPosition::Top,
    );

    assert_eq!(
        result.err(),
        Some(DomainError::PathConflict {
            group_id: "G".to_string(),
            col_id: "g".to_string()
        })
    );
}

// ============================================================
// Custom path derivers
// ============================================================

#[test]
fn given_custom_deriver_when_building_then_forwards_flags_for_every_column() {
    init_test_setup();
    let deriver = |column: &LeafColumn,
                   is_transposed: bool,
                   position: HeaderPosition|
     -> DomainResult<Vec<String>> {
        assert!(is_transposed);
        assert_eq!(position, HeaderPosition::Left);
        Ok(vec!["All".to_string(), column.col_id.to_uppercase()])
    };
    let leaves = vec![leaf("a", &[]), leaf("b", &[])];

    let forest = PivotGroupBuilder::new(deriver)
        .build(&leaves, true, HeaderPosition::Left)
        .unwrap();

    let all = forest.group_index("All").unwrap();
    assert_eq!(forest.leaves_under(all).len(), 2);
}

#[test]
fn given_failing_deriver_when_building_then_propagates_error() {
    init_test_setup();
    let deriver = |column: &LeafColumn, _: bool, _: HeaderPosition| -> DomainResult<Vec<String>> {
        Err(DomainError::PathDerivation {
            col_id: column.col_id.clone(),
            message: "no scope".to_string(),
        })
    };

    let result = PivotGroupBuilder::new(deriver).build(&[leaf("a", &["A"])], false, HeaderPosition::Top);

    assert!(matches!(result, Err(DomainError::PathDerivation { .. })));
}
