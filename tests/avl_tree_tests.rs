//! Integration tests for AvlTree.

use ordered_trees::{AvlTree, NaturalOrder, Reversed, SearchTree, TraversalOrder};
use rstest::{fixture, rstest};

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn scenario_tree() -> AvlTree<i32, i32> {
    [2, 3, 7, 1, 9, 0, 8, 6]
        .into_iter()
        .map(|key| (key, key))
        .collect()
}

fn root_key<V>(tree: &AvlTree<i32, V>) -> Option<i32> {
    tree.root_entry().map(|(key, _)| *key)
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[rstest]
fn test_scenario_insert_sequence(scenario_tree: AvlTree<i32, i32>) {
    assert_eq!(scenario_tree.to_string(), "0 | 1 | 2 | 3 | 6 | 7 | 8 | 9");
    assert_eq!(scenario_tree.len(), 8);
    assert_eq!(scenario_tree.validate(), Ok(()));
}

#[rstest]
fn test_scenario_remove_after_insert(mut scenario_tree: AvlTree<i32, i32>) {
    scenario_tree.remove(&6).remove(&9);
    assert_eq!(scenario_tree.to_string(), "0 | 1 | 2 | 3 | 7 | 8");
    assert_eq!(scenario_tree.len(), 6);
    assert_eq!(scenario_tree.validate(), Ok(()));
}

#[rstest]
#[case::single_left_rotation([1, 3, 5])]
#[case::left_right_rotation([5, 1, 3])]
fn test_three_inserts_rotate_to_middle_key(#[case] keys: [i32; 3]) {
    let mut tree = AvlTree::new();
    for key in keys {
        tree.insert(key, ());
    }
    assert_eq!(root_key(&tree), Some(3));
    assert_eq!(tree.height(), 2);
}

// =============================================================================
// Insert and Get Tests
// =============================================================================

#[rstest]
fn test_insert_chain_and_get() {
    let mut tree = AvlTree::new();
    tree.insert(2, "two".to_string())
        .insert(1, "one".to_string())
        .insert(3, "three".to_string());

    assert_eq!(tree.get(&1), Some(&"one".to_string()));
    assert_eq!(tree.get(&4), None);
    assert!(tree.contains_key(&3));
}

#[rstest]
fn test_insert_overwrites_existing_key(mut scenario_tree: AvlTree<i32, i32>) {
    scenario_tree.insert(7, 70);
    assert_eq!(scenario_tree.get(&7), Some(&70));
    assert_eq!(scenario_tree.len(), 8);
}

#[rstest]
fn test_get_mut_updates_in_place(mut scenario_tree: AvlTree<i32, i32>) {
    if let Some(value) = scenario_tree.get_mut(&9) {
        *value *= 10;
    }
    assert_eq!(scenario_tree.max(), Some(&90));
}

// =============================================================================
// Min / Max / Traversal Tests
// =============================================================================

#[rstest]
fn test_min_max(scenario_tree: AvlTree<i32, i32>) {
    assert_eq!(scenario_tree.min(), Some(&0));
    assert_eq!(scenario_tree.max(), Some(&9));
    assert_eq!(scenario_tree.min_entry(), Some((&0, &0)));
    assert_eq!(scenario_tree.max_entry(), Some((&9, &9)));
}

#[rstest]
#[case::pre_order(TraversalOrder::PreOrder, vec![3, 1, 0, 2, 8, 7, 6, 9])]
#[case::in_order(TraversalOrder::InOrder, vec![0, 1, 2, 3, 6, 7, 8, 9])]
#[case::post_order(TraversalOrder::PostOrder, vec![0, 2, 1, 6, 7, 9, 8, 3])]
fn test_traversal_orders(
    scenario_tree: AvlTree<i32, i32>,
    #[case] order: TraversalOrder,
    #[case] expected: Vec<i32>,
) {
    let visited: Vec<i32> = scenario_tree.traverse(order).copied().collect();
    assert_eq!(visited, expected);
}

#[rstest]
fn test_traverse_is_restartable(scenario_tree: AvlTree<i32, i32>) {
    let traversal = scenario_tree.traverse(TraversalOrder::default());
    let first: Vec<&i32> = traversal.clone().collect();
    let second: Vec<&i32> = traversal.collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 8);
}

#[rstest]
fn test_iter_keys_values(scenario_tree: AvlTree<i32, i32>) {
    let keys: Vec<&i32> = scenario_tree.keys().collect();
    let values: Vec<&i32> = scenario_tree.iter().rev().map(|(_, value)| value).collect();
    assert_eq!(keys.first(), Some(&&0));
    assert_eq!(values.first(), Some(&&9));
    assert_eq!((&scenario_tree).into_iter().len(), 8);
}

// =============================================================================
// Comparer Tests
// =============================================================================

#[rstest]
fn test_closure_comparer_orders_descending() {
    let mut tree = AvlTree::with_comparer(|left: &i32, right: &i32| right.cmp(left));
    tree.extend((0..10).map(|key| (key, key)));

    assert_eq!(tree.to_string(), "9 | 8 | 7 | 6 | 5 | 4 | 3 | 2 | 1 | 0");
    assert_eq!(tree.min(), Some(&9));
    assert_eq!(tree.validate(), Ok(()));
}

#[rstest]
fn test_reversed_natural_order_matches_closure() {
    let mut reversed = AvlTree::with_comparer(Reversed(NaturalOrder));
    reversed.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
    assert_eq!(reversed.to_string(), "c | b | a");
}

// =============================================================================
// Equality / Clone / Debug
// =============================================================================

#[rstest]
fn test_equality_ignores_insertion_order() {
    let ascending: AvlTree<i32, i32> = (0..20).map(|key| (key, key)).collect();
    let descending: AvlTree<i32, i32> = (0..20).rev().map(|key| (key, key)).collect();
    assert_eq!(ascending, descending);
}

#[rstest]
fn test_clone_is_deep(scenario_tree: AvlTree<i32, i32>) {
    let mut copy = scenario_tree.clone();
    copy.remove(&3).insert(42, 42);

    assert_eq!(scenario_tree.to_string(), "0 | 1 | 2 | 3 | 6 | 7 | 8 | 9");
    assert_eq!(copy.to_string(), "0 | 1 | 2 | 6 | 7 | 8 | 9 | 42");
    assert_eq!(copy.validate(), Ok(()));
}

#[rstest]
fn test_debug_uses_map_form() {
    let tree: AvlTree<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
    assert_eq!(format!("{tree:?}"), r#"{"a": 1, "b": 2}"#);
}

// =============================================================================
// Generic Surface
// =============================================================================

fn drain_through_trait<T: SearchTree<i32, i32>>(tree: &mut T) -> Vec<i32> {
    let mut drained = Vec::new();
    while let Some(&smallest) = tree.min() {
        if let Some(value) = tree.take(&smallest) {
            drained.push(value);
        }
    }
    drained
}

#[rstest]
fn test_drain_through_trait(mut scenario_tree: AvlTree<i32, i32>) {
    assert_eq!(
        drain_through_trait(&mut scenario_tree),
        vec![0, 1, 2, 3, 6, 7, 8, 9]
    );
    assert!(scenario_tree.is_empty());
    assert_eq!(scenario_tree.validate(), Ok(()));
}

#[rstest]
fn test_large_workload_stays_balanced() {
    let mut tree = AvlTree::new();
    for key in 0..5_000 {
        tree.insert((key * 7_919) % 5_003, key);
    }
    for key in (0..5_003).step_by(2) {
        tree.remove(&key);
    }
    assert_eq!(tree.validate(), Ok(()));
    assert!(tree.height() <= 17);
}
