//! Selection model: single exclusivity, ctrl toggling and shift ranges.

use proptest::prelude::*;
use tableview::prelude::*;

fn rows(n: u32) -> Vec<u32> {
    (0..n).collect()
}

fn selected(model: &SelectionModel<u32>, rows: &[u32]) -> Vec<u32> {
    model
        .selected_indexes(rows)
        .into_iter()
        .map(|index| rows[index])
        .collect()
}

// =============================================================================
// Single selection
// =============================================================================

#[test]
fn test_single_select_replaces() {
    let mut model = SelectionModel::single(None);
    model.select(1u32);
    model.select(4);
    assert_eq!(model.selection(), &Selection::Single(Some(4)));
    assert!(!model.is_selected(&1));
}

#[test]
fn test_single_unselect_clears_regardless_of_key() {
    let mut model = SelectionModel::single(Some(2u32));
    assert!(model.unselect(&7));
    assert!(model.selection().is_empty());
}

#[test]
fn test_single_ignores_range_extension() {
    let rows = rows(5);
    let mut model = SelectionModel::single(Some(1u32));
    assert!(!model.extend_range(&3, &rows));
    assert_eq!(model.selection(), &Selection::Single(Some(1)));
    assert_eq!(model.drag_direction(), None);
}

// =============================================================================
// Multiple selection
// =============================================================================

#[test]
fn test_multiple_select_is_idempotent() {
    let mut model = SelectionModel::multiple([]);
    assert!(model.select(3u32));
    assert!(!model.select(3));
    assert_eq!(model.selection().len(), 1);
}

#[test]
fn test_replace_with_clears_set() {
    let mut model = SelectionModel::multiple([1u32, 2, 3]);
    model.replace_with(5);
    assert_eq!(selected(&model, &rows(8)), vec![5]);
}

#[test]
fn test_toggle_flips_membership() {
    let mut model = SelectionModel::multiple([1u32]);
    model.toggle(2);
    model.toggle(1);
    assert_eq!(selected(&model, &rows(4)), vec![2]);
}

// =============================================================================
// Range extension
// =============================================================================

#[test]
fn test_range_from_empty_grows_then_reverses() {
    let rows = rows(5);
    let mut model = SelectionModel::multiple([]);

    model.extend_range(&2, &rows);
    assert_eq!(selected(&model, &rows), vec![2]);
    assert_eq!(model.drag_direction(), Some(DragDirection::Down));

    model.extend_range(&4, &rows);
    assert_eq!(selected(&model, &rows), vec![2, 3, 4]);
    assert_eq!(model.drag_direction(), Some(DragDirection::Down));

    model.extend_range(&1, &rows);
    assert_eq!(selected(&model, &rows), vec![1, 2]);
    assert_eq!(model.drag_direction(), Some(DragDirection::Up));
}

#[test]
fn test_range_shrinks_towards_anchor() {
    let rows = rows(10);
    let mut model = SelectionModel::multiple([3u32]);

    model.extend_range(&7, &rows);
    assert_eq!(selected(&model, &rows), vec![3, 4, 5, 6, 7]);

    model.extend_range(&5, &rows);
    assert_eq!(selected(&model, &rows), vec![3, 4, 5]);
    assert_eq!(model.drag_direction(), Some(DragDirection::Down));
}

#[test]
fn test_range_up_then_down_past_anchor() {
    let rows = rows(10);
    let mut model = SelectionModel::multiple([5u32]);

    model.extend_range(&2, &rows);
    assert_eq!(selected(&model, &rows), vec![2, 3, 4, 5]);
    assert_eq!(model.drag_direction(), Some(DragDirection::Up));

    // Reversing collapses the extended head back onto the anchor.
    model.extend_range(&8, &rows);
    assert_eq!(selected(&model, &rows), vec![5, 6, 7, 8]);
    assert_eq!(model.drag_direction(), Some(DragDirection::Down));
}

#[test]
fn test_range_to_missing_row_is_noop() {
    let rows = rows(5);
    let mut model = SelectionModel::multiple([1u32]);
    assert!(!model.extend_range(&42, &rows));
    assert_eq!(selected(&model, &rows), vec![1]);
    assert_eq!(model.drag_direction(), None);
}

#[test]
fn test_range_follows_render_order() {
    let rows = vec![4u32, 3, 2, 1, 0];
    let mut model = SelectionModel::multiple([3u32]);
    model.extend_range(&1, &rows);
    assert_eq!(selected(&model, &rows), vec![3, 2, 1]);
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Debug, Clone)]
enum SingleOp {
    Select(u32),
    Replace(u32),
    Unselect(u32),
}

fn single_op() -> impl Strategy<Value = SingleOp> {
    prop_oneof![
        (0u32..20).prop_map(SingleOp::Select),
        (0u32..20).prop_map(SingleOp::Replace),
        (0u32..20).prop_map(SingleOp::Unselect),
    ]
}

proptest! {
    #[test]
    fn single_selection_holds_at_most_one(ops in prop::collection::vec(single_op(), 0..64)) {
        let mut model = SelectionModel::single(None);
        for op in ops {
            match op {
                SingleOp::Select(key) => { model.select(key); }
                SingleOp::Replace(key) => { model.replace_with(key); }
                SingleOp::Unselect(key) => { model.unselect(&key); }
            }
            prop_assert!(model.selection().len() <= 1);
        }
    }

    #[test]
    fn range_extension_twice_is_stable(
        initial in prop::collection::hash_set(0u32..30, 0..6),
        clicks in prop::collection::vec(0u32..30, 0..6),
        target in 0u32..30,
    ) {
        let rows: Vec<u32> = (0..30).collect();
        let mut model = SelectionModel::multiple(initial);
        for click in clicks {
            model.extend_range(&click, &rows);
        }

        model.extend_range(&target, &rows);
        let once = model.selection().clone();
        model.extend_range(&target, &rows);
        prop_assert_eq!(model.selection(), &once);
    }
}
