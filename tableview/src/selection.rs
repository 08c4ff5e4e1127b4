//! Row selection state.
//!
//! Selection is tracked by row key, so it survives re-sorting. A table is
//! either single- or multiple-selection for its whole lifetime; the
//! [`Selection`] variant never changes after construction.

use std::collections::HashSet;
use std::hash::Hash;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Selection cardinality, fixed per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    /// At most one row.
    #[default]
    Single,
    /// Any number of rows (ctrl+click, shift+range, drag painting).
    Multiple,
}

/// Vertical direction of a drag sample or of the live end of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragDirection {
    Up,
    Down,
}

/// The selected keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<K: Eq + Hash> {
    Single(Option<K>),
    Multiple(HashSet<K>),
}

impl<K: Eq + Hash> Selection<K> {
    /// Empty selection of the given type.
    pub fn empty(selection_type: SelectionType) -> Self {
        match selection_type {
            SelectionType::Single => Selection::Single(None),
            SelectionType::Multiple => Selection::Multiple(HashSet::new()),
        }
    }

    pub fn selection_type(&self) -> SelectionType {
        match self {
            Selection::Single(_) => SelectionType::Single,
            Selection::Multiple(_) => SelectionType::Multiple,
        }
    }

    pub fn is_selected(&self, key: &K) -> bool {
        match self {
            Selection::Single(current) => current.as_ref() == Some(key),
            Selection::Multiple(set) => set.contains(key),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Single(current) => usize::from(current.is_some()),
            Selection::Multiple(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate selected keys (unordered for multiple selection).
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        let (single, multiple) = match self {
            Selection::Single(current) => (current.as_ref(), None),
            Selection::Multiple(set) => (None, Some(set)),
        };
        single.into_iter().chain(multiple.into_iter().flatten())
    }

    /// The selected key of a single-selection table.
    pub fn as_single(&self) -> Option<&K> {
        match self {
            Selection::Single(current) => current.as_ref(),
            Selection::Multiple(_) => None,
        }
    }

    /// The selected keys of a multiple-selection table.
    pub fn as_multiple(&self) -> Option<&HashSet<K>> {
        match self {
            Selection::Single(_) => None,
            Selection::Multiple(set) => Some(set),
        }
    }
}

/// Selection plus the direction memory used for range extension.
#[derive(Debug, Clone)]
pub struct SelectionModel<K: Eq + Hash> {
    selection: Selection<K>,
    drag_direction: Option<DragDirection>,
}

impl<K: Clone + Eq + Hash> SelectionModel<K> {
    /// Create an empty model.
    pub fn new(selection_type: SelectionType) -> Self {
        Self {
            selection: Selection::empty(selection_type),
            drag_direction: None,
        }
    }

    /// Single-selection model, optionally pre-seeded.
    pub fn single(initial: Option<K>) -> Self {
        Self {
            selection: Selection::Single(initial),
            drag_direction: None,
        }
    }

    /// Multiple-selection model, pre-seeded with `initial`.
    pub fn multiple(initial: impl IntoIterator<Item = K>) -> Self {
        Self {
            selection: Selection::Multiple(initial.into_iter().collect()),
            drag_direction: None,
        }
    }

    pub fn selection_type(&self) -> SelectionType {
        self.selection.selection_type()
    }

    pub fn selection(&self) -> &Selection<K> {
        &self.selection
    }

    /// Direction of the live end of the current range, if any.
    ///
    /// Always `None` for single selection.
    pub fn drag_direction(&self) -> Option<DragDirection> {
        self.drag_direction
    }

    pub fn reset_drag_direction(&mut self) {
        self.drag_direction = None;
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selection.is_selected(key)
    }

    /// Select a key. Single replaces, multiple inserts.
    /// Returns true if the selection changed.
    pub fn select(&mut self, key: K) -> bool {
        match &mut self.selection {
            Selection::Single(current) => {
                if current.as_ref() == Some(&key) {
                    return false;
                }
                *current = Some(key);
                true
            }
            Selection::Multiple(set) => set.insert(key),
        }
    }

    /// Unselect a key.
    ///
    /// Single selection has only one possible value, so it is cleared
    /// whatever `key` is. Returns true if the selection changed.
    pub fn unselect(&mut self, key: &K) -> bool {
        match &mut self.selection {
            Selection::Single(current) => current.take().is_some(),
            Selection::Multiple(set) => set.remove(key),
        }
    }

    /// Plain click: make `key` the only selected row.
    pub fn replace_with(&mut self, key: K) -> bool {
        if self.selection_type() == SelectionType::Single {
            return self.select(key);
        }
        let Selection::Multiple(set) = &mut self.selection else {
            return false;
        };
        if set.len() == 1 && set.contains(&key) {
            return false;
        }
        set.clear();
        set.insert(key);
        true
    }

    /// Ctrl/command click: flip one row.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.is_selected(&key) {
            self.unselect(&key)
        } else {
            self.select(key)
        }
    }

    /// Clear the selection. Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        match &mut self.selection {
            Selection::Single(current) => current.take().is_some(),
            Selection::Multiple(set) => {
                let changed = !set.is_empty();
                set.clear();
                changed
            }
        }
    }

    /// Select every row. No-op for single selection.
    pub fn select_all(&mut self, rows: &[K]) -> bool {
        let Selection::Multiple(set) = &mut self.selection else {
            return false;
        };
        let before = set.len();
        set.extend(rows.iter().cloned());
        set.len() != before
    }

    /// Drop selected keys that fail `keep`. Returns true if any were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) -> bool {
        match &mut self.selection {
            Selection::Single(current) => {
                if current.as_ref().is_some_and(|key| !keep(key)) {
                    *current = None;
                    return true;
                }
                false
            }
            Selection::Multiple(set) => {
                let before = set.len();
                set.retain(|key| keep(key));
                set.len() != before
            }
        }
    }

    /// Positions of the selected keys in `rows`, ascending.
    pub fn selected_indexes(&self, rows: &[K]) -> Vec<usize> {
        rows.iter()
            .enumerate()
            .filter(|(_, key)| self.selection.is_selected(key))
            .map(|(index, _)| index)
            .collect()
    }

    /// Shift+click: grow or shrink the contiguous range towards `to`.
    ///
    /// `rows` is the current render order. The selection is replaced by the
    /// range between the anchor end and `to`; reversing past the anchor
    /// collapses the previously extended tail first. An empty selection
    /// anchors at `to` itself.
    ///
    /// Only applies to multiple selection. Returns true if the selection
    /// changed.
    pub fn extend_range(&mut self, to: &K, rows: &[K]) -> bool {
        if self.selection_type() != SelectionType::Multiple {
            trace!("Range extension ignored for single selection");
            return false;
        }
        let Some(click_index) = rows.iter().position(|key| key == to) else {
            debug!("Range extension target not in current rows");
            return false;
        };

        let selected_indexes = self.selected_indexes(rows);
        let mut lower = selected_indexes.first().copied().unwrap_or(0);
        let mut upper = selected_indexes.last().copied().unwrap_or(0);
        let prior = self.drag_direction;

        let direction = match prior {
            Some(DragDirection::Up) if click_index < upper => DragDirection::Up,
            Some(DragDirection::Up) => DragDirection::Down,
            _ if click_index > lower => DragDirection::Down,
            _ => DragDirection::Up,
        };

        if selected_indexes.is_empty() {
            lower = click_index;
            upper = click_index;
        } else {
            match direction {
                DragDirection::Up => {
                    if prior == Some(DragDirection::Down) {
                        upper = lower;
                    }
                    lower = click_index;
                }
                DragDirection::Down => {
                    if prior == Some(DragDirection::Up) {
                        lower = upper;
                    }
                    upper = click_index;
                }
            }
        }

        if lower > upper {
            debug!("Inverted range {lower}..={upper}, collapsing to {click_index}");
            lower = click_index;
            upper = click_index;
        }

        let range: HashSet<K> = rows[lower..=upper].iter().cloned().collect();
        trace!("Range extension {prior:?} -> {direction:?}, rows {lower}..={upper}");

        self.drag_direction = Some(direction);
        let changed = self.selection.as_multiple() != Some(&range);
        self.selection = Selection::Multiple(range);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("r{i}")).collect()
    }

    fn key(i: usize) -> String {
        format!("r{i}")
    }

    fn set(ids: &[usize]) -> HashSet<String> {
        ids.iter().map(|&i| key(i)).collect()
    }

    #[test]
    fn test_single_select_replaces() {
        let mut model = SelectionModel::single(None);
        assert!(model.select(key(1)));
        assert!(model.select(key(2)));
        assert!(!model.select(key(2)));
        assert_eq!(model.selection(), &Selection::Single(Some(key(2))));
    }

    #[test]
    fn test_single_unselect_clears_regardless_of_key() {
        let mut model = SelectionModel::single(Some(key(1)));
        assert!(model.unselect(&key(5)));
        assert!(model.selection().is_empty());
        assert!(!model.unselect(&key(5)));
    }

    #[test]
    fn test_multiple_select_is_idempotent() {
        let mut model = SelectionModel::new(SelectionType::Multiple);
        assert!(model.select(key(1)));
        assert!(!model.select(key(1)));
        assert_eq!(model.selection().len(), 1);
    }

    #[test]
    fn test_replace_with_clears_others() {
        let mut model = SelectionModel::multiple([key(1), key(2), key(3)]);
        assert!(model.replace_with(key(2)));
        assert_eq!(model.selection().as_multiple(), Some(&set(&[2])));
        assert!(!model.replace_with(key(2)));
    }

    #[test]
    fn test_toggle() {
        let mut model = SelectionModel::multiple([key(1)]);
        model.toggle(key(1));
        model.toggle(key(2));
        assert_eq!(model.selection().as_multiple(), Some(&set(&[2])));
    }

    #[test]
    fn test_extend_range_missing_target_is_noop() {
        let mut model = SelectionModel::multiple([key(1)]);
        assert!(!model.extend_range(&key(99), &rows(5)));
        assert_eq!(model.selection().as_multiple(), Some(&set(&[1])));
        assert_eq!(model.drag_direction(), None);
    }

    #[test]
    fn test_extend_range_single_is_noop() {
        let mut model = SelectionModel::single(Some(key(1)));
        assert!(!model.extend_range(&key(3), &rows(5)));
        assert_eq!(model.selection().as_single(), Some(&key(1)));
    }

    #[test]
    fn test_extend_range_from_plain_click_grows_up() {
        let rows = rows(6);
        let mut model = SelectionModel::new(SelectionType::Multiple);
        model.replace_with(key(3));

        model.extend_range(&key(1), &rows);
        assert_eq!(model.selection().as_multiple(), Some(&set(&[1, 2, 3])));
        assert_eq!(model.drag_direction(), Some(DragDirection::Up));

        // shrinking from the live end keeps the anchor
        model.extend_range(&key(2), &rows);
        assert_eq!(model.selection().as_multiple(), Some(&set(&[2, 3])));
    }

    #[test]
    fn test_extend_range_reversal_below_anchor() {
        let rows = rows(6);
        let mut model = SelectionModel::new(SelectionType::Multiple);
        model.replace_with(key(3));
        model.extend_range(&key(1), &rows);

        // reverse past the anchor: the upper tail collapses to the anchor
        model.extend_range(&key(5), &rows);
        assert_eq!(model.selection().as_multiple(), Some(&set(&[3, 4, 5])));
        assert_eq!(model.drag_direction(), Some(DragDirection::Down));
    }

    #[test]
    fn test_clear_and_select_all() {
        let rows = rows(3);
        let mut model = SelectionModel::new(SelectionType::Multiple);
        assert!(model.select_all(&rows));
        assert!(!model.select_all(&rows));
        assert_eq!(model.selected_indexes(&rows), vec![0, 1, 2]);
        assert!(model.clear());
        assert!(!model.clear());
    }

    #[test]
    fn test_retain_drops_missing_keys() {
        let mut model = SelectionModel::multiple([key(1), key(4)]);
        assert!(model.retain(|k| k != &key(4)));
        assert_eq!(model.selection().as_multiple(), Some(&set(&[1])));

        let mut model = SelectionModel::single(Some(key(1)));
        assert!(!model.retain(|_| true));
        assert!(model.retain(|_| false));
        assert!(model.selection().is_empty());
    }

    #[test]
    fn test_iter_covers_both_variants() {
        let single = Selection::Single(Some(key(0)));
        assert_eq!(single.iter().count(), 1);
        let multiple = Selection::Multiple(set(&[0, 1]));
        assert_eq!(multiple.iter().count(), 2);
        assert_eq!(Selection::<String>::empty(SelectionType::Single).iter().count(), 0);
    }
}
