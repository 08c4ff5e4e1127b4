//! The table facade.
//!
//! [`Table`] owns the rows, the column catalog with its sort truth, the
//! selection model and the drag accumulator. The rendering layer resolves
//! pointer positions to row keys and feeds [`TableInput`]s in; it reads the
//! selection and header state back out and drains [`TableUpdate`]s to know
//! what to repaint.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use log::{debug, trace, warn};

use crate::column::{Column, ColumnCatalog, SortToggle};
use crate::config::TableConfig;
use crate::drag::{DragSelector, Point};
use crate::error::TableError;
use crate::input::{EventResult, KeyCombo, Modifiers, TableInput};
use crate::keyboard;
use crate::selection::{DragDirection, Selection, SelectionModel, SelectionType};
use crate::sort::SortDescriptor;

/// A row that can be shown in a [`Table`].
pub trait TableRow {
    /// Stable identity of the row, independent of sort order.
    type Key: Clone + Eq + Hash + fmt::Debug;

    /// Cell content produced for the rendering layer.
    type Cell;

    fn key(&self) -> Self::Key;

    /// Cell content for the column at `column_index`.
    fn cell(&self, column_index: usize) -> Self::Cell;
}

/// A state change the rendering layer should react to.
pub enum TableUpdate<R: TableRow> {
    /// The selection changed; carries the new selection.
    SelectionChanged(Selection<R::Key>),
    /// The sort truth changed.
    SortChanged(Vec<SortDescriptor<R>>),
    /// Row order changed after a re-sort.
    RowsReordered,
}

impl<R: TableRow> Clone for TableUpdate<R> {
    fn clone(&self) -> Self {
        match self {
            Self::SelectionChanged(selection) => Self::SelectionChanged(selection.clone()),
            Self::SortChanged(truth) => Self::SortChanged(truth.clone()),
            Self::RowsReordered => Self::RowsReordered,
        }
    }
}

impl<R: TableRow> PartialEq for TableUpdate<R> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SelectionChanged(a), Self::SelectionChanged(b)) => a == b,
            (Self::SortChanged(a), Self::SortChanged(b)) => a == b,
            (Self::RowsReordered, Self::RowsReordered) => true,
            _ => false,
        }
    }
}

impl<R: TableRow> fmt::Debug for TableUpdate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectionChanged(selection) => {
                f.debug_tuple("SelectionChanged").field(selection).finish()
            }
            Self::SortChanged(truth) => f.debug_tuple("SortChanged").field(truth).finish(),
            Self::RowsReordered => f.write_str("RowsReordered"),
        }
    }
}

/// Selection and ordering state of one table.
pub struct Table<R: TableRow> {
    /// Rows in render order.
    rows: Vec<R>,
    /// Keys of `rows`, same order.
    keys: Vec<R::Key>,
    catalog: ColumnCatalog<R>,
    selection: SelectionModel<R::Key>,
    drag: DragSelector<R::Key>,
    /// Between a drag start and a drag end.
    dragging: bool,
    /// Reorder `rows` when the sort truth changes.
    sort_rows: bool,
    updates: Vec<TableUpdate<R>>,
}

impl<R: TableRow> Table<R> {
    /// Create a table with no initial sort or selection.
    pub fn new(
        columns: Vec<Column<R>>,
        rows: Vec<R>,
        selection_type: SelectionType,
    ) -> Result<Self, TableError> {
        TableConfig::new()
            .selection_type(selection_type)
            .columns(columns)
            .build(rows)
    }

    pub(crate) fn from_parts(
        rows: Vec<R>,
        columns: Vec<Column<R>>,
        truth: Vec<SortDescriptor<R>>,
        mut selection: SelectionModel<R::Key>,
        toggle: SortToggle,
        sort_rows: bool,
    ) -> Result<Self, TableError> {
        let keys = unique_keys(&rows)?;
        let known: HashSet<&R::Key> = keys.iter().collect();
        if selection.retain(|key| known.contains(key)) {
            debug!("Dropped initial selection keys with no matching row");
        }

        let mut table = Self {
            rows,
            keys,
            catalog: ColumnCatalog::new(columns, truth).with_toggle(toggle),
            selection,
            drag: DragSelector::new(),
            dragging: false,
            sort_rows,
            updates: Vec::new(),
        };
        table.resort();
        Ok(table)
    }

    // -------------------------------------------------------------------------
    // Row access
    // -------------------------------------------------------------------------

    /// Rows in render order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Row keys in render order.
    pub fn row_keys(&self) -> &[R::Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a row in render order.
    pub fn index_of(&self, key: &R::Key) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Replace all rows.
    ///
    /// Ends any drag in progress, drops selected keys that no longer exist
    /// and re-sorts if the table sorts its own rows.
    pub fn set_rows(&mut self, rows: Vec<R>) -> Result<(), TableError> {
        let keys = unique_keys(&rows)?;
        self.end_drag();

        debug!("Replacing {} rows with {}", self.rows.len(), rows.len());
        self.rows = rows;
        self.keys = keys;

        let known: HashSet<&R::Key> = self.keys.iter().collect();
        if self.selection.retain(|key| known.contains(key)) {
            self.selection_changed();
        }
        self.resort();
        self.updates.push(TableUpdate::RowsReordered);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Columns and sorting
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &[Column<R>] {
        self.catalog.columns()
    }

    pub fn column(&self, index: usize) -> Option<&Column<R>> {
        self.catalog.column(index)
    }

    pub fn catalog(&self) -> &ColumnCatalog<R> {
        &self.catalog
    }

    /// The current sort truth.
    pub fn sort_descriptors(&self) -> &[SortDescriptor<R>] {
        self.catalog.truth()
    }

    /// Whether the header of `column` shows the sort chevron.
    pub fn is_sorted_column(&self, column: &Column<R>) -> bool {
        self.catalog.is_sorted_column(column)
    }

    /// Whether a trailing divider should be omitted after `column`.
    pub fn is_last_column(&self, column: &Column<R>) -> bool {
        self.catalog.is_last_column(column)
    }

    /// Replace the columns, e.g. when a column is shown or hidden. The new
    /// list is re-indexed and mirrors the current sort truth.
    pub fn set_columns(&mut self, columns: Vec<Column<R>>) {
        self.catalog.set_columns(columns);
    }

    /// Replace the sort truth from outside.
    pub fn set_sort_descriptors(
        &mut self,
        truth: Vec<SortDescriptor<R>>,
    ) -> Result<(), TableError> {
        if let Some(descriptor) = truth.iter().find(|d| d.column_index >= self.catalog.len()) {
            return Err(TableError::UnknownSortColumn {
                column_index: descriptor.column_index,
                column_count: self.catalog.len(),
            });
        }
        self.end_drag();
        self.catalog.set_truth(truth.clone());
        self.updates.push(TableUpdate::SortChanged(truth));
        if self.resort() {
            self.updates.push(TableUpdate::RowsReordered);
        }
        Ok(())
    }

    /// Tap on a header cell.
    pub fn header_tap(&mut self, column_index: usize) -> EventResult {
        if self.drag.is_active() {
            warn!("Ignoring header tap on column {column_index} during drag");
            return EventResult::Ignored;
        }
        let Some(truth) = self.catalog.tap(column_index) else {
            trace!("Header tap on column {column_index} did nothing");
            return EventResult::Ignored;
        };

        debug!("Sort truth is now {truth:?}");
        self.updates.push(TableUpdate::SortChanged(truth));
        if self.resort() {
            self.updates.push(TableUpdate::RowsReordered);
        }
        EventResult::Consumed
    }

    /// Re-sort rows by the active column. Returns true if the order changed.
    fn resort(&mut self) -> bool {
        if !self.sort_rows {
            return false;
        }
        let Some(descriptor) = self
            .catalog
            .active_column()
            .map(|column| column.sort_descriptor.clone())
        else {
            return false;
        };
        if !descriptor.has_comparator() {
            return false;
        }

        descriptor.sort(&mut self.rows);
        let keys: Vec<R::Key> = self.rows.iter().map(R::key).collect();
        if keys == self.keys {
            return false;
        }
        trace!("Rows reordered by column {}", descriptor.column_index);
        self.keys = keys;
        true
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selection_type(&self) -> SelectionType {
        self.selection.selection_type()
    }

    pub fn selection(&self) -> &Selection<R::Key> {
        self.selection.selection()
    }

    pub fn selection_model(&self) -> &SelectionModel<R::Key> {
        &self.selection
    }

    pub fn is_selected(&self, key: &R::Key) -> bool {
        self.selection.is_selected(key)
    }

    /// Direction of the live end of the current range, if any.
    pub fn drag_direction(&self) -> Option<DragDirection> {
        self.selection.drag_direction()
    }

    /// Indexes of the selected rows in render order, ascending.
    pub fn selected_indexes(&self) -> Vec<usize> {
        self.selection.selected_indexes(&self.keys)
    }

    /// Select every row. Multiple selection only.
    pub fn select_all(&mut self) -> bool {
        let changed = self.selection.select_all(&self.keys);
        if changed {
            self.selection_changed();
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        self.selection.reset_drag_direction();
        if changed {
            self.selection_changed();
        }
        changed
    }

    /// Forget the drag accumulator and the range direction.
    pub fn clear_drag_state(&mut self) {
        self.drag.end();
        self.selection.reset_drag_direction();
    }

    fn selection_changed(&mut self) {
        self.updates
            .push(TableUpdate::SelectionChanged(self.selection.selection().clone()));
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Dispatch one input event.
    pub fn handle(&mut self, input: TableInput<R::Key>) -> EventResult {
        match input {
            TableInput::Click { row, modifiers } => self.click(row, modifiers),
            TableInput::DragStart { modifiers } => self.drag_start(modifiers),
            TableInput::DragMove {
                row,
                location,
                predicted_end,
            } => self.drag_move(row, location, predicted_end),
            TableInput::DragEnd => self.drag_end(),
            TableInput::Key(combo) => self.key(&combo),
            TableInput::HeaderTap { column } => self.header_tap(column),
        }
    }

    /// Click on a row.
    ///
    /// Single selection ignores modifiers. Multiple: shift extends the
    /// range, ctrl toggles the row, a plain click replaces the selection.
    pub fn click(&mut self, row: R::Key, modifiers: Modifiers) -> EventResult {
        if self.index_of(&row).is_none() {
            debug!("Click on unknown row {row:?}");
            return EventResult::Ignored;
        }

        let changed = match self.selection.selection_type() {
            SelectionType::Single => {
                self.clear_drag_state();
                self.selection.replace_with(row)
            }
            SelectionType::Multiple if modifiers.shift => {
                self.selection.extend_range(&row, &self.keys)
            }
            SelectionType::Multiple if modifiers.ctrl => self.selection.toggle(row),
            SelectionType::Multiple => {
                self.clear_drag_state();
                self.selection.replace_with(row)
            }
        };

        if changed {
            self.selection_changed();
        }
        EventResult::Consumed
    }

    /// Pointer pressed and started moving.
    ///
    /// In a multiple-selection table a plain drag starts over, while a drag
    /// with ctrl or shift held paints on top of the current selection.
    pub fn drag_start(&mut self, modifiers: Modifiers) -> EventResult {
        let fresh = self.selection.selection_type() == SelectionType::Multiple
            && !modifiers.ctrl
            && !modifiers.shift;
        trace!("Drag start (fresh: {fresh})");
        self.drag.begin(fresh);
        self.dragging = true;
        EventResult::Consumed
    }

    /// One drag sample. `row` is the hit-tested row under the pointer.
    pub fn drag_move(
        &mut self,
        row: Option<R::Key>,
        location: Point,
        predicted_end: Point,
    ) -> EventResult {
        if !self.dragging {
            debug!("Drag sample without drag start");
            self.drag_start(Modifiers::NONE);
        }
        let row = row.filter(|key| self.index_of(key).is_some());
        if row.is_none() {
            debug!("Drag sample at {location:?} resolved to no row");
            return EventResult::Ignored;
        }

        if self
            .drag
            .sample(&mut self.selection, row, location, predicted_end)
        {
            self.selection_changed();
        }
        EventResult::Consumed
    }

    /// Pointer released.
    pub fn drag_end(&mut self) -> EventResult {
        if !self.dragging {
            return EventResult::Ignored;
        }
        self.end_drag();
        EventResult::Consumed
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn end_drag(&mut self) {
        if self.dragging {
            trace!("Drag end");
            self.clear_drag_state();
            self.dragging = false;
        }
    }

    /// Key press while the table has focus. Only Up and Down are handled.
    pub fn key(&mut self, combo: &KeyCombo) -> EventResult {
        let Some(target) = keyboard::resolve(&self.selection, &self.keys, combo) else {
            return EventResult::Ignored;
        };
        let Some(row) = self.keys.get(target.index).cloned() else {
            return EventResult::Ignored;
        };
        self.click(row, target.modifiers)
    }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// Take the updates queued since the last call, oldest first.
    pub fn drain_updates(&mut self) -> Vec<TableUpdate<R>> {
        std::mem::take(&mut self.updates)
    }
}

impl<R: TableRow> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("keys", &self.keys)
            .field("catalog", &self.catalog)
            .field("selection", &self.selection)
            .field("dragging", &self.dragging)
            .field("sort_rows", &self.sort_rows)
            .finish_non_exhaustive()
    }
}

fn unique_keys<R: TableRow>(rows: &[R]) -> Result<Vec<R::Key>, TableError> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut keys = Vec::with_capacity(rows.len());
    for row in rows {
        let key = row.key();
        if !seen.insert(key.clone()) {
            return Err(TableError::DuplicateRowKey {
                key: format!("{key:?}"),
            });
        }
        keys.push(key);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        rank: u32,
    }

    impl TableRow for Item {
        type Key = u32;
        type Cell = String;

        fn key(&self) -> u32 {
            self.id
        }

        fn cell(&self, _column_index: usize) -> String {
            self.rank.to_string()
        }
    }

    fn items(n: u32) -> Vec<Item> {
        (0..n).map(|id| Item { id, rank: n - id }).collect()
    }

    fn columns() -> Vec<Column<Item>> {
        vec![
            Column::new("Id").sort(SortDescriptor::by_key(|i: &Item| i.id)),
            Column::new("Rank").sort(SortDescriptor::by_key(|i: &Item| i.rank)),
        ]
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let rows = vec![Item { id: 1, rank: 0 }, Item { id: 1, rank: 1 }];
        let err = Table::new(columns(), rows, SelectionType::Single).unwrap_err();
        assert_eq!(err, TableError::DuplicateRowKey { key: "1".into() });
    }

    #[test]
    fn test_click_unknown_row_ignored() {
        let mut table = Table::new(columns(), items(3), SelectionType::Single).unwrap();
        assert_eq!(table.click(9, Modifiers::NONE), EventResult::Ignored);
        assert!(table.drain_updates().is_empty());
    }

    #[test]
    fn test_single_click_ignores_modifiers() {
        let mut table = Table::new(columns(), items(3), SelectionType::Single).unwrap();
        table.click(1, Modifiers::NONE);
        table.click(2, Modifiers::CTRL);
        assert_eq!(table.selection(), &Selection::Single(Some(2)));
    }

    #[test]
    fn test_header_tap_resorts_rows() {
        let mut table = Table::new(columns(), items(3), SelectionType::Multiple).unwrap();
        assert_eq!(table.row_keys(), &[0, 1, 2]);

        // Rank column starts descending; first tap flips it to ascending.
        assert!(table.header_tap(1).is_handled());
        assert_eq!(table.row_keys(), &[2, 1, 0]);
        let updates = table.drain_updates();
        assert!(matches!(updates[0], TableUpdate::SortChanged(_)));
        assert_eq!(updates[1], TableUpdate::RowsReordered);
    }

    #[test]
    fn test_header_tap_ignored_while_dragging() {
        let mut table = Table::new(columns(), items(3), SelectionType::Multiple).unwrap();
        table.drag_start(Modifiers::NONE);
        table.drag_move(Some(0), Point::new(0.0, 1.0), Point::new(0.0, 2.0));
        assert_eq!(table.header_tap(1), EventResult::Ignored);
        assert!(table.sort_descriptors().is_empty());
    }

    #[test]
    fn test_key_other_than_arrow_ignored() {
        let mut table = Table::new(columns(), items(3), SelectionType::Single).unwrap();
        assert_eq!(
            table.key(&KeyCombo::key(Key::Char('x'))),
            EventResult::Ignored
        );
    }

    #[test]
    fn test_set_rows_drops_stale_selection() {
        let mut table = Table::new(columns(), items(4), SelectionType::Multiple).unwrap();
        table.click(1, Modifiers::NONE);
        table.click(3, Modifiers::CTRL);
        table.drain_updates();

        table.set_rows(items(2)).unwrap();
        assert_eq!(table.selected_indexes(), vec![1]);
        assert!(!table.is_selected(&3));
    }
}
