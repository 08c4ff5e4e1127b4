//! Table construction.

use std::collections::HashSet;

use log::debug;

use crate::column::{Column, SortToggle};
use crate::error::TableError;
use crate::selection::{SelectionModel, SelectionType};
use crate::sort::SortDescriptor;
use crate::table::{Table, TableRow};

/// Builder for a [`Table`].
///
/// # Examples
///
/// ```
/// use tableview::prelude::*;
///
/// #[derive(Clone)]
/// struct Car { id: u32, year: u16 }
///
/// impl TableRow for Car {
///     type Key = u32;
///     type Cell = String;
///     fn key(&self) -> u32 { self.id }
///     fn cell(&self, _column_index: usize) -> String { self.year.to_string() }
/// }
///
/// let table = TableConfig::new()
///     .selection_type(SelectionType::Multiple)
///     .columns(vec![Column::new("Year").sort(SortDescriptor::by_key(|c: &Car| c.year))])
///     .sort(vec![SortDescriptor::unsorted().column(0).ascending(true)])
///     .build(vec![Car { id: 1, year: 2004 }, Car { id: 2, year: 1999 }])
///     .unwrap();
///
/// assert_eq!(table.row_keys(), &[2, 1]);
/// ```
pub struct TableConfig<R: TableRow> {
    selection_type: SelectionType,
    columns: Vec<Column<R>>,
    sort: Vec<SortDescriptor<R>>,
    selection: Vec<R::Key>,
    sort_toggle: SortToggle,
    sort_rows: bool,
}

impl<R: TableRow> Default for TableConfig<R> {
    fn default() -> Self {
        Self {
            selection_type: SelectionType::Single,
            columns: Vec::new(),
            sort: Vec::new(),
            selection: Vec::new(),
            sort_toggle: SortToggle::Always,
            sort_rows: true,
        }
    }
}

impl<R: TableRow> TableConfig<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection cardinality (default single).
    pub fn selection_type(mut self, selection_type: SelectionType) -> Self {
        self.selection_type = selection_type;
        self
    }

    /// Column definitions, in display order.
    pub fn columns(mut self, columns: Vec<Column<R>>) -> Self {
        self.columns = columns;
        self
    }

    /// Initial sort truth.
    pub fn sort(mut self, truth: Vec<SortDescriptor<R>>) -> Self {
        self.sort = truth;
        self
    }

    /// Initially selected rows.
    pub fn selection(mut self, keys: impl IntoIterator<Item = R::Key>) -> Self {
        self.selection = keys.into_iter().collect();
        self
    }

    /// Header tap policy.
    pub fn sort_toggle(mut self, toggle: SortToggle) -> Self {
        self.sort_toggle = toggle;
        self
    }

    /// Whether the table reorders its rows when the sort truth changes
    /// (default true). Turn off when the caller sorts.
    pub fn sort_rows(mut self, sort_rows: bool) -> Self {
        self.sort_rows = sort_rows;
        self
    }

    /// Validate and build the table.
    pub fn build(self, rows: Vec<R>) -> Result<Table<R>, TableError> {
        if self.selection_type == SelectionType::Single {
            let distinct: HashSet<&R::Key> = self.selection.iter().collect();
            if distinct.len() > 1 {
                return Err(TableError::SelectionCardinality {
                    count: distinct.len(),
                });
            }
        }
        if let Some(descriptor) = self
            .sort
            .iter()
            .find(|d| d.column_index >= self.columns.len())
        {
            return Err(TableError::UnknownSortColumn {
                column_index: descriptor.column_index,
                column_count: self.columns.len(),
            });
        }

        let selection = match self.selection_type {
            SelectionType::Single => SelectionModel::single(self.selection.into_iter().next()),
            SelectionType::Multiple => SelectionModel::multiple(self.selection),
        };
        debug!(
            "Building {:?} table with {} columns and {} rows",
            self.selection_type,
            self.columns.len(),
            rows.len()
        );

        Table::from_parts(
            rows,
            self.columns,
            self.sort,
            selection,
            self.sort_toggle,
            self.sort_rows,
        )
    }
}
