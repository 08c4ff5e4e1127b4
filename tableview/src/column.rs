//! Column metadata and the column catalog.
//!
//! Columns are built once from a plain list, then kept in sync with the
//! externally owned sort truth: the header always mirrors the truth instead
//! of whatever flag a column was constructed with.

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::sort::{SortDescriptor, SortIndicator, find_in_truth};

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// What a header tap does to the tapped column's ascending flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortToggle {
    /// Flip the flag on every tap, even when the column was not the active
    /// sort column and its flag is left over from an earlier sort.
    #[default]
    Always,
    /// Flip only when the column is already active; otherwise make it active
    /// with the flag it currently holds.
    ActiveOnly,
}

/// Column configuration.
///
/// # Examples
///
/// ```
/// use tableview::column::{Alignment, Column};
/// use tableview::sort::SortDescriptor;
///
/// struct File { size: u64, name: String }
///
/// let columns: Vec<Column<File>> = vec![
///     Column::new("Size")
///         .ideal_width(12)
///         .align(Alignment::Right)
///         .sort(SortDescriptor::by_key(|f: &File| f.size)),
///     Column::divider(),
///     Column::new("Name")
///         .min_width(20)
///         .sort(SortDescriptor::by_key(|f: &File| f.name.clone())),
/// ];
/// assert_eq!(columns[0].min_width, Some(12));
/// ```
pub struct Column<R> {
    /// Position in the catalog. Reassigned on every reconciliation.
    pub index: usize,
    /// Header text.
    pub title: String,
    pub min_width: Option<u16>,
    pub ideal_width: Option<u16>,
    pub max_width: Option<u16>,
    pub alignment: Alignment,
    /// This column's descriptor, or the truth entry adopted during
    /// reconciliation.
    pub sort_descriptor: SortDescriptor<R>,
    /// Named text color for cells, resolved by the renderer.
    pub text_color: Option<String>,
    /// Placeholder column drawn as a divider; never sortable.
    pub is_divider: bool,
}

impl<R> Column<R> {
    /// Create a column with the given header text.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            index: 0,
            title: title.into(),
            min_width: None,
            ideal_width: None,
            max_width: None,
            alignment: Alignment::Left,
            sort_descriptor: SortDescriptor::unsorted(),
            text_color: None,
            is_divider: false,
        }
    }

    /// Create a divider placeholder column.
    pub fn divider() -> Self {
        let mut column = Self::new("").ideal_width(1);
        column.is_divider = true;
        column
    }

    /// Pin min, ideal and max width to the same value.
    pub fn fixed(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self.ideal_width = Some(width);
        self.max_width = Some(width);
        self
    }

    /// Set the ideal width. Also pins min and max to it.
    pub fn ideal_width(self, width: u16) -> Self {
        self.fixed(width)
    }

    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Set the max width. The column becomes flexible so the ideal width is
    /// dropped.
    pub fn max_width(mut self, width: u16) -> Self {
        self.max_width = Some(width);
        self.ideal_width = None;
        self
    }

    /// Set the alignment.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set this column's default sort descriptor.
    pub fn sort(mut self, descriptor: SortDescriptor<R>) -> Self {
        self.sort_descriptor = descriptor.column(self.index);
        self
    }

    /// Set a named text color.
    pub fn text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    /// Header chevron for this column's current direction.
    pub fn indicator(&self) -> SortIndicator {
        self.sort_descriptor.indicator()
    }

    /// Width a fixed-cell renderer should use, falling back through
    /// ideal, min and max.
    pub fn preferred_width(&self) -> Option<u16> {
        self.ideal_width.or(self.min_width).or(self.max_width)
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            title: self.title.clone(),
            min_width: self.min_width,
            ideal_width: self.ideal_width,
            max_width: self.max_width,
            alignment: self.alignment,
            sort_descriptor: self.sort_descriptor.clone(),
            text_color: self.text_color.clone(),
            is_divider: self.is_divider,
        }
    }
}

impl<R> PartialEq for Column<R> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.title == other.title
            && self.min_width == other.min_width
            && self.ideal_width == other.ideal_width
            && self.max_width == other.max_width
            && self.alignment == other.alignment
            && self.sort_descriptor == other.sort_descriptor
            && self.text_color == other.text_color
            && self.is_divider == other.is_divider
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("index", &self.index)
            .field("title", &self.title)
            .field("min_width", &self.min_width)
            .field("ideal_width", &self.ideal_width)
            .field("max_width", &self.max_width)
            .field("alignment", &self.alignment)
            .field("sort_descriptor", &self.sort_descriptor)
            .field("text_color", &self.text_color)
            .field("is_divider", &self.is_divider)
            .finish()
    }
}

// =============================================================================
// Catalog operations
// =============================================================================

/// Re-index columns and copy the sort truth into them.
///
/// Every column gets `index` equal to its position. A column with a matching
/// truth entry adopts it; when that entry carries no comparator the column
/// keeps its own comparator and only takes the flag. Other columns keep their
/// own descriptor.
pub fn reconcile<R>(columns: Vec<Column<R>>, truth: &[SortDescriptor<R>]) -> Vec<Column<R>> {
    columns
        .into_iter()
        .enumerate()
        .map(|(index, mut column)| {
            column.index = index;
            match find_in_truth(truth, index) {
                Some(entry) => {
                    let own = column.sort_descriptor.comparator().cloned();
                    column.sort_descriptor = entry.clone();
                    if !entry.has_comparator() {
                        column.sort_descriptor.set_comparator(own);
                    }
                }
                None => column.sort_descriptor.column_index = index,
            }
            column
        })
        .collect()
}

/// Whether `column` is the last one in `columns`.
pub fn is_last_column<R>(columns: &[Column<R>], column: &Column<R>) -> bool {
    columns
        .iter()
        .position(|c| c.index == column.index)
        .is_some_and(|position| position + 1 == columns.len())
}

/// Toggle a tapped column's direction and produce the new truth.
///
/// Returns `None` for divider columns.
pub fn header_tap<R>(column: &mut Column<R>) -> Option<Vec<SortDescriptor<R>>> {
    if column.is_divider {
        return None;
    }
    column.sort_descriptor = column.sort_descriptor.toggle_ascending();
    Some(vec![column.sort_descriptor.clone()])
}

/// Ordered columns plus the sort truth they mirror.
pub struct ColumnCatalog<R> {
    columns: Vec<Column<R>>,
    truth: Vec<SortDescriptor<R>>,
    toggle: SortToggle,
}

impl<R> ColumnCatalog<R> {
    /// Build a catalog and run the first reconciliation.
    pub fn new(columns: Vec<Column<R>>, truth: Vec<SortDescriptor<R>>) -> Self {
        let columns = reconcile(columns, &truth);
        Self {
            columns,
            truth,
            toggle: SortToggle::default(),
        }
    }

    /// Set the header tap policy.
    pub fn with_toggle(mut self, toggle: SortToggle) -> Self {
        self.toggle = toggle;
        self
    }

    pub fn toggle(&self) -> SortToggle {
        self.toggle
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column<R>> {
        self.columns.get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The current sort truth.
    pub fn truth(&self) -> &[SortDescriptor<R>] {
        &self.truth
    }

    /// The column the truth currently sorts by.
    pub fn active_column(&self) -> Option<&Column<R>> {
        self.truth
            .first()
            .and_then(|descriptor| self.columns.get(descriptor.column_index))
    }

    /// Replace the columns, e.g. when a column is shown or hidden.
    pub fn set_columns(&mut self, columns: Vec<Column<R>>) {
        debug!("Rebuilding catalog with {} columns", columns.len());
        self.columns = reconcile(columns, &self.truth);
    }

    /// Replace the truth from outside and mirror it into the columns.
    pub fn set_truth(&mut self, truth: Vec<SortDescriptor<R>>) {
        let columns = std::mem::take(&mut self.columns);
        self.columns = reconcile(columns, &truth);
        self.truth = truth;
    }

    /// Whether the column appears in the truth (bold title and chevron).
    pub fn is_sorted_column(&self, column: &Column<R>) -> bool {
        find_in_truth(&self.truth, column.index).is_some()
    }

    pub fn is_last_column(&self, column: &Column<R>) -> bool {
        is_last_column(&self.columns, column)
    }

    /// Handle a tap on a header cell.
    ///
    /// Returns the new singleton truth, or `None` when the tap did nothing
    /// (unknown index or divider).
    pub fn tap(&mut self, column_index: usize) -> Option<Vec<SortDescriptor<R>>> {
        let active = self
            .columns
            .get(column_index)
            .is_some_and(|column| self.is_sorted_column(column));
        let toggle = self.toggle;
        let column = self.columns.get_mut(column_index)?;

        let truth = match toggle {
            SortToggle::Always => header_tap(column)?,
            SortToggle::ActiveOnly if active => header_tap(column)?,
            SortToggle::ActiveOnly => {
                if column.is_divider {
                    return None;
                }
                vec![column.sort_descriptor.clone()]
            }
        };
        trace!(
            "Header tap on column {} -> ascending={}",
            column_index, column.sort_descriptor.ascending
        );
        self.truth = truth.clone();
        Some(truth)
    }
}

impl<R> Clone for ColumnCatalog<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            truth: self.truth.clone(),
            toggle: self.toggle,
        }
    }
}

impl<R> fmt::Debug for ColumnCatalog<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnCatalog")
            .field("columns", &self.columns)
            .field("truth", &self.truth)
            .field("toggle", &self.toggle)
            .finish()
    }
}
