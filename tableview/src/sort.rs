//! Sort descriptors for table columns.
//!
//! A descriptor pairs a column index, an ascending flag and a comparator.
//! Equality only looks at the column index and the flag: comparators are
//! closures and get rebuilt on every render, while callers that only know
//! indices still need to compare descriptors.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Comparator over two row values, returning their ascending order.
pub type Comparator<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// Direction chevron drawn next to the active column title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortIndicator {
    Ascending,
    Descending,
}

impl SortIndicator {
    /// Glyph used by terminal renderers.
    pub fn symbol(&self) -> &'static str {
        match self {
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
        }
    }
}

/// Comparator-free snapshot of a descriptor.
///
/// This is what gets handed to the rendering layer or persisted by callers
/// that only track which column is sorted and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub column_index: usize,
    pub ascending: bool,
}

/// Sort descriptor for one column.
pub struct SortDescriptor<R> {
    /// Index of the column this descriptor belongs to.
    pub column_index: usize,
    /// Sort direction.
    pub ascending: bool,
    compare: Option<Comparator<R>>,
}

impl<R> SortDescriptor<R> {
    /// Create a descriptor from an ascending comparator.
    ///
    /// Defaults to descending on column 0, use [`ascending`](Self::ascending)
    /// and [`column`](Self::column) to adjust.
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&R, &R) -> Ordering + Send + Sync + 'static,
    {
        Self {
            column_index: 0,
            ascending: false,
            compare: Some(Arc::new(compare)),
        }
    }

    /// Create a descriptor that orders rows by a projected key.
    pub fn by_key<V, F>(key: F) -> Self
    where
        V: Ord,
        F: Fn(&R) -> V + Send + Sync + 'static,
    {
        Self::new(move |lhs, rhs| key(lhs).cmp(&key(rhs)))
    }

    /// Create a descriptor without a comparator.
    ///
    /// Used for icon/spacer columns and for sort truth built by callers that
    /// only know column indices. Every pair of rows compares equal.
    pub fn unsorted() -> Self {
        Self {
            column_index: 0,
            ascending: false,
            compare: None,
        }
    }

    /// Create a comparator-free descriptor from a snapshot.
    pub fn from_state(state: SortState) -> Self {
        Self::unsorted()
            .column(state.column_index)
            .ascending(state.ascending)
    }

    /// Set the ascending flag.
    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Set the column index.
    pub fn column(mut self, column_index: usize) -> Self {
        self.column_index = column_index;
        self
    }

    /// Return a copy with the ascending flag flipped.
    pub fn toggle_ascending(&self) -> Self {
        let mut toggled = self.clone();
        toggled.ascending = !toggled.ascending;
        toggled
    }

    /// Whether this descriptor can actually order rows.
    pub fn has_comparator(&self) -> bool {
        self.compare.is_some()
    }

    pub(crate) fn comparator(&self) -> Option<&Comparator<R>> {
        self.compare.as_ref()
    }

    pub(crate) fn set_comparator(&mut self, compare: Option<Comparator<R>>) {
        self.compare = compare;
    }

    /// Compare two rows in this descriptor's direction.
    pub fn compare(&self, lhs: &R, rhs: &R) -> Ordering {
        let Some(compare) = &self.compare else {
            return Ordering::Equal;
        };
        if self.ascending {
            compare(lhs, rhs)
        } else {
            compare(rhs, lhs)
        }
    }

    /// Stable-sort rows in place. No-op without a comparator.
    pub fn sort(&self, rows: &mut [R]) {
        if self.compare.is_none() {
            return;
        }
        rows.sort_by(|lhs, rhs| self.compare(lhs, rhs));
    }

    /// Header chevron for the current direction.
    pub fn indicator(&self) -> SortIndicator {
        if self.ascending {
            SortIndicator::Ascending
        } else {
            SortIndicator::Descending
        }
    }

    /// Snapshot without the comparator.
    pub fn state(&self) -> SortState {
        SortState {
            column_index: self.column_index,
            ascending: self.ascending,
        }
    }
}

impl<R> Clone for SortDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            column_index: self.column_index,
            ascending: self.ascending,
            compare: self.compare.clone(),
        }
    }
}

impl<R> PartialEq for SortDescriptor<R> {
    fn eq(&self, other: &Self) -> bool {
        self.column_index == other.column_index && self.ascending == other.ascending
    }
}

impl<R> Eq for SortDescriptor<R> {}

impl<R> fmt::Debug for SortDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("column_index", &self.column_index)
            .field("ascending", &self.ascending)
            .field("comparator", &self.compare.is_some())
            .finish()
    }
}

impl<R> From<SortState> for SortDescriptor<R> {
    fn from(state: SortState) -> Self {
        Self::from_state(state)
    }
}

/// Find the truth entry for a column, if any.
pub fn find_in_truth<R>(truth: &[SortDescriptor<R>], column_index: usize) -> Option<&SortDescriptor<R>> {
    truth.iter().find(|d| d.column_index == column_index)
}

/// Snapshot a whole truth list.
pub fn truth_states<R>(truth: &[SortDescriptor<R>]) -> Vec<SortState> {
    truth.iter().map(SortDescriptor::state).collect()
}
