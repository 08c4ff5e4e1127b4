//! Arrow-key navigation.
//!
//! Up/Down become a click on the neighbouring row. The click goes through
//! the same path as a pointer click, so shift+arrow extends the range the
//! same way shift+click does.

use std::hash::Hash;

use log::trace;

use crate::input::{Key, KeyCombo, Modifiers};
use crate::selection::{DragDirection, SelectionModel, SelectionType};

/// Direction of an arrow key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Up,
    Down,
}

impl Navigation {
    /// The navigation a key maps to, if any.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Up => Some(Navigation::Up),
            Key::Down => Some(Navigation::Down),
            _ => None,
        }
    }
}

/// Row to click and the modifiers to click it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTarget {
    pub index: usize,
    pub modifiers: Modifiers,
}

/// Index the arrow keys move away from.
///
/// Single: the selected row, or 0. Multiple: the live end of the range
/// (lowest when extending up, highest when extending down), otherwise the
/// lowest selected row, or 0.
pub fn current_row_index<K: Clone + Eq + Hash>(model: &SelectionModel<K>, rows: &[K]) -> usize {
    let indexes = model.selected_indexes(rows);
    let first = indexes.first().copied().unwrap_or(0);
    match model.selection_type() {
        SelectionType::Single => first,
        SelectionType::Multiple => match model.drag_direction() {
            Some(DragDirection::Down) => indexes.last().copied().unwrap_or(0),
            Some(DragDirection::Up) | None => first,
        },
    }
}

/// Resolve an arrow key into the row it should click.
///
/// Returns `None` if the key is not an arrow or the move would leave the
/// row list. The ctrl and alt modifiers are stripped; shift is kept.
pub fn resolve<K: Clone + Eq + Hash>(
    model: &SelectionModel<K>,
    rows: &[K],
    combo: &KeyCombo,
) -> Option<NavigationTarget> {
    let navigation = Navigation::from_key(combo.key)?;
    let current = current_row_index(model, rows);

    let index = match navigation {
        Navigation::Up => current.checked_sub(1)?,
        Navigation::Down => {
            let next = current + 1;
            if next >= rows.len() {
                trace!("Arrow down at last row {current}");
                return None;
            }
            next
        }
    };

    Some(NavigationTarget {
        index,
        modifiers: Modifiers {
            shift: combo.modifiers.shift,
            ..Modifiers::NONE
        },
    })
}
