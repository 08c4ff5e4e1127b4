//! Drag painting over rows.
//!
//! While the pointer is dragged across rows in a multiple-selection table,
//! each touched row remembers the sequence of directions it was crossed in.
//! A row crossed an odd number of times (unequal up/down counts) ends up
//! selected, an even number cancels out. Dragging down paints rows, dragging
//! back up over them unpaints them.

use std::collections::HashMap;
use std::hash::Hash;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::selection::{DragDirection, SelectionModel, SelectionType};

/// Pointer location in the collaborator's coordinate space (y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Classify a sample by comparing where the pointer is with where the
/// gesture is predicted to end. Ties count as `Up`.
pub fn sample_direction(location: Point, predicted_end: Point) -> DragDirection {
    if location.y < predicted_end.y {
        DragDirection::Down
    } else {
        DragDirection::Up
    }
}

/// Direction history of one row within a gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraggedRow {
    directions: Vec<DragDirection>,
}

impl DraggedRow {
    fn seeded(direction: DragDirection) -> Self {
        Self {
            directions: vec![direction],
        }
    }

    /// Record a direction unless it repeats the last one.
    pub fn push(&mut self, direction: DragDirection) {
        if self.directions.last() != Some(&direction) {
            self.directions.push(direction);
        }
    }

    pub fn directions(&self) -> &[DragDirection] {
        &self.directions
    }

    /// Selected when the up and down counts differ.
    pub fn is_selected(&self) -> bool {
        let ups = self
            .directions
            .iter()
            .filter(|&&d| d == DragDirection::Up)
            .count();
        ups * 2 != self.directions.len()
    }
}

/// Accumulator for one continuous drag gesture.
#[derive(Debug, Clone)]
pub struct DragSelector<K> {
    rows: HashMap<K, DraggedRow>,
    fresh: bool,
}

impl<K> Default for DragSelector<K> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            fresh: false,
        }
    }
}

impl<K: Clone + Eq + Hash> DragSelector<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture.
    ///
    /// With `fresh` set, the first sample clears whatever was selected before
    /// and forgets the range direction.
    pub fn begin(&mut self, fresh: bool) {
        self.rows.clear();
        self.fresh = fresh;
    }

    /// Whether any row has been touched in the current gesture.
    pub fn is_active(&self) -> bool {
        !self.rows.is_empty()
    }

    /// History recorded for a row in the current gesture.
    pub fn history(&self, key: &K) -> Option<&DraggedRow> {
        self.rows.get(key)
    }

    /// Apply one pointer sample. `row` is the row under the pointer as
    /// resolved by the caller's hit testing.
    ///
    /// Returns true if the selection changed.
    pub fn sample(
        &mut self,
        model: &mut SelectionModel<K>,
        row: Option<K>,
        location: Point,
        predicted_end: Point,
    ) -> bool {
        let Some(key) = row else {
            debug!("Drag sample at {location:?} hit no row");
            return false;
        };

        if model.selection_type() == SelectionType::Single {
            return model.select(key);
        }

        let direction = sample_direction(location, predicted_end);
        let mut changed = false;

        if self.rows.is_empty() {
            if self.fresh {
                changed |= model.clear();
                model.reset_drag_direction();
                self.fresh = false;
            }
            self.rows.insert(key.clone(), DraggedRow::seeded(direction));
        }
        self.rows.entry(key).or_default().push(direction);
        trace!("Drag {direction:?} over {} touched rows", self.rows.len());

        for (key, history) in &self.rows {
            changed |= if history.is_selected() {
                model.select(key.clone())
            } else {
                model.unselect(key)
            };
        }
        changed
    }

    /// End the gesture. The selection already holds the result.
    pub fn end(&mut self) {
        self.rows.clear();
        self.fresh = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOWN: (Point, Point) = (Point::new(0.0, 10.0), Point::new(0.0, 20.0));
    const UP: (Point, Point) = (Point::new(0.0, 20.0), Point::new(0.0, 10.0));

    #[test]
    fn test_sample_direction_ties_are_up() {
        assert_eq!(sample_direction(DOWN.0, DOWN.1), DragDirection::Down);
        assert_eq!(sample_direction(UP.0, UP.1), DragDirection::Up);
        let p = Point::new(3.0, 5.0);
        assert_eq!(sample_direction(p, p), DragDirection::Up);
    }

    #[test]
    fn test_dragged_row_collapses_repeats() {
        let mut row = DraggedRow::default();
        row.push(DragDirection::Down);
        row.push(DragDirection::Down);
        row.push(DragDirection::Up);
        row.push(DragDirection::Up);
        assert_eq!(row.directions(), &[DragDirection::Down, DragDirection::Up]);
        assert!(!row.is_selected());
        row.push(DragDirection::Down);
        assert!(row.is_selected());
    }

    #[test]
    fn test_miss_is_ignored() {
        let mut model = SelectionModel::<u32>::new(SelectionType::Multiple);
        let mut drag = DragSelector::new();
        drag.begin(true);
        assert!(!drag.sample(&mut model, None, DOWN.0, DOWN.1));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_single_selection_follows_pointer() {
        let mut model = SelectionModel::single(Some(1u32));
        let mut drag = DragSelector::new();
        drag.begin(true);
        drag.sample(&mut model, Some(2), DOWN.0, DOWN.1);
        drag.sample(&mut model, Some(3), UP.0, UP.1);
        assert_eq!(model.selection().as_single(), Some(&3));
        // no direction tracking for single selection
        assert!(!drag.is_active());
    }

    #[test]
    fn test_fresh_gesture_clears_prior_selection() {
        let mut model = SelectionModel::multiple([7u32, 8]);
        let mut drag = DragSelector::new();
        drag.begin(true);
        drag.sample(&mut model, Some(1), DOWN.0, DOWN.1);
        assert_eq!(model.selection().len(), 1);
        assert!(model.is_selected(&1));
    }

    #[test]
    fn test_additive_gesture_keeps_prior_selection() {
        let mut model = SelectionModel::multiple([7u32]);
        let mut drag = DragSelector::new();
        drag.begin(false);
        drag.sample(&mut model, Some(1), DOWN.0, DOWN.1);
        assert!(model.is_selected(&7));
        assert!(model.is_selected(&1));
    }

    #[test]
    fn test_paint_then_unpaint() {
        let mut model = SelectionModel::new(SelectionType::Multiple);
        let mut drag = DragSelector::new();
        drag.begin(true);
        for key in [1u32, 2, 3] {
            drag.sample(&mut model, Some(key), DOWN.0, DOWN.1);
        }
        assert_eq!(model.selection().len(), 3);

        // come back up over 3 and 2
        drag.sample(&mut model, Some(3), UP.0, UP.1);
        drag.sample(&mut model, Some(2), UP.0, UP.1);
        assert!(model.is_selected(&1));
        assert!(!model.is_selected(&2));
        assert!(!model.is_selected(&3));

        drag.end();
        assert!(!drag.is_active());
        assert!(model.is_selected(&1));
    }
}
