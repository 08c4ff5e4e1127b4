pub mod column;
pub mod config;
pub mod drag;
pub mod error;
pub mod input;
pub mod keyboard;
pub mod selection;
pub mod sort;
pub mod table;

pub use config::TableConfig;
pub use error::TableError;
pub use table::{Table, TableRow, TableUpdate};

pub mod prelude {
    pub use crate::column::{Alignment, Column, ColumnCatalog, SortToggle};
    pub use crate::config::TableConfig;
    pub use crate::drag::{DragSelector, DraggedRow, Point};
    pub use crate::error::TableError;
    pub use crate::input::{EventResult, Key, KeyCombo, Modifiers, TableInput};
    pub use crate::selection::{DragDirection, Selection, SelectionModel, SelectionType};
    pub use crate::sort::{SortDescriptor, SortIndicator, SortState};
    pub use crate::table::{Table, TableRow, TableUpdate};
}
