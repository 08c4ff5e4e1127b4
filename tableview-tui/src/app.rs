//! Event loop and drawing.
//!
//! Line 0 is the header, the last line is the status bar and every line in
//! between is one row. Mouse positions are hit tested here and handed to the
//! table as row keys and column indexes.

use std::io::{self, Write};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use log::{debug, info, trace};
use tableview::keyboard;
use tableview::prelude::*;

use crate::data::Car;
use crate::error::AppError;
use crate::terminal::Screen;

const HEADER_ROWS: u16 = 1;
const STATUS_ROWS: u16 = 1;
const DIVIDER: &str = "│";

/// Left button held down on a row.
#[derive(Debug, Clone, Copy)]
struct Press {
    x: u16,
    y: u16,
    modifiers: Modifiers,
    last_y: u16,
    /// Sign of the last vertical motion, 0 before any.
    last_step: i32,
    dragging: bool,
}

pub struct App {
    table: Table<Car>,
    /// Index of the first visible row.
    offset: usize,
    /// Number of visible row lines.
    viewport: u16,
    press: Option<Press>,
    quit: bool,
}

impl App {
    pub fn new(table: Table<Car>) -> Self {
        Self {
            table,
            offset: 0,
            viewport: 0,
            press: None,
            quit: false,
        }
    }

    pub fn run(&mut self, screen: &mut Screen) -> Result<(), AppError> {
        while !self.quit {
            let (width, height) = screen.size()?;
            self.viewport = height.saturating_sub(HEADER_ROWS + STATUS_ROWS);
            self.draw(screen.stdout(), width, height)?;

            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
                Event::Mouse(mouse) => self.on_mouse(mouse),
                Event::Resize(width, height) => debug!("Resized to {width}x{height}"),
                _ => {}
            }

            for update in self.table.drain_updates() {
                debug!("{update:?}");
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("Quit requested");
                self.quit = true;
            }
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.table.select_all();
            }
            KeyCode::Char('c') => {
                self.table.clear_selection();
            }
            _ => {
                if self.table.key(&KeyCombo::from(key)).is_handled() {
                    let current = keyboard::current_row_index(
                        self.table.selection_model(),
                        self.table.row_keys(),
                    );
                    self.scroll_to(current);
                } else {
                    trace!("Unhandled key {:?}", key.code);
                }
            }
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let modifiers = Modifiers::from(mouse.modifiers);
        let (x, y) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if y < HEADER_ROWS => {
                if let Some(column) = column_at(&self.widths(), x) {
                    self.table.handle(TableInput::HeaderTap { column });
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(row) = self.row_at(y) {
                    self.table.click(row, modifiers);
                    self.press = Some(Press {
                        x,
                        y,
                        modifiers,
                        last_y: y,
                        last_step: 0,
                        dragging: false,
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => self.on_drag(x, y),
            MouseEventKind::Up(MouseButton::Left) => {
                if self.press.take().is_some_and(|press| press.dragging) {
                    self.table.drag_end();
                }
            }
            MouseEventKind::ScrollDown => self.scroll_by(1),
            MouseEventKind::ScrollUp => self.scroll_by(-1),
            _ => {}
        }
    }

    fn on_drag(&mut self, x: u16, y: u16) {
        let Some(mut press) = self.press.take() else {
            return;
        };
        // Sideways motion carries no direction.
        if y != press.last_y {
            if !press.dragging {
                self.table.drag_start(press.modifiers);
                press.dragging = true;
                let row = self.row_at(press.y);
                self.table
                    .drag_move(row, point(x, i32::from(press.y)), point(x, i32::from(y)));
            }

            let step = if y > press.last_y { 1 } else { -1 };
            let mut previous = i32::from(press.last_y);

            // On a turn the row under the pointer is crossed again.
            if press.last_step != 0 && step != press.last_step {
                let row = self.row_at(press.last_y);
                self.table
                    .drag_move(row, point(x, previous), point(x, previous + step));
            }

            // Terminal drags can jump several lines at once; sample each one.
            while previous != i32::from(y) {
                let current = previous + step;
                let row = u16::try_from(current).ok().and_then(|line| self.row_at(line));
                self.table
                    .drag_move(row, point(x, current), point(x, current + step));
                previous = current;
            }
            press.last_y = y;
            press.last_step = step;
        }
        self.press = Some(press);
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    fn widths(&self) -> Vec<u16> {
        self.table.columns().iter().map(column_width).collect()
    }

    /// Key of the row drawn on line `y`.
    fn row_at(&self, y: u16) -> Option<String> {
        let line = usize::from(y.checked_sub(HEADER_ROWS)?);
        if line >= usize::from(self.viewport) {
            return None;
        }
        self.table.row_keys().get(self.offset + line).cloned()
    }

    fn scroll_to(&mut self, index: usize) {
        let viewport = usize::from(self.viewport).max(1);
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + viewport {
            self.offset = index + 1 - viewport;
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max_offset = self.table.len().saturating_sub(usize::from(self.viewport));
        self.offset = self.offset.saturating_add_signed(delta).min(max_offset);
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    fn draw(&self, out: &mut impl Write, width: u16, height: u16) -> io::Result<()> {
        let widths = self.widths();
        let columns = self.table.columns();

        queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for (column, &column_width) in columns.iter().zip(&widths) {
            if column.is_divider {
                queue!(out, Print(DIVIDER))?;
            } else if self.table.is_sorted_column(column) {
                let title = format!("{} {}", column.title, column.indicator().symbol());
                queue!(
                    out,
                    SetAttribute(Attribute::Bold),
                    Print(align_cell(&title, column_width, column.alignment)),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(out, Print(align_cell(&column.title, column_width, column.alignment)))?;
            }
            if !self.table.is_last_column(column) {
                queue!(out, Print(" "))?;
            }
        }

        let visible = self
            .table
            .rows()
            .iter()
            .skip(self.offset)
            .take(usize::from(self.viewport));
        for (y, row) in (HEADER_ROWS..).zip(visible) {
            queue!(out, cursor::MoveTo(0, y))?;
            if self.table.is_selected(&row.key()) {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            for (column, &column_width) in columns.iter().zip(&widths) {
                if column.is_divider {
                    queue!(out, Print(DIVIDER))?;
                } else {
                    if let Some(color) = column.text_color.as_deref().and_then(color_for) {
                        queue!(out, SetForegroundColor(color))?;
                    }
                    let text = align_cell(&row.cell(column.index), column_width, column.alignment);
                    queue!(out, Print(text), ResetColor)?;
                }
                if !self.table.is_last_column(column) {
                    queue!(out, Print(" "))?;
                }
            }
            queue!(out, SetAttribute(Attribute::Reset))?;
        }

        queue!(
            out,
            cursor::MoveTo(0, height.saturating_sub(STATUS_ROWS)),
            SetAttribute(Attribute::Dim),
            Print(align_cell(&self.status(), width, Alignment::Left)),
            SetAttribute(Attribute::Reset)
        )?;
        out.flush()
    }

    fn status(&self) -> String {
        let sort = self
            .table
            .catalog()
            .active_column()
            .map(|column| format!("{} {}", column.title, column.indicator().symbol()))
            .unwrap_or_else(|| "none".to_string());
        format!(
            " {}/{} selected | sort: {} | {:?} | q quit, ctrl+a all, c clear",
            self.table.selection().len(),
            self.table.len(),
            sort,
            self.table.selection_type(),
        )
    }
}

fn point(x: u16, y: i32) -> Point {
    Point::new(f32::from(x), y as f32)
}

fn column_width(column: &Column<Car>) -> u16 {
    column.preferred_width().unwrap_or_else(|| {
        let title = u16::try_from(column.title.chars().count()).unwrap_or(u16::MAX);
        title.saturating_add(2).max(8)
    })
}

/// Index of the column drawn at `x`, counting the one-cell gap after each
/// column as part of it.
fn column_at(widths: &[u16], x: u16) -> Option<usize> {
    let mut end = 0u16;
    for (index, &width) in widths.iter().enumerate() {
        end = end.saturating_add(width).saturating_add(1);
        if x < end {
            return Some(index);
        }
    }
    None
}

/// Truncate or pad `text` to exactly `width` cells.
fn align_cell(text: &str, width: u16, alignment: Alignment) -> String {
    let width = usize::from(width);
    let text: String = text.chars().take(width).collect();
    match alignment {
        Alignment::Left => format!("{text:<width$}"),
        Alignment::Center => format!("{text:^width$}"),
        Alignment::Right => format!("{text:>width$}"),
    }
}

fn color_for(name: &str) -> Option<Color> {
    match name {
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "grey" | "gray" => Some(Color::Grey),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    fn app(viewport: u16) -> App {
        let table = Table::new(data::columns(), data::sample(), SelectionType::Multiple).unwrap();
        let mut app = App::new(table);
        app.viewport = viewport;
        app
    }

    #[test]
    fn test_column_at() {
        let widths = [6, 1, 10];
        assert_eq!(column_at(&widths, 0), Some(0));
        assert_eq!(column_at(&widths, 6), Some(0));
        assert_eq!(column_at(&widths, 7), Some(1));
        assert_eq!(column_at(&widths, 9), Some(2));
        assert_eq!(column_at(&widths, 20), None);
    }

    #[test]
    fn test_align_cell() {
        assert_eq!(align_cell("abc", 5, Alignment::Left), "abc  ");
        assert_eq!(align_cell("abc", 5, Alignment::Right), "  abc");
        assert_eq!(align_cell("abcdef", 4, Alignment::Center), "abcd");
    }

    #[test]
    fn test_row_at_respects_header_and_scroll() {
        let mut app = app(5);
        assert_eq!(app.row_at(0), None);
        assert_eq!(app.row_at(1).as_deref(), Some("c01"));
        assert_eq!(app.row_at(6), None);

        app.scroll_by(2);
        assert_eq!(app.row_at(1).as_deref(), Some("c03"));
    }

    #[test]
    fn test_drag_down_paints_crossed_rows() {
        let mut app = app(10);
        let press = |kind, row| MouseEvent {
            kind,
            column: 2,
            row,
            modifiers: KeyModifiers::NONE,
        };

        app.on_mouse(press(MouseEventKind::Down(MouseButton::Left), 2));
        app.on_mouse(press(MouseEventKind::Drag(MouseButton::Left), 5));
        app.on_mouse(press(MouseEventKind::Up(MouseButton::Left), 5));

        let selected: Vec<_> = app
            .table
            .selected_indexes()
            .into_iter()
            .map(|index| app.table.row_keys()[index].clone())
            .collect();
        assert_eq!(selected, vec!["c02", "c03", "c04", "c05"]);
        assert!(!app.table.is_dragging());
    }

    #[test]
    fn test_drag_reversal_unpaints_turning_row() {
        let mut app = app(10);
        let press = |kind, row| MouseEvent {
            kind,
            column: 2,
            row,
            modifiers: KeyModifiers::NONE,
        };

        app.on_mouse(press(MouseEventKind::Down(MouseButton::Left), 2));
        app.on_mouse(press(MouseEventKind::Drag(MouseButton::Left), 5));
        app.on_mouse(press(MouseEventKind::Drag(MouseButton::Left), 3));
        app.on_mouse(press(MouseEventKind::Up(MouseButton::Left), 3));

        let selected: Vec<_> = app
            .table
            .selected_indexes()
            .into_iter()
            .map(|index| app.table.row_keys()[index].clone())
            .collect();
        assert_eq!(selected, vec!["c02"]);
    }

    #[test]
    fn test_header_click_sorts() {
        let mut app = app(10);
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.table.sort_descriptors()[0].column_index, 0);
        assert_eq!(app.table.row_keys()[0], "c17");
    }
}
