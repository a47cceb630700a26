/// Board coordinates, cursor movement and the shared board widget
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell as TableCell, Row, Table},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 1-based cell number in row-major order, as printed on the board.
    pub fn number(self, size: usize) -> usize {
        self.row * size + self.col + 1
    }

    pub fn from_number(number: usize, size: usize) -> Option<Self> {
        if number == 0 || number > size * size {
            return None;
        }
        let idx = number - 1;
        Some(Self::new(idx / size, idx % size))
    }

    pub fn in_board(self, size: usize) -> bool {
        self.row < size && self.col < size
    }
}

/// Keyboard cursor clamped to an N×N board
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub cell: Cell,
    size: usize,
}

impl Cursor {
    pub fn new(size: usize) -> Self {
        Self { cell: Cell::new(0, 0), size }
    }

    /// Returns true when the key was a movement key.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let last = self.size.saturating_sub(1);
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.cell.row = self.cell.row.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.cell.row = (self.cell.row + 1).min(last),
            KeyCode::Left | KeyCode::Char('h') => self.cell.col = self.cell.col.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => self.cell.col = (self.cell.col + 1).min(last),
            _ => return false,
        }
        true
    }
}

/// Header / status / board / footer split used by every puzzle screen
pub fn screen_chunks(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Status
            Constraint::Min(0),    // Board
            Constraint::Length(3), // Footer
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

pub fn cursor_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
}

/// Builds an N×N table; `paint` decides the glyph and style of each cell.
pub fn board_table<'a, F>(size: usize, title: &'a str, cursor: Option<Cell>, paint: F) -> Table<'a>
where
    F: Fn(Cell) -> (String, Style),
{
    let mut rows = vec![Row::new(
        std::iter::once(TableCell::from(" "))
            .chain((0..size).map(|c| TableCell::from(format!("{c}"))))
            .collect::<Vec<_>>(),
    )];

    for row in 0..size {
        let mut cells = vec![TableCell::from(format!("{row}"))];
        for col in 0..size {
            let cell = Cell::new(row, col);
            let (glyph, style) = paint(cell);
            let style = if cursor == Some(cell) { cursor_style() } else { style };
            cells.push(TableCell::from(glyph).style(style));
        }
        rows.push(Row::new(cells));
    }

    Table::new(rows, std::iter::repeat(Constraint::Length(4)).take(size + 1).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::White))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_is_row_major_and_one_based() {
        assert_eq!(Cell::new(0, 0).number(3), 1);
        assert_eq!(Cell::new(1, 1).number(3), 5);
        assert_eq!(Cell::from_number(8, 3), Some(Cell::new(2, 1)));
        assert_eq!(Cell::from_number(0, 3), None);
        assert_eq!(Cell::from_number(10, 3), None);
    }

    #[test]
    fn cursor_stays_on_board() {
        let mut cursor = Cursor::new(3);
        assert!(cursor.handle_key(KeyCode::Up));
        assert_eq!(cursor.cell, Cell::new(0, 0));
        for _ in 0..5 {
            cursor.handle_key(KeyCode::Right);
            cursor.handle_key(KeyCode::Down);
        }
        assert_eq!(cursor.cell, Cell::new(2, 2));
        assert!(!cursor.handle_key(KeyCode::Enter));
    }
}
