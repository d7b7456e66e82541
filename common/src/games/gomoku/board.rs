use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::types::{Position, Symbol};

pub const MIN_BOARD_SIZE: usize = 6;
pub const MAX_BOARD_SIZE: usize = 24;

/// Square grid of cells. The side length is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Symbol>>,
}

impl Board {
    pub fn new(size: usize) -> Result<Self, GameError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(GameError::InvalidSettings(format!(
                "Board size must be between {} and {}, got {}",
                MIN_BOARD_SIZE, MAX_BOARD_SIZE, size
            )));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Option<Symbol>, GameError> {
        let index = self.index_of(row, col)?;
        Ok(self.cells[index])
    }

    /// Returns a copy of the board with `symbol` written at `(row, col)`.
    pub fn place(&self, row: usize, col: usize, symbol: Symbol) -> Result<Board, GameError> {
        let index = self.index_of(row, col)?;
        if self.cells[index].is_some() {
            return Err(GameError::CellOccupied(Position::new(row, col)));
        }
        let mut next = self.clone();
        next.cells[index] = Some(symbol);
        Ok(next)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn stone_count(&self) -> usize {
        self.cells.len() - self.empty_count()
    }

    pub fn center(&self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    pub fn available_moves(&self) -> Vec<Position> {
        self.positions()
            .filter(|pos| self.cell(*pos).is_none())
            .collect()
    }

    pub fn stones(&self) -> impl Iterator<Item = (Position, Symbol)> + '_ {
        self.positions()
            .filter_map(|pos| self.cell(pos).map(|symbol| (pos, symbol)))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// Unchecked read for positions already known to be on the board.
    pub(crate) fn cell(&self, pos: Position) -> Option<Symbol> {
        self.cells[pos.row * self.size + pos.col]
    }

    pub(crate) fn is_open(&self, pos: Position) -> bool {
        self.cell(pos).is_none()
    }

    /// Make/unmake for the search engine's scratch copy only.
    pub(crate) fn put(&mut self, pos: Position, symbol: Symbol) {
        self.cells[pos.row * self.size + pos.col] = Some(symbol);
    }

    pub(crate) fn take(&mut self, pos: Position) {
        self.cells[pos.row * self.size + pos.col] = None;
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size * 2 + 1));
        for row in 0..self.size {
            for col in 0..self.size {
                match self.cell(Position::new(row, col)) {
                    Some(symbol) => out.push_str(&symbol.to_string()),
                    None => out.push('.'),
                }
                if col + 1 < self.size {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }

    fn index_of(&self, row: usize, col: usize) -> Result<usize, GameError> {
        if row >= self.size || col >= self.size {
            return Err(GameError::OutOfBounds { row, col, size: self.size });
        }
        Ok(row * self.size + col)
    }

    /// Builds a board from rows of `X`, `O`, `T` and `.` characters.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Board {
        let mut board = Board::new(rows.len()).unwrap();
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().filter(|c| !c.is_whitespace()).enumerate() {
                let symbol = match ch {
                    'X' => Symbol::First,
                    'O' => Symbol::Second,
                    'T' => Symbol::Third,
                    _ => continue,
                };
                board.put(Position::new(row, col), symbol);
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limits() {
        assert!(Board::new(5).is_err());
        assert!(Board::new(25).is_err());
        assert_eq!(Board::new(6).unwrap().size(), 6);
        assert_eq!(Board::new(24).unwrap().empty_count(), 576);
    }

    #[test]
    fn test_place_then_get_every_cell() {
        for size in [MIN_BOARD_SIZE, 11, MAX_BOARD_SIZE] {
            let board = Board::new(size).unwrap();
            for row in 0..size {
                for col in 0..size {
                    let placed = board.place(row, col, Symbol::Second).unwrap();
                    assert_eq!(placed.get(row, col).unwrap(), Some(Symbol::Second));
                    assert_eq!(placed.stone_count(), 1);
                }
            }
        }
    }

    #[test]
    fn test_place_on_occupied_fails() {
        let board = Board::new(8).unwrap().place(2, 3, Symbol::First).unwrap();
        for symbol in Symbol::ALL {
            assert_eq!(
                board.place(2, 3, symbol),
                Err(GameError::CellOccupied(Position::new(2, 3)))
            );
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::new(8).unwrap();
        assert_eq!(board.get(8, 0), Err(GameError::OutOfBounds { row: 8, col: 0, size: 8 }));
        assert!(board.place(0, 8, Symbol::First).is_err());
    }

    #[test]
    fn test_place_does_not_touch_original() {
        let board = Board::new(8).unwrap();
        let _ = board.place(4, 4, Symbol::First).unwrap();
        assert_eq!(board.get(4, 4).unwrap(), None);
    }

    #[test]
    fn test_from_rows_and_render() {
        let board = Board::from_rows(&[
            "X.....",
            ".O....",
            "..T...",
            "......",
            "......",
            "......",
        ]);
        assert_eq!(board.stone_count(), 3);
        assert!(board.render().starts_with("X . . . . .\n. O"));
    }
}
