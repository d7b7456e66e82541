use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    First,
    Second,
    Third,
}

impl Symbol {
    pub const ALL: [Symbol; 3] = [Symbol::First, Symbol::Second, Symbol::Third];

    pub fn index(self) -> usize {
        match self {
            Symbol::First => 0,
            Symbol::Second => 1,
            Symbol::Third => 2,
        }
    }

    /// Symbol handed to the seat at `seat_index`.
    pub fn for_seat(seat_index: usize) -> Option<Symbol> {
        Self::ALL.get(seat_index).copied()
    }

    /// Turn order for a session with `seat_count` seats.
    pub fn seating(seat_count: usize) -> Vec<Symbol> {
        Self::ALL.iter().copied().take(seat_count).collect()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self {
            Symbol::First => "X",
            Symbol::Second => "O",
            Symbol::Third => "△",
        };
        write!(f, "{}", mark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbour at signed offset, `None` when it falls outside a board of `size`.
    pub fn offset(&self, d_row: isize, d_col: isize, size: usize) -> Option<Position> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        if row >= size || col >= size {
            return None;
        }
        Some(Position { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub position: Position,
    pub symbol: Symbol,
    pub sequence: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    WaitingForPlayers,
    InProgress,
    Completed,
    Draw,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Draw)
    }

    fn rank(self) -> u8 {
        match self {
            SessionStatus::WaitingForPlayers => 0,
            SessionStatus::InProgress => 1,
            SessionStatus::Completed | SessionStatus::Draw => 2,
        }
    }

    /// Statuses only move forward; terminal states never change.
    pub fn can_advance_to(self, next: SessionStatus) -> bool {
        if self.is_terminal() {
            return self == next;
        }
        next.rank() >= self.rank()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    pub symbol: Symbol,
    pub start: Position,
    pub end: Position,
    pub length: usize,
    pub open_ends: u8,
}
