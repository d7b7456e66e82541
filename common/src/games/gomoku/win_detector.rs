use super::board::Board;
use super::types::{Position, Symbol, WinningLine};

/// Horizontal, vertical, diagonal, anti-diagonal.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

pub const FIVE: usize = 5;
pub const OPEN_FOUR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRun {
    pub length: usize,
    pub open_ends: u8,
    pub start: Position,
    pub end: Position,
}

impl AxisRun {
    /// Five or longer, or exactly four with both extension cells empty.
    pub fn is_winning(&self) -> bool {
        self.length >= FIVE || (self.length == OPEN_FOUR && self.open_ends == 2)
    }
}

/// Counts the run of `symbol` through `pos` along one axis.
pub fn axis_run(board: &Board, pos: Position, symbol: Symbol, axis: (isize, isize)) -> AxisRun {
    let (d_row, d_col) = axis;
    let (forward, forward_open) = walk(board, pos, symbol, d_row, d_col);
    let (backward, backward_open) = walk(board, pos, symbol, -d_row, -d_col);

    AxisRun {
        length: 1 + forward.1 + backward.1,
        open_ends: u8::from(forward_open) + u8::from(backward_open),
        start: backward.0,
        end: forward.0,
    }
}

fn walk(board: &Board, pos: Position, symbol: Symbol, d_row: isize, d_col: isize) -> ((Position, usize), bool) {
    let size = board.size();
    let mut last = pos;
    let mut count = 0;
    loop {
        match last.offset(d_row, d_col, size) {
            Some(next) if board.cell(next) == Some(symbol) => {
                last = next;
                count += 1;
            }
            Some(next) => return ((last, count), board.is_open(next)),
            None => return ((last, count), false),
        }
    }
}

/// Win check from the stone just placed at `pos`. Axes are checked in
/// `AXES` order and the first satisfying one is reported.
pub fn detect_win(board: &Board, pos: Position) -> Option<WinningLine> {
    let symbol = board.cell(pos)?;
    AXES.iter()
        .map(|&axis| axis_run(board, pos, symbol, axis))
        .find(AxisRun::is_winning)
        .map(|run| WinningLine {
            symbol,
            start: run.start,
            end: run.end,
            length: run.length,
            open_ends: run.open_ends,
        })
}

/// Full-board scan, used when a board arrives from outside the rules engine.
pub fn find_any_win(board: &Board) -> Option<WinningLine> {
    board.stones().find_map(|(pos, _)| detect_win(board, pos))
}
