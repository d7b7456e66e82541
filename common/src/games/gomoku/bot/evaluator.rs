use super::super::board::Board;
use super::super::types::{Position, Symbol};
use super::super::win_detector::{AXES, axis_run};

/// Run weights. A four with both ends open never shows up in a searched
/// position because placing it ends the game.
pub struct PatternScore;

impl PatternScore {
    pub const FIVE: i64 = 10_000_000;
    pub const OPEN_FOUR: i64 = 5_000_000;
    pub const CLOSED_FOUR: i64 = 100_000;
    pub const OPEN_THREE: i64 = 50_000;
    pub const CLOSED_THREE: i64 = 2_000;
    pub const OPEN_TWO: i64 = 1_000;
    pub const CLOSED_TWO: i64 = 100;
    pub const OPEN_ONE: i64 = 10;
    pub const CLOSED_ONE: i64 = 1;
}

pub fn run_score(length: usize, open_ends: u8) -> i64 {
    match (length, open_ends) {
        (5.., _) => PatternScore::FIVE,
        (_, 0) => 0,
        (4, 2) => PatternScore::OPEN_FOUR,
        (4, _) => PatternScore::CLOSED_FOUR,
        (3, 2) => PatternScore::OPEN_THREE,
        (3, _) => PatternScore::CLOSED_THREE,
        (2, 2) => PatternScore::OPEN_TWO,
        (2, _) => PatternScore::CLOSED_TWO,
        (_, 2) => PatternScore::OPEN_ONE,
        _ => PatternScore::CLOSED_ONE,
    }
}

/// Sum of run weights for every maximal run of `symbol`.
pub fn symbol_score(board: &Board, symbol: Symbol) -> i64 {
    let size = board.size();
    let mut score = 0;
    for (pos, stone) in board.stones() {
        if stone != symbol {
            continue;
        }
        for &(d_row, d_col) in &AXES {
            // Count each run once, from its first stone.
            let starts_run = pos
                .offset(-d_row, -d_col, size)
                .is_none_or(|prev| board.cell(prev) != Some(symbol));
            if !starts_run {
                continue;
            }
            let run = axis_run(board, pos, symbol, (d_row, d_col));
            score += run_score(run.length, run.open_ends);
        }
    }
    score
}

/// Position value from `mover`'s side: its own runs minus every opponent's.
pub fn evaluate(board: &Board, mover: Symbol, turn_order: &[Symbol]) -> i64 {
    turn_order.iter().fold(0, |total, &symbol| {
        let score = symbol_score(board, symbol);
        if symbol == mover { total + score } else { total - score }
    })
}

/// Ordering key for a candidate: what `symbol` gains by playing there plus
/// what it denies the other seats. Central cells break ties.
pub fn move_score(board: &Board, pos: Position, symbol: Symbol, turn_order: &[Symbol]) -> i64 {
    let mut score = 0;
    for &other in turn_order {
        let gain: i64 = AXES
            .iter()
            .map(|&axis| {
                let run = axis_run(board, pos, other, axis);
                run_score(run.length, run.open_ends)
            })
            .sum();
        score += if other == symbol { gain } else { gain * 9 / 10 };
    }

    let center = (board.size() / 2) as isize;
    let distance = (pos.row as isize - center).abs().max((pos.col as isize - center).abs());
    score - distance as i64
}
