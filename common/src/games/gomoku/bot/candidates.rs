use super::super::board::Board;
use super::super::types::{Position, Symbol};
use super::evaluator::move_score;

/// Empty cells within `radius` (king moves) of any stone, row-major.
/// An empty board offers only its center; when no empty cell lies within
/// `radius` the whole empty set is offered.
pub fn candidate_cells(board: &Board, radius: usize) -> Vec<Position> {
    let size = board.size();
    if board.stone_count() == 0 {
        return vec![board.center()];
    }

    let mut marked = vec![false; size * size];
    for (pos, _) in board.stones() {
        let rows = pos.row.saturating_sub(radius)..=(pos.row + radius).min(size - 1);
        for row in rows {
            let cols = pos.col.saturating_sub(radius)..=(pos.col + radius).min(size - 1);
            for col in cols {
                marked[row * size + col] = true;
            }
        }
    }

    let nearby: Vec<Position> = board
        .positions()
        .filter(|pos| marked[pos.row * size + pos.col] && board.is_open(*pos))
        .collect();
    if nearby.is_empty() {
        return board.available_moves();
    }
    nearby
}

/// Sorts `moves` best-first for `symbol`. Equal scores keep row-major order.
pub fn order_moves(board: &Board, moves: &mut [Position], symbol: Symbol, turn_order: &[Symbol]) {
    let mut scored: Vec<(i64, Position)> = moves
        .iter()
        .map(|&pos| (move_score(board, pos, symbol, turn_order), pos))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    for (slot, (_, pos)) in moves.iter_mut().zip(scored) {
        *slot = pos;
    }
}

/// Moves `preferred` to the front, inserting it when the list lacks it.
pub fn promote(moves: &mut Vec<Position>, preferred: Position, board: &Board) {
    match moves.iter().position(|&pos| pos == preferred) {
        Some(index) => moves[..=index].rotate_right(1),
        None if board.is_open(preferred) => moves.insert(0, preferred),
        None => {}
    }
}
