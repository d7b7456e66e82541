use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::super::board::Board;
use super::super::types::{Position, Symbol};

const ZOBRIST_SEED: u64 = 0x6F6D_6F6B_755F_5A42;

/// XOR fingerprints for (cell, symbol) pairs plus the side to move. Placing
/// or removing a stone is a single XOR.
pub struct ZobristTable {
    size: usize,
    stones: Vec<[u64; 3]>,
    to_move: [u64; 3],
}

impl ZobristTable {
    pub fn new(size: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED ^ size as u64);
        let stones = (0..size * size)
            .map(|_| [rng.random(), rng.random(), rng.random()])
            .collect();
        let to_move = [rng.random(), rng.random(), rng.random()];
        Self { size, stones, to_move }
    }

    pub fn hash(&self, board: &Board, to_move: Symbol) -> u64 {
        board
            .stones()
            .fold(self.to_move[to_move.index()], |hash, (pos, symbol)| {
                hash ^ self.stone(pos, symbol)
            })
    }

    #[inline]
    pub fn stone(&self, pos: Position, symbol: Symbol) -> u64 {
        self.stones[pos.row * self.size + pos.col][symbol.index()]
    }

    /// Key change when the move passes from `from` to `to`.
    #[inline]
    pub fn turn(&self, from: Symbol, to: Symbol) -> u64 {
        self.to_move[from.index()] ^ self.to_move[to.index()]
    }
}
