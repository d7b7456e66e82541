use std::borrow::Cow;
use std::time::{Duration, Instant};

use super::super::board::Board;
use super::super::error::GameError;
use super::super::session::GomokuSession;
use super::super::types::{Position, Symbol};
use super::super::win_detector::detect_win;
use super::candidates::{candidate_cells, order_moves, promote};
use super::difficulty::{DepthPolicy, Difficulty};
use super::evaluator::evaluate;
use super::search_config::SearchConfig;
use super::transposition::{Bound, Entry, TranspositionTable};
use super::zobrist::ZobristTable;

/// Score of a won position, reduced by the ply it is reached at so that
/// shorter wins and longer losses are preferred.
pub const WIN_SCORE: i64 = 1_000_000_000_000;
const WIN_THRESHOLD: i64 = WIN_SCORE - 10_000;
const INFINITY: i64 = i64::MAX / 2;
pub const TIME_CHECK_INTERVAL: u64 = 64;

#[derive(Debug, Clone)]
pub struct BotInput {
    pub board: Board,
    pub mover: Symbol,
    pub turn_order: Vec<Symbol>,
}

impl BotInput {
    pub fn from_session(session: &GomokuSession) -> Self {
        let turn_order = session.turn_order();
        let mover = session
            .current_seat()
            .map_or(Symbol::First, |seat| seat.symbol);
        Self {
            board: session.board().clone(),
            mover,
            turn_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiSearchResult {
    pub position: Position,
    /// From the mover's side; positive favours the mover.
    pub evaluation_score: f64,
    pub depth_reached: u8,
    pub elapsed: Duration,
    pub nodes: u64,
}

pub fn compute_move(
    input: &BotInput,
    difficulty: Difficulty,
    config: &SearchConfig,
) -> Result<AiSearchResult, GameError> {
    let started = Instant::now();
    let empty = input.board.empty_count();
    if empty == 0 {
        return Err(GameError::NoLegalMoves);
    }
    let depth_cap = empty.min(u8::MAX as usize) as u8;

    let input = seated(input);
    let mut searcher = Searcher::new(&input, config);
    let (position, score, depth_reached) = match difficulty.depth_policy(config.expert_budget()) {
        DepthPolicy::Fixed(depth) => {
            let depth = depth.min(depth_cap);
            let (position, score) = searcher
                .search_root(depth, None)
                .ok_or(GameError::NoLegalMoves)?;
            (position, score, depth)
        }
        DepthPolicy::IterativeDeepening { budget } => {
            let deadline = started + budget;
            searcher.deadline = Some(deadline);

            let mut best: Option<(Position, i64, u8)> = None;
            for depth in 1..=config.expert_max_depth.min(depth_cap) {
                let Some((position, score)) = searcher.search_root(depth, best.map(|b| b.0)) else {
                    break;
                };
                best = Some((position, score, depth));
                if score.abs() >= WIN_THRESHOLD || Instant::now() >= deadline {
                    break;
                }
            }

            match best {
                Some(found) => found,
                None => {
                    let position = searcher
                        .root_candidates()
                        .first()
                        .copied()
                        .ok_or(GameError::NoLegalMoves)?;
                    (position, evaluate(&input.board, input.mover, &input.turn_order), 0)
                }
            }
        }
    };

    Ok(AiSearchResult {
        position,
        evaluation_score: score as f64,
        depth_reached,
        elapsed: started.elapsed(),
        nodes: searcher.nodes,
    })
}

// An empty turn order means the usual seating; a mover missing from it
// plays first.
fn seated(input: &BotInput) -> Cow<'_, BotInput> {
    if input.turn_order.contains(&input.mover) {
        return Cow::Borrowed(input);
    }
    let mut turn_order = if input.turn_order.is_empty() {
        Symbol::seating((input.mover.index() + 1).max(2))
    } else {
        input.turn_order.clone()
    };
    if !turn_order.contains(&input.mover) {
        turn_order.insert(0, input.mover);
    }
    Cow::Owned(BotInput {
        board: input.board.clone(),
        mover: input.mover,
        turn_order,
    })
}

// Paranoid: every seat other than the root minimizes the root's score.
struct Searcher<'a> {
    board: Board,
    root: Symbol,
    turn_order: &'a [Symbol],
    config: &'a SearchConfig,
    zobrist: Option<ZobristTable>,
    table: Option<TranspositionTable>,
    hash: u64,
    nodes: u64,
    deadline: Option<Instant>,
    aborted: bool,
}

impl<'a> Searcher<'a> {
    fn new(input: &'a BotInput, config: &'a SearchConfig) -> Self {
        let (zobrist, table, hash) = if config.transposition_table {
            let zobrist = ZobristTable::new(input.board.size());
            let hash = zobrist.hash(&input.board, input.mover);
            (Some(zobrist), Some(TranspositionTable::new(config.transposition_capacity)), hash)
        } else {
            (None, None, 0)
        };

        Self {
            board: input.board.clone(),
            root: input.mover,
            turn_order: &input.turn_order,
            config,
            zobrist,
            table,
            hash,
            nodes: 0,
            deadline: None,
            aborted: false,
        }
    }

    fn root_candidates(&self) -> Vec<Position> {
        self.candidates(self.root, None)
    }

    fn search_root(&mut self, depth: u8, preferred: Option<Position>) -> Option<(Position, i64)> {
        self.nodes += 1;
        let preferred = preferred.or_else(|| self.table_move());
        let moves = self.candidates(self.root, preferred);
        let next = self.next_symbol(self.root);

        let mut alpha = -INFINITY;
        let mut best: Option<(Position, i64)> = None;
        for pos in moves {
            let score = self.score_move(pos, self.root, next, depth, 1, alpha, INFINITY);
            if self.aborted {
                return None;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
            alpha = alpha.max(score);
        }

        if let Some((pos, score)) = best {
            self.store(depth, score, Bound::Exact, Some(pos), 0);
        }
        best
    }

    fn alpha_beta(&mut self, depth: u8, ply: i64, mut alpha: i64, mut beta: i64, to_move: Symbol) -> i64 {
        self.nodes += 1;
        if self.out_of_time() {
            return 0;
        }
        let maximizing = to_move == self.root;
        if depth == 0 {
            return evaluate(&self.board, self.root, self.turn_order);
        }

        if let Some(table) = &self.table
            && let Some(score) = table.probe(self.hash, depth, alpha, beta)
        {
            return from_table(score, ply);
        }

        let preferred = self.table_move();
        let moves = self.candidates(to_move, preferred);
        if moves.is_empty() {
            return 0;
        }
        let next = self.next_symbol(to_move);

        let (alpha_start, beta_start) = (alpha, beta);
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;
        for pos in moves {
            let score = self.score_move(pos, to_move, next, depth, ply + 1, alpha, beta);
            if self.aborted {
                return 0;
            }
            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(pos);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(pos);
                }
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }

        let bound = if best_score <= alpha_start {
            Bound::Upper
        } else if best_score >= beta_start {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.store(depth, best_score, bound, best_move, ply);
        best_score
    }

    // `ply` is the ply after the move.
    fn score_move(
        &mut self,
        pos: Position,
        symbol: Symbol,
        next: Symbol,
        depth: u8,
        ply: i64,
        alpha: i64,
        beta: i64,
    ) -> i64 {
        self.make(pos, symbol, next);
        let score = if detect_win(&self.board, pos).is_some() {
            let win = WIN_SCORE - ply;
            if symbol == self.root { win } else { -win }
        } else if self.board.is_full() {
            0
        } else {
            self.alpha_beta(depth - 1, ply, alpha, beta, next)
        };
        self.unmake(pos, symbol, next);
        score
    }

    fn candidates(&self, symbol: Symbol, preferred: Option<Position>) -> Vec<Position> {
        let mut moves = candidate_cells(&self.board, self.config.candidate_radius);
        if self.config.move_ordering {
            order_moves(&self.board, &mut moves, symbol, self.turn_order);
            if self.config.max_candidates > 0 {
                moves.truncate(self.config.max_candidates);
            }
        }
        if let Some(preferred) = preferred {
            promote(&mut moves, preferred, &self.board);
        }
        moves
    }

    fn make(&mut self, pos: Position, symbol: Symbol, next: Symbol) {
        self.board.put(pos, symbol);
        if let Some(zobrist) = &self.zobrist {
            self.hash ^= zobrist.stone(pos, symbol) ^ zobrist.turn(symbol, next);
        }
    }

    fn unmake(&mut self, pos: Position, symbol: Symbol, next: Symbol) {
        self.board.take(pos);
        if let Some(zobrist) = &self.zobrist {
            self.hash ^= zobrist.stone(pos, symbol) ^ zobrist.turn(symbol, next);
        }
    }

    fn next_symbol(&self, symbol: Symbol) -> Symbol {
        let index = self.turn_order.iter().position(|&s| s == symbol).unwrap_or(0);
        self.turn_order[(index + 1) % self.turn_order.len()]
    }

    fn table_move(&self) -> Option<Position> {
        self.table.as_ref().and_then(|table| table.best_move(self.hash))
    }

    fn store(&mut self, depth: u8, score: i64, bound: Bound, best_move: Option<Position>, ply: i64) {
        if let Some(table) = &mut self.table {
            table.store(self.hash, Entry {
                depth,
                score: to_table(score, ply),
                bound,
                best_move,
            });
        }
    }

    fn out_of_time(&mut self) -> bool {
        if let Some(deadline) = self.deadline
            && self.nodes % TIME_CHECK_INTERVAL == 0
            && Instant::now() >= deadline
        {
            self.aborted = true;
        }
        self.aborted
    }
}

// Mate scores are stored node-relative.
fn to_table(score: i64, ply: i64) -> i64 {
    if score >= WIN_THRESHOLD {
        score + ply
    } else if score <= -WIN_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn from_table(score: i64, ply: i64) -> i64 {
    if score >= WIN_THRESHOLD {
        score - ply
    } else if score <= -WIN_THRESHOLD {
        score + ply
    } else {
        score
    }
}
