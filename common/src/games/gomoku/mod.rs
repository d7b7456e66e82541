mod board;
mod error;
mod rules;
mod session;
mod settings;
mod types;
mod win_detector;
pub mod bot;

pub use board::{Board, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use bot::{AiSearchResult, BotInput, Difficulty, SearchConfig, compute_move};
pub use error::GameError;
pub use rules::{next_seat, validate_and_apply};
pub use session::{GomokuSession, LeaveOutcome, Seat, SeatController};
pub use settings::{MAX_SEATS, MIN_SEATS, SessionSettings};
pub use types::{Move, Position, SessionStatus, Symbol, WinningLine};
pub use win_detector::{detect_win, find_any_win};
