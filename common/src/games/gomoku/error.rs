use super::types::Position;

/// Every rejection leaves the board and session untouched; callers may retry
/// with a corrected action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    OutOfBounds { row: usize, col: usize, size: usize },
    CellOccupied(Position),
    NotYourTurn,
    GameNotInProgress,
    SessionNotJoinable,
    SeatNotAvailable,
    NoLegalMoves,
    SessionNotFound,
    NotSeated,
    NotHost,
    InvalidSettings(String),
    OutOfSequence { expected: u32, received: u32 },
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::OutOfBounds { row, col, size } => {
                write!(f, "Position ({}, {}) is outside the {}x{} board", row, col, size, size)
            }
            GameError::CellOccupied(pos) => write!(f, "Cell {} is already occupied", pos),
            GameError::NotYourTurn => write!(f, "Not your turn"),
            GameError::GameNotInProgress => write!(f, "Game is not in progress"),
            GameError::SessionNotJoinable => write!(f, "Session is full or already started"),
            GameError::SeatNotAvailable => write!(f, "Seat is not available"),
            GameError::NoLegalMoves => write!(f, "No legal moves left"),
            GameError::SessionNotFound => write!(f, "Session not found"),
            GameError::NotSeated => write!(f, "Participant is not seated in this session"),
            GameError::NotHost => write!(f, "Only the host can do that"),
            GameError::InvalidSettings(reason) => write!(f, "Invalid session settings: {}", reason),
            GameError::OutOfSequence { expected, received } => {
                write!(f, "Move out of sequence: expected #{}, received #{}", expected, received)
            }
        }
    }
}

impl std::error::Error for GameError {}
