use std::future::Future;
use chrono::{DateTime, Utc};

use gomoku_common::games::gomoku::{Board, Move, SessionStatus, WinningLine};
use gomoku_common::{ParticipantId, SessionId, log};

use crate::roster::RosterEntry;

/// Final record of a session that reached `Completed` or `Draw`.
#[derive(Debug, Clone)]
pub struct FinishedSession {
    pub session_id: SessionId,
    pub name: String,
    pub board: Board,
    pub move_log: Vec<Move>,
    pub status: SessionStatus,
    pub winner: Option<ParticipantId>,
    pub winning_line: Option<WinningLine>,
    pub roster: Vec<RosterEntry>,
    pub finished_at: DateTime<Utc>,
}

impl FinishedSession {
    pub fn outcome(&self) -> String {
        match (&self.status, &self.winner) {
            (SessionStatus::Completed, Some(winner)) => format!("won by {}", winner),
            (SessionStatus::Draw, _) => "draw".to_string(),
            (status, _) => format!("{:?}", status),
        }
    }
}

pub trait SessionArchive: Send + Sync + 'static {
    fn store(&self, finished: FinishedSession) -> impl Future<Output = Result<(), String>> + Send;
}

/// Writes a summary line and the final board to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogArchive;

impl SessionArchive for LogArchive {
    async fn store(&self, finished: FinishedSession) -> Result<(), String> {
        log!(
            "[session:{}] '{}' finished after {} moves, {}",
            finished.session_id,
            finished.name,
            finished.move_log.len(),
            finished.outcome()
        );
        log!("[session:{}] final board:\n{}", finished.session_id, finished.board.render());
        Ok(())
    }
}
