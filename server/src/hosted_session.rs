use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use gomoku_common::games::gomoku::{Board, GomokuSession, Move, SessionSettings, SessionStatus, WinningLine};
use gomoku_common::{ParticipantId, SessionId};

use crate::archive::FinishedSession;
use crate::messages::SessionAdvertised;
use crate::roster::{Roster, RosterEntry};

/// Read-only copy of a hosted session, for catch-up after a reconnect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub name: String,
    pub settings: SessionSettings,
    pub board: Board,
    pub roster: Vec<RosterEntry>,
    pub status: SessionStatus,
    pub current_mover: Option<ParticipantId>,
    pub move_log: Vec<Move>,
    pub winner: Option<ParticipantId>,
    pub winning_line: Option<WinningLine>,
}

pub struct HostedState {
    pub game: GomokuSession,
    pub roster: Roster,
    last_activity: DateTime<Utc>,
    touched: Instant,
}

impl HostedState {
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
        self.touched = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.touched.elapsed()
    }
}

/// A session owned by this registry. Every mutation goes through `lock`.
pub struct HostedSession {
    id: SessionId,
    name: String,
    state: Mutex<HostedState>,
}

impl HostedSession {
    pub fn new(name: String, game: GomokuSession, roster: Roster) -> Self {
        Self {
            id: game.id().clone(),
            name,
            state: Mutex::new(HostedState {
                game,
                roster,
                last_activity: Utc::now(),
                touched: Instant::now(),
            }),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn lock(&self) -> MutexGuard<'_, HostedState> {
        self.state.lock().await
    }

    pub fn snapshot(&self, state: &HostedState) -> SessionSnapshot {
        let game = &state.game;
        SessionSnapshot {
            session_id: self.id.clone(),
            name: self.name.clone(),
            settings: game.settings(),
            board: game.board().clone(),
            roster: state.roster.entries().to_vec(),
            status: game.status(),
            current_mover: game.current_seat().map(|seat| seat.participant_id.clone()),
            move_log: game.move_log().to_vec(),
            winner: game.winner().cloned(),
            winning_line: game.winning_line().copied(),
        }
    }

    pub fn advertisement(&self, state: &HostedState) -> SessionAdvertised {
        let settings = state.game.settings();
        SessionAdvertised {
            session_id: self.id.clone(),
            name: self.name.clone(),
            board_size: settings.board_size,
            occupancy: state.game.seats().len(),
            max_occupancy: settings.seat_count,
            status: state.game.status(),
            last_activity: state.last_activity,
        }
    }

    pub fn finished(&self, state: &HostedState) -> FinishedSession {
        let game = &state.game;
        FinishedSession {
            session_id: self.id.clone(),
            name: self.name.clone(),
            board: game.board().clone(),
            move_log: game.move_log().to_vec(),
            status: game.status(),
            winner: game.winner().cloned(),
            winning_line: game.winning_line().copied(),
            roster: state.roster.entries().to_vec(),
            finished_at: Utc::now(),
        }
    }
}
