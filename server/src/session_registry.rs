use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::sync::Mutex;

use gomoku_common::games::gomoku::{
    Difficulty, GameError, GomokuSession, LeaveOutcome, Move, SearchConfig, Seat, SessionSettings,
    SessionStatus, compute_move,
};
use gomoku_common::id_generator::generate_session_name;
use gomoku_common::{Participant, ParticipantId, SessionId, log};

use crate::archive::FinishedSession;
use crate::broadcaster::RelayTransport;
use crate::hosted_session::{HostedSession, HostedState, SessionSnapshot};
use crate::messages::{ChatMessage, CloseReason, MoveApplied, RelayMessage, RosterChanged, SessionAdvertised};
use crate::roster::Roster;

/// Sessions hosted by this process. The map lock only guards lookup and
/// membership; each session serializes its own mutations.
#[derive(Clone)]
pub struct SessionRegistry<T: RelayTransport> {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<HostedSession>>>>,
    next_session_number: Arc<Mutex<u64>>,
    transport: T,
    search: Arc<SearchConfig>,
}

impl<T: RelayTransport> std::fmt::Debug for SessionRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry").finish()
    }
}

impl<T: RelayTransport> SessionRegistry<T> {
    pub fn new(transport: T, search: SearchConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_session_number: Arc::new(Mutex::new(1)),
            transport,
            search: Arc::new(search),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn open_session(
        &self,
        host: Participant,
        name: Option<String>,
        settings: SessionSettings,
    ) -> Result<SessionSnapshot, GameError> {
        let session_id = {
            let mut number = self.next_session_number.lock().await;
            let id = SessionId::new(format!("session_{}", *number));
            *number += 1;
            id
        };

        let game = GomokuSession::open(session_id.clone(), host, settings)?;
        let mut roster = Roster::new();
        if let Some(seat) = game.seats().first() {
            roster.admit(seat, true);
        }

        let name = name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(generate_session_name);
        let hosted = Arc::new(HostedSession::new(name, game, roster));
        let snapshot = {
            let state = hosted.lock().await;
            hosted.snapshot(&state)
        };

        self.sessions.lock().await.insert(session_id.clone(), hosted);
        log!(
            "[session:{}] Opened '{}' by {} ({}x{}, {} seats)",
            session_id,
            snapshot.name,
            snapshot.roster.first().map_or("?", |entry| entry.participant_id.as_str()),
            settings.board_size,
            settings.board_size,
            settings.seat_count
        );
        Ok(snapshot)
    }

    pub async fn join_session(&self, session_id: &SessionId, participant: Participant) -> Result<SessionSnapshot, GameError> {
        let hosted = self.find(session_id).await?;
        let mut state = hosted.lock().await;

        let seat = state.game.join(participant)?;
        state.roster.admit(&seat, false);
        state.touch();
        log!("[session:{}] {} joined as {}", session_id, seat.participant_id, seat.symbol);

        self.relay_roster(&hosted, &mut state, Some(&seat.participant_id)).await;
        Ok(hosted.snapshot(&state))
    }

    pub async fn add_computer(
        &self,
        session_id: &SessionId,
        requester: &ParticipantId,
        difficulty: Difficulty,
    ) -> Result<Seat, GameError> {
        let hosted = self.find(session_id).await?;
        let mut state = hosted.lock().await;

        if state.game.host() != requester {
            return Err(GameError::NotHost);
        }
        let seat = state.game.join_computer(difficulty)?;
        state.roster.admit(&seat, false);
        state.touch();
        log!("[session:{}] {} seated as {}", session_id, seat.display_name, seat.symbol);

        self.relay_roster(&hosted, &mut state, None).await;
        Ok(seat)
    }

    pub async fn leave_session(&self, session_id: &SessionId, participant: &ParticipantId) -> Result<LeaveOutcome, GameError> {
        let hosted = self.find(session_id).await?;
        let mut state = hosted.lock().await;

        let outcome = state.game.leave(participant)?;
        state.touch();
        match outcome {
            LeaveOutcome::SeatFreed => {
                let seats = state.game.seats().to_vec();
                state.roster.sync_with_seats(&seats);
                log!("[session:{}] {} left, seat freed", session_id, participant);
                self.relay_roster(&hosted, &mut state, None).await;
            }
            LeaveOutcome::SeatRetained => {
                state.roster.set_connected(participant, false);
                log!("[session:{}] {} left a game in progress, seat kept", session_id, participant);
                self.relay_roster(&hosted, &mut state, None).await;
            }
            LeaveOutcome::Cancelled => {
                drop(state);
                self.close(session_id, CloseReason::HostLeft).await;
                log!("[session:{}] Host {} left, session cancelled", session_id, participant);
            }
        }
        Ok(outcome)
    }

    /// Validates and applies a move, relays it, then lets any computer seats
    /// that are now on turn play.
    pub async fn submit_move(
        &self,
        session_id: &SessionId,
        participant: &ParticipantId,
        row: usize,
        col: usize,
    ) -> Result<Move, GameError> {
        let hosted = self.find(session_id).await?;
        let applied = apply_and_relay(&self.transport, &hosted, participant, row, col).await?;
        self.drive_computers(hosted);
        Ok(applied)
    }

    pub async fn send_chat(&self, session_id: &SessionId, sender: &ParticipantId, text: &str) -> Result<ChatMessage, GameError> {
        let hosted = self.find(session_id).await?;
        let mut state = hosted.lock().await;
        if !state.game.is_seated(sender) {
            return Err(GameError::NotSeated);
        }

        let chat = ChatMessage {
            session_id: session_id.clone(),
            sender_id: sender.clone(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        state.touch();
        let recipients = state.roster.recipients_except(Some(sender));
        let lost = self.transport.relay(&recipients, RelayMessage::Chat(chat.clone())).await;
        mark_lost(&self.transport, &hosted, &mut state, lost).await;
        Ok(chat)
    }

    pub async fn mark_disconnected(&self, session_id: &SessionId, participant: &ParticipantId) -> Result<(), GameError> {
        let hosted = self.find(session_id).await?;
        let mut state = hosted.lock().await;
        if !state.game.is_seated(participant) {
            return Err(GameError::NotSeated);
        }
        if state.roster.set_connected(participant, false) {
            log!("[session:{}] {} disconnected", session_id, participant);
            self.relay_roster(&hosted, &mut state, None).await;
        }
        Ok(())
    }

    pub async fn mark_reconnected(&self, session_id: &SessionId, participant: &ParticipantId) -> Result<SessionSnapshot, GameError> {
        let hosted = self.find(session_id).await?;
        let mut state = hosted.lock().await;
        if !state.game.is_seated(participant) {
            return Err(GameError::NotSeated);
        }
        if state.roster.set_connected(participant, true) {
            log!("[session:{}] {} reconnected", session_id, participant);
            state.touch();
            self.relay_roster(&hosted, &mut state, Some(participant)).await;
        }
        Ok(hosted.snapshot(&state))
    }

    pub async fn advertisements(&self) -> Vec<SessionAdvertised> {
        let mut adverts = Vec::new();
        for hosted in self.all().await {
            let state = hosted.lock().await;
            if state.game.status() == SessionStatus::WaitingForPlayers
                && !state.game.is_full()
            {
                adverts.push(hosted.advertisement(&state));
            }
        }
        adverts.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        adverts
    }

    pub async fn snapshot(&self, session_id: &SessionId) -> Result<SessionSnapshot, GameError> {
        let hosted = self.find(session_id).await?;
        let state = hosted.lock().await;
        Ok(hosted.snapshot(&state))
    }

    pub async fn remove_session(&self, session_id: &SessionId) -> Result<SessionSnapshot, GameError> {
        let hosted = self
            .sessions
            .lock()
            .await
            .remove(session_id)
            .ok_or(GameError::SessionNotFound)?;
        let state = hosted.lock().await;
        log!("[session:{}] Removed", session_id);
        Ok(hosted.snapshot(&state))
    }

    pub async fn drain_finished(&self) -> Vec<FinishedSession> {
        let mut finished = Vec::new();
        for hosted in self.all().await {
            let state = hosted.lock().await;
            if state.game.status().is_terminal() {
                finished.push(hosted.finished(&state));
            }
        }

        if !finished.is_empty() {
            let mut sessions = self.sessions.lock().await;
            for record in &finished {
                sessions.remove(&record.session_id);
            }
        }
        finished
    }

    /// Drops sessions still waiting for players after `timeout` without
    /// activity.
    pub async fn remove_inactive(&self, timeout: Duration) -> Vec<SessionId> {
        let mut stale = Vec::new();
        for hosted in self.all().await {
            let state = hosted.lock().await;
            if state.game.status() == SessionStatus::WaitingForPlayers
                && state.idle_for() >= timeout
            {
                stale.push(hosted.id().clone());
            }
        }

        for session_id in &stale {
            self.close(session_id, CloseReason::Inactive).await;
            log!("[session:{}] Closed after {:?} of inactivity", session_id, timeout);
        }
        stale
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn find(&self, session_id: &SessionId) -> Result<Arc<HostedSession>, GameError> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or(GameError::SessionNotFound)
    }

    async fn all(&self) -> Vec<Arc<HostedSession>> {
        self.sessions.lock().await.values().cloned().collect()
    }

    async fn close(&self, session_id: &SessionId, reason: CloseReason) {
        let Some(hosted) = self.sessions.lock().await.remove(session_id) else {
            return;
        };
        let state = hosted.lock().await;
        let recipients = state.roster.recipients_except(None);
        self.transport
            .relay(&recipients, RelayMessage::SessionClosed {
                session_id: session_id.clone(),
                reason,
            })
            .await;
    }

    async fn relay_roster(&self, hosted: &HostedSession, state: &mut HostedState, except: Option<&ParticipantId>) {
        relay_roster(&self.transport, hosted, state, except).await;
    }

    fn drive_computers(&self, hosted: Arc<HostedSession>) {
        let transport = self.transport.clone();
        let search = self.search.clone();
        tokio::spawn(async move {
            play_computer_turns(transport, search, hosted).await;
        });
    }
}

// Relay under the session lock keeps sequence order.
async fn apply_and_relay<T: RelayTransport>(
    transport: &T,
    hosted: &HostedSession,
    participant: &ParticipantId,
    row: usize,
    col: usize,
) -> Result<Move, GameError> {
    let mut state = hosted.lock().await;
    let applied = match state.game.submit_move(participant, row, col) {
        Ok(applied) => applied,
        Err(e) => {
            log!("[session:{}] Rejected move by {} at ({}, {}): {}", hosted.id(), participant, row, col, e);
            return Err(e);
        }
    };
    state.touch();

    let resulting_status = state.game.status();
    log!(
        "[session:{}] #{} {} at ({}, {}) -> {:?}",
        hosted.id(),
        applied.sequence,
        applied.symbol,
        row,
        col,
        resulting_status
    );

    let recipients = state.roster.recipients_except(Some(participant));
    let message = RelayMessage::MoveApplied(MoveApplied {
        session_id: hosted.id().clone(),
        applied: applied.clone(),
        resulting_status,
    });
    let lost = transport.relay(&recipients, message).await;
    mark_lost(transport, hosted, &mut state, lost).await;
    Ok(applied)
}

async fn relay_roster<T: RelayTransport>(
    transport: &T,
    hosted: &HostedSession,
    state: &mut HostedState,
    except: Option<&ParticipantId>,
) {
    let recipients = state.roster.recipients_except(except);
    let message = RelayMessage::RosterChanged(RosterChanged {
        session_id: hosted.id().clone(),
        roster: state.roster.entries().to_vec(),
    });
    let lost = transport.relay(&recipients, message).await;
    mark_lost(transport, hosted, state, lost).await;
}

async fn mark_lost<T: RelayTransport>(transport: &T, hosted: &HostedSession, state: &mut HostedState, lost: Vec<ParticipantId>) {
    let mut changed = false;
    for participant in &lost {
        if state.roster.set_connected(participant, false) {
            log!("[session:{}] Lost contact with {}", hosted.id(), participant);
            changed = true;
        }
    }
    if !changed {
        return;
    }

    let recipients = state.roster.recipients_except(None);
    let message = RelayMessage::RosterChanged(RosterChanged {
        session_id: hosted.id().clone(),
        roster: state.roster.entries().to_vec(),
    });
    for participant in transport.relay(&recipients, message).await {
        state.roster.set_connected(&participant, false);
    }
}

async fn play_computer_turns<T: RelayTransport>(transport: T, search: Arc<SearchConfig>, hosted: Arc<HostedSession>) {
    loop {
        let pending = hosted.lock().await.game.pending_computer_turn();
        let Some((computer_id, difficulty, input)) = pending else {
            return;
        };

        let config = search.clone();
        let result = tokio::task::spawn_blocking(move || compute_move(&input, difficulty, &config)).await;
        let found = match result {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                log!("[session:{}] {} found no move: {}", hosted.id(), computer_id, e);
                return;
            }
            Err(e) => {
                log!("[session:{}] Search task for {} failed: {}", hosted.id(), computer_id, e);
                return;
            }
        };

        log!(
            "[session:{}] {} ({}) chose ({}, {}) at depth {} after {} nodes in {:?}",
            hosted.id(),
            computer_id,
            difficulty,
            found.position.row,
            found.position.col,
            found.depth_reached,
            found.nodes,
            found.elapsed
        );

        let position = found.position;
        if apply_and_relay(&transport, &hosted, &computer_id, position.row, position.col).await.is_err() {
            return;
        }
    }
}
