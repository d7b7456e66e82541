use serde::{Deserialize, Serialize};

use crate::config::Validate;
use crate::id_generator::computer_participant_id;
use crate::{Participant, ParticipantId, SessionId};
use super::board::Board;
use super::bot::{BotInput, Difficulty};
use super::error::GameError;
use super::rules;
use super::settings::SessionSettings;
use super::types::{Move, SessionStatus, Symbol, WinningLine};
use super::win_detector::detect_win;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatController {
    Human,
    Computer(Difficulty),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub symbol: Symbol,
    pub controller: SeatController,
}

impl Seat {
    pub fn is_computer(&self) -> bool {
        matches!(self.controller, SeatController::Computer(_))
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.controller {
            SeatController::Computer(difficulty) => Some(difficulty),
            SeatController::Human => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Left before the game started; later seats moved up one place.
    SeatFreed,
    /// Game already running; the seat stays and the turn order is unchanged.
    SeatRetained,
    /// The host left before the game started.
    Cancelled,
}

/// One game in progress: the board, the seats and the status.
#[derive(Debug, Clone)]
pub struct GomokuSession {
    pub(super) id: SessionId,
    pub(super) settings: SessionSettings,
    pub(super) board: Board,
    pub(super) seats: Vec<Seat>,
    pub(super) current_mover: usize,
    pub(super) status: SessionStatus,
    pub(super) move_log: Vec<Move>,
    pub(super) winner: Option<ParticipantId>,
    pub(super) winning_line: Option<WinningLine>,
}

impl GomokuSession {
    pub fn open(id: SessionId, host: Participant, settings: SessionSettings) -> Result<Self, GameError> {
        settings.validate().map_err(GameError::InvalidSettings)?;
        let board = Board::new(settings.board_size)?;

        Ok(Self {
            id,
            settings,
            board,
            seats: vec![Seat {
                participant_id: host.id,
                display_name: host.display_name,
                symbol: Symbol::First,
                controller: SeatController::Human,
            }],
            current_mover: 0,
            status: SessionStatus::WaitingForPlayers,
            move_log: Vec::new(),
            winner: None,
            winning_line: None,
        })
    }

    /// Builds a read-only mirror of a host's session from its seat list. The
    /// mirror advances only through `apply_confirmed`.
    pub fn mirror(id: SessionId, settings: SessionSettings, seats: Vec<Seat>) -> Result<Self, GameError> {
        settings.validate().map_err(GameError::InvalidSettings)?;
        if seats.is_empty() || seats.len() > settings.seat_count {
            return Err(GameError::InvalidSettings(format!(
                "Mirror needs 1 to {} seats, got {}",
                settings.seat_count,
                seats.len()
            )));
        }
        let status = if seats.len() == settings.seat_count {
            SessionStatus::InProgress
        } else {
            SessionStatus::WaitingForPlayers
        };

        Ok(Self {
            id,
            settings,
            board: Board::new(settings.board_size)?,
            seats,
            current_mover: 0,
            status,
            move_log: Vec::new(),
            winner: None,
            winning_line: None,
        })
    }

    pub fn join(&mut self, participant: Participant) -> Result<Seat, GameError> {
        self.ensure_joinable()?;
        if self.is_seated(&participant.id) {
            return Err(GameError::SeatNotAvailable);
        }
        self.seat(participant.id, participant.display_name, SeatController::Human)
    }

    pub fn join_computer(&mut self, difficulty: Difficulty) -> Result<Seat, GameError> {
        self.ensure_joinable()?;
        let participant_id = self.free_computer_id();
        let display_name = format!("Computer ({})", difficulty);
        self.seat(participant_id, display_name, SeatController::Computer(difficulty))
    }

    pub fn leave(&mut self, participant: &ParticipantId) -> Result<LeaveOutcome, GameError> {
        let index = self.seat_index(participant).ok_or(GameError::NotSeated)?;

        if self.status != SessionStatus::WaitingForPlayers {
            return Ok(LeaveOutcome::SeatRetained);
        }
        if index == 0 {
            return Ok(LeaveOutcome::Cancelled);
        }

        self.seats.remove(index);
        for (i, seat) in self.seats.iter_mut().enumerate() {
            if let Some(symbol) = Symbol::for_seat(i) {
                seat.symbol = symbol;
            }
        }
        Ok(LeaveOutcome::SeatFreed)
    }

    pub fn submit_move(&mut self, participant: &ParticipantId, row: usize, col: usize) -> Result<Move, GameError> {
        rules::validate_and_apply(self, participant, row, col)
    }

    /// Applies a move the host already accepted. Returns `Ok(false)` for a
    /// move that was applied before.
    pub fn apply_confirmed(&mut self, confirmed: &Move, resulting_status: SessionStatus) -> Result<bool, GameError> {
        let last = self.last_sequence();
        if confirmed.sequence <= last {
            return Ok(false);
        }
        if confirmed.sequence != last + 1 {
            return Err(GameError::OutOfSequence {
                expected: last + 1,
                received: confirmed.sequence,
            });
        }
        if self.status.is_terminal() {
            return Err(GameError::GameNotInProgress);
        }
        let mover = self
            .seats
            .iter()
            .position(|seat| seat.symbol == confirmed.symbol)
            .ok_or(GameError::NotSeated)?;

        let position = confirmed.position;
        self.board = self.board.place(position.row, position.col, confirmed.symbol)?;
        self.move_log.push(confirmed.clone());
        self.current_mover = mover;

        match resulting_status {
            SessionStatus::Completed => {
                self.winning_line = detect_win(&self.board, position);
                self.winner = Some(self.seats[mover].participant_id.clone());
                self.status = SessionStatus::Completed;
            }
            SessionStatus::Draw => self.status = SessionStatus::Draw,
            _ => {
                self.status = SessionStatus::InProgress;
                self.current_mover = rules::next_seat(mover, self.seats.len());
            }
        }
        Ok(true)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn host(&self) -> &ParticipantId {
        &self.seats[0].participant_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    pub fn winner(&self) -> Option<&ParticipantId> {
        self.winner.as_ref()
    }

    pub fn winning_line(&self) -> Option<&WinningLine> {
        self.winning_line.as_ref()
    }

    pub fn current_mover_index(&self) -> usize {
        self.current_mover
    }

    pub fn current_seat(&self) -> Option<&Seat> {
        self.seats.get(self.current_mover)
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() >= self.settings.seat_count
    }

    pub fn is_seated(&self, participant: &ParticipantId) -> bool {
        self.seat_index(participant).is_some()
    }

    /// Search input for the seat whose turn it is, if that seat is a computer.
    pub fn pending_computer_turn(&self) -> Option<(ParticipantId, Difficulty, BotInput)> {
        if self.status != SessionStatus::InProgress {
            return None;
        }
        let seat = self.current_seat()?;
        let difficulty = seat.difficulty()?;
        Some((seat.participant_id.clone(), difficulty, BotInput::from_session(self)))
    }

    pub fn turn_order(&self) -> Vec<Symbol> {
        self.seats.iter().map(|seat| seat.symbol).collect()
    }

    pub(super) fn next_sequence(&self) -> u32 {
        self.last_sequence() + 1
    }

    fn last_sequence(&self) -> u32 {
        self.move_log.last().map_or(0, |m| m.sequence)
    }

    fn seat_index(&self, participant: &ParticipantId) -> Option<usize> {
        self.seats.iter().position(|seat| &seat.participant_id == participant)
    }

    fn ensure_joinable(&self) -> Result<(), GameError> {
        if self.status != SessionStatus::WaitingForPlayers || self.is_full() {
            return Err(GameError::SessionNotJoinable);
        }
        Ok(())
    }

    fn free_computer_id(&self) -> ParticipantId {
        (self.seats.len()..)
            .map(|i| ParticipantId::new(computer_participant_id(i)))
            .find(|id| !self.is_seated(id))
            .unwrap_or_else(|| ParticipantId::new(computer_participant_id(self.seats.len())))
    }

    fn seat(&mut self, participant_id: ParticipantId, display_name: String, controller: SeatController) -> Result<Seat, GameError> {
        let symbol = Symbol::for_seat(self.seats.len()).ok_or(GameError::SessionNotJoinable)?;
        let seat = Seat {
            participant_id,
            display_name,
            symbol,
            controller,
        };
        self.seats.push(seat.clone());

        if self.is_full() {
            self.status = SessionStatus::InProgress;
            self.current_mover = 0;
        }
        Ok(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(size: usize, seats: usize) -> GomokuSession {
        GomokuSession::open("s1".into(), Participant::new("host", "Host"), SessionSettings::new(size, seats)).unwrap()
    }

    #[test]
    fn test_open_rejects_bad_settings() {
        let result = GomokuSession::open("s".into(), Participant::new("h", "H"), SessionSettings::new(30, 2));
        assert!(matches!(result, Err(GameError::InvalidSettings(_))));
    }

    #[test]
    fn test_two_seat_session_starts_when_full() {
        let mut session = open(8, 2);
        assert_eq!(session.status(), SessionStatus::WaitingForPlayers);
        let seat = session.join(Participant::new("guest", "Guest")).unwrap();
        assert_eq!(seat.symbol, Symbol::Second);
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.current_seat().unwrap().participant_id, ParticipantId::new("host"));
    }

    #[test]
    fn test_three_seat_session_waits_for_third() {
        let mut session = open(8, 3);
        session.join(Participant::new("b", "B")).unwrap();
        assert_eq!(session.status(), SessionStatus::WaitingForPlayers);
        let seat = session.join(Participant::new("c", "C")).unwrap();
        assert_eq!(seat.symbol, Symbol::Third);
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn test_join_errors() {
        let mut session = open(8, 3);
        assert_eq!(session.join(Participant::new("host", "Again")), Err(GameError::SeatNotAvailable));
        session.join(Participant::new("b", "B")).unwrap();
        session.join(Participant::new("c", "C")).unwrap();
        assert_eq!(session.join(Participant::new("d", "D")), Err(GameError::SessionNotJoinable));
        assert_eq!(session.join_computer(Difficulty::Easy), Err(GameError::SessionNotJoinable));
    }

    #[test]
    fn test_leave_before_start_renumbers_symbols() {
        let mut session = open(8, 3);
        session.join(Participant::new("b", "B")).unwrap();
        session.join_computer(Difficulty::Hard).unwrap();
        assert_eq!(session.seats()[2].symbol, Symbol::Third);

        assert_eq!(session.leave(&ParticipantId::new("b")), Ok(LeaveOutcome::SeatFreed));
        assert_eq!(session.seats().len(), 2);
        assert_eq!(session.seats()[1].symbol, Symbol::Second);
        assert!(session.seats()[1].is_computer());

        // A second computer must not reuse the remaining computer's id.
        let seat = session.join_computer(Difficulty::Easy).unwrap();
        assert_ne!(seat.participant_id, session.seats()[1].participant_id);
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn test_host_leaving_cancels_waiting_session() {
        let mut session = open(8, 2);
        assert_eq!(session.leave(&ParticipantId::new("host")), Ok(LeaveOutcome::Cancelled));
        assert_eq!(session.leave(&ParticipantId::new("nobody")), Err(GameError::NotSeated));
    }

    #[test]
    fn test_leave_during_game_keeps_seat() {
        let mut session = open(8, 2);
        session.join(Participant::new("b", "B")).unwrap();
        assert_eq!(session.leave(&ParticipantId::new("b")), Ok(LeaveOutcome::SeatRetained));
        assert_eq!(session.seats().len(), 2);
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn test_join_after_start_rejected() {
        let mut session = open(8, 2);
        session.join(Participant::new("b", "B")).unwrap();
        assert_eq!(session.join(Participant::new("c", "C")), Err(GameError::SessionNotJoinable));
    }

    #[test]
    fn test_pending_computer_turn() {
        let mut session = open(8, 2);
        session.join_computer(Difficulty::Easy).unwrap();
        assert!(session.pending_computer_turn().is_none());

        session.submit_move(&ParticipantId::new("host"), 4, 4).unwrap();
        let (id, difficulty, input) = session.pending_computer_turn().unwrap();
        assert_eq!(id, ParticipantId::new("computer-2"));
        assert_eq!(difficulty, Difficulty::Easy);
        assert_eq!(input.mover, Symbol::Second);
        assert_eq!(input.board.stone_count(), 1);
    }

    #[test]
    fn test_mirror_follows_host() {
        let mut host = open(8, 2);
        host.join(Participant::new("b", "B")).unwrap();
        let mut mirror = GomokuSession::mirror("s1".into(), host.settings(), host.seats().to_vec()).unwrap();

        let plays = [("host", 3, 2), ("b", 0, 0), ("host", 3, 3), ("b", 0, 7), ("host", 3, 4), ("b", 7, 7), ("host", 3, 5)];
        for (who, row, col) in plays {
            let applied = host.submit_move(&ParticipantId::new(who), row, col).unwrap();
            assert!(mirror.apply_confirmed(&applied, host.status()).unwrap());
            // Redelivery is ignored.
            assert!(!mirror.apply_confirmed(&applied, host.status()).unwrap());
        }

        assert_eq!(mirror.board(), host.board());
        assert_eq!(mirror.status(), SessionStatus::Completed);
        assert_eq!(mirror.winner(), Some(&ParticipantId::new("host")));
        assert_eq!(mirror.winning_line(), host.winning_line());
    }

    #[test]
    fn test_mirror_rejects_gaps() {
        let mut host = open(8, 2);
        host.join(Participant::new("b", "B")).unwrap();
        let mut mirror = GomokuSession::mirror("s1".into(), host.settings(), host.seats().to_vec()).unwrap();

        host.submit_move(&ParticipantId::new("host"), 1, 1).unwrap();
        let second = host.submit_move(&ParticipantId::new("b"), 2, 2).unwrap();
        assert_eq!(
            mirror.apply_confirmed(&second, host.status()),
            Err(GameError::OutOfSequence { expected: 1, received: 2 })
        );
        assert_eq!(mirror.board().get(2, 2).unwrap(), None);
        assert_eq!(mirror.current_seat().unwrap().symbol, Symbol::First);
    }
}
