use chrono::Utc;

use crate::ParticipantId;
use super::error::GameError;
use super::session::GomokuSession;
use super::types::{Move, Position, SessionStatus};
use super::win_detector::detect_win;

/// Validates a move for `participant` and applies it to the session.
///
/// On success the stone is written, the move is appended to the log with the
/// next sequence number and the session is settled: win, draw or turn advance.
/// Any error leaves the session untouched.
pub fn validate_and_apply(
    session: &mut GomokuSession,
    participant: &ParticipantId,
    row: usize,
    col: usize,
) -> Result<Move, GameError> {
    if session.status != SessionStatus::InProgress {
        return Err(GameError::GameNotInProgress);
    }

    let seat = session
        .seats
        .get(session.current_mover)
        .ok_or(GameError::GameNotInProgress)?;
    if &seat.participant_id != participant {
        return Err(GameError::NotYourTurn);
    }
    let symbol = seat.symbol;

    session.board = session.board.place(row, col, symbol)?;

    let applied = Move {
        position: Position::new(row, col),
        symbol,
        sequence: session.next_sequence(),
        timestamp: Utc::now(),
    };
    session.move_log.push(applied.clone());
    settle(session, applied.position);

    Ok(applied)
}

pub(super) fn settle(session: &mut GomokuSession, placed: Position) {
    if let Some(line) = detect_win(&session.board, placed) {
        session.winner = session
            .seats
            .iter()
            .find(|seat| seat.symbol == line.symbol)
            .map(|seat| seat.participant_id.clone());
        session.winning_line = Some(line);
        session.status = SessionStatus::Completed;
        return;
    }

    if session.board.is_full() {
        session.status = SessionStatus::Draw;
        return;
    }

    session.current_mover = next_seat(session.current_mover, session.seats.len());
}

pub fn next_seat(current: usize, seat_count: usize) -> usize {
    if seat_count == 0 {
        return 0;
    }
    (current + 1) % seat_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Participant;
    use crate::games::gomoku::{SessionSettings, Symbol};

    fn started(size: usize, seats: usize) -> GomokuSession {
        let mut session = GomokuSession::open(
            "rules".into(),
            Participant::new("a", "Alice"),
            SessionSettings::new(size, seats),
        )
        .unwrap();
        session.join(Participant::new("b", "Bob")).unwrap();
        if seats == 3 {
            session.join(Participant::new("c", "Carol")).unwrap();
        }
        session
    }

    fn id(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    #[test]
    fn test_rejects_before_start() {
        let mut session = GomokuSession::open(
            "waiting".into(),
            Participant::new("a", "Alice"),
            SessionSettings::new(8, 2),
        )
        .unwrap();
        assert_eq!(
            validate_and_apply(&mut session, &id("a"), 0, 0),
            Err(GameError::GameNotInProgress)
        );
        assert!(session.move_log().is_empty());
    }

    #[test]
    fn test_not_your_turn_is_a_no_op() {
        let mut session = started(8, 2);
        assert_eq!(validate_and_apply(&mut session, &id("b"), 0, 0), Err(GameError::NotYourTurn));
        assert_eq!(session.board().stone_count(), 0);
        assert_eq!(session.current_mover_index(), 0);
    }

    #[test]
    fn test_board_errors_propagate() {
        let mut session = started(8, 2);
        assert!(matches!(
            validate_and_apply(&mut session, &id("a"), 8, 0),
            Err(GameError::OutOfBounds { .. })
        ));
        validate_and_apply(&mut session, &id("a"), 1, 1).unwrap();
        assert_eq!(
            validate_and_apply(&mut session, &id("b"), 1, 1),
            Err(GameError::CellOccupied(Position::new(1, 1)))
        );
        assert_eq!(session.current_mover_index(), 1);
        assert_eq!(session.move_log().len(), 1);
    }

    #[test]
    fn test_sequence_numbers_are_gap_free() {
        let mut session = started(8, 2);
        let cells = [(0, 0), (7, 7), (0, 2), (7, 5), (0, 4)];
        for (i, (row, col)) in cells.into_iter().enumerate() {
            let mover = session.current_seat().unwrap().participant_id.clone();
            let applied = validate_and_apply(&mut session, &mover, row, col).unwrap();
            assert_eq!(applied.sequence, i as u32 + 1);
        }
        assert_eq!(session.move_log().len(), session.board().stone_count());
    }

    #[test]
    fn test_turn_cycles_through_three_seats() {
        let mut session = started(10, 3);
        let mut seen = Vec::new();
        for col in 0..6 {
            let before = session.current_mover_index();
            let mover = session.current_seat().unwrap().participant_id.clone();
            validate_and_apply(&mut session, &mover, col % 2 * 5, col).unwrap();
            assert_ne!(before, session.current_mover_index());
            seen.push(before);
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_open_four_completes_game_on_fourth_stone() {
        let mut session = started(8, 2);
        let plays = [
            ("a", 3, 2), ("b", 7, 0),
            ("a", 3, 3), ("b", 7, 7),
            ("a", 3, 4), ("b", 0, 7),
            ("a", 3, 5),
        ];
        for (who, row, col) in plays {
            validate_and_apply(&mut session, &id(who), row, col).unwrap();
        }

        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.winner(), Some(&id("a")));
        let line = session.winning_line().unwrap();
        assert_eq!(line.symbol, Symbol::First);
        assert_eq!((line.length, line.open_ends), (4, 2));

        // The game is over; nothing else is accepted.
        assert_eq!(
            validate_and_apply(&mut session, &id("b"), 5, 5),
            Err(GameError::GameNotInProgress)
        );
        assert_eq!(
            validate_and_apply(&mut session, &id("a"), 5, 5),
            Err(GameError::GameNotInProgress)
        );
    }

    #[test]
    fn test_full_board_without_run_is_a_draw() {
        // Column pairs alternate so no symbol ever lines up more than two
        // stones on any axis.
        let mut session = started(6, 2);
        let size = 6;
        let mut first_cells = Vec::new();
        let mut second_cells = Vec::new();
        for row in 0..size {
            for col in 0..size {
                let block = (col / 2 + row) % 2;
                if block == 0 {
                    first_cells.push((row, col));
                } else {
                    second_cells.push((row, col));
                }
            }
        }
        assert_eq!(first_cells.len(), second_cells.len());

        for i in 0..first_cells.len() {
            let (r, c) = first_cells[i];
            validate_and_apply(&mut session, &id("a"), r, c).unwrap();
            assert_eq!(session.status(), SessionStatus::InProgress, "{}", session.board().render());
            let (r, c) = second_cells[i];
            validate_and_apply(&mut session, &id("b"), r, c).unwrap();
        }

        assert_eq!(session.status(), SessionStatus::Draw);
        assert_eq!(session.winner(), None);
        assert_eq!(session.move_log().len(), size * size);
    }
}
