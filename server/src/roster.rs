use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gomoku_common::ParticipantId;
use gomoku_common::games::gomoku::{Seat, Symbol};

/// Reachability view of a seat. The seat itself lives in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub symbol: Symbol,
    pub is_host: bool,
    pub is_computer: bool,
    pub connected: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, seat: &Seat, is_host: bool) -> RosterEntry {
        let entry = RosterEntry {
            participant_id: seat.participant_id.clone(),
            display_name: seat.display_name.clone(),
            symbol: seat.symbol,
            is_host,
            is_computer: seat.is_computer(),
            connected: true,
            joined_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Drops entries whose seat is gone and copies the current symbols,
    /// keeping the seat order.
    pub fn sync_with_seats(&mut self, seats: &[Seat]) {
        self.entries.retain(|entry| seats.iter().any(|seat| seat.participant_id == entry.participant_id));
        for entry in &mut self.entries {
            if let Some(seat) = seats.iter().find(|seat| seat.participant_id == entry.participant_id) {
                entry.symbol = seat.symbol;
            }
        }
        self.entries.sort_by_key(|entry| entry.symbol);
    }

    /// Returns true when the flag actually changed.
    pub fn set_connected(&mut self, participant: &ParticipantId, connected: bool) -> bool {
        match self.entries.iter_mut().find(|entry| &entry.participant_id == participant) {
            Some(entry) if entry.connected != connected && !entry.is_computer => {
                entry.connected = connected;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<&RosterEntry> {
        self.entries.iter().find(|entry| &entry.participant_id == participant)
    }

    /// Connected human participants other than `except`.
    pub fn recipients_except(&self, except: Option<&ParticipantId>) -> Vec<ParticipantId> {
        self.entries
            .iter()
            .filter(|entry| entry.connected && !entry.is_computer)
            .filter(|entry| Some(&entry.participant_id) != except)
            .map(|entry| entry.participant_id.clone())
            .collect()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
