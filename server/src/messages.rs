use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gomoku_common::games::gomoku::{Move, SessionStatus};
use gomoku_common::{ParticipantId, SessionId};

use crate::roster::RosterEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveApplied {
    pub session_id: SessionId,
    #[serde(rename = "move")]
    pub applied: Move,
    pub resulting_status: SessionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterChanged {
    pub session_id: SessionId,
    pub roster: Vec<RosterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub session_id: SessionId,
    pub sender_id: ParticipantId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Discovery summary of a session that still has free seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAdvertised {
    pub session_id: SessionId,
    pub name: String,
    pub board_size: usize,
    pub occupancy: usize,
    pub max_occupancy: usize,
    pub status: SessionStatus,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    HostLeft,
    Inactive,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RelayMessage {
    MoveApplied(MoveApplied),
    RosterChanged(RosterChanged),
    Chat(ChatMessage),
    SessionAdvertised(SessionAdvertised),
    SessionClosed { session_id: SessionId, reason: CloseReason },
    ServerShuttingDown { message: String },
}

impl RelayMessage {
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            RelayMessage::MoveApplied(m) => Some(&m.session_id),
            RelayMessage::RosterChanged(m) => Some(&m.session_id),
            RelayMessage::Chat(m) => Some(&m.session_id),
            RelayMessage::SessionAdvertised(m) => Some(&m.session_id),
            RelayMessage::SessionClosed { session_id, .. } => Some(session_id),
            RelayMessage::ServerShuttingDown { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_common::games::gomoku::{Position, Symbol};

    #[test]
    fn test_move_applied_wire_shape() {
        let message = RelayMessage::MoveApplied(MoveApplied {
            session_id: SessionId::new("session_1"),
            applied: Move {
                position: Position::new(3, 4),
                symbol: Symbol::Second,
                sequence: 2,
                timestamp: Utc::now(),
            },
            resulting_status: SessionStatus::InProgress,
        });

        let yaml = serde_yaml_ng::to_string(&message).unwrap();
        assert!(yaml.contains("type: MoveApplied"));
        assert!(yaml.contains("move:"));
        assert!(yaml.contains("session_id: session_1"));

        let parsed: RelayMessage = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed, message);
    }

    #[test]
    fn test_session_id_lookup() {
        let closed = RelayMessage::SessionClosed {
            session_id: SessionId::new("session_9"),
            reason: CloseReason::HostLeft,
        };
        assert_eq!(closed.session_id().map(|id| id.as_str()), Some("session_9"));

        let shutdown = RelayMessage::ServerShuttingDown { message: "bye".to_string() };
        assert_eq!(shutdown.session_id(), None);
    }
}
