use serde::{Deserialize, Serialize};

use crate::config::{Validate, ensure_range};
use super::board::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};

pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub board_size: usize,
    /// 2 for a classic game, 3 for a triangle-symbol game.
    pub seat_count: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            board_size: 15,
            seat_count: MIN_SEATS,
        }
    }
}

impl SessionSettings {
    pub fn new(board_size: usize, seat_count: usize) -> Self {
        Self { board_size, seat_count }
    }
}

impl Validate for SessionSettings {
    fn validate(&self) -> Result<(), String> {
        ensure_range("Board size", self.board_size, MIN_BOARD_SIZE, MAX_BOARD_SIZE)?;
        ensure_range("Seat count", self.seat_count, MIN_SEATS, MAX_SEATS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SessionSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(SessionSettings::new(5, 2).validate().is_err());
        assert!(SessionSettings::new(25, 2).validate().is_err());
        assert!(SessionSettings::new(10, 1).validate().is_err());
        assert!(SessionSettings::new(10, 4).validate().is_err());
        assert!(SessionSettings::new(24, 3).validate().is_ok());
    }
}
