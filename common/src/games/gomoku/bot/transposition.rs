use std::collections::HashMap;

use super::super::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Score is at least the stored value (beta cutoff).
    Lower,
    /// Score is at most the stored value (alpha fail-low).
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub depth: u8,
    pub score: i64,
    pub bound: Bound,
    pub best_move: Option<Position>,
}

/// Per-search cache from position fingerprint to result. Once `capacity`
/// entries are held, new positions are dropped; known positions are still
/// refreshed when searched at least as deep.
pub struct TranspositionTable {
    entries: HashMap<u64, Entry>,
    capacity: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            capacity,
        }
    }

    /// Score usable at `depth` within the `(alpha, beta)` window.
    pub fn probe(&self, hash: u64, depth: u8, alpha: i64, beta: i64) -> Option<i64> {
        let entry = self.entries.get(&hash)?;
        if entry.depth < depth {
            return None;
        }
        match entry.bound {
            Bound::Exact => Some(entry.score),
            Bound::Lower if entry.score >= beta => Some(entry.score),
            Bound::Upper if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    pub fn best_move(&self, hash: u64) -> Option<Position> {
        self.entries.get(&hash).and_then(|entry| entry.best_move)
    }

    pub fn store(&mut self, hash: u64, entry: Entry) {
        if let Some(existing) = self.entries.get_mut(&hash) {
            if entry.depth >= existing.depth {
                *existing = entry;
            }
            return;
        }
        if self.entries.len() < self.capacity {
            self.entries.insert(hash, entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(depth: u8, score: i64, bound: Bound) -> Entry {
        Entry { depth, score, bound, best_move: Some(Position::new(3, 3)) }
    }

    #[test]
    fn test_exact_hit() {
        let mut tt = TranspositionTable::new(16);
        tt.store(42, entry(3, 120, Bound::Exact));
        assert_eq!(tt.probe(42, 3, -1000, 1000), Some(120));
        assert_eq!(tt.probe(42, 2, -1000, 1000), Some(120));
        assert_eq!(tt.best_move(42), Some(Position::new(3, 3)));
    }

    #[test]
    fn test_shallow_entry_not_used_for_deeper_search() {
        let mut tt = TranspositionTable::new(16);
        tt.store(7, entry(2, 50, Bound::Exact));
        assert_eq!(tt.probe(7, 4, -1000, 1000), None);
        assert_eq!(tt.best_move(7), Some(Position::new(3, 3)));
    }

    #[test]
    fn test_bounds_respect_window() {
        let mut tt = TranspositionTable::new(16);
        tt.store(1, entry(4, 200, Bound::Lower));
        tt.store(2, entry(4, 50, Bound::Upper));

        assert_eq!(tt.probe(1, 4, -1000, 150), Some(200));
        assert_eq!(tt.probe(1, 4, -1000, 300), None);
        assert_eq!(tt.probe(2, 4, 100, 1000), Some(50));
        assert_eq!(tt.probe(2, 4, 30, 1000), None);
    }

    #[test]
    fn test_capacity_is_a_hard_cap() {
        let mut tt = TranspositionTable::new(2);
        tt.store(1, entry(1, 0, Bound::Exact));
        tt.store(2, entry(1, 0, Bound::Exact));
        tt.store(3, entry(1, 0, Bound::Exact));
        assert_eq!(tt.len(), 2);
        assert_eq!(tt.probe(3, 1, -10, 10), None);

        tt.store(1, entry(5, 9, Bound::Exact));
        assert_eq!(tt.probe(1, 5, -10, 10), Some(9));
    }

    #[test]
    fn test_shallower_result_does_not_replace_deeper() {
        let mut tt = TranspositionTable::new(4);
        tt.store(9, entry(5, 100, Bound::Exact));
        tt.store(9, entry(2, -100, Bound::Exact));
        assert_eq!(tt.probe(9, 5, -1000, 1000), Some(100));
    }
}
