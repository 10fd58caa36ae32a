//! Move history: every placed mark, in order.

use crate::board::{Mark, Side, row_col};
use chrono::{DateTime, Local};
use derive_getters::Getters;
use tracing::{debug, instrument};

/// A single placed move.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MoveRecord {
    /// Mark that was placed.
    mark: Mark,
    /// Side that placed it.
    side: Side,
    /// Flat cell index (0-8).
    index: usize,
    /// 1-indexed row.
    row: usize,
    /// 1-indexed column.
    col: usize,
    /// Wall-clock time the move was recorded.
    timestamp: DateTime<Local>,
}

impl MoveRecord {
    /// Creates a record stamped with the current local time.
    pub fn new(mark: Mark, side: Side, index: usize) -> Self {
        Self::at(mark, side, index, Local::now())
    }

    /// Creates a record with an explicit timestamp.
    pub fn at(mark: Mark, side: Side, index: usize, timestamp: DateTime<Local>) -> Self {
        let (row, col) = row_col(index);
        Self {
            mark,
            side,
            index,
            row,
            col,
            timestamp,
        }
    }

    /// Notation such as `X at (2,2)`.
    pub fn notation(&self) -> String {
        format!("{} at ({},{})", self.mark, self.row, self.col)
    }

    /// Display time, `HH:MM:SS`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Append-only list of moves for the current game.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move.
    #[instrument(skip(self))]
    pub fn record(&mut self, mark: Mark, side: Side, index: usize) -> &MoveRecord {
        let record = MoveRecord::new(mark, side, index);
        debug!(notation = %record.notation(), number = self.records.len() + 1, "Move recorded");
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// The newest record.
    pub fn latest(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no move has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forgets every move.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Display lines, `#1: X at (2,2)`, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| format!("#{}: {}", i + 1, record.notation()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation_matches_row_and_column() {
        for index in 0..9 {
            let record = MoveRecord::new(Mark::X, Side::Player, index);
            assert_eq!(*record.row(), index / 3 + 1);
            assert_eq!(*record.col(), index % 3 + 1);
        }
        assert_eq!(MoveRecord::new(Mark::O, Side::Ai, 0).notation(), "O at (1,1)");
        assert_eq!(MoveRecord::new(Mark::X, Side::Player, 7).notation(), "X at (3,2)");
    }

    #[test]
    fn test_history_is_ordered_and_clearable() {
        let mut history = MoveHistory::new();
        history.record(Mark::X, Side::Player, 4);
        history.record(Mark::O, Side::Ai, 0);
        assert_eq!(history.len(), 2);
        assert_eq!(history.lines(), vec!["#1: X at (2,2)", "#2: O at (1,1)"]);
        assert_eq!(*history.latest().unwrap().side(), Side::Ai);

        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn test_time_label_format() {
        let stamp = Local::now();
        let record = MoveRecord::at(Mark::X, Side::Player, 0, stamp);
        assert_eq!(record.time_label(), stamp.format("%H:%M:%S").to_string());
        assert_eq!(record.time_label().len(), 8);
    }
}
