//! Selection cursor for quick-open suggestions
//!
//! Tracks the highlighted row. Navigation clamps at both ends of the list
//! instead of wrapping around.

use std::ops::Range;

use super::suggestion_store::SuggestionStore;
use crate::fuzzy::MatchResult;

/// Arrow-key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    /// Currently selected row (None = no selection)
    index: Option<usize>,
}

impl SelectionCursor {
    pub fn new() -> Self {
        Self { index: None }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Forget the selected row
    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Move one row in `direction` within a list of `len` results
    ///
    /// From no selection, Down selects the first row and Up does nothing.
    /// Moving past either end holds at that end. A selection that is already
    /// outside the list is an invariant breach: it is reported and dropped.
    pub fn move_by(&mut self, direction: Direction, len: usize) {
        if let Some(current) = self.index
            && current >= len
        {
            report_out_of_range(current, len);
            self.index = None;
            return;
        }
        if len == 0 {
            return;
        }

        self.index = match (self.index, direction) {
            (None, Direction::Down) => Some(0),
            (None, Direction::Up) => None,
            (Some(current), direction) => {
                let moved = current.saturating_add_signed(direction.delta());
                Some(moved.min(len - 1))
            }
        };
    }

    /// The selected result, if any
    pub fn current<'a>(&self, store: &'a SuggestionStore) -> Option<&'a MatchResult> {
        let index = self.index?;
        match store.get(index) {
            Ok(result) => Some(result),
            Err(e) => {
                report_out_of_range(e.index, e.len);
                None
            }
        }
    }

    /// Rows to draw when at most `max_rows` fit, keeping the selection visible
    pub fn visible_window(&self, len: usize, max_rows: usize) -> Range<usize> {
        if max_rows == 0 || len == 0 {
            return 0..0;
        }
        if len <= max_rows {
            return 0..len;
        }

        let selected = self.index.unwrap_or(0).min(len - 1);
        let start = (selected + 1).saturating_sub(max_rows);
        start..start + max_rows
    }
}

fn report_out_of_range(index: usize, len: usize) {
    log::error!("Selection {} out of range for {} results", index, len);
    debug_assert!(false, "selection {} out of range for {} results", index, len);
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod selection_tests;
