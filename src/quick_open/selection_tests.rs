//! Tests for the selection cursor

use super::*;
use crate::fuzzy::Generation;
use proptest::prelude::*;

fn store_with(len: usize) -> SuggestionStore {
    let mut store = SuggestionStore::new();
    let generation = Generation::next();
    store.track(generation);
    let results = (0..len)
        .map(|i| MatchResult::new(format!("src/file{}.rs", i), 0, vec![]))
        .collect();
    store.replace(generation, "file", results);
    store
}

// =========================================================================
// Unit Tests
// =========================================================================

#[test]
fn test_new_cursor_is_unset() {
    let cursor = SelectionCursor::new();
    assert!(cursor.index().is_none());
    assert!(cursor.current(&store_with(3)).is_none());
}

#[test]
fn test_down_from_unset_selects_first() {
    let mut cursor = SelectionCursor::new();
    cursor.move_by(Direction::Down, 3);
    assert_eq!(cursor.index(), Some(0));
}

#[test]
fn test_up_from_unset_is_noop() {
    let mut cursor = SelectionCursor::new();
    cursor.move_by(Direction::Up, 3);
    assert!(cursor.index().is_none());
}

#[test]
fn test_down_holds_at_last_row() {
    let mut cursor = SelectionCursor::new();
    for _ in 0..10 {
        cursor.move_by(Direction::Down, 3);
    }
    assert_eq!(cursor.index(), Some(2));
}

#[test]
fn test_up_holds_at_first_row() {
    let mut cursor = SelectionCursor::new();
    cursor.move_by(Direction::Down, 3);
    cursor.move_by(Direction::Up, 3);
    cursor.move_by(Direction::Up, 3);
    assert_eq!(cursor.index(), Some(0));
}

#[test]
fn test_navigate_with_zero_results() {
    let mut cursor = SelectionCursor::new();
    cursor.move_by(Direction::Down, 0);
    assert!(cursor.index().is_none());
    cursor.move_by(Direction::Up, 0);
    assert!(cursor.index().is_none());
}

#[test]
fn test_reset_clears_selection() {
    let mut cursor = SelectionCursor::new();
    cursor.move_by(Direction::Down, 3);
    cursor.reset();
    assert!(cursor.index().is_none());
}

#[test]
fn test_current_returns_selected_result() {
    let store = store_with(3);
    let mut cursor = SelectionCursor::new();
    cursor.move_by(Direction::Down, store.len());
    cursor.move_by(Direction::Down, store.len());
    assert_eq!(cursor.current(&store).unwrap().path(), "src/file1.rs");
}

#[test]
fn test_visible_window_fits_everything() {
    let cursor = SelectionCursor::new();
    assert_eq!(cursor.visible_window(4, 6), 0..4);
}

#[test]
fn test_visible_window_follows_selection() {
    let mut cursor = SelectionCursor::new();
    for _ in 0..8 {
        cursor.move_by(Direction::Down, 10);
    }
    // Selected row 7 with 6 rows visible
    assert_eq!(cursor.visible_window(10, 6), 2..8);
}

#[test]
fn test_visible_window_empty() {
    let cursor = SelectionCursor::new();
    assert_eq!(cursor.visible_window(0, 6), 0..0);
    assert_eq!(cursor.visible_window(5, 0), 0..0);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn test_move_from_stale_index_fails_loudly() {
    let mut cursor = SelectionCursor::new();
    for _ in 0..5 {
        cursor.move_by(Direction::Down, 5);
    }
    assert_eq!(cursor.index(), Some(4));

    // The list shrank without the cursor being reset
    cursor.move_by(Direction::Down, 1);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn test_current_with_stale_index_fails_loudly() {
    let mut cursor = SelectionCursor::new();
    for _ in 0..5 {
        cursor.move_by(Direction::Down, 5);
    }

    let _ = cursor.current(&store_with(1));
}

#[test]
#[cfg(not(debug_assertions))]
fn test_stale_index_is_dropped_in_release() {
    let mut cursor = SelectionCursor::new();
    for _ in 0..5 {
        cursor.move_by(Direction::Down, 5);
    }

    assert!(cursor.current(&store_with(1)).is_none());
    cursor.move_by(Direction::Down, 1);
    assert!(cursor.index().is_none());
}

// =========================================================================
// Property Tests
// =========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Navigation never leaves [0, len - 1]
    #[test]
    fn prop_move_by_stays_in_bounds(
        len in 1usize..20,
        moves in prop::collection::vec(prop::bool::ANY, 0..60)
    ) {
        let mut cursor = SelectionCursor::new();
        for down in moves {
            let direction = if down { Direction::Down } else { Direction::Up };
            cursor.move_by(direction, len);
            if let Some(index) = cursor.index() {
                prop_assert!(index < len);
            }
        }
    }

    // Up-only navigation from no selection never selects anything
    #[test]
    fn prop_up_from_unset_never_selects(len in 0usize..20, presses in 1usize..10) {
        let mut cursor = SelectionCursor::new();
        for _ in 0..presses {
            cursor.move_by(Direction::Up, len);
        }
        prop_assert!(cursor.index().is_none());
    }

    // Repeated Down past the end holds at the last row
    #[test]
    fn prop_down_saturates_at_last(len in 1usize..20, extra in 0usize..10) {
        let mut cursor = SelectionCursor::new();
        for _ in 0..(len + extra) {
            cursor.move_by(Direction::Down, len);
        }
        prop_assert_eq!(cursor.index(), Some(len - 1));
    }

    // The selected row is always inside the visible window
    #[test]
    fn prop_selection_visible(len in 1usize..40, max_rows in 1usize..10, downs in 1usize..50) {
        let mut cursor = SelectionCursor::new();
        for _ in 0..downs {
            cursor.move_by(Direction::Down, len);
        }
        let window = cursor.visible_window(len, max_rows);
        let index = cursor.index().unwrap();
        prop_assert!(window.contains(&index));
        prop_assert!(window.len() <= max_rows);
        prop_assert!(window.end <= len);
    }
}
