//! Per-window cycling state.
//!
//! Repeating a direction advances one step through that direction's
//! candidate sequence.  A fresh direction (or a window with no history)
//! re-enters the sequence at the primary slot of the screen the window is
//! currently on.
//!
//! The repeat path trusts the recorded index and never looks at the
//! window's real rectangle, so cycling keeps advancing even when the window
//! manager settles the window a few pixels away from the requested slot.
//! The flip side: a window moved by something else between two presses
//! continues from where *we* last put it.

use crate::command::{Direction, WindowIdentity};
use crate::geometry::Rect;
use crate::grid::{grid_containing, Position, ScreenGrid};
use log::debug;
use std::collections::HashMap;

/// The last move applied to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub direction: Direction,
    /// Index into the candidate sequence for `direction`.
    pub index: usize,
}

/// Process-lifetime memory of the last move per window.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: HashMap<WindowIdentity, HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &WindowIdentity) -> Option<HistoryEntry> {
        self.entries.get(id).copied()
    }

    pub fn record(&mut self, id: WindowIdentity, entry: HistoryEntry) {
        self.entries.insert(id, entry);
    }

    pub fn forget(&mut self, id: &WindowIdentity) {
        self.entries.remove(id);
    }

    /// Drop every entry keyed by the backend window id `window_id`.
    /// Title-keyed entries are left alone.
    pub fn forget_window(&mut self, window_id: u64) {
        self.entries
            .retain(|key, _| !matches!(key, WindowIdentity::Handle { id, .. } if *id == window_id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decide which index of `positions` a window should move to.
///
/// `positions` must be the non-empty sequence for `direction`.
pub fn next_index(
    previous: Option<HistoryEntry>,
    direction: Direction,
    positions: &[Position],
    grids: &[ScreenGrid],
    current: &Rect,
) -> usize {
    match previous {
        Some(prev) if prev.direction == direction => (prev.index + 1) % positions.len(),
        _ => entry_index(direction, positions, grids, current),
    }
}

/// Index of the primary slot for `direction` on the screen containing the
/// window's center, or `0` if the window is on no known screen.
fn entry_index(
    direction: Direction,
    positions: &[Position],
    grids: &[ScreenGrid],
    current: &Rect,
) -> usize {
    let Some(grid) = grid_containing(grids, current.center()) else {
        debug!("window center off every screen, entering {} at 0", direction);
        return 0;
    };
    let primary = grid.slot(direction.primary_slot());
    positions
        .iter()
        .position(|p| p.same_geometry(primary))
        .unwrap_or(0)
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Slot;
    use crate::grid::tests::screen;
    use crate::grid::{build_grids, NativeOrigin};
    use crate::index::PositionCache;

    fn setup() -> (Vec<ScreenGrid>, PositionCache) {
        let grids = build_grids(
            &[
                screen(0, 0.0, 0.0, 1920.0, 1080.0),
                screen(1, 1920.0, 0.0, 1920.0, 1080.0),
            ],
            NativeOrigin::BottomLeft,
        );
        let cache = PositionCache::build(&grids);
        (grids, cache)
    }

    fn id(n: u64) -> WindowIdentity {
        WindowIdentity::Handle { pid: 1, id: n }
    }

    #[test]
    fn history_record_get_forget() {
        let mut h = History::new();
        assert!(h.is_empty());
        let entry = HistoryEntry {
            direction: Direction::Left,
            index: 1,
        };
        h.record(id(1), entry);
        assert_eq!(h.get(&id(1)), Some(entry));
        assert_eq!(h.get(&id(2)), None);
        h.forget(&id(1));
        assert_eq!(h.len(), 0);
    }

    #[test]
    fn forget_window_drops_only_matching_handles() {
        let mut h = History::new();
        let entry = HistoryEntry {
            direction: Direction::Up,
            index: 0,
        };
        let titled = WindowIdentity::Titled {
            pid: 1,
            title: "7".into(),
        };
        h.record(id(7), entry);
        h.record(id(8), entry);
        h.record(titled.clone(), entry);
        h.forget_window(7);
        assert_eq!(h.get(&id(7)), None);
        assert_eq!(h.get(&id(8)), Some(entry));
        assert_eq!(h.get(&titled), Some(entry));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn fresh_direction_enters_at_primary_of_current_screen() {
        let (grids, cache) = setup();
        let positions = cache.get(Direction::Left);
        // Window sitting in the middle of the right-hand screen.
        let rect = Rect::new(2200.0, 200.0, 800.0, 600.0);
        let idx = next_index(None, Direction::Left, positions, &grids, &rect);
        assert_eq!(positions[idx].screen_index, 1);
        assert_eq!(positions[idx].slot, Slot::LeftHalf);
    }

    #[test]
    fn repeated_direction_advances_and_wraps() {
        let (grids, cache) = setup();
        let positions = cache.get(Direction::Left);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let last = positions.len() - 1;
        let prev = HistoryEntry {
            direction: Direction::Left,
            index: last,
        };
        assert_eq!(next_index(Some(prev), Direction::Left, positions, &grids, &rect), 0);
        let prev = HistoryEntry {
            direction: Direction::Left,
            index: 1,
        };
        assert_eq!(next_index(Some(prev), Direction::Left, positions, &grids, &rect), 2);
    }

    #[test]
    fn direction_change_ignores_previous_index() {
        let (grids, cache) = setup();
        let positions = cache.get(Direction::Right);
        let rect = Rect::new(100.0, 100.0, 400.0, 400.0);
        let prev = HistoryEntry {
            direction: Direction::Left,
            index: 3,
        };
        let idx = next_index(Some(prev), Direction::Right, positions, &grids, &rect);
        assert_eq!(positions[idx].slot, Slot::RightHalf);
        assert_eq!(positions[idx].screen_index, 0);
    }

    #[test]
    fn off_screen_window_enters_at_zero() {
        let (grids, cache) = setup();
        let positions = cache.get(Direction::Up);
        let rect = Rect::new(-5000.0, -5000.0, 100.0, 100.0);
        assert_eq!(next_index(None, Direction::Up, positions, &grids, &rect), 0);
    }
}
