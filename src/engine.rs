//! The layout engine: screen grids, per-direction candidate sequences and
//! per-window cycling history behind one `&mut self` API.
//!
//! [`Engine::rebuild`] replaces the grids, recomputes the [`PositionCache`]
//! and clears the history in a single call, so a cycling decision can never
//! observe a cache that does not match the grids, nor reuse an index
//! recorded against an older cache.

use crate::command::{Direction, ScreenInfo, Slot, WindowIdentity};
use crate::cycle::{next_index, History, HistoryEntry};
use crate::geometry::{Rect, Tolerance};
use crate::grid::{build_grids, grid_containing, NativeOrigin, Position, ScreenGrid};
use crate::index::PositionCache;
use log::{debug, info};

/// Errors produced by the engine.  None of them mutate any state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The sequence for this direction is empty (no screens attached).
    #[error("no layout available for {0}")]
    NoLayout(Direction),
    /// There are no screens to place a window on.
    #[error("no screens attached")]
    NoScreens,
}

#[derive(Debug, Clone)]
pub struct Engine {
    origin: NativeOrigin,
    tolerance: Tolerance,
    grids: Vec<ScreenGrid>,
    cache: PositionCache,
    history: History,
}

impl Engine {
    /// Create an engine with no screens.  Call [`rebuild`](Self::rebuild)
    /// before issuing moves.
    pub fn new(origin: NativeOrigin, tolerance: Tolerance) -> Self {
        Self {
            origin,
            tolerance,
            grids: Vec::new(),
            cache: PositionCache::default(),
            history: History::new(),
        }
    }

    /// Rebuild every grid and candidate sequence from `screens` and drop all
    /// cycling history.
    pub fn rebuild(&mut self, screens: &[ScreenInfo]) {
        let grids = build_grids(screens, self.origin);
        self.cache = PositionCache::build(&grids);
        self.grids = grids;
        self.history.clear();
        info!("rebuilt layout for {} screen(s)", self.grids.len());
    }

    pub fn grids(&self) -> &[ScreenGrid] {
        &self.grids
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// The ordered candidate sequence for `direction`.
    pub fn positions_for_direction(&self, direction: Direction) -> &[Position] {
        self.cache.get(direction)
    }

    /// Decide where the window identified by `id` goes next for
    /// `direction`, and record that decision.
    ///
    /// The history write happens before the caller applies the geometry and
    /// is not rolled back if applying fails: the next press continues the
    /// cycle instead of retrying the same slot.
    pub fn move_window(
        &mut self,
        direction: Direction,
        id: &WindowIdentity,
        current: Rect,
    ) -> Result<Position, EngineError> {
        let positions = self.cache.get(direction);
        if positions.is_empty() {
            return Err(EngineError::NoLayout(direction));
        }

        let previous = self.history.get(id);
        let index = next_index(previous, direction, positions, &self.grids, &current);
        let target = positions[index];

        debug!(
            "{} {}: index {} of {} -> {} on screen {}",
            id,
            direction,
            index,
            positions.len(),
            target.slot,
            target.screen_index
        );
        self.history.record(id.clone(), HistoryEntry { direction, index });
        Ok(target)
    }

    /// Send the window straight to `slot` on the screen containing its
    /// center (the first screen if none does).  Resets the window's cycle.
    pub fn place(
        &mut self,
        slot: Slot,
        id: &WindowIdentity,
        current: Rect,
    ) -> Result<Position, EngineError> {
        let grid = grid_containing(&self.grids, current.center())
            .or_else(|| self.grids.first())
            .ok_or(EngineError::NoScreens)?;
        let target = *grid.slot(slot);
        self.history.forget(id);
        debug!("{} place {} on screen {}", id, slot, target.screen_index);
        Ok(target)
    }

    /// Tolerant lookup of the slot `rect` currently occupies.
    ///
    /// When several slots match, the one with the closest origin wins.
    pub fn locate(&self, rect: &Rect) -> Option<&Position> {
        self.grids
            .iter()
            .flat_map(|g| g.positions())
            .filter(|p| self.tolerance.matches(&p.rect(), rect))
            .min_by(|a, b| {
                origin_distance(a, rect)
                    .total_cmp(&origin_distance(b, rect))
                    .then_with(|| size_distance(a, rect).total_cmp(&size_distance(b, rect)))
            })
    }

    pub fn history_for(&self, id: &WindowIdentity) -> Option<HistoryEntry> {
        self.history.get(id)
    }

    pub fn forget(&mut self, id: &WindowIdentity) {
        self.history.forget(id);
    }

    /// Drop history for a closed window, by backend window id.
    pub fn forget_window(&mut self, window_id: u64) {
        self.history.forget_window(window_id);
    }

    /// Drop all cycling history but keep the current layout.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

fn origin_distance(p: &Position, r: &Rect) -> f64 {
    (p.origin.x - r.x).abs() + (p.origin.y - r.y).abs()
}

fn size_distance(p: &Position, r: &Rect) -> f64 {
    (p.size.width - r.width).abs() + (p.size.height - r.height).abs()
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::screen;

    fn single_screen() -> Vec<ScreenInfo> {
        vec![screen(0, 0.0, 0.0, 1920.0, 1080.0)]
    }

    fn dual_screen() -> Vec<ScreenInfo> {
        vec![
            screen(0, 0.0, 0.0, 1920.0, 1080.0),
            screen(1, 1920.0, 0.0, 1920.0, 1080.0),
        ]
    }

    fn engine(screens: &[ScreenInfo]) -> Engine {
        let mut e = Engine::new(NativeOrigin::BottomLeft, Tolerance::default());
        e.rebuild(screens);
        e
    }

    fn win() -> WindowIdentity {
        WindowIdentity::Handle { pid: 100, id: 1 }
    }

    /// A rect that matches no slot, centered on the primary screen.
    fn floating() -> Rect {
        Rect::new(700.0, 300.0, 500.0, 400.0)
    }

    #[test]
    fn no_screens_is_no_layout_and_no_history() {
        let mut e = engine(&[]);
        for dir in Direction::ALL {
            assert_eq!(e.move_window(dir, &win(), floating()), Err(EngineError::NoLayout(dir)));
        }
        assert_eq!(e.history_for(&win()), None);
        assert_eq!(e.place(Slot::Full, &win(), floating()), Err(EngineError::NoScreens));
    }

    #[test]
    fn single_screen_left_cycles_left_right_left() {
        let mut e = engine(&single_screen());
        let g = e.grids()[0].clone();
        assert_eq!(
            e.positions_for_direction(Direction::Left),
            &[g.right_half, g.left_half]
        );

        let first = e.move_window(Direction::Left, &win(), floating()).unwrap();
        assert_eq!(first, g.left_half);
        assert_eq!(first.rect(), Rect::new(0.0, 0.0, 960.0, 1080.0));

        let second = e.move_window(Direction::Left, &win(), first.rect()).unwrap();
        assert_eq!(second, g.right_half);
        assert_eq!(second.rect(), Rect::new(960.0, 0.0, 960.0, 1080.0));

        let third = e.move_window(Direction::Left, &win(), second.rect()).unwrap();
        assert_eq!(third, first);
    }

    #[test]
    fn cycling_alternates_indefinitely() {
        let mut e = engine(&single_screen());
        let mut indices = Vec::new();
        for _ in 0..6 {
            e.move_window(Direction::Up, &win(), floating()).unwrap();
            indices.push(e.history_for(&win()).unwrap().index);
        }
        let start = indices[0];
        let other = 1 - start;
        assert_eq!(indices, vec![start, other, start, other, start, other]);
    }

    #[test]
    fn repeated_press_walks_every_screen() {
        let mut e = engine(&dual_screen());
        let mut seen = Vec::new();
        for _ in 0..4 {
            let p = e.move_window(Direction::Right, &win(), floating()).unwrap();
            seen.push((p.screen_index, p.slot));
        }
        // Starts at the primary slot of the window's screen and walks right.
        assert_eq!(
            seen,
            vec![
                (0, Slot::RightHalf),
                (1, Slot::LeftHalf),
                (1, Slot::RightHalf),
                (0, Slot::LeftHalf),
            ]
        );
    }

    #[test]
    fn switching_direction_restarts_at_primary() {
        let mut e = engine(&dual_screen());
        // Walk left twice: left half of screen 0, then wrap to right half of screen 1.
        e.move_window(Direction::Left, &win(), floating()).unwrap();
        let wrapped = e.move_window(Direction::Left, &win(), floating()).unwrap();
        assert_eq!((wrapped.screen_index, wrapped.slot), (1, Slot::RightHalf));

        // Now ask for "up" while the window sits on screen 1.
        let up = e.move_window(Direction::Up, &win(), wrapped.rect()).unwrap();
        assert_eq!((up.screen_index, up.slot), (1, Slot::TopHalf));
        let entry = e.history_for(&win()).unwrap();
        assert_eq!(entry.direction, Direction::Up);
        assert_eq!(e.positions_for_direction(Direction::Up)[entry.index], up);
    }

    #[test]
    fn maximize_cycles_through_screens_left_to_right() {
        let mut e = engine(&dual_screen());
        let on_right = Rect::new(2000.0, 100.0, 300.0, 300.0);
        let a = e.move_window(Direction::Maximize, &win(), on_right).unwrap();
        assert_eq!((a.screen_index, a.slot), (1, Slot::Full));
        let b = e.move_window(Direction::Maximize, &win(), a.rect()).unwrap();
        assert_eq!((b.screen_index, b.slot), (0, Slot::Full));
    }

    #[test]
    fn windows_have_independent_history() {
        let mut e = engine(&single_screen());
        let other = WindowIdentity::Titled {
            pid: 100,
            title: "notes".into(),
        };
        let a1 = e.move_window(Direction::Left, &win(), floating()).unwrap();
        let b1 = e.move_window(Direction::Left, &other, floating()).unwrap();
        assert_eq!(a1, b1, "both start at the primary slot");
        let a2 = e.move_window(Direction::Left, &win(), a1.rect()).unwrap();
        assert_ne!(a1, a2);
        assert_eq!(e.history_for(&other).unwrap().index, e.history_for(&win()).unwrap().index ^ 1);
    }

    #[test]
    fn off_screen_window_enters_at_index_zero() {
        let mut e = engine(&dual_screen());
        let lost = Rect::new(-9000.0, -9000.0, 100.0, 100.0);
        let p = e.move_window(Direction::Left, &win(), lost).unwrap();
        assert_eq!(p, e.positions_for_direction(Direction::Left)[0]);
    }

    #[test]
    fn external_move_between_presses_is_not_noticed() {
        let mut e = engine(&dual_screen());
        let first = e.move_window(Direction::Left, &win(), floating()).unwrap();
        assert_eq!((first.screen_index, first.slot), (0, Slot::LeftHalf));

        // Something else drags the window to the right-hand screen.
        let dragged = Rect::new(3000.0, 200.0, 400.0, 400.0);
        let next = e.move_window(Direction::Left, &win(), dragged).unwrap();

        // The cycle continues from the recorded index, not from the window's
        // new screen.
        let seq = e.positions_for_direction(Direction::Left);
        let first_idx = seq.iter().position(|p| *p == first).unwrap();
        assert_eq!(next, seq[(first_idx + 1) % seq.len()]);
    }

    #[test]
    fn rebuild_clears_history_and_is_idempotent() {
        let mut e = engine(&dual_screen());
        e.move_window(Direction::Left, &win(), floating()).unwrap();
        e.move_window(Direction::Left, &win(), floating()).unwrap();
        let before: Vec<Vec<Position>> = Direction::ALL
            .iter()
            .map(|d| e.positions_for_direction(*d).to_vec())
            .collect();

        e.rebuild(&dual_screen());
        assert_eq!(e.history_for(&win()), None);
        let after: Vec<Vec<Position>> = Direction::ALL
            .iter()
            .map(|d| e.positions_for_direction(*d).to_vec())
            .collect();
        assert_eq!(before, after);

        e.move_window(Direction::Left, &win(), floating()).unwrap();
        e.rebuild(&dual_screen());
        assert_eq!(e.history_for(&win()), None);
    }

    #[test]
    fn rebuild_after_unplug_restarts_cycle_on_remaining_screen() {
        let mut e = engine(&dual_screen());
        for _ in 0..3 {
            e.move_window(Direction::Right, &win(), floating()).unwrap();
        }
        e.rebuild(&single_screen());
        assert_eq!(e.positions_for_direction(Direction::Right).len(), 2);
        let p = e.move_window(Direction::Right, &win(), floating()).unwrap();
        assert_eq!(p.slot, Slot::RightHalf);
        assert!(e.history_for(&win()).unwrap().index < 2);
    }

    #[test]
    fn closed_window_restarts_at_primary() {
        let mut e = engine(&single_screen());
        e.move_window(Direction::Left, &win(), floating()).unwrap();
        e.forget_window(1);
        assert_eq!(e.history_for(&win()), None);
        let p = e.move_window(Direction::Left, &win(), floating()).unwrap();
        assert_eq!(p.slot, Slot::LeftHalf);
    }

    #[test]
    fn clear_history_keeps_layout() {
        let mut e = engine(&dual_screen());
        e.move_window(Direction::Right, &win(), floating()).unwrap();
        e.clear_history();
        assert_eq!(e.history_for(&win()), None);
        assert_eq!(e.positions_for_direction(Direction::Right).len(), 4);
    }

    #[test]
    fn place_targets_current_screen_and_resets_cycle() {
        let mut e = engine(&dual_screen());
        e.move_window(Direction::Left, &win(), floating()).unwrap();
        let on_right = Rect::new(2500.0, 300.0, 300.0, 300.0);
        let p = e.place(Slot::CenterThird, &win(), on_right).unwrap();
        assert_eq!(p.screen_index, 1);
        assert_eq!(p.rect(), Rect::new(2560.0, 0.0, 640.0, 1080.0));
        assert_eq!(e.history_for(&win()), None);
    }

    #[test]
    fn place_off_screen_uses_first_screen() {
        let mut e = engine(&dual_screen());
        let p = e
            .place(Slot::BottomRight, &win(), Rect::new(-500.0, -500.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(p.screen_index, 0);
        assert_eq!(p.rect(), Rect::new(960.0, 540.0, 960.0, 540.0));
    }

    #[test]
    fn locate_tolerates_window_manager_slack() {
        let e = engine(&dual_screen());
        // Right half of screen 1, but the window kept a minimum width and
        // picked up a title-bar offset.
        let settled = Rect::new(2885.0, 12.0, 1000.0, 1070.0);
        let hit = e.locate(&settled).unwrap();
        assert_eq!((hit.screen_index, hit.slot), (1, Slot::RightHalf));

        assert!(e.locate(&Rect::new(400.0, 400.0, 300.0, 300.0)).is_none());
    }

    #[test]
    fn locate_prefers_closest_size_on_shared_origin() {
        let mut e = Engine::new(NativeOrigin::BottomLeft, Tolerance::new(20.0, 400.0));
        e.rebuild(&single_screen());
        // Left third, left half and left two-thirds all share the origin and
        // fit the loose size bound; the closest size wins.
        let hit = e.locate(&Rect::new(0.0, 0.0, 960.0, 1070.0)).unwrap();
        assert_eq!(hit.slot, Slot::LeftHalf);
    }
}
