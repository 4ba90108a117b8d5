//! Globally ordered candidate sequences, one per [`Direction`].
//!
//! For every direction the candidate slots of all screens are flattened and
//! sorted by absolute coordinate, so cycling follows the physical monitor
//! arrangement rather than the order the backend enumerates screens in.
//!
//! | Direction  | Candidates per screen      | Order                        |
//! |------------|----------------------------|------------------------------|
//! | `Right`    | left half, right half      | origin X ascending           |
//! | `Left`     | left half, right half      | reverse of `Right`           |
//! | `Up`       | top half, bottom half      | origin Y ascending           |
//! | `Down`     | top half, bottom half      | reverse of `Up`              |
//! | `Maximize` | full                       | native frame X ascending     |
//!
//! The descending sequences are built by reversing the ascending ones, so
//! `Left` is always the exact reverse of `Right` (and `Down` of `Up`), ties
//! included.

use crate::command::Direction;
use crate::grid::{Position, ScreenGrid};

/// Precomputed candidate sequences for every direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionCache {
    left: Vec<Position>,
    right: Vec<Position>,
    up: Vec<Position>,
    down: Vec<Position>,
    maximize: Vec<Position>,
}

impl PositionCache {
    /// Build the sequences for `grids`.
    pub fn build(grids: &[ScreenGrid]) -> Self {
        let mut right: Vec<Position> = grids
            .iter()
            .flat_map(|g| [g.left_half, g.right_half])
            .collect();
        right.sort_by(|a, b| a.origin.x.total_cmp(&b.origin.x));
        let left = right.iter().rev().copied().collect();

        let mut up: Vec<Position> = grids
            .iter()
            .flat_map(|g| [g.top_half, g.bottom_half])
            .collect();
        up.sort_by(|a, b| a.origin.y.total_cmp(&b.origin.y));
        let down = up.iter().rev().copied().collect();

        let mut screens: Vec<&ScreenGrid> = grids.iter().collect();
        screens.sort_by(|a, b| a.native_frame.x.total_cmp(&b.native_frame.x));
        let maximize = screens.into_iter().map(|g| g.full).collect();

        Self {
            left,
            right,
            up,
            down,
            maximize,
        }
    }

    /// The candidate sequence for `direction`.  Empty when no screens are
    /// attached.
    pub fn get(&self, direction: Direction) -> &[Position] {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Maximize => &self.maximize,
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Slot;
    use crate::grid::tests::screen;
    use crate::grid::{build_grids, NativeOrigin};

    fn cache(screens: &[crate::command::ScreenInfo]) -> PositionCache {
        PositionCache::build(&build_grids(screens, NativeOrigin::BottomLeft))
    }

    fn side_by_side() -> PositionCache {
        cache(&[
            screen(0, 0.0, 0.0, 1920.0, 1080.0),
            screen(1, 1920.0, 0.0, 1920.0, 1080.0),
        ])
    }

    #[test]
    fn empty_grids_give_empty_sequences() {
        let c = PositionCache::build(&[]);
        for dir in Direction::ALL {
            assert!(c.get(dir).is_empty());
        }
    }

    #[test]
    fn single_screen_left_is_right_half_then_left_half() {
        let c = cache(&[screen(0, 0.0, 0.0, 1920.0, 1080.0)]);
        let left: Vec<Slot> = c.get(Direction::Left).iter().map(|p| p.slot).collect();
        assert_eq!(left, vec![Slot::RightHalf, Slot::LeftHalf]);
        assert_eq!(c.get(Direction::Left)[0].origin.x, 960.0);
        assert_eq!(c.get(Direction::Left)[1].origin.x, 0.0);
    }

    #[test]
    fn lengths_scale_with_screen_count() {
        for n in 1..=4 {
            let screens: Vec<_> = (0..n)
                .map(|i| screen(i, i as f64 * 1000.0, 0.0, 1000.0, 800.0))
                .collect();
            let c = cache(&screens);
            for dir in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
                assert_eq!(c.get(dir).len(), 2 * n, "{dir} with {n} screens");
            }
            assert_eq!(c.get(Direction::Maximize).len(), n);
        }
    }

    #[test]
    fn left_is_strictly_descending_and_right_is_its_reverse() {
        let c = side_by_side();
        let xs: Vec<f64> = c.get(Direction::Left).iter().map(|p| p.origin.x).collect();
        assert_eq!(xs, vec![2880.0, 1920.0, 960.0, 0.0]);
        let mut reversed = c.get(Direction::Left).to_vec();
        reversed.reverse();
        assert_eq!(c.get(Direction::Right), reversed.as_slice());
    }

    #[test]
    fn right_screen_sorts_first_for_left() {
        let c = side_by_side();
        let left = c.get(Direction::Left);
        assert_eq!(left.len(), 4);
        assert_eq!(left[0].screen_index, 1);
        assert_eq!(left[1].screen_index, 1);
        assert_eq!(left[2].screen_index, 0);
        assert_eq!(left[3].screen_index, 0);
    }

    #[test]
    fn enumeration_order_does_not_matter() {
        // Right-hand monitor enumerated first.
        let c = cache(&[
            screen(0, 1920.0, 0.0, 1920.0, 1080.0),
            screen(1, 0.0, 0.0, 1920.0, 1080.0),
        ]);
        let xs: Vec<f64> = c.get(Direction::Right).iter().map(|p| p.origin.x).collect();
        assert_eq!(xs, vec![0.0, 960.0, 1920.0, 2880.0]);
        let max: Vec<usize> = c
            .get(Direction::Maximize)
            .iter()
            .map(|p| p.screen_index)
            .collect();
        assert_eq!(max, vec![1, 0]);
    }

    #[test]
    fn up_is_ascending_and_down_is_its_reverse() {
        // Stacked: primary on the bottom, secondary above it (native Y up).
        let c = cache(&[
            screen(0, 0.0, 0.0, 1920.0, 1080.0),
            screen(1, 0.0, 1080.0, 1920.0, 1080.0),
        ]);
        let ys: Vec<f64> = c.get(Direction::Up).iter().map(|p| p.origin.y).collect();
        assert_eq!(ys, vec![-1080.0, -540.0, 0.0, 540.0]);
        assert_eq!(c.get(Direction::Up)[0].screen_index, 1);
        assert_eq!(c.get(Direction::Up)[0].slot, Slot::TopHalf);

        let mut reversed = c.get(Direction::Up).to_vec();
        reversed.reverse();
        assert_eq!(c.get(Direction::Down), reversed.as_slice());
    }

    #[test]
    fn down_reverses_up_even_with_ties() {
        let c = side_by_side();
        let mut reversed = c.get(Direction::Up).to_vec();
        reversed.reverse();
        assert_eq!(c.get(Direction::Down), reversed.as_slice());
    }

    #[test]
    fn maximize_is_full_slot_per_screen() {
        let c = side_by_side();
        let max = c.get(Direction::Maximize);
        assert!(max.iter().all(|p| p.slot == Slot::Full));
        assert_eq!(max[0].origin.x, 0.0);
        assert_eq!(max[1].origin.x, 1920.0);
    }

    #[test]
    fn rebuilding_is_deterministic() {
        assert_eq!(side_by_side(), side_by_side());
    }
}
