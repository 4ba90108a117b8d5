//! Per-screen slot geometry.
//!
//! [`build_grids`] turns the backend's screen list into one [`ScreenGrid`]
//! per screen.  Each grid holds every named [`Slot`] as a [`Position`] in
//! screen coordinates.  Grids are immutable: when the display configuration
//! changes the whole list is rebuilt and replaced.

use crate::command::{ScreenInfo, Slot};
use crate::geometry::{flip_y, Point, Rect, Size};

/// Coordinate convention a backend reports screen geometry in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativeOrigin {
    /// Origin at the bottom-left of the primary screen, Y growing upward.
    #[default]
    BottomLeft,
    /// Origin at the top-left, Y growing downward (already screen
    /// coordinates).
    TopLeft,
}

/// One named slot on one screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub origin: Point,
    pub size: Size,
    /// Index of the [`ScreenGrid`] this position belongs to.
    pub screen_index: usize,
    pub slot: Slot,
}

impl Position {
    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.origin, self.size)
    }

    /// Exact origin and size equality.
    pub fn same_geometry(&self, other: &Position) -> bool {
        self.origin == other.origin && self.size == other.size
    }
}

/// All named slots of one screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenGrid {
    pub screen_index: usize,
    /// Usable area in screen coordinates.
    pub usable: Rect,
    /// Full screen rect in screen coordinates.
    pub frame: Rect,
    /// Full screen rect as the backend reported it.
    pub native_frame: Rect,
    pub left_half: Position,
    pub right_half: Position,
    pub top_half: Position,
    pub bottom_half: Position,
    /// Left, center, right.
    pub thirds: [Position; 3],
    /// Left, right.
    pub two_thirds: [Position; 2],
    /// Top-left, top-right, bottom-left, bottom-right.
    pub quarters: [Position; 4],
    pub full: Position,
}

impl ScreenGrid {
    /// Build the grid for `screen`.
    ///
    /// Slots are subdivided in the native convention and then converted to
    /// screen coordinates against `primary_height`, the full height of the
    /// primary screen.
    pub fn build(screen: &ScreenInfo, origin: NativeOrigin, primary_height: f64) -> Self {
        let to_screen = |r: Rect| match origin {
            NativeOrigin::BottomLeft => flip_y(r, primary_height),
            NativeOrigin::TopLeft => r,
        };
        let pos = |slot: Slot, r: Rect| {
            let r = to_screen(r);
            Position {
                origin: r.origin(),
                size: r.size(),
                screen_index: screen.index,
                slot,
            }
        };

        let Rect {
            x,
            y,
            width: w,
            height: h,
        } = screen.usable;
        let (half_w, half_h) = (w / 2.0, h / 2.0);
        let (third_w, two_third_w) = (w / 3.0, w * 2.0 / 3.0);

        // "Upper" half in native terms depends on which way Y grows.
        let (upper_y, lower_y) = match origin {
            NativeOrigin::BottomLeft => (y + half_h, y),
            NativeOrigin::TopLeft => (y, y + half_h),
        };

        Self {
            screen_index: screen.index,
            usable: to_screen(screen.usable),
            frame: to_screen(screen.frame),
            native_frame: screen.frame,
            left_half: pos(Slot::LeftHalf, Rect::new(x, y, half_w, h)),
            right_half: pos(Slot::RightHalf, Rect::new(x + half_w, y, half_w, h)),
            top_half: pos(Slot::TopHalf, Rect::new(x, upper_y, w, half_h)),
            bottom_half: pos(Slot::BottomHalf, Rect::new(x, lower_y, w, half_h)),
            thirds: [
                pos(Slot::LeftThird, Rect::new(x, y, third_w, h)),
                pos(Slot::CenterThird, Rect::new(x + third_w, y, third_w, h)),
                pos(Slot::RightThird, Rect::new(x + two_third_w, y, third_w, h)),
            ],
            two_thirds: [
                pos(Slot::LeftTwoThirds, Rect::new(x, y, two_third_w, h)),
                pos(Slot::RightTwoThirds, Rect::new(x + third_w, y, two_third_w, h)),
            ],
            quarters: [
                pos(Slot::TopLeft, Rect::new(x, upper_y, half_w, half_h)),
                pos(Slot::TopRight, Rect::new(x + half_w, upper_y, half_w, half_h)),
                pos(Slot::BottomLeft, Rect::new(x, lower_y, half_w, half_h)),
                pos(Slot::BottomRight, Rect::new(x + half_w, lower_y, half_w, half_h)),
            ],
            full: pos(Slot::Full, screen.usable),
        }
    }

    /// Look up a named slot.
    pub fn slot(&self, slot: Slot) -> &Position {
        match slot {
            Slot::LeftHalf => &self.left_half,
            Slot::RightHalf => &self.right_half,
            Slot::TopHalf => &self.top_half,
            Slot::BottomHalf => &self.bottom_half,
            Slot::LeftThird => &self.thirds[0],
            Slot::CenterThird => &self.thirds[1],
            Slot::RightThird => &self.thirds[2],
            Slot::LeftTwoThirds => &self.two_thirds[0],
            Slot::RightTwoThirds => &self.two_thirds[1],
            Slot::TopLeft => &self.quarters[0],
            Slot::TopRight => &self.quarters[1],
            Slot::BottomLeft => &self.quarters[2],
            Slot::BottomRight => &self.quarters[3],
            Slot::Full => &self.full,
        }
    }

    /// Every slot of this grid, in [`Slot::ALL`] order.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        Slot::ALL.into_iter().map(move |s| self.slot(s))
    }
}

/// Build one grid per screen.
///
/// The first screen in `screens` is the primary; its full frame height is
/// the shared vertical reference for the bottom-left conversion.  An empty
/// list yields no grids.
pub fn build_grids(screens: &[ScreenInfo], origin: NativeOrigin) -> Vec<ScreenGrid> {
    let Some(primary) = screens.first() else {
        return Vec::new();
    };
    let primary_height = primary.frame.height;
    screens
        .iter()
        .map(|s| ScreenGrid::build(s, origin, primary_height))
        .collect()
}

/// Find the grid whose screen-coordinate frame contains `p`.
pub fn grid_containing(grids: &[ScreenGrid], p: Point) -> Option<&ScreenGrid> {
    grids.iter().find(|g| g.frame.contains(p))
}

//  Tests
