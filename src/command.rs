//! Commands and types used throughout tilecycle.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the tiler can perform,
//! [`Direction`] and [`Slot`] name the layout targets, and
//! [`ScreenInfo`] / [`WindowInfo`] / [`WindowIdentity`] describe what the
//! window-manager backend reports.
//!
//! Direction and slot names are parsed leniently ("Left", "left",
//! "right_third", "Right-Third" all work) so shell key-bind helpers do not
//! need to match an exact casing.

use crate::geometry::Rect;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lowercase `s` and drop whitespace, `-` and `_`.
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// A directional snapping command.
///
/// `Left`/`Right` cycle through left and right halves, `Up`/`Down` through
/// top and bottom halves, and `Maximize` through the full-screen slot of
/// every screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Maximize,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::Maximize,
    ];

    /// The slot a window re-enters the cycle at when this direction is
    /// pressed fresh.
    pub fn primary_slot(self) -> Slot {
        match self {
            Direction::Left => Slot::LeftHalf,
            Direction::Right => Slot::RightHalf,
            Direction::Up => Slot::TopHalf,
            Direction::Down => Slot::BottomHalf,
            Direction::Maximize => Slot::Full,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Maximize => write!(f, "maximize"),
        }
    }
}

/// Parse a direction string (case-insensitive; accepts "max"/"full" for maximize).
fn parse_direction(s: &str) -> Option<Direction> {
    match normalize(s).as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "maximize" | "maximise" | "max" | "full" => Some(Direction::Maximize),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// One named layout rectangle on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    LeftHalf,
    RightHalf,
    TopHalf,
    BottomHalf,
    LeftThird,
    CenterThird,
    RightThird,
    LeftTwoThirds,
    RightTwoThirds,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Full,
}

impl Slot {
    pub const ALL: [Slot; 14] = [
        Slot::LeftHalf,
        Slot::RightHalf,
        Slot::TopHalf,
        Slot::BottomHalf,
        Slot::LeftThird,
        Slot::CenterThird,
        Slot::RightThird,
        Slot::LeftTwoThirds,
        Slot::RightTwoThirds,
        Slot::TopLeft,
        Slot::TopRight,
        Slot::BottomLeft,
        Slot::BottomRight,
        Slot::Full,
    ];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::LeftHalf => "left-half",
            Slot::RightHalf => "right-half",
            Slot::TopHalf => "top-half",
            Slot::BottomHalf => "bottom-half",
            Slot::LeftThird => "left-third",
            Slot::CenterThird => "center-third",
            Slot::RightThird => "right-third",
            Slot::LeftTwoThirds => "left-two-thirds",
            Slot::RightTwoThirds => "right-two-thirds",
            Slot::TopLeft => "top-left",
            Slot::TopRight => "top-right",
            Slot::BottomLeft => "bottom-left",
            Slot::BottomRight => "bottom-right",
            Slot::Full => "full",
        };
        f.write_str(name)
    }
}

fn parse_slot(s: &str) -> Option<Slot> {
    let wanted = normalize(s);
    Slot::ALL
        .into_iter()
        .find(|slot| normalize(&slot.to_string()) == wanted)
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_slot(&s).ok_or_else(|| DeError::custom(format!("invalid slot: {:?}", s)))
    }
}

/// Every action the tiler can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the [`Tiler`](crate::tiler::Tiler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Snap the focused window in `direction`.  Pressing the same direction
    /// again advances through the candidate slots of every screen.
    Move(Direction),

    /// Put the focused window into one named slot on its current screen.
    Place(Slot),

    /// The display configuration changed; re-enumerate screens and rebuild
    /// every grid.
    ///
    /// On the wire this is encoded as the JSON string `"ScreensChanged"`.
    ScreensChanged,

    /// A window with this backend window id was closed; its cycling
    /// history can go.
    WindowClosed(u64),
}

/// One attached screen as reported by the backend, in the backend's
/// native coordinate convention.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenInfo {
    /// Position of the screen in the backend's enumeration order.
    pub index: usize,
    /// Area available to windows (excludes bars, docks, reserved edges).
    pub usable: Rect,
    /// The full screen rectangle.
    pub frame: Rect,
}

/// Opaque handle the backend uses to read and write a window's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Information about the currently focused window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Handle for geometry get/set.
    pub handle: WindowHandle,
    /// Stable per-window id, when the backend exposes one.
    pub window_id: Option<u64>,
    /// Owning process.
    pub pid: u32,
    /// Human-readable title.
    pub title: String,
}

impl WindowInfo {
    /// Derive the identity cycling history is keyed by.
    ///
    /// Prefers `(pid, window_id)`.  Without a stable id it falls back to
    /// `(pid, title)`, so a title change starts a fresh cycle.  Returns
    /// `None` when neither is available.
    pub fn identity(&self) -> Option<WindowIdentity> {
        match self.window_id {
            Some(id) => Some(WindowIdentity::Handle { pid: self.pid, id }),
            None if !self.title.is_empty() => Some(WindowIdentity::Titled {
                pid: self.pid,
                title: self.title.clone(),
            }),
            None => None,
        }
    }
}

/// Key under which per-window cycling history is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WindowIdentity {
    Handle { pid: u32, id: u64 },
    Titled { pid: u32, title: String },
}

impl fmt::Display for WindowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowIdentity::Handle { pid, id } => write!(f, "{}:0x{:x}", pid, id),
            WindowIdentity::Titled { pid, title } => write!(f, "{}:{:?}", pid, title),
        }
    }
}
