//! **tilecycle**: keyboard-driven window tiling by cycling through preset
//! positions.
//!
//! Every screen is cut into a fixed set of slots (halves, thirds,
//! two-thirds, quarters, full).  Pressing a direction moves the focused
//! window to the next slot in that direction; pressing it again keeps
//! cycling, across every attached screen, and wraps around.  The cycle
//! position is remembered per window so alternating between windows does
//! not lose anyone's place.
//!
//! # Architecture
//!
//! * [`geometry`], [`grid`], [`index`], [`cycle`] and [`engine`] are pure
//!   computation: screen rects in, target rects out.
//! * [`traits::WindowManager`] abstracts reading screens and moving windows
//!   so the engine is not coupled to any specific compositor.
//! * [`traits::CommandSource`] abstracts the transport that delivers
//!   user intent (a Unix socket, compositor events, …).
//! * [`tiler::Tiler`] glues a window manager to the engine.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC) and
//! [`ipc`] (Unix-socket command listener).

pub mod command;
pub mod config;
pub mod cycle;
pub mod engine;
pub mod geometry;
pub mod grid;
pub mod hyprland;
pub mod index;
pub mod ipc;
pub mod tiler;
pub mod traits;
