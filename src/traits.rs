//! Core traits that decouple tilecycle from any specific window manager or
//! transport mechanism.
//!
//! Every concrete backend (Hyprland, a Unix-socket listener, a test harness,
//! …) implements one of these traits.  The [`Tiler`](crate::tiler::Tiler)
//! only depends on these abstractions.

use crate::command::{Command, ScreenInfo, WindowHandle, WindowInfo};
use crate::geometry::Rect;
use crate::grid::NativeOrigin;
use std::sync::mpsc;

/// Abstraction over a window manager that can enumerate screens and read
/// and write the geometry of the focused window.
///
/// Window rectangles crossing this boundary are always in screen
/// coordinates (top-left origin, Y down).  Backends whose platform uses a
/// different convention convert inside their implementation.  Screen
/// rectangles are reported in the native convention named by
/// [`native_origin`](WindowManager::native_origin).
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// Coordinate convention of the rects returned by
    /// [`screens`](WindowManager::screens).
    fn native_origin(&self) -> NativeOrigin;

    /// Every attached screen, primary first.
    fn screens(&self) -> Result<Vec<ScreenInfo>, Self::Error>;

    /// The focused window, or `None` if nothing eligible has focus.
    ///
    /// Windows belonging to this process must not be reported.
    fn focused_window(&self) -> Result<Option<WindowInfo>, Self::Error>;

    /// Current rectangle of `window`, or `None` if it cannot be read.
    fn window_rect(&self, window: WindowHandle) -> Result<Option<Rect>, Self::Error>;

    /// Ask the window manager to move and resize `window`.
    fn set_window_rect(&self, window: WindowHandle, rect: Rect) -> Result<(), Self::Error>;
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, Hyprland's
/// IPC event stream, an in-memory channel) and forward parsed commands
/// into the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    ///
    /// This method blocks the calling thread.  To run multiple sources
    /// concurrently, spawn each one on its own thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
