//! The orchestrator that ties the layout engine, window manager, and command
//! sources together.
//!
//! [`Tiler`] owns the [`Engine`] and reacts to [`Command`]s by querying the
//! focused window, asking the engine for a target slot, and issuing calls to
//! the [`WindowManager`] trait.
//!
//! A `Tiler` is meant to be driven from a single thread: every command
//! source funnels into one channel and the owner handles commands one at a
//! time, so a screen rebuild can never interleave with a cycling decision.

use crate::command::{Command, Direction, Slot, WindowInfo};
use crate::engine::Engine;
use crate::geometry::{Rect, Tolerance};
use crate::grid::Position;
use crate::traits::WindowManager;
use log::{debug, info, warn};

/// Possible errors from the tiler.
#[derive(Debug, thiserror::Error)]
pub enum TilerError {
    /// The window manager returned an error.
    #[error("window manager error: {0}")]
    WindowManager(String),
}

fn wm_err(e: impl std::fmt::Display) -> TilerError {
    TilerError::WindowManager(e.to_string())
}

/// What a command should do to the focused window once its identity and
/// rectangle are known.
#[derive(Debug, Clone, Copy)]
enum Target {
    Cycle(Direction),
    Slot(Slot),
}

/// Orchestrates the layout engine and window-manager calls.
///
/// # Typical usage
///
/// ```ignore
/// let wm = HyprlandWm::new();
/// let mut tiler = Tiler::new(wm, Tolerance::default())?;
/// tiler.handle(Command::Move(Direction::Left))?;
/// ```
pub struct Tiler<W: WindowManager> {
    wm: W,
    engine: Engine,
}

impl<W: WindowManager> Tiler<W> {
    /// Create a tiler and build the initial layout from the window
    /// manager's current screens.
    pub fn new(wm: W, tolerance: Tolerance) -> Result<Self, TilerError> {
        let engine = Engine::new(wm.native_origin(), tolerance);
        let mut tiler = Self { wm, engine };
        tiler.rebuild()?;
        Ok(tiler)
    }

    /// Return a shared reference to the layout engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Return a shared reference to the window manager backend.
    pub fn wm(&self) -> &W {
        &self.wm
    }

    /// Re-enumerate screens and rebuild the layout.  Clears all cycling
    /// history.
    pub fn rebuild(&mut self) -> Result<(), TilerError> {
        let screens = self.wm.screens().map_err(wm_err)?;
        self.engine.rebuild(&screens);
        Ok(())
    }

    /// Process a single [`Command`].
    ///
    /// Returns the position the focused window was sent to, or `None` when
    /// the command was a no-op (no focused window, no screens, …).  If the
    /// window manager fails to apply the geometry, the engine has
    /// **already** recorded the move; the next press continues the cycle.
    pub fn handle(&mut self, cmd: Command) -> Result<Option<Position>, TilerError> {
        match cmd {
            Command::Move(dir) => {
                info!("move {}", dir);
                self.apply(Target::Cycle(dir))
            }
            Command::Place(slot) => {
                info!("place {}", slot);
                self.apply(Target::Slot(slot))
            }
            Command::ScreensChanged => {
                info!("screens changed");
                if let Err(e) = self.rebuild() {
                    warn!("keeping previous layout, cycles restart: {}", e);
                    self.engine.clear_history();
                    return Err(e);
                }
                Ok(None)
            }
            Command::WindowClosed(window_id) => {
                debug!("window 0x{:x} closed", window_id);
                self.engine.forget_window(window_id);
                Ok(None)
            }
        }
    }

    fn apply(&mut self, target: Target) -> Result<Option<Position>, TilerError> {
        let Some(window) = self.wm.focused_window().map_err(wm_err)? else {
            debug!("no focused window, nothing to move");
            return Ok(None);
        };
        let Some(current) = self.wm.window_rect(window.handle).map_err(wm_err)? else {
            debug!("no rectangle for window {}", window.handle);
            return Ok(None);
        };
        let Some(id) = window.identity() else {
            warn!("cannot identify window {} (pid {})", window.handle, window.pid);
            return Ok(None);
        };

        let decided = match target {
            Target::Cycle(dir) => self.engine.move_window(dir, &id, current),
            Target::Slot(slot) => self.engine.place(slot, &id, current),
        };
        let position = match decided {
            Ok(p) => p,
            Err(e) => {
                warn!("{}", e);
                return Ok(None);
            }
        };

        self.wm
            .set_window_rect(window.handle, position.rect())
            .map_err(wm_err)?;
        self.report_settled(&window, &position);
        Ok(Some(position))
    }

    /// Log whether the window ended up where it was sent.
    fn report_settled(&self, window: &WindowInfo, target: &Position) {
        let settled: Option<Rect> = match self.wm.window_rect(window.handle) {
            Ok(r) => r,
            Err(e) => {
                debug!("could not re-read window {}: {}", window.handle, e);
                return;
            }
        };
        let Some(settled) = settled else { return };
        match self.engine.locate(&settled) {
            Some(p) if p.slot == target.slot && p.screen_index == target.screen_index => {}
            Some(p) => debug!(
                "window {} settled in {} on screen {} instead of {}",
                window.handle, p.slot, p.screen_index, target.slot
            ),
            None => debug!("window {} settled outside every slot: {:?}", window.handle, settled),
        }
    }
}

//  Tests
