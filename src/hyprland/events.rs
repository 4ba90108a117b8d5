//! Turns Hyprland compositor events into tiler [`Command`]s.
//!
//! Hyprland broadcasts events on its event socket (`socket2`) at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`, one
//! per line in the `EVENT>>DATA` format:
//!
//! | Event              | Payload                      | Command                 |
//! |--------------------|------------------------------|-------------------------|
//! | `monitoradded`     | `<name>`                     | `ScreensChanged`        |
//! | `monitoraddedv2`   | `<id>,<name>,<description>`  | `ScreensChanged`        |
//! | `monitorremoved`   | `<name>`                     | `ScreensChanged`        |
//! | `monitorremovedv2` | `<id>,<name>,<description>`  | `ScreensChanged`        |
//! | `configreloaded`   | (empty)                      | `ScreensChanged`        |
//! | `closewindow`      | `<address>` (hex, no `0x`)   | `WindowClosed(address)` |
//!
//! Everything else on the stream is ignored.

use crate::command::Command;
use crate::hyprland::wm::parse_address;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::mpsc;

/// A [`CommandSource`] that watches Hyprland's event socket for monitor
/// changes and closed windows.
#[derive(Debug, Default)]
pub struct HyprlandEventSource;

/// Error from the Hyprland event source.
#[derive(Debug, thiserror::Error)]
#[error("hyprland event error: {0}")]
pub struct HyprlandEventError(String);

impl HyprlandEventSource {
    pub fn new() -> Self {
        Self
    }
}

/// Resolve the Hyprland event socket path.
fn socket2_path() -> Result<PathBuf, HyprlandEventError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandEventError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandEventError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket2.sock",
        runtime_dir, his
    )))
}

/// Split a socket2 line into `(event, data)`.
fn parse_event_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(">>")
}

/// Map one event to the command it should trigger, if any.
fn command_for_event(event: &str, data: &str) -> Option<Command> {
    match event {
        "monitoradded" | "monitoraddedv2" | "monitorremoved" | "monitorremovedv2"
        | "configreloaded" => Some(Command::ScreensChanged),
        "closewindow" => parse_address(data).map(Command::WindowClosed),
        _ => None,
    }
}

impl CommandSource for HyprlandEventSource {
    type Error = HyprlandEventError;

    /// Connect to Hyprland's event socket and forward relevant events.
    ///
    /// Blocks until the socket closes.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        let path = socket2_path()?;
        let stream = UnixStream::connect(&path)
            .map_err(|e| HyprlandEventError(format!("connect to {}: {}", path.display(), e)))?;
        info!("watching compositor events on {}", path.display());

        for line in BufReader::new(stream).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("socket2 read error: {}", e);
                    return Err(HyprlandEventError(format!("read error: {}", e)));
                }
            };
            let Some((event, data)) = parse_event_line(&line) else {
                continue;
            };
            if let Some(cmd) = command_for_event(event, data) {
                debug!("{}>>{} triggers {:?}", event, data, cmd);
                if sink.send(cmd).is_err() {
                    info!("sink closed, shutting down");
                    return Ok(());
                }
            }
        }

        warn!("socket2 stream ended");
        Ok(())
    }
}

//  Tests
