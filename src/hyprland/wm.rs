//! [`WindowManager`] implementation backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! avoiding any shell command invocation or third-party crate for socket
//! discovery.
//!
//! Hyprland reports layout coordinates with a top-left origin, so screens
//! and windows pass through without a Y flip.  Monitor sizes are divided by
//! the monitor scale to get layout (logical) units.

use crate::command::{ScreenInfo, WindowHandle, WindowInfo};
use crate::geometry::Rect;
use crate::grid::NativeOrigin;
use crate::traits::WindowManager;
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Hyprland-backed window manager.
///
/// All communication happens over Hyprland's IPC socket
/// (`$XDG_RUNTIME_DIR/hypr/<instance>/.socket.sock`).  No child processes
/// are spawned.
#[derive(Debug, Default)]
pub struct HyprlandWm;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandWmError(String);

impl HyprlandWm {
    /// Create a new handle.
    ///
    /// No connection is opened eagerly; each method call opens a short-lived
    /// IPC request.
    pub fn new() -> Self {
        Self
    }
}

//  Direct Hyprland IPC helpers

/// Resolve the Hyprland command socket path.
fn socket_path() -> Result<PathBuf, HyprlandWmError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandWmError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandWmError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket.sock",
        runtime_dir, his
    )))
}

/// Send a raw command to the Hyprland command socket and return the
/// response as a string.
fn ipc_request(command: &str) -> Result<String, HyprlandWmError> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path)
        .map_err(|e| HyprlandWmError(format!("connect to {}: {}", path.display(), e)))?;

    stream
        .write_all(command.as_bytes())
        .map_err(|e| HyprlandWmError(format!("write: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .map_err(|e| HyprlandWmError(format!("read: {}", e)))?;

    String::from_utf8(response).map_err(|e| HyprlandWmError(format!("utf-8: {}", e)))
}

/// Send a JSON data query (`j/<command>`) and parse the reply.
fn ipc_json<T: for<'de> Deserialize<'de>>(data_command: &str) -> Result<T, HyprlandWmError> {
    let json = ipc_request(&format!("j/{}", data_command))?;
    serde_json::from_str(&json).map_err(|e| HyprlandWmError(format!("parse {}: {}", data_command, e)))
}

/// Send a dispatch command and check for `"ok"`.
fn ipc_dispatch(args: &str) -> Result<(), HyprlandWmError> {
    let response = ipc_request(&format!("/dispatch {}", args))?;
    if response.trim() == "ok" {
        Ok(())
    } else {
        Err(HyprlandWmError(format!("dispatch error: {}", response)))
    }
}

//  Minimal serde structs for the JSON we care about

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Debug, Deserialize)]
struct MonitorJson {
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    #[serde(default = "unit_scale")]
    scale: f64,
    /// Reserved edges `[left, top, right, bottom]` (bars, docks).
    #[serde(default)]
    reserved: [f64; 4],
    /// Output transform (0-7).  Odd values rotate by 90 or 270 degrees;
    /// `width`/`height` are still reported in the unrotated mode.
    #[serde(default)]
    transform: u8,
}

fn unit_scale() -> f64 {
    1.0
}

/// Subset of a client object from `j/activewindow` / `j/clients`.
///
/// `j/activewindow` returns `{}` when nothing is focused, so every field
/// defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClientJson {
    address: String,
    pid: i64,
    title: String,
    at: [f64; 2],
    size: [f64; 2],
}

impl ClientJson {
    fn rect(&self) -> Rect {
        Rect::new(self.at[0], self.at[1], self.size[0], self.size[1])
    }
}

/// Parse a Hyprland window address (`"0x55d0c1a2b3c0"`).
pub(crate) fn parse_address(address: &str) -> Option<u64> {
    let hex = address.trim().trim_start_matches("0x");
    if hex.is_empty() {
        return None;
    }
    u64::from_str_radix(hex, 16).ok()
}

fn monitor_to_screen(index: usize, m: &MonitorJson) -> ScreenInfo {
    let scale = if m.scale > 0.0 { m.scale } else { 1.0 };
    let (width, height) = if m.transform % 2 == 1 {
        (m.height, m.width)
    } else {
        (m.width, m.height)
    };
    let frame = Rect::new(
        m.x as f64,
        m.y as f64,
        width as f64 / scale,
        height as f64 / scale,
    );
    let [left, top, right, bottom] = m.reserved;
    let usable = Rect::new(
        frame.x + left,
        frame.y + top,
        (frame.width - left - right).max(0.0),
        (frame.height - top - bottom).max(0.0),
    );
    ScreenInfo {
        index,
        usable,
        frame,
    }
}

fn client_to_window(c: &ClientJson) -> Option<WindowInfo> {
    let address = parse_address(&c.address)?;
    Some(WindowInfo {
        handle: WindowHandle(address),
        window_id: Some(address),
        pid: u32::try_from(c.pid).unwrap_or(0),
        title: c.title.clone(),
    })
}

//  WindowManager implementation

impl WindowManager for HyprlandWm {
    type Error = HyprlandWmError;

    fn native_origin(&self) -> NativeOrigin {
        NativeOrigin::TopLeft
    }

    fn screens(&self) -> Result<Vec<ScreenInfo>, Self::Error> {
        let monitors: Vec<MonitorJson> = ipc_json("monitors")?;
        Ok(monitors
            .iter()
            .enumerate()
            .map(|(i, m)| monitor_to_screen(i, m))
            .collect())
    }

    fn focused_window(&self) -> Result<Option<WindowInfo>, Self::Error> {
        let active: ClientJson = ipc_json("activewindow")?;
        let Some(window) = client_to_window(&active) else {
            return Ok(None);
        };
        if window.pid == std::process::id() {
            return Ok(None);
        }
        Ok(Some(window))
    }

    fn window_rect(&self, window: WindowHandle) -> Result<Option<Rect>, Self::Error> {
        let clients: Vec<ClientJson> = ipc_json("clients")?;
        Ok(clients
            .iter()
            .find(|c| parse_address(&c.address) == Some(window.0))
            .map(ClientJson::rect))
    }

    fn set_window_rect(&self, window: WindowHandle, rect: Rect) -> Result<(), Self::Error> {
        // Only floating windows can be given an exact geometry.
        ipc_dispatch(&format!("setfloating address:{}", window))?;
        ipc_dispatch(&format!(
            "movewindowpixel exact {} {},address:{}",
            rect.x.round() as i64,
            rect.y.round() as i64,
            window
        ))?;
        ipc_dispatch(&format!(
            "resizewindowpixel exact {} {},address:{}",
            rect.width.round() as i64,
            rect.height.round() as i64,
            window
        ))
    }
}
