//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"Move":"left"}
//! {"Move":"maximize"}
//! {"Place":"right-third"}
//! "ScreensChanged"
//! ```
//!
//! A key-bind helper can be as small as
//! `echo '{"Move":"left"}' | socat - UNIX-CONNECT:$XDG_RUNTIME_DIR/tilecycle.sock`.

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::fs::{self, DirBuilder, Permissions};
use std::io::{self, BufRead, BufReader};
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whether the listener should keep accepting connections.
enum Flow {
    Continue,
    SinkClosed,
}

/// Removes the socket file when the listener stops.
struct SocketFile<'a>(&'a Path);

impl Drop for SocketFile<'_> {
    fn drop(&mut self) {
        let _ = fs::remove_file(self.0);
    }
}

/// Private directory the socket is created in before it is moved to `path`.
fn staging_dir(path: &Path) -> io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "socket path has no file name"))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok(parent.join(format!(
        ".{}.{}.bind",
        name.to_string_lossy(),
        std::process::id()
    )))
}

/// Bind a socket at `path` that is never reachable by other users.
///
/// The socket is bound inside a fresh `0700` directory, narrowed to `0600`
/// and only then renamed onto `path`.
fn bind_private(path: &Path) -> Result<UnixListener, UnixSocketError> {
    let staging = staging_dir(path)?;
    let _ = fs::remove_dir_all(&staging);
    DirBuilder::new().mode(0o700).create(&staging)?;

    let staged = staging.join("sock");
    let bound = UnixListener::bind(&staged).and_then(|listener| {
        fs::set_permissions(&staged, Permissions::from_mode(0o600))?;
        fs::rename(&staged, path)?;
        Ok(listener)
    });
    let _ = fs::remove_file(&staged);
    let _ = fs::remove_dir(&staging);
    Ok(bound?)
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called
    /// and removed when the source shuts down.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse one line off the wire.  Blank lines yield `Ok(None)`.
fn parse_line(text: &str) -> Result<Option<Command>, UnixSocketError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(text)?))
}

/// Forward every command on one client connection into `sink`.
fn serve_client(stream: UnixStream, sink: &mpsc::Sender<Command>) -> Flow {
    for line in BufReader::new(stream).lines() {
        let text = match line {
            Ok(text) => text,
            Err(e) => {
                warn!("read error: {}", e);
                break;
            }
        };
        match parse_line(&text) {
            Ok(Some(cmd)) => {
                debug!("received {:?}", cmd);
                if sink.send(cmd).is_err() {
                    return Flow::SinkClosed;
                }
            }
            Ok(None) => {}
            Err(e) => error!("bad command: {} ({})", text, e),
        }
    }
    Flow::Continue
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** indefinitely.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = fs::remove_file(&self.path);

        let listener = bind_private(&self.path)?;
        let _cleanup = SocketFile(&self.path);
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    if let Flow::SinkClosed = serve_client(stream, &sink) {
                        info!("sink closed, shutting down");
                        return Ok(());
                    }
                    debug!("client disconnected");
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

//  Tests 
