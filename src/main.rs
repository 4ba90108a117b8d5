//! Entry point for the **tilecycle** daemon.
//!
//! Spawns the command sources on background threads and processes incoming
//! commands on the main thread, so all tiling state is owned by one thread.

use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::mpsc;
use tilecycle::command::Command;
use tilecycle::config::Config;
use tilecycle::hyprland::events::HyprlandEventSource;
use tilecycle::hyprland::wm::HyprlandWm;
use tilecycle::ipc::listener::UnixSocketListener;
use tilecycle::tiler::Tiler;
use tilecycle::traits::{CommandSource, WindowManager};

/// Resolve the config directory (`$XDG_CONFIG_HOME/tilecycle`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("tilecycle")
}

/// Try to load the config from `$XDG_CONFIG_HOME/tilecycle/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();

    let tiler = match Tiler::new(HyprlandWm::new(), config.matching.tolerance()) {
        Ok(t) => {
            info!("found {} screen(s)", t.engine().grids().len());
            t
        }
        Err(e) => {
            error!("failed to query screens: {}", e);
            std::process::exit(1);
        }
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx, &config);

    run_event_loop(tiler, cmd_rx);
}

fn run_event_loop<W: WindowManager>(mut tiler: Tiler<W>, cmd_rx: mpsc::Receiver<Command>) {
    info!("tilecycle running");
    for cmd in cmd_rx {
        match tiler.handle(cmd) {
            Ok(Some(position)) => debug!("{:?} -> {:?}", cmd, position.rect()),
            Ok(None) => {}
            Err(e) => error!("command error: {}", e),
        }
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_source<S>(mut source: S, tx: mpsc::Sender<Command>, name: &'static str)
where
    S: CommandSource + 'static,
{
    std::thread::spawn(move || {
        if let Err(e) = source.run(tx) {
            error!("{} error: {}", name, e);
        }
    });
}

fn spawn_command_sources(tx: mpsc::Sender<Command>, config: &Config) {
    spawn_source(
        UnixSocketListener::new(config.socket.resolved_path()),
        tx.clone(),
        "socket listener",
    );
    spawn_source(HyprlandEventSource::new(), tx, "hyprland event source");
}
