//! Entry point for the **gridwm** daemon.
//!
//! Spawns the configured [`CommandSource`](gridwm::traits::CommandSource)s
//! on background threads and processes incoming commands on the main
//! thread.  Display-server requests are written to stdout as JSON lines;
//! logs go to stderr (`RUST_LOG` controls the level).

use gridwm::command::Command;
use gridwm::config::Config;
use gridwm::driver::JsonLinesDriver;
use gridwm::ipc::listener::UnixSocketListener;
use gridwm::manager::Manager;
use gridwm::traits::{CommandSource, DisplayDriver};
use gridwm::workspaces::WorkspaceSet;
use log::{error, info};
use std::sync::mpsc;

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/gridwm.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/gridwm`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("gridwm")
}

/// Try to load the config from `$XDG_CONFIG_HOME/gridwm/config.json`,
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

    let workspaces = match WorkspaceSet::new(JsonLinesDriver::stdout(), &config) {
        Ok(set) => set,
        Err(e) => {
            error!("invalid workspace configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    run_event_loop(Manager::new(workspaces), cmd_rx);
}

fn run_event_loop<D: DisplayDriver>(mut manager: Manager<D>, cmd_rx: mpsc::Receiver<Command>) {
    info!("gridwm running");
    for cmd in cmd_rx {
        if let Err(e) = manager.handle(cmd) {
            error!("command error: {}", e);
        }
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    {
        let tx = tx.clone();
        let path = default_socket_path();
        std::thread::spawn(move || {
            let mut source = UnixSocketListener::new(&path);
            if let Err(e) = source.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    // Display-server notifications (WindowCreated, WindowDestroyed, ...)
    // arrive over the same socket, sent by the display adapter.

    drop(tx);
}
