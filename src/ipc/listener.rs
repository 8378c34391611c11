//! Unix-socket [`CommandSource`].
//!
//! # Wire format
//!
//! One JSON-encoded [`Command`] per line:
//!
//! ```json
//! {"Go":"left"}
//! {"Go":3}
//! {"MoveWindowTo":{"window":10,"target":"back"}}
//! {"MoveWindowAndGo":"next"}
//! "FocusNext"
//! {"AdjustMainWindowScale":-5}
//! {"WindowCreated":{"id":10,"width":800,"height":600,"title":"term"}}
//! ```
//!
//! Lines that do not parse are logged and skipped; the connection stays
//! open.

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Serves gridwm commands on a Unix stream socket.
///
/// Connections are handled one after the other; a client may send any
/// number of commands before closing.
pub struct UnixSocketListener {
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("socket io: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do after a client hangs up.
enum After {
    Accept,
    Stop,
}

impl UnixSocketListener {
    /// A listener for `path`; nothing is bound until
    /// [`run`](CommandSource::run).
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forward every parsable line of `stream` into `sink`.
    fn serve(&self, stream: UnixStream, sink: &mpsc::Sender<Command>) -> After {
        for line in BufReader::new(stream).lines() {
            let text = match line {
                Ok(text) => text,
                Err(e) => {
                    warn!("dropping client after read error: {}", e);
                    return After::Accept;
                }
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let cmd = match serde_json::from_str::<Command>(text) {
                Ok(cmd) => cmd,
                Err(e) => {
                    warn!("skipping malformed command {:?}: {}", text, e);
                    continue;
                }
            };
            debug!("received {:?}", cmd);
            if sink.send(cmd).is_err() {
                return After::Stop;
            }
        }
        After::Accept
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and serve clients until the sink is dropped.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        if self.path.exists() {
            debug!("removing stale socket {}", self.path.display());
            std::fs::remove_file(&self.path)?;
        }
        let listener = UnixListener::bind(&self.path)?;
        info!("command socket at {}", self.path.display());

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("accept failed: {}", e);
                    continue;
                }
            };
            if let After::Stop = self.serve(stream, &sink) {
                info!("command channel closed, removing {}", self.path.display());
                std::fs::remove_file(&self.path)?;
                break;
            }
        }
        Ok(())
    }
}

//  Tests
