//! Core traits that decouple gridwm from any specific display server or
//! transport mechanism.
//!
//! Every concrete backend (an X11 connection, a Unix-socket listener, a test
//! harness, …) implements one of these traits.  The
//! [`WorkspaceSet`](crate::workspaces::WorkspaceSet) only depends on these
//! abstractions.

use crate::command::Command;
use crate::WindowId;
use std::sync::mpsc;

/// Abstraction over the display-server driver that actually places windows
/// on screen.
///
/// Calls are fire-and-forget: callers issue them and move on.  A failing call
/// is logged by the caller and never aborts the operation that issued it.
pub trait DisplayDriver {
    /// The error type produced by this driver.
    type Error: std::error::Error + Send + 'static;

    /// Move the top-left corner of `id` to `(x, y)`.
    fn move_window(&self, id: WindowId, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Resize `id` to `width × height`.
    fn resize_window(&self, id: WindowId, width: i32, height: i32) -> Result<(), Self::Error>;

    /// Give input focus to `id`.
    fn focus_window(&self, id: WindowId) -> Result<(), Self::Error>;

    /// Ask the client owning `id` to terminate.
    fn kill_window(&self, id: WindowId) -> Result<(), Self::Error>;
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, a display
/// server's event stream, an in-memory channel) and forward parsed
/// commands into the provided [`mpsc::Sender`].
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
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}


#[cfg(test)]
mod tests {
    use super::recorder::{DriverCall, RecorderDisplay};
    use super::*;
    use crate::command::{Direction, Target};

    #[test]
    fn recorder_keeps_call_order() {
        let d = RecorderDisplay::default();
        d.move_window(1, 10, 20).unwrap();
        d.resize_window(1, 300, 200).unwrap();
        d.focus_window(1).unwrap();
        assert_eq!(
            d.take(),
            vec![
                DriverCall::Move(1, 10, 20),
                DriverCall::Resize(1, 300, 200),
                DriverCall::Focus(1),
            ]
        );
        assert!(d.take().is_empty());
    }

    #[test]
    fn failing_recorder_still_records() {
        let d = RecorderDisplay::default();
        d.failing.set(true);
        assert!(d.kill_window(4).is_err());
        assert_eq!(d.take(), vec![DriverCall::Kill(4)]);
    }

    //  Mock CommandSource

    /// A test double that emits a fixed sequence of commands.
    struct MockSource {
        commands: Vec<Command>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), MockError> {
            for cmd in self.commands.drain(..) {
                let _ = sink.send(cmd);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_commands() {
        let mut src = MockSource {
            commands: vec![Command::Go(Direction::Right.into()), Command::Go(Target::Back)],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0], Command::Go(Target::Direction(Direction::Right)));
        assert_eq!(cmds[1], Command::Go(Target::Back));
    }
}
