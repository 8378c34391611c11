//! The main orchestrator that ties the workspace set and the command sources
//! together.
//!
//! [`Manager`] owns the [`WorkspaceSet`] and reacts to [`Command`]s by
//! invoking the matching operation.  Operations that the core refuses
//! (unknown ids, nothing focused, …) are reported as [`ManagerError`]s so
//! the daemon loop can log them and carry on.

use crate::command::{Command, Target};
use crate::traits::DisplayDriver;
use crate::workspaces::WorkspaceSet;
use crate::{WindowId, WorkspaceId};
use log::{debug, info};

/// A command that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManagerError {
    #[error("window {0} is not managed")]
    UnknownWindow(WindowId),

    #[error("no workspace matches {0}")]
    UnknownWorkspace(Target),

    #[error("no window is focused")]
    NothingFocused,

    #[error("window {window} cannot be moved to {target}")]
    MoveRejected { window: WindowId, target: Target },

    #[error("no layout is registered")]
    NoLayouts,
}

/// Dispatches commands onto a [`WorkspaceSet`].
///
/// ```ignore
/// let set = WorkspaceSet::new(driver, &config)?;
/// let mut manager = Manager::new(set);
/// manager.handle(Command::Go(Direction::Right.into()))?;
/// ```
pub struct Manager<D: DisplayDriver> {
    workspaces: WorkspaceSet<D>,
}

impl<D: DisplayDriver> Manager<D> {
    pub fn new(workspaces: WorkspaceSet<D>) -> Self {
        Self { workspaces }
    }

    pub fn workspaces(&self) -> &WorkspaceSet<D> {
        &self.workspaces
    }

    fn focused(&self) -> Result<WindowId, ManagerError> {
        self.workspaces
            .focused_window()
            .ok_or(ManagerError::NothingFocused)
    }

    fn resolve(&self, target: Target) -> Result<WorkspaceId, ManagerError> {
        self.workspaces
            .translate(target)
            .ok_or(ManagerError::UnknownWorkspace(target))
    }

    fn known(&self, window: WindowId) -> Result<(), ManagerError> {
        match self.workspaces.owner_of(window) {
            Some(_) => Ok(()),
            None => Err(ManagerError::UnknownWindow(window)),
        }
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<(), ManagerError> {
        match cmd {
            Command::Go(target) => {
                info!("go {}", target);
                self.resolve(target)?;
                self.workspaces.go(target);
            }

            Command::MoveWindowTo { window, target } => {
                let window = match window {
                    Some(window) => window,
                    None => self.focused()?,
                };
                info!("move window {} to {}", window, target);
                self.known(window)?;
                self.resolve(target)?;
                if !self.workspaces.move_window_to(window, target) {
                    return Err(ManagerError::MoveRejected { window, target });
                }
            }

            Command::MoveWindowAndGo(target) => {
                let window = self.focused()?;
                info!("move window {} and go {}", window, target);
                // Resolve once so the move and the switch agree on the target.
                let to = Target::Workspace(self.resolve(target)?);
                if !self.workspaces.move_window_to(window, to) {
                    return Err(ManagerError::MoveRejected { window, target });
                }
                self.workspaces.go(to);
                self.workspaces.focus(window);
            }

            Command::FocusNext => {
                debug!("focus next");
                self.workspaces.focus_next();
            }

            Command::FocusPrev => {
                debug!("focus prev");
                self.workspaces.focus_prev();
            }

            Command::Focus(window) => {
                debug!("focus {}", window);
                self.known(window)?;
                self.workspaces.focus(window);
            }

            Command::SetMainWindowScale(scale) => {
                let stored = self.workspaces.set_main_window_scale(scale);
                info!("main window scale {} (requested {})", stored, scale);
            }

            Command::AdjustMainWindowScale(delta) => {
                let stored = self.workspaces.adjust_main_window_scale(delta);
                info!("main window scale {} ({:+})", stored, delta);
            }

            Command::CycleLayout => {
                let layout = self.workspaces.cycle_layout().ok_or(ManagerError::NoLayouts)?;
                info!("layout {}", layout);
            }

            Command::PromoteFocused => {
                let window = self.focused()?;
                info!("promote window {}", window);
                self.workspaces.promote_focused();
            }

            Command::Rearrange => {
                let current = self.workspaces.current();
                let placed = self.workspaces.rearrange(current);
                debug!("rearranged workspace {} ({} windows)", current, placed);
            }

            Command::KillFocused => {
                let window = self.focused()?;
                info!("kill focused window {}", window);
                self.workspaces.kill(window);
            }

            Command::Kill(window) => {
                info!("kill window {}", window);
                if !self.workspaces.kill(window) {
                    return Err(ManagerError::UnknownWindow(window));
                }
            }

            //  Display-server notifications

            Command::WindowCreated(info) => {
                let id = info.id;
                if !self.workspaces.manage(info) {
                    debug!("window {} already managed", id);
                }
            }

            Command::WindowDestroyed(window) => {
                // A window killed through us is already forgotten.
                if !self.workspaces.unmanage(window) {
                    debug!("destroyed window {} was not managed", window);
                }
            }

            Command::WindowUpdated { window, update } => {
                debug!("window {} updated", window);
                if !self.workspaces.update_window(window, update) {
                    return Err(ManagerError::UnknownWindow(window));
                }
            }
        }
        Ok(())
    }
}

//  Tests
