//! The set of all workspaces, addressed as a grid.
//!
//! [`WorkspaceSet`] owns every [`Workspace`] together with the display
//! driver, the layout registry and the immutable [`Grid`].  It is the only
//! place where a window changes owner, which keeps the window ↔ workspace
//! back-reference consistent: every composite operation (switching,
//! cross-workspace moves, window lifecycle) restores it before returning.
//!
//! Workspace ids are 1-based; the workspace at grid index `i` has id `i + 1`.

use crate::collection::{Collection, CollectionObserver, LogObserver};
use crate::command::{Direction, Rect, Target, WindowInfo};
use crate::config::Config;
use crate::grid::{Grid, GridError};
use crate::layout::LayoutRegistry;
use crate::traits::DisplayDriver;
use crate::window::{Window, WindowUpdate};
use crate::workspace::{Workspace, WorkspaceUpdate};
use crate::{WindowId, WorkspaceId};
use log::{debug, info, warn};

fn index_to_id(index: usize) -> WorkspaceId {
    index + 1
}

fn id_to_index(id: WorkspaceId) -> usize {
    id.saturating_sub(1)
}

/// Hands out the observers attached to the collections of a
/// [`WorkspaceSet`] while it is being built.
///
/// [`workspaces`](Self::workspaces) is asked once; [`windows`](Self::windows)
/// once per workspace, in id order.
pub trait Observers {
    fn workspaces(&mut self) -> Box<dyn CollectionObserver<Workspace>>;
    fn windows(&mut self, workspace: WorkspaceId) -> Box<dyn CollectionObserver<Window>>;
}

/// Writes every membership change to the debug log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObservers;

impl Observers for LogObservers {
    fn workspaces(&mut self) -> Box<dyn CollectionObserver<Workspace>> {
        Box::new(LogObserver::new("workspaces"))
    }

    fn windows(&mut self, workspace: WorkspaceId) -> Box<dyn CollectionObserver<Window>> {
        Box::new(LogObserver::new(format!("workspace {} windows", workspace)))
    }
}

/// Every workspace of the session plus the state needed to navigate them.
///
/// Generic over the [`DisplayDriver`] so the same logic drives a real
/// display server or a recording test double.
pub struct WorkspaceSet<D: DisplayDriver> {
    display: D,
    layouts: LayoutRegistry,
    screen: Rect,
    grid: Grid,
    workspaces: Collection<Workspace>,
    current: WorkspaceId,
    previous: WorkspaceId,
}

impl<D: DisplayDriver> WorkspaceSet<D> {
    /// Build the workspace set with the built-in layouts.
    ///
    /// Fails when the grid configuration is rejected by
    /// [`Grid::size_check`]; no workspace is created in that case.
    pub fn new(display: D, config: &Config) -> Result<Self, GridError> {
        Self::with_layouts(display, config, LayoutRegistry::with_defaults())
    }

    /// Build the workspace set with a caller-supplied layout registry.
    pub fn with_layouts(
        display: D,
        config: &Config,
        layouts: LayoutRegistry,
    ) -> Result<Self, GridError> {
        Self::with_observers(display, config, layouts, LogObservers)
    }

    /// Build the workspace set, attaching the observers `observers` hands
    /// out to the workspace collection and to every window collection.
    pub fn with_observers(
        display: D,
        config: &Config,
        layouts: LayoutRegistry,
        mut observers: impl Observers,
    ) -> Result<Self, GridError> {
        let grid = Grid::new(&config.workspaces)?;
        let layout = &config.workspaces.layout;
        if !layouts.contains(layout) {
            warn!("layout {:?} is not registered, nothing will be tiled", layout);
        }
        let mut workspaces = Collection::new(observers.workspaces());
        for index in 0..grid.cells() {
            let id = index_to_id(index);
            let observer = observers.windows(id);
            let mut workspace = Workspace::with_observer(id, layout.clone(), observer);
            workspace.set_main_window_scale(config.workspaces.main_window_scale);
            workspaces.add(workspace);
        }
        let (rows, cols) = grid.dimensions();
        info!(
            "created {} workspaces in a {}x{} grid (layout {:?})",
            workspaces.len(),
            rows,
            cols,
            config.workspaces.layout
        );
        Ok(Self {
            display,
            layouts,
            screen: config.screen.rect(),
            grid,
            workspaces,
            current: index_to_id(0),
            previous: index_to_id(0),
        })
    }

    //  Accessors

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// Id of the focused workspace.
    pub fn current(&self) -> WorkspaceId {
        self.current
    }

    /// Id of the workspace focused before the current one.
    pub fn previous(&self) -> WorkspaceId {
        self.previous
    }

    pub fn workspaces(&self) -> &Collection<Workspace> {
        &self.workspaces
    }

    pub fn workspace(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.get(id)
    }

    /// The workspace that owns `window`.
    pub fn owner_of(&self, window: WindowId) -> Option<WorkspaceId> {
        self.workspaces
            .iter()
            .find(|ws| ws.contains(window))
            .map(|ws| ws.id())
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.workspaces.iter().find_map(|ws| ws.window(id))
    }

    //  Navigation

    /// Grid index of the neighbour of the current workspace in `direction`.
    pub fn workspace_to_my(&self, direction: Direction) -> usize {
        self.grid.neighbour(id_to_index(self.current), direction)
    }

    /// Resolve `target` to the id of a present workspace.
    pub fn translate(&self, target: Target) -> Option<WorkspaceId> {
        let id = match target {
            Target::Back => Some(self.previous),
            Target::Next => self.workspaces.next(self.current),
            Target::Prev => self.workspaces.prev(self.current),
            Target::Direction(dir) => Some(index_to_id(self.workspace_to_my(dir))),
            Target::Workspace(id) => Some(id),
        };
        id.filter(|id| self.workspaces.exists(*id))
    }

    /// Focus the workspace named by `target`.
    ///
    /// Windows of the old workspace are parked, those of the new one shown,
    /// the new layout is applied and the window remembered as focused there
    /// gets input focus again.  Returns `false` if `target` does not resolve
    /// or already is the current workspace.
    pub fn go(&mut self, target: Target) -> bool {
        let Some(to) = self.translate(target) else {
            debug!("go {}: no such workspace", target);
            return false;
        };
        if to == self.current {
            debug!("go {}: already on workspace {}", target, to);
            return false;
        }
        info!("workspace {} -> {}", self.current, to);
        if let Some(from) = self.workspaces.get_mut(self.current) {
            from.hide_all(&self.display);
        }
        if let Some(into) = self.workspaces.get_mut(to) {
            into.show_all(&self.display);
        }
        self.previous = self.current;
        self.current = to;
        self.rearrange(to);
        self.refocus();
        true
    }

    //  Window moves

    /// Move `window` from workspace `source` to `target`.
    ///
    /// The window is shown iff it lands on the current workspace and hidden
    /// otherwise; both layouts are recomputed.  Aborts (returning `false`)
    /// without touching anything if `target` does not resolve, if `source`
    /// does not own the window, or if the window would not change owner.
    pub fn move_window(&mut self, source: WorkspaceId, window: WindowId, target: Target) -> bool {
        let Some(to) = self.translate(target) else {
            debug!("move of window {}: target {} does not resolve", window, target);
            return false;
        };
        if !self.workspaces.get(source).is_some_and(|ws| ws.contains(window)) {
            debug!("move of window {}: not owned by workspace {}", window, source);
            return false;
        }
        if to == source {
            debug!("move of window {}: already on workspace {}", window, to);
            return false;
        }

        let Some(moved) = self
            .workspaces
            .get_mut(source)
            .and_then(|ws| ws.detach_window(window))
        else {
            return false;
        };
        let visible = to == self.current;
        match self.workspaces.get_mut(to) {
            Some(dest) if !dest.contains(window) => {
                dest.add_window(moved);
                if let Some(w) = dest.window_mut(window) {
                    if visible {
                        w.show(&self.display);
                    } else {
                        w.hide(&self.display);
                    }
                }
            }
            _ => {
                warn!(
                    "move of window {}: workspace {} refused it, returning it to {}",
                    window, to, source
                );
                if let Some(ws) = self.workspaces.get_mut(source) {
                    ws.add_window(moved);
                }
                return false;
            }
        }
        info!("moved window {} from workspace {} to {}", window, source, to);

        self.rearrange(source);
        self.rearrange(to);
        if source == self.current {
            self.refocus();
        }
        true
    }

    /// Move `window` from whichever workspace owns it to `target`.
    pub fn move_window_to(&mut self, window: WindowId, target: Target) -> bool {
        match self.owner_of(window) {
            Some(source) => self.move_window(source, window, target),
            None => {
                debug!("move of window {}: not managed", window);
                false
            }
        }
    }

    /// Recompute and render the layout of workspace `id`.
    ///
    /// Returns the number of windows placed.
    pub fn rearrange(&mut self, id: WorkspaceId) -> usize {
        match self.workspaces.get_mut(id) {
            Some(ws) => ws.rearrange(&self.display, &self.layouts, self.screen),
            None => 0,
        }
    }

    //  Window lifecycle

    /// Adopt a window the display server just reported.
    ///
    /// It joins the current workspace, the layout is reapplied and it gets
    /// focus.  Returns `false` if the id is already managed.
    pub fn manage(&mut self, info: WindowInfo) -> bool {
        let id = info.id;
        if let Some(owner) = self.owner_of(id) {
            debug!("window {} already managed by workspace {}", id, owner);
            return false;
        }
        let current = self.current;
        let Some(ws) = self.workspaces.get_mut(current) else {
            return false;
        };
        ws.add_window(Window::new(info));
        info!("managing window {} on workspace {}", id, current);
        self.rearrange(current);
        self.focus(id)
    }

    /// Forget a window the display server destroyed.
    pub fn unmanage(&mut self, id: WindowId) -> bool {
        let Some(owner) = self.owner_of(id) else {
            debug!("window {} is not managed", id);
            return false;
        };
        if let Some(ws) = self.workspaces.get_mut(owner) {
            ws.detach_window(id);
        }
        info!("unmanaged window {} from workspace {}", id, owner);
        self.rearrange(owner);
        if owner == self.current {
            self.refocus();
        }
        true
    }

    /// Ask `id` to quit and stop managing it.
    pub fn kill(&mut self, id: WindowId) -> bool {
        let Some(owner) = self.owner_of(id) else {
            debug!("window {} is not managed", id);
            return false;
        };
        let display = &self.display;
        let removed = self
            .workspaces
            .get_mut(owner)
            .is_some_and(|ws| ws.remove_window(display, id));
        if removed {
            self.rearrange(owner);
            if owner == self.current {
                self.refocus();
            }
        }
        removed
    }

    /// Stop managing every window of workspace `id` for which `keep`
    /// returns `false`.
    ///
    /// The windows are not asked to quit.  Returns their ids in insertion
    /// order.
    pub fn unmanage_where(
        &mut self,
        id: WorkspaceId,
        keep: impl FnMut(&Window) -> bool,
    ) -> Vec<WindowId> {
        let Some(ws) = self.workspaces.get_mut(id) else {
            return Vec::new();
        };
        let removed: Vec<WindowId> = ws
            .retain_windows(keep)
            .iter()
            .map(|w| w.id())
            .collect();
        if !removed.is_empty() {
            info!("unmanaged windows {:?} from workspace {}", removed, id);
            self.rearrange(id);
            if id == self.current {
                self.refocus();
            }
        }
        removed
    }

    /// Merge new metadata into a managed window.
    ///
    /// A change of the floating flag reapplies the owner's layout.
    pub fn update_window(&mut self, id: WindowId, update: WindowUpdate) -> bool {
        let Some(owner) = self.owner_of(id) else {
            debug!("window {} is not managed", id);
            return false;
        };
        let relayout = update.floating.is_some();
        let updated = self
            .workspaces
            .get_mut(owner)
            .is_some_and(|ws| ws.update_window(id, update));
        if updated && relayout {
            self.rearrange(owner);
        }
        updated
    }

    //  Focus

    /// The window remembered as focused on the current workspace.
    pub fn focused_window(&self) -> Option<WindowId> {
        self.workspaces.get(self.current).and_then(|ws| ws.focused())
    }

    /// Give focus to `id`, switching to its workspace first if needed.
    pub fn focus(&mut self, id: WindowId) -> bool {
        let Some(owner) = self.owner_of(id) else {
            debug!("focus: window {} is not managed", id);
            return false;
        };
        if owner != self.current {
            self.go(Target::Workspace(owner));
        }
        let Some(ws) = self.workspaces.get_mut(owner) else {
            return false;
        };
        let focused = ws.window(id).is_some_and(|w| w.focus(&self.display));
        if focused {
            ws.set_focused(Some(id));
        }
        focused
    }

    /// Focus the window after the focused one, wrapping.
    pub fn focus_next(&mut self) -> bool {
        self.cycle_focus(|windows, id| windows.next(id))
    }

    /// Focus the window before the focused one, wrapping.
    pub fn focus_prev(&mut self) -> bool {
        self.cycle_focus(|windows, id| windows.prev(id))
    }

    fn cycle_focus(
        &mut self,
        step: impl Fn(&Collection<Window>, WindowId) -> Option<WindowId>,
    ) -> bool {
        let Some(ws) = self.workspaces.get(self.current) else {
            return false;
        };
        let windows = ws.windows();
        let candidate = match ws.focused() {
            Some(focused) => {
                // Hidden members are skipped; at most one full lap.
                let mut id = focused;
                let mut found = None;
                for _ in 0..windows.len() {
                    match step(windows, id) {
                        Some(next) if next == focused => break,
                        Some(next) => {
                            if windows.get(next).is_some_and(|w| w.is_visible()) {
                                found = Some(next);
                                break;
                            }
                            id = next;
                        }
                        None => break,
                    }
                }
                found
            }
            None => ws.visible_windows().first().map(|w| w.id()),
        };
        match candidate {
            Some(id) => self.focus(id),
            None => {
                debug!("workspace {}: nothing to cycle focus to", self.current);
                false
            }
        }
    }

    /// Restore focus on the current workspace: the remembered window if it
    /// is still there, else the first visible one.
    fn refocus(&mut self) {
        let display = &self.display;
        let Some(ws) = self.workspaces.get_mut(self.current) else {
            return;
        };
        let target = ws
            .focused()
            .filter(|id| ws.window(*id).is_some_and(|w| w.is_visible()))
            .or_else(|| ws.visible_windows().first().map(|w| w.id()));
        match target {
            Some(id) => {
                if ws.window(id).is_some_and(|w| w.focus(display)) {
                    ws.set_focused(Some(id));
                }
            }
            None => debug!("workspace {}: nothing to focus", ws.id()),
        }
    }

    //  Workspace state

    /// Set the current workspace's main window scale and reflow it.
    ///
    /// Returns the stored (clamped) scale.
    pub fn set_main_window_scale(&mut self, scale: i32) -> u8 {
        let current = self.current;
        self.workspaces.update(
            current,
            WorkspaceUpdate {
                main_window_scale: Some(scale),
                ..WorkspaceUpdate::default()
            },
        );
        self.rearrange(current);
        self.workspaces
            .get(current)
            .map(|ws| ws.main_window_scale())
            .unwrap_or_default()
    }

    /// Change the current workspace's main window scale by `delta` percent.
    pub fn adjust_main_window_scale(&mut self, delta: i32) -> u8 {
        let scale = self
            .workspaces
            .get(self.current)
            .map(|ws| ws.main_window_scale() as i32)
            .unwrap_or_default();
        self.set_main_window_scale(scale.saturating_add(delta))
    }

    /// Switch the current workspace to the next registered layout.
    ///
    /// Returns the new layout name, or `None` when no layout is registered.
    pub fn cycle_layout(&mut self) -> Option<String> {
        let current = self.current;
        let layout = {
            let ws = self.workspaces.get(current)?;
            self.layouts.next_name(ws.layout())?.to_string()
        };
        info!("workspace {}: layout {}", current, layout);
        self.workspaces.update(
            current,
            WorkspaceUpdate {
                layout: Some(layout.clone()),
                ..WorkspaceUpdate::default()
            },
        );
        self.rearrange(current);
        Some(layout)
    }

    /// Make the focused window the main window of the current workspace.
    pub fn promote_focused(&mut self) -> bool {
        let current = self.current;
        let Some(focused) = self.focused_window() else {
            return false;
        };
        let promoted = self
            .workspaces
            .get_mut(current)
            .is_some_and(|ws| ws.set_main_window(focused));
        if promoted {
            self.rearrange(current);
        }
        promoted
    }
}

//  Tests
