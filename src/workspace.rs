//! A workspace: an ordered set of windows sharing one layout.
//!
//! The workspace owns its [`Collection`] of [`Window`]s and keeps the
//! back-reference of each window ([`Window::workspace`]) in step with
//! membership: adding sets it, detaching clears it.

use crate::collection::{Collection, CollectionObserver, Keyed, LogObserver};
use crate::command::Rect;
use crate::layout::LayoutRegistry;
use crate::traits::DisplayDriver;
use crate::window::{Window, WindowUpdate};
use crate::{WindowId, WorkspaceId};
use log::{debug, warn};

/// Smallest share of the screen the main window can be given, in percent.
pub const MIN_MAIN_WINDOW_SCALE: u8 = 1;
/// Largest share of the screen the main window can be given, in percent.
pub const MAX_MAIN_WINDOW_SCALE: u8 = 99;
pub const DEFAULT_MAIN_WINDOW_SCALE: u8 = 50;

fn clamp_scale(scale: i32) -> u8 {
    scale.clamp(MIN_MAIN_WINDOW_SCALE as i32, MAX_MAIN_WINDOW_SCALE as i32) as u8
}

/// Typed partial update for a [`Workspace`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceUpdate {
    pub layout: Option<String>,
    /// Clamped to `1..=99` when applied.
    pub main_window_scale: Option<i32>,
}

#[derive(Debug)]
pub struct Workspace {
    id: WorkspaceId,
    layout: String,
    windows: Collection<Window>,
    main_window_scale: u8,
    main_window: Option<WindowId>,
    focused: Option<WindowId>,
}

impl Workspace {
    /// An empty workspace whose window collection logs its mutations.
    pub fn new(id: WorkspaceId, layout: impl Into<String>) -> Self {
        Self::with_observer(id, layout, LogObserver::new(format!("workspace {} windows", id)))
    }

    /// An empty workspace reporting window membership changes to `observer`.
    pub fn with_observer(
        id: WorkspaceId,
        layout: impl Into<String>,
        observer: impl CollectionObserver<Window> + 'static,
    ) -> Self {
        Self {
            id,
            layout: layout.into(),
            windows: Collection::new(observer),
            main_window_scale: DEFAULT_MAIN_WINDOW_SCALE,
            main_window: None,
            focused: None,
        }
    }

    pub fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Name of the layout in the [`LayoutRegistry`].
    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: impl Into<String>) {
        self.layout = layout.into();
    }

    pub fn windows(&self) -> &Collection<Window> {
        &self.windows
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.exists(id)
    }

    /// Take ownership of `window`.
    ///
    /// Returns `false` if a window with the same id is already owned; the
    /// owned one is left as it was.
    pub fn add_window(&mut self, mut window: Window) -> bool {
        if self.windows.exists(window.id()) {
            debug!("workspace {} already owns window {}", self.id, window.id());
            return false;
        }
        window.set_workspace(Some(self.id));
        self.windows.add(window)
    }

    /// Give up ownership of a window without terminating it.
    ///
    /// `None` if the window is not owned by this workspace.
    pub fn detach_window(&mut self, id: WindowId) -> Option<Window> {
        let Some(mut window) = self.windows.take(id) else {
            debug!("workspace {} does not own window {}", self.id, id);
            return None;
        };
        self.forget(&mut window);
        Some(window)
    }

    /// Detach every window for which `keep` returns `false`.
    ///
    /// The detached windows are returned in insertion order, unowned and
    /// still running.
    pub fn retain_windows(&mut self, mut keep: impl FnMut(&Window) -> bool) -> Vec<Window> {
        let mut removed = self.windows.retain(|window, _| keep(window));
        for window in &mut removed {
            self.forget(window);
        }
        removed
    }

    fn forget(&mut self, window: &mut Window) {
        let id = window.id();
        window.set_workspace(None);
        if self.main_window == Some(id) {
            self.main_window = None;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Ask the window to quit, then detach it.
    pub fn remove_window<D: DisplayDriver>(&mut self, display: &D, id: WindowId) -> bool {
        let Some(window) = self.windows.get(id) else {
            debug!("workspace {} does not own window {}", self.id, id);
            return false;
        };
        window.quit(display);
        self.detach_window(id).is_some()
    }

    pub fn move_window<D: DisplayDriver>(
        &mut self,
        display: &D,
        id: WindowId,
        x: i32,
        y: i32,
    ) -> bool {
        match self.windows.get_mut(id) {
            Some(window) => {
                window.move_to(display, x, y);
                true
            }
            None => false,
        }
    }

    /// Merge metadata into an owned window.
    pub fn update_window(&mut self, id: WindowId, patch: WindowUpdate) -> bool {
        self.windows.update(id, patch)
    }

    /// Run this workspace's layout over `screen` and render the result.
    ///
    /// Returns the number of windows placed.  Placements naming windows this
    /// workspace does not own are skipped.
    pub fn rearrange<D: DisplayDriver>(
        &mut self,
        display: &D,
        layouts: &LayoutRegistry,
        screen: Rect,
    ) -> usize {
        let Some(layout) = layouts.get(&self.layout) else {
            warn!("workspace {}: unknown layout {:?}", self.id, self.layout);
            return 0;
        };
        let placements = layout.arrange(self, screen);
        let mut placed = 0;
        for placement in placements {
            match self.windows.get_mut(placement.window) {
                Some(window) => {
                    window.render(display, placement.rect);
                    placed += 1;
                }
                None => debug!(
                    "workspace {}: layout placed foreign window {}",
                    self.id, placement.window
                ),
            }
        }
        placed
    }

    pub fn main_window_scale(&self) -> u8 {
        self.main_window_scale
    }

    /// Store `scale` clamped to `1..=99` and return the stored value.
    pub fn set_main_window_scale(&mut self, scale: i32) -> u8 {
        self.main_window_scale = clamp_scale(scale);
        self.main_window_scale
    }

    pub fn main_window(&self) -> Option<WindowId> {
        self.main_window
    }

    /// Mark an owned window as the one the layout treats as primary.
    pub fn set_main_window(&mut self, id: WindowId) -> bool {
        if !self.windows.exists(id) {
            return false;
        }
        self.main_window = Some(id);
        true
    }

    /// The window that last had focus on this workspace.
    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, id: Option<WindowId>) {
        self.focused = id.filter(|id| self.windows.exists(*id));
    }

    /// Snapshot of the visible windows in insertion order.
    pub fn visible_windows(&self) -> Vec<&Window> {
        self.windows.iter().filter(|w| w.is_visible()).collect()
    }

    pub fn hide_all<D: DisplayDriver>(&mut self, display: &D) {
        for window in self.windows.iter_mut() {
            window.hide(display);
        }
    }

    pub fn show_all<D: DisplayDriver>(&mut self, display: &D) {
        for window in self.windows.iter_mut() {
            window.show(display);
        }
    }
}

impl Keyed for Workspace {
    type Id = WorkspaceId;
    type Patch = WorkspaceUpdate;

    fn id(&self) -> WorkspaceId {
        self.id
    }

    fn apply(&mut self, patch: WorkspaceUpdate) {
        if let Some(layout) = patch.layout {
            self.layout = layout;
        }
        if let Some(scale) = patch.main_window_scale {
            self.set_main_window_scale(scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::WindowInfo;
    use crate::layout::Placement;
    use crate::traits::recorder::{DriverCall, RecorderDisplay};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn window(id: WindowId) -> Window {
        Window::new(WindowInfo::new(id, Rect::new(0, 0, 100, 100)))
    }

    fn workspace_with(ids: &[WindowId]) -> Workspace {
        let mut ws = Workspace::new(1, "tile");
        for id in ids {
            assert!(ws.add_window(window(*id)));
        }
        ws
    }

    #[test]
    fn add_sets_owner() {
        let ws = workspace_with(&[10]);
        assert_eq!(ws.window(10).unwrap().workspace(), Some(1));
    }

    #[test]
    fn add_is_idempotent() {
        let mut ws = workspace_with(&[10]);
        let mut other = window(10);
        other.move_to(&RecorderDisplay::default(), 500, 500);
        assert!(!ws.add_window(other));
        assert_eq!(ws.windows().len(), 1);
        assert_eq!(ws.window(10).unwrap().geometry(), Rect::new(0, 0, 100, 100));
    }

    #[test]
    fn detach_clears_owner_without_quitting() {
        let mut ws = workspace_with(&[10, 20]);
        ws.set_main_window(10);
        ws.set_focused(Some(10));
        let w = ws.detach_window(10).unwrap();
        assert_eq!(w.workspace(), None);
        assert!(!ws.contains(10));
        assert_eq!(ws.main_window(), None);
        assert_eq!(ws.focused(), None);
    }

    #[test]
    fn detach_unknown_window_fails() {
        let mut ws = workspace_with(&[10]);
        assert!(ws.detach_window(99).is_none());
        assert_eq!(ws.windows().len(), 1);
    }

    #[test]
    fn retain_detaches_rejected_windows() {
        let mut ws = workspace_with(&[10, 20, 30]);
        ws.set_main_window(20);
        ws.set_focused(Some(30));

        let removed = ws.retain_windows(|w| w.id() == 30);

        let ids: Vec<WindowId> = removed.iter().map(|w| w.id()).collect();
        assert_eq!(ids, vec![10, 20]);
        assert!(removed.iter().all(|w| w.workspace().is_none()));
        assert_eq!(ws.windows().keys(), vec![30]);
        assert_eq!(ws.main_window(), None);
        assert_eq!(ws.focused(), Some(30));
    }

    #[test]
    fn remove_quits_then_detaches() {
        let d = RecorderDisplay::default();
        let mut ws = workspace_with(&[10, 20]);
        assert!(ws.remove_window(&d, 20));
        assert_eq!(d.take(), vec![DriverCall::Kill(20)]);
        assert_eq!(ws.windows().keys(), vec![10]);
        assert!(!ws.remove_window(&d, 20));
        assert!(d.take().is_empty());
    }

    #[test]
    fn move_window_only_for_owned() {
        let d = RecorderDisplay::default();
        let mut ws = workspace_with(&[10]);
        assert!(ws.move_window(&d, 10, 7, 8));
        assert_eq!(ws.window(10).unwrap().geometry(), Rect::new(7, 8, 100, 100));
        assert!(!ws.move_window(&d, 11, 7, 8));
    }

    #[test]
    fn scale_is_clamped() {
        let mut ws = workspace_with(&[]);
        assert_eq!(ws.set_main_window_scale(0), 1);
        assert_eq!(ws.main_window_scale(), 1);
        assert_eq!(ws.set_main_window_scale(150), 99);
        assert_eq!(ws.set_main_window_scale(50), 50);
        assert_eq!(ws.set_main_window_scale(-20), 1);
    }

    #[test]
    fn patch_clamps_scale_and_sets_layout() {
        let mut ws = workspace_with(&[]);
        ws.apply(WorkspaceUpdate {
            layout: Some("monocle".into()),
            main_window_scale: Some(400),
        });
        assert_eq!(ws.layout(), "monocle");
        assert_eq!(ws.main_window_scale(), 99);
    }

    #[test]
    fn visible_windows_skip_hidden() {
        let d = RecorderDisplay::default();
        let mut ws = workspace_with(&[1, 2, 3]);
        ws.window_mut(2).unwrap().hide(&d);
        let ids: Vec<WindowId> = ws.visible_windows().iter().map(|w| w.id()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn main_window_must_be_owned() {
        let mut ws = workspace_with(&[1]);
        assert!(!ws.set_main_window(2));
        assert!(ws.set_main_window(1));
        assert_eq!(ws.main_window(), Some(1));
    }

    #[test]
    fn rearrange_renders_layout_output() {
        let d = RecorderDisplay::default();
        let mut layouts = LayoutRegistry::new();
        layouts.register("pair", |ws: &Workspace, screen: Rect| -> Vec<Placement> {
            ws.windows()
                .keys()
                .into_iter()
                .map(|window| Placement {
                    window,
                    rect: screen,
                })
                .chain(std::iter::once(Placement {
                    window: 99,
                    rect: screen,
                }))
                .collect()
        });
        let mut ws = workspace_with(&[1, 2]);
        ws.set_layout("pair");

        let screen = Rect::new(0, 0, 800, 600);
        assert_eq!(ws.rearrange(&d, &layouts, screen), 2);
        assert_eq!(ws.window(1).unwrap().geometry(), screen);
        assert_eq!(d.last_move(99), None);
    }

    #[test]
    fn rearrange_with_unknown_layout_places_nothing() {
        let d = RecorderDisplay::default();
        let mut ws = workspace_with(&[1]);
        ws.set_layout("spiral");
        assert_eq!(ws.rearrange(&d, &LayoutRegistry::with_defaults(), Rect::default()), 0);
        assert!(d.take().is_empty());
    }

    #[test]
    fn hide_all_and_show_all() {
        let d = RecorderDisplay::default();
        let mut ws = workspace_with(&[1, 2]);
        ws.hide_all(&d);
        assert!(ws.visible_windows().is_empty());
        ws.show_all(&d);
        assert_eq!(ws.visible_windows().len(), 2);
    }

    #[test]
    fn observer_sees_detach_as_removal() {
        #[derive(Clone, Default)]
        struct Seen(Rc<RefCell<Vec<String>>>);
        impl CollectionObserver<Window> for Seen {
            fn on_added(&mut self, w: &Window) {
                self.0.borrow_mut().push(format!("add {}", w.id()));
            }
            fn on_before_removed(&mut self, w: &Window) {
                self.0.borrow_mut().push(format!("before {}", w.id()));
            }
            fn on_removed(&mut self, id: WindowId) {
                self.0.borrow_mut().push(format!("removed {}", id));
            }
        }
        let seen = Seen::default();
        let log = seen.0.clone();
        let mut ws = Workspace::with_observer(3, "tile", seen);
        ws.add_window(window(5));
        ws.detach_window(5);
        assert_eq!(*log.borrow(), vec!["add 5", "before 5", "removed 5"]);
    }
}
