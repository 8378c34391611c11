//! A single managed top-level window.
//!
//! A [`Window`] is either visible or hidden.  Hidden windows are not unmapped;
//! they are parked just beyond the top-left corner of the screen, while the
//! stored geometry keeps the logical position so that [`Window::show`] puts
//! the window back exactly where it was.
//!
//! [`Window::render`] is the only path by which geometry reaches the
//! [`DisplayDriver`].

use crate::collection::Keyed;
use crate::command::{Rect, WindowInfo};
use crate::traits::DisplayDriver;
use crate::{WindowId, WorkspaceId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Typed partial update for the metadata of a [`Window`].
///
/// Only fields set to `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowUpdate {
    pub title: Option<String>,
    pub class: Option<String>,
    pub instance: Option<String>,
    pub floating: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    id: WindowId,
    geometry: Rect,
    title: String,
    class: String,
    instance: String,
    floating: bool,
    visible: bool,
    workspace: Option<WorkspaceId>,
}

/// Where a hidden window with logical geometry `rect` is pushed.
fn parked(rect: Rect) -> Rect {
    Rect {
        x: -rect.width - 1,
        y: -rect.height - 1,
        ..rect
    }
}

impl Window {
    /// A new, visible, unowned window.
    pub fn new(info: WindowInfo) -> Self {
        Self {
            id: info.id,
            geometry: Rect::new(info.x, info.y, info.width, info.height),
            title: info.title,
            class: info.class,
            instance: info.instance,
            floating: info.floating,
            visible: true,
            workspace: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Logical geometry, which hiding does not change.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The workspace that currently owns this window.
    pub fn workspace(&self) -> Option<WorkspaceId> {
        self.workspace
    }

    pub(crate) fn set_workspace(&mut self, workspace: Option<WorkspaceId>) {
        self.workspace = workspace;
    }

    /// Store `rect` and push it to the driver.
    ///
    /// A hidden window receives its parked position instead, so a layout pass
    /// over a background workspace never brings its windows on screen.
    pub fn render<D: DisplayDriver>(&mut self, display: &D, rect: Rect) {
        self.geometry = rect;
        let target = if self.visible { rect } else { parked(rect) };
        debug!(
            "render window {} at ({}, {}) {}x{}",
            self.id, target.x, target.y, target.width, target.height
        );
        if let Err(e) = display.move_window(self.id, target.x, target.y) {
            warn!("move of window {} failed: {}", self.id, e);
        }
        if let Err(e) = display.resize_window(self.id, target.width, target.height) {
            warn!("resize of window {} failed: {}", self.id, e);
        }
    }

    /// Make the window visible at its logical geometry.
    ///
    /// Returns `false` if it already was.
    pub fn show<D: DisplayDriver>(&mut self, display: &D) -> bool {
        if self.visible {
            return false;
        }
        self.visible = true;
        self.render(display, self.geometry);
        true
    }

    /// Park the window off screen.
    ///
    /// Returns `false` if it already was hidden.
    pub fn hide<D: DisplayDriver>(&mut self, display: &D) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        self.render(display, self.geometry);
        true
    }

    pub fn move_to<D: DisplayDriver>(&mut self, display: &D, x: i32, y: i32) {
        let rect = Rect {
            x,
            y,
            ..self.geometry
        };
        self.render(display, rect);
    }

    pub fn resize<D: DisplayDriver>(&mut self, display: &D, width: i32, height: i32) {
        let rect = Rect {
            width,
            height,
            ..self.geometry
        };
        self.render(display, rect);
    }

    /// Request input focus.  Hidden windows are never focused.
    pub fn focus<D: DisplayDriver>(&self, display: &D) -> bool {
        if !self.visible {
            debug!("not focusing hidden window {}", self.id);
            return false;
        }
        if let Err(e) = display.focus_window(self.id) {
            warn!("focus of window {} failed: {}", self.id, e);
        }
        true
    }

    /// Ask the client to terminate.  Ownership is left to the caller.
    pub fn quit<D: DisplayDriver>(&self, display: &D) {
        debug!("quit window {}", self.id);
        if let Err(e) = display.kill_window(self.id) {
            warn!("kill of window {} failed: {}", self.id, e);
        }
    }
}

impl Keyed for Window {
    type Id = WindowId;
    type Patch = WindowUpdate;

    fn id(&self) -> WindowId {
        self.id
    }

    fn apply(&mut self, patch: WindowUpdate) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(class) = patch.class {
            self.class = class;
        }
        if let Some(instance) = patch.instance {
            self.instance = instance;
        }
        if let Some(floating) = patch.floating {
            self.floating = floating;
        }
    }
}
