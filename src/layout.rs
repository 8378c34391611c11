//! Pluggable layouts.
//!
//! A [`Layout`] turns the state of a [`Workspace`] and the usable screen area
//! into a list of [`Placement`]s.  Layouts are pure: applying the placements
//! is the job of [`Workspace::rearrange`].
//!
//! Any `Fn(&Workspace, Rect) -> Vec<Placement>` is a layout, so tests and
//! users can register closures directly.

use crate::command::Rect;
use crate::workspace::Workspace;
use crate::WindowId;
use std::fmt;

/// Target geometry for one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub window: WindowId,
    pub rect: Rect,
}

pub trait Layout {
    fn arrange(&self, workspace: &Workspace, screen: Rect) -> Vec<Placement>;
}

impl<F> Layout for F
where
    F: Fn(&Workspace, Rect) -> Vec<Placement>,
{
    fn arrange(&self, workspace: &Workspace, screen: Rect) -> Vec<Placement> {
        self(workspace, screen)
    }
}

/// Named layouts in registration order.
#[derive(Default)]
pub struct LayoutRegistry {
    layouts: Vec<(String, Box<dyn Layout>)>,
}

impl fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in layouts: `tile`, `monocle`, `wide` and
    /// `grid`, in that cycling order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("tile", tile);
        registry.register("monocle", monocle);
        registry.register("wide", wide);
        registry.register("grid", grid);
        registry
    }

    /// Add `layout` under `name`, replacing an existing layout of that name
    /// in place.
    pub fn register(&mut self, name: impl Into<String>, layout: impl Layout + 'static) {
        let name = name.into();
        let layout: Box<dyn Layout> = Box::new(layout);
        match self.layouts.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = layout,
            None => self.layouts.push((name, layout)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Layout> {
        self.layouts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, layout)| layout.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|(n, _)| n.as_str())
    }

    /// The name registered after `current`, wrapping.  An unknown `current`
    /// yields the first layout.
    pub fn next_name(&self, current: &str) -> Option<&str> {
        let pos = self.layouts.iter().position(|(n, _)| n == current);
        let next = match pos {
            Some(pos) => (pos + 1) % self.layouts.len(),
            None => 0,
        };
        self.layouts.get(next).map(|(n, _)| n.as_str())
    }
}

//  Built-in layouts

/// Visible tiled (non-floating) windows, main window first.
fn tiled_order(workspace: &Workspace) -> Vec<WindowId> {
    let mut ids: Vec<WindowId> = workspace
        .visible_windows()
        .into_iter()
        .filter(|w| !w.is_floating())
        .map(|w| w.id())
        .collect();
    if let Some(main) = workspace.main_window() {
        if let Some(pos) = ids.iter().position(|id| *id == main) {
            let id = ids.remove(pos);
            ids.insert(0, id);
        }
    }
    ids
}

/// Split `length` into `count` contiguous spans that add up exactly.
fn spans(start: i32, length: i32, count: usize) -> Vec<(i32, i32)> {
    let count = count as i64;
    (0..count)
        .map(|i| {
            let from = length as i64 * i / count;
            let to = length as i64 * (i + 1) / count;
            (start + from as i32, (to - from) as i32)
        })
        .collect()
}

fn scaled(length: i32, scale: u8) -> i32 {
    (length as i64 * scale as i64 / 100) as i32
}

/// Main window on the left, the rest stacked on the right.
pub fn tile(workspace: &Workspace, screen: Rect) -> Vec<Placement> {
    let ids = tiled_order(workspace);
    let Some((&main, rest)) = ids.split_first() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return vec![Placement {
            window: main,
            rect: screen,
        }];
    }
    let main_width = scaled(screen.width, workspace.main_window_scale());
    let mut placements = vec![Placement {
        window: main,
        rect: Rect {
            width: main_width,
            ..screen
        },
    }];
    let stack_x = screen.x + main_width;
    let stack_width = screen.width - main_width;
    for (id, (y, height)) in rest.iter().zip(spans(screen.y, screen.height, rest.len())) {
        placements.push(Placement {
            window: *id,
            rect: Rect::new(stack_x, y, stack_width, height),
        });
    }
    placements
}

/// Every tiled window fills the screen.
pub fn monocle(workspace: &Workspace, screen: Rect) -> Vec<Placement> {
    tiled_order(workspace)
        .into_iter()
        .map(|window| Placement {
            window,
            rect: screen,
        })
        .collect()
}

/// Main window across the top, the rest side by side below it.
pub fn wide(workspace: &Workspace, screen: Rect) -> Vec<Placement> {
    let ids = tiled_order(workspace);
    let Some((&main, rest)) = ids.split_first() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return vec![Placement {
            window: main,
            rect: screen,
        }];
    }
    let main_height = scaled(screen.height, workspace.main_window_scale());
    let mut placements = vec![Placement {
        window: main,
        rect: Rect {
            height: main_height,
            ..screen
        },
    }];
    let row_y = screen.y + main_height;
    let row_height = screen.height - main_height;
    for (id, (x, width)) in rest.iter().zip(spans(screen.x, screen.width, rest.len())) {
        placements.push(Placement {
            window: *id,
            rect: Rect::new(x, row_y, width, row_height),
        });
    }
    placements
}

/// Near-square grid, filled row by row starting with the main window.
///
/// There are `ceil(sqrt(n))` columns; a short last row is stretched over
/// the full width.
pub fn grid(workspace: &Workspace, screen: Rect) -> Vec<Placement> {
    let ids = tiled_order(workspace);
    if ids.is_empty() {
        return Vec::new();
    }
    let mut cols = 1;
    while cols * cols < ids.len() {
        cols += 1;
    }
    let rows = ids.len().div_ceil(cols);
    let mut placements = Vec::with_capacity(ids.len());
    for (row, (y, height)) in ids.chunks(cols).zip(spans(screen.y, screen.height, rows)) {
        for (id, (x, width)) in row.iter().zip(spans(screen.x, screen.width, row.len())) {
            placements.push(Placement {
                window: *id,
                rect: Rect::new(x, y, width, height),
            });
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::WindowInfo;
    use crate::window::Window;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 1000,
        height: 900,
    };

    fn workspace_with(ids: &[WindowId]) -> Workspace {
        let mut ws = Workspace::new(1, "tile");
        for id in ids {
            ws.add_window(Window::new(WindowInfo::new(*id, Rect::new(0, 0, 10, 10))));
        }
        ws
    }

    #[test]
    fn tile_single_window_fills_screen() {
        let ws = workspace_with(&[1]);
        let expected = Placement {
            window: 1,
            rect: SCREEN,
        };
        assert_eq!(tile(&ws, SCREEN), vec![expected]);
    }

    #[test]
    fn tile_splits_by_main_window_scale() {
        let mut ws = workspace_with(&[1, 2, 3]);
        ws.set_main_window_scale(60);
        let p = tile(&ws, SCREEN);
        let rects: Vec<(WindowId, Rect)> = p.iter().map(|p| (p.window, p.rect)).collect();
        assert_eq!(
            rects,
            vec![
                (1, Rect::new(0, 0, 600, 900)),
                (2, Rect::new(600, 0, 400, 450)),
                (3, Rect::new(600, 450, 400, 450)),
            ]
        );
    }

    #[test]
    fn main_window_goes_first() {
        let mut ws = workspace_with(&[1, 2]);
        assert!(ws.set_main_window(2));
        let p = tile(&ws, SCREEN);
        assert_eq!(p[0].window, 2);
        assert_eq!(p[1].window, 1);
    }

    #[test]
    fn stack_spans_cover_the_full_height() {
        let ws = workspace_with(&[1, 2, 3, 4]);
        let p = tile(&ws, SCREEN);
        let total: i32 = p[1..].iter().map(|p| p.rect.height).sum();
        assert_eq!(total, SCREEN.height);
    }

    #[test]
    fn monocle_gives_everyone_the_screen() {
        let ws = workspace_with(&[1, 2]);
        assert!(monocle(&ws, SCREEN).iter().all(|p| p.rect == SCREEN));
    }

    #[test]
    fn wide_puts_main_on_top() {
        let ws = workspace_with(&[1, 2, 3]);
        let p = wide(&ws, SCREEN);
        assert_eq!(p[0].rect, Rect::new(0, 0, 1000, 450));
        assert_eq!(p[1].rect, Rect::new(0, 450, 500, 450));
        assert_eq!(p[2].rect, Rect::new(500, 450, 500, 450));
    }

    #[test]
    fn grid_fills_a_square() {
        let ws = workspace_with(&[1, 2, 3, 4]);
        let rects: Vec<Rect> = grid(&ws, SCREEN).iter().map(|p| p.rect).collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 500, 450),
                Rect::new(500, 0, 500, 450),
                Rect::new(0, 450, 500, 450),
                Rect::new(500, 450, 500, 450),
            ]
        );
    }

    #[test]
    fn grid_stretches_short_last_row() {
        let mut ws = workspace_with(&[1, 2, 3]);
        assert!(ws.set_main_window(3));
        let p = grid(&ws, SCREEN);
        assert_eq!(p[0].window, 3);
        assert_eq!(p[1].rect, Rect::new(500, 0, 500, 450));
        assert_eq!(p[2].window, 2);
        assert_eq!(p[2].rect, Rect::new(0, 450, 1000, 450));
    }

    #[test]
    fn grid_uses_three_columns_for_five_windows() {
        let ws = workspace_with(&[1, 2, 3, 4, 5]);
        let p = grid(&ws, SCREEN);
        assert_eq!(p.len(), 5);
        assert_eq!(p[2].rect, Rect::new(666, 0, 334, 450));
        assert_eq!(p[3].rect, Rect::new(0, 450, 500, 450));
        assert_eq!(grid(&workspace_with(&[7]), SCREEN)[0].rect, SCREEN);
    }

    #[test]
    fn floating_windows_are_not_tiled() {
        let mut ws = workspace_with(&[1]);
        let mut info = WindowInfo::new(2, Rect::new(0, 0, 10, 10));
        info.floating = true;
        ws.add_window(Window::new(info));
        assert_eq!(tile(&ws, SCREEN).len(), 1);
    }

    #[test]
    fn empty_workspace_has_no_placements() {
        let ws = workspace_with(&[]);
        assert!(tile(&ws, SCREEN).is_empty());
        assert!(wide(&ws, SCREEN).is_empty());
        assert!(grid(&ws, SCREEN).is_empty());
    }

    #[test]
    fn registry_cycles_names() {
        let reg = LayoutRegistry::with_defaults();
        assert_eq!(reg.next_name("tile"), Some("monocle"));
        assert_eq!(reg.next_name("wide"), Some("grid"));
        assert_eq!(reg.next_name("grid"), Some("tile"));
        assert_eq!(reg.next_name("unknown"), Some("tile"));
        assert_eq!(LayoutRegistry::new().next_name("tile"), None);
    }

    #[test]
    fn closures_can_be_registered() {
        let mut reg = LayoutRegistry::new();
        reg.register("nothing", |_: &Workspace, _: Rect| -> Vec<Placement> { Vec::new() });
        let ws = workspace_with(&[1]);
        assert!(reg.get("nothing").unwrap().arrange(&ws, SCREEN).is_empty());
    }

    #[test]
    fn register_replaces_in_place() {
        let mut reg = LayoutRegistry::with_defaults();
        reg.register("tile", monocle);
        let names: Vec<&str> = reg.names().collect();
        assert_eq!(names, vec!["tile", "monocle", "wide", "grid"]);
        assert!(reg.contains("grid"));
        assert!(!reg.contains("spiral"));
        let ws = workspace_with(&[1, 2]);
        assert!(reg.get("tile").unwrap().arrange(&ws, SCREEN).iter().all(|p| p.rect == SCREEN));
    }
}
