//! Commands and types used throughout gridwm.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the manager can perform,
//! and [`Direction`] / [`Target`] / [`WindowInfo`] / [`Rect`] provide
//! the supporting data types.
//!
//! Helpers forward raw arguments; the daemon parses direction strings
//! (e.g. "left", "Up"), symbolic targets ("back", "next", "prev") and plain
//! workspace numbers (either `3` or `"3"`).

use crate::window::WindowUpdate;
use crate::{WindowId, WorkspaceId};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A rectangle in screen coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Direction for grid navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Parse a direction string (case-insensitive; accepts "left", "Up", " RIGHT ").
fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_lowercase().as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Where a navigation or move should land.
///
/// Symbolic targets are resolved against the workspace set at the moment the
/// command is applied, so `Back` and the directions are relative to whichever
/// workspace is focused then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The previously focused workspace.
    Back,
    /// The following workspace in collection order (wraps).
    Next,
    /// The preceding workspace in collection order (wraps).
    Prev,
    /// A grid neighbour of the focused workspace.
    Direction(Direction),
    /// A concrete workspace id.
    Workspace(WorkspaceId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Back => write!(f, "back"),
            Target::Next => write!(f, "next"),
            Target::Prev => write!(f, "prev"),
            Target::Direction(dir) => write!(f, "{}", dir),
            Target::Workspace(id) => write!(f, "{}", id),
        }
    }
}

impl From<Direction> for Target {
    fn from(dir: Direction) -> Self {
        Target::Direction(dir)
    }
}

/// Parse a target string: a symbol, a direction, or a workspace number.
pub fn parse_target(s: &str) -> Option<Target> {
    let normalized = s.trim().to_lowercase();
    match normalized.as_str() {
        "back" => Some(Target::Back),
        "next" => Some(Target::Next),
        "prev" | "previous" => Some(Target::Prev),
        other => parse_direction(other)
            .map(Target::Direction)
            .or_else(|| other.parse().ok().map(Target::Workspace)),
    }
}

impl Serialize for Target {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Target;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "workspace number, direction, \"back\", \"next\" or \"prev\"")
            }
            fn visit_u64<E>(self, n: u64) -> Result<Target, E> {
                Ok(Target::Workspace(n as WorkspaceId))
            }
            fn visit_str<E>(self, s: &str) -> Result<Target, E>
            where
                E: DeError,
            {
                parse_target(s).ok_or_else(|| DeError::custom(format!("invalid target: {:?}", s)))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// A top-level window as reported by the display server when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Display-server id of the window.
    pub id: WindowId,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub instance: String,
    #[serde(default)]
    pub floating: bool,
}

impl WindowInfo {
    /// Minimal info with just an id and a geometry.
    pub fn new(id: WindowId, rect: Rect) -> Self {
        Self {
            id,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            title: String::new(),
            class: String::new(),
            instance: String::new(),
            floating: false,
        }
    }
}

/// Every action the manager can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the [`Manager`](crate::manager::Manager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Focus another workspace.
    Go(Target),

    /// Move a window to another workspace without following it.
    ///
    /// When `window` is omitted the focused window is moved.
    MoveWindowTo {
        #[serde(default)]
        window: Option<WindowId>,
        target: Target,
    },

    /// Move the focused window to `target` and follow it there.
    MoveWindowAndGo(Target),

    /// Focus the next window on the current workspace.
    FocusNext,

    /// Focus the previous window on the current workspace.
    FocusPrev,

    /// Focus a specific window on the current workspace.
    Focus(WindowId),

    /// Set the current workspace's main window scale (clamped to 1..=99).
    SetMainWindowScale(i32),

    /// Grow or shrink the current workspace's main window scale.
    AdjustMainWindowScale(i32),

    /// Switch the current workspace to the next registered layout.
    CycleLayout,

    /// Make the focused window the main window of its workspace.
    PromoteFocused,

    /// Recompute the current workspace's layout.
    Rearrange,

    /// Ask the display server to close the focused window.
    KillFocused,

    /// Ask the display server to close a specific window.
    Kill(WindowId),

    //  Display-server notifications

    /// A new top-level window appeared.
    WindowCreated(WindowInfo),

    /// A managed window was destroyed by the display server.
    WindowDestroyed(WindowId),

    /// Metadata of a managed window changed.
    WindowUpdated {
        window: WindowId,
        update: WindowUpdate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Left.to_string(), "left");
        assert_eq!(Direction::Right.to_string(), "right");
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Down.to_string(), "down");
    }

    #[test]
    fn parse_symbolic_targets() {
        assert_eq!(parse_target("back"), Some(Target::Back));
        assert_eq!(parse_target("Next"), Some(Target::Next));
        assert_eq!(parse_target("previous"), Some(Target::Prev));
        assert_eq!(parse_target(" LEFT "), Some(Target::Direction(Direction::Left)));
        assert_eq!(parse_target("7"), Some(Target::Workspace(7)));
        assert_eq!(parse_target("sideways"), None);
    }

    #[test]
    fn target_accepts_numbers_and_strings() {
        let n: Target = serde_json::from_str("3").unwrap();
        let s: Target = serde_json::from_str(r#""3""#).unwrap();
        let d: Target = serde_json::from_str(r#""down""#).unwrap();
        assert_eq!(n, Target::Workspace(3));
        assert_eq!(s, Target::Workspace(3));
        assert_eq!(d, Target::Direction(Direction::Down));
    }

    #[test]
    fn target_serializes_as_its_display_string() {
        assert_eq!(serde_json::to_string(&Target::Back).unwrap(), r#""back""#);
        assert_eq!(
            serde_json::to_string(&Target::Direction(Direction::Up)).unwrap(),
            r#""up""#
        );
    }

    #[test]
    fn invalid_target_is_rejected() {
        assert!(serde_json::from_str::<Target>(r#""diagonal""#).is_err());
    }

    #[test]
    fn move_window_to_defaults_to_focused() {
        let cmd: Command = serde_json::from_str(r#"{"MoveWindowTo":{"target":"next"}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::MoveWindowTo {
                window: None,
                target: Target::Next
            }
        );
    }

    #[test]
    fn window_created_fills_optional_metadata() {
        let cmd: Command = serde_json::from_str(
            r#"{"WindowCreated":{"id":10,"width":800,"height":600,"title":"term"}}"#,
        )
        .unwrap();
        match cmd {
            Command::WindowCreated(info) => {
                assert_eq!(info.id, 10);
                assert_eq!((info.x, info.y), (0, 0));
                assert_eq!(info.title, "term");
                assert!(info.class.is_empty());
                assert!(!info.floating);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn command_equality() {
        assert_eq!(
            Command::Go(Target::Direction(Direction::Left)),
            Command::Go(Direction::Left.into())
        );
        assert_ne!(Command::FocusNext, Command::FocusPrev);
    }
}
