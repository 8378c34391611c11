//! **gridwm**: the workspace core of a tiling window manager.
//!
//! Windows are grouped into workspaces, and the workspaces are laid out as a
//! fixed `rows × cols` grid that can be navigated by direction (with
//! configurable wraparound), in collection order (`next`/`prev`) or back to
//! the previously focused workspace.  Exactly one workspace is focused; its
//! windows are on screen and every other window is parked just off screen.
//!
//! # Architecture
//!
//! * [`collection::Collection`]: insertion-ordered keyed container that
//!   reports every mutation to an injected observer.  Used for the windows
//!   of a workspace and for the workspaces of the set.
//! * [`window::Window`] → [`workspace::Workspace`] →
//!   [`workspaces::WorkspaceSet`]: the ownership hierarchy.  Only the
//!   workspace set moves windows between owners.
//! * [`grid::Grid`]: row-major addressing and directional navigation.
//! * [`layout`]: pluggable layouts turning a workspace into placements.
//! * [`manager::Manager`]: dispatches [`command::Command`]s.
//!
//! Two traits decouple the core from the outside world:
//!
//! * [`traits::DisplayDriver`]: moves, resizes, focuses and kills windows
//!   on an actual display server.  [`driver`] forwards those calls as JSON
//!   lines to an external adapter.
//! * [`traits::CommandSource`]: delivers commands from some transport;
//!   [`ipc`] provides a Unix-socket implementation.

pub mod collection;
pub mod command;
pub mod config;
pub mod driver;
pub mod grid;
pub mod ipc;
pub mod layout;
pub mod manager;
pub mod traits;
pub mod window;
pub mod workspace;
pub mod workspaces;

/// Identifier of a managed window, as assigned by the display server.
pub type WindowId = u64;

/// Identifier of a workspace.  1-based: grid index `i` has id `i + 1`.
pub type WorkspaceId = usize;
