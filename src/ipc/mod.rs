//! Command transports.
//!
//! Key-bind helpers and display-server adapters connect to the socket
//! served by [`listener::UnixSocketListener`] and send newline-delimited
//! JSON commands.

pub mod listener;
