//! Command transport over a Unix socket.
//!
//! Key-bind helpers and scripts connect to the socket and send
//! newline-delimited JSON commands.

pub mod listener;
