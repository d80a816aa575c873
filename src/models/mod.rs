//! Wire models of the remote tables and the server configuration.

#[cfg(feature = "server")]
pub mod config;
pub mod dish;
pub mod event;
