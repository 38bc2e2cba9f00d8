//! Daemon module - IPC server and handlers

pub mod handlers;
pub mod protocol;
pub mod server;
