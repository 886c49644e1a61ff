//! Terminal client for the deck service
//!
//! The CLI is a pure thin client: every command talks to the REST
//! server, auto-starting a local one when none is reachable.

pub mod client;
pub mod commands;
pub mod display;
pub mod server_manager;
