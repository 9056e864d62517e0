// Discord layer - commands, sign-in flow, and toast rendering.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "auth/mod.rs"]
pub mod auth;

#[path = "notify/mod.rs"]
pub mod notify;

// Re-export command types for convenience
pub use commands::gdoc::{Data, Error};
