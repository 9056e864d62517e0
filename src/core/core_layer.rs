// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "clipper/mod.rs"]
pub mod clipper;

#[path = "notify/mod.rs"]
pub mod notify;

#[path = "settings/mod.rs"]
pub mod settings;
