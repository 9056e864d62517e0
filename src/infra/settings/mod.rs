// JSON-file persistence for per-user settings.

pub mod json_store;

pub use json_store::{JsonBindingStore, JsonSessionStore};
