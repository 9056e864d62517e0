// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "google_docs/mod.rs"]
pub mod google_docs;

#[path = "google_oauth/mod.rs"]
pub mod google_oauth;

#[path = "settings/mod.rs"]
pub mod settings;
