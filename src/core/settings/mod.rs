// Per-user settings: the bound document and the Google session.
// Both are plain key-value records keyed by Discord user id.

pub mod binding_service;
#[cfg(test)]
pub mod in_memory;
pub mod session_service;
pub mod settings_models;
pub mod settings_store;

pub use binding_service::BindingService;
pub use session_service::{
    AuthFlowError, AuthState, AuthorizationFlow, IdentityApi, SessionService,
};
pub use settings_models::{DocBinding, Session};
pub use settings_store::{BindingStore, SessionStore, StoreError};
