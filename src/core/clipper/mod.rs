// Clipping: turn a selection into an append on the user's Google Doc.

pub mod clip_models;
pub mod clip_service;

pub use clip_models::{AppendPlan, ClipRequest};
pub use clip_service::{ClipperService, DocsError, DocumentsApi};
