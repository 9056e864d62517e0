// Where toasts end up on Discord.

pub mod interaction_toast;

pub use interaction_toast::{interaction_notifier, FollowupHandle};
