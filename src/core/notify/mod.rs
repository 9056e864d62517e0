pub mod notifier;
pub mod notify_models;
pub mod toast_board;

pub use notifier::{FallbackNotifier, Notifier, NotifyError, ToastChannel};
pub use notify_models::{PageKey, ToastMessage, ToastStatus};
pub use toast_board::{ToastBoard, ToastNotifier, ToastSurface, ToastTiming};
