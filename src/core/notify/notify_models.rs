use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastStatus {
    Success,
    Error,
}

impl ToastStatus {
    pub fn icon(self) -> &'static str {
        match self {
            ToastStatus::Success => "✓",
            ToastStatus::Error => "✕",
        }
    }

    /// Background colour of the toast (green for success, red for errors).
    pub fn colour(self) -> u32 {
        match self {
            ToastStatus::Success => 0x1e7e34,
            ToastStatus::Error => 0xc82333,
        }
    }

    /// Title used when the toast has to fall back to a standalone notification.
    pub fn title(self) -> &'static str {
        match self {
            ToastStatus::Success => "Success",
            ToastStatus::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "SHOW_TOAST")]
    ShowToast,
}

/// The one message the clipper sends to the place the user clipped from.
///
/// Serializes as `{ "type": "SHOW_TOAST", "status": "success", "text": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub status: ToastStatus,
    pub text: String,
}

impl ToastMessage {
    pub fn new(status: ToastStatus, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::ShowToast,
            status,
            text: text.into(),
        }
    }

    /// Text with the status icon in front, as rendered inside the toast.
    pub fn display_text(&self) -> String {
        format!("{} {}", self.status.icon(), self.text)
    }
}

/// Identifies the "page" a toast belongs to: one user looking at one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub user_id: u64,
    pub channel_id: u64,
}
