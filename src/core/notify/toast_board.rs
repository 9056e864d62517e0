// =============================================================================
// TOASTS
// =============================================================================
//
// A toast is a short-lived status message shown where the user triggered the
// clip. The board remembers which toast is currently visible on each page so
// that:
// - showing a new toast first removes the old one (never two at once), and
// - each toast removes itself after its lifetime, unless a newer toast has
//   already replaced it.
//
// Rendering lives behind `ToastSurface`; the Discord layer renders toasts as
// ephemeral interaction follow-ups.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use super::notifier::{NotifyError, ToastChannel};
use super::notify_models::{PageKey, ToastMessage};

/// How long a toast stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    pub visible: Duration,
    pub fade_out: Duration,
}

impl ToastTiming {
    pub fn lifetime(&self) -> Duration {
        self.visible + self.fade_out
    }
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            visible: Duration::from_millis(2500),
            fade_out: Duration::from_millis(300),
        }
    }
}

/// Something that can put a toast on screen and take it down again.
#[async_trait]
pub trait ToastSurface: Send + Sync + 'static {
    /// Everything needed to remove the toast later, possibly from another interaction.
    type Handle: Send + Sync + 'static;

    async fn show(&self, message: &ToastMessage) -> Result<Self::Handle, NotifyError>;
    async fn remove(&self, handle: Self::Handle);
}

struct VisibleToast<H> {
    id: u64,
    handle: H,
}

/// Tracks the visible toast per page. Shared by every interaction.
pub struct ToastBoard<H> {
    visible: DashMap<PageKey, VisibleToast<H>>,
    next_id: AtomicU64,
    timing: ToastTiming,
}

impl<H: Send + Sync + 'static> ToastBoard<H> {
    pub fn new(timing: ToastTiming) -> Self {
        Self {
            visible: DashMap::new(),
            next_id: AtomicU64::new(1),
            timing,
        }
    }

    /// Replaces whatever is visible on `page` with `message` and schedules its removal.
    pub async fn show<S>(
        self: &Arc<Self>,
        surface: Arc<S>,
        page: PageKey,
        message: &ToastMessage,
    ) -> Result<(), NotifyError>
    where
        S: ToastSurface<Handle = H>,
    {
        if let Some((_, previous)) = self.visible.remove(&page) {
            surface.remove(previous.handle).await;
        }

        let handle = surface.show(message).await?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // Another toast may have landed on this page while we were awaiting.
        if let Some(raced) = self.visible.insert(page, VisibleToast { id, handle }) {
            surface.remove(raced.handle).await;
        }
        tracing::debug!(toast = id, pages = self.visible.len(), "Toast shown");

        let board = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(board.timing.lifetime()).await;
            if let Some((_, expired)) = board.visible.remove_if(&page, |_, t| t.id == id) {
                surface.remove(expired.handle).await;
            }
        });

        Ok(())
    }
}

/// A toast channel bound to one page of one surface.
pub struct ToastNotifier<S: ToastSurface> {
    board: Arc<ToastBoard<S::Handle>>,
    surface: Arc<S>,
    page: PageKey,
}

impl<S: ToastSurface> ToastNotifier<S> {
    pub fn new(board: Arc<ToastBoard<S::Handle>>, surface: S, page: PageKey) -> Self {
        Self {
            board,
            surface: Arc::new(surface),
            page,
        }
    }
}

#[async_trait]
impl<S: ToastSurface> ToastChannel for ToastNotifier<S> {
    async fn deliver(&self, message: &ToastMessage) -> Result<(), NotifyError> {
        self.board
            .show(Arc::clone(&self.surface), self.page, message)
            .await
    }
}
