// Discord renditions of the toast surfaces.
//
// - Primary: an ephemeral follow-up on the interaction that triggered the clip.
//   Only the clipping user sees it, and the toast board deletes it again once
//   its lifetime is over.
// - Fallback: a direct message, used when the interaction can no longer be
//   answered (expired token, missing access).

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use crate::core::notify::{
    FallbackNotifier, NotifyError, PageKey, ToastBoard, ToastChannel, ToastMessage,
    ToastNotifier, ToastSurface,
};

/// Everything needed to delete a follow-up later, from any interaction.
#[derive(Debug, Clone)]
pub struct FollowupHandle {
    pub interaction_token: String,
    pub message_id: serenity::MessageId,
}

pub struct FollowupSurface {
    http: Arc<serenity::Http>,
    interaction: serenity::CommandInteraction,
}

fn toast_embed(message: &ToastMessage) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .description(message.display_text())
        .color(message.status.colour())
}

#[async_trait]
impl ToastSurface for FollowupSurface {
    type Handle = FollowupHandle;

    async fn show(&self, message: &ToastMessage) -> Result<FollowupHandle, NotifyError> {
        let followup = serenity::CreateInteractionResponseFollowup::new()
            .ephemeral(true)
            .embed(toast_embed(message));

        let sent = self
            .interaction
            .create_followup(&*self.http, followup)
            .await
            .map_err(|e| NotifyError::Unreachable(e.to_string()))?;

        Ok(FollowupHandle {
            interaction_token: self.interaction.token.clone(),
            message_id: sent.id,
        })
    }

    async fn remove(&self, handle: FollowupHandle) {
        if let Err(e) = self
            .http
            .delete_followup_message(&handle.interaction_token, handle.message_id)
            .await
        {
            tracing::debug!("Toast {} already gone: {}", handle.message_id, e);
        }
    }
}

/// Stand-in for a system notification: a DM to the user.
pub struct DirectMessageChannel {
    http: Arc<serenity::Http>,
    user_id: serenity::UserId,
}

#[async_trait]
impl ToastChannel for DirectMessageChannel {
    async fn deliver(&self, message: &ToastMessage) -> Result<(), NotifyError> {
        let dm = self
            .user_id
            .create_dm_channel(&*self.http)
            .await
            .map_err(|e| NotifyError::Unreachable(e.to_string()))?;

        let embed = serenity::CreateEmbed::new()
            .title(message.status.title())
            .description(&message.text)
            .color(message.status.colour());

        dm.id
            .send_message(&*self.http, serenity::CreateMessage::new().embed(embed))
            .await
            .map_err(|e| NotifyError::Failed(e.to_string()))?;
        Ok(())
    }
}

pub type InteractionNotifier = FallbackNotifier<ToastNotifier<FollowupSurface>, DirectMessageChannel>;

/// Builds the notifier for one command invocation. The interaction must
/// already be deferred or answered so follow-ups are accepted.
pub fn interaction_notifier(
    http: Arc<serenity::Http>,
    interaction: &serenity::CommandInteraction,
    board: Arc<ToastBoard<FollowupHandle>>,
) -> InteractionNotifier {
    let page = PageKey {
        user_id: interaction.user.id.get(),
        channel_id: interaction.channel_id.get(),
    };

    let surface = FollowupSurface {
        http: Arc::clone(&http),
        interaction: interaction.clone(),
    };

    FallbackNotifier::new(
        ToastNotifier::new(board, surface, page),
        DirectMessageChannel {
            http,
            user_id: interaction.user.id,
        },
    )
}
