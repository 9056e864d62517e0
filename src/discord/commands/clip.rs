// The "Append to Google Doc" message context-menu command.
//
// Right-click a message > Apps > Append to Google Doc. The message text is
// the selection, its jump link is the source URL, and the channel plus author
// make up the title.

use poise::serenity_prelude as serenity;

use crate::core::clipper::ClipRequest;
use crate::core::notify::{Notifier, ToastStatus};
use crate::discord::commands::gdoc::{ApplicationContext, Context, Error};
use crate::discord::notify::interaction_notifier;

/// Append this message to your Google Doc.
#[poise::command(context_menu_command = "Append to Google Doc")]
pub async fn append_to_doc(
    app_ctx: ApplicationContext<'_>,
    message: serenity::Message,
) -> Result<(), Error> {
    let ctx = poise::Context::Application(app_ctx);
    ctx.defer_ephemeral().await?;

    let notifier = interaction_notifier(
        ctx.serenity_context().http.clone(),
        app_ctx.interaction,
        ctx.data().toasts.clone(),
    );

    if message.content.trim().is_empty() {
        notifier
            .notify(ToastStatus::Error, "That message has no text to append")
            .await;
        return Ok(());
    }

    let title = page_title(ctx, &message).await;
    let request = ClipRequest::new(message.content.clone(), message.link(), title);

    // The notifier has already told the user what went wrong.
    let _ = ctx
        .data()
        .clipper
        .append(ctx.author().id.get(), &request, &notifier)
        .await;

    Ok(())
}

/// "#channel - author" for guild messages, "DM with author" otherwise.
async fn page_title(ctx: Context<'_>, message: &serenity::Message) -> String {
    let channel_name = message
        .channel_id
        .to_channel(ctx.serenity_context())
        .await
        .ok()
        .and_then(|channel| channel.guild())
        .map(|channel| channel.name);

    match channel_name {
        Some(name) => format!("#{} - {}", name, message.author.name),
        None => format!("DM with {}", message.author.name),
    }
}
