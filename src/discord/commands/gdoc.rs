// `/gdoc` commands: sign in to Google and choose the document clips go to.
//
// **Notice the pattern:**
// 1. Extract the user id from the Discord context
// 2. Call the core service
// 3. Reply ephemerally with the result
//
// This layer is THIN - no business logic, just translation.

use std::sync::Arc;
use std::time::Duration;

use crate::core::clipper::ClipperService;
use crate::core::notify::ToastBoard;
use crate::core::settings::{AuthState, BindingService, SessionService};
use crate::discord::auth::DiscordAuthFlow;
use crate::discord::notify::FollowupHandle;
use crate::infra::google_docs::GoogleDocsClient;
use crate::infra::google_oauth::GoogleOAuthClient;
use crate::infra::settings::{JsonBindingStore, JsonSessionStore};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type ApplicationContext<'a> = poise::ApplicationContext<'a, Data, Error>;

/// Data that's shared across all commands.
pub struct Data {
    pub clipper: Arc<ClipperService<GoogleDocsClient, JsonBindingStore, JsonSessionStore>>,
    pub bindings: Arc<BindingService<JsonBindingStore>>,
    pub sessions: Arc<SessionService<GoogleOAuthClient, JsonSessionStore>>,
    pub toasts: Arc<ToastBoard<FollowupHandle>>,
    /// How long `/gdoc signin` waits for the user to paste the redirect URL.
    pub sign_in_timeout: Duration,
}

async fn reply(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(text.into())
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Root `/gdoc` command. Subcommands handle sign-in and document setup.
#[poise::command(
    slash_command,
    subcommands("status", "signin", "signout", "bind")
)]
pub async fn gdoc(ctx: Context<'_>) -> Result<(), Error> {
    reply(
        ctx,
        "Google Doc clipper commands:\n\
        `/gdoc status` - Show whether you are signed in and which doc is bound\n\
        `/gdoc signin` - Sign in with Google\n\
        `/gdoc signout` - Forget your Google sign-in\n\
        `/gdoc bind <url>` - Choose the Google Doc clips are appended to\n\
        Then right-click any message > Apps > **Append to Google Doc**.",
    )
    .await
}

/// Show sign-in state and the bound document.
#[poise::command(slash_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    let user_id = ctx.author().id.get();

    let auth = match ctx.data().sessions.status(user_id).await? {
        AuthState::SignedIn { since } => format!("Signed in (since <t:{}:R>)", since.timestamp()),
        AuthState::SignedOut => "Not signed in".to_string(),
    };

    let doc = match ctx.data().bindings.current(user_id).await? {
        Some(binding) => format!(
            "Document ID: `{}` (bound <t:{}:R>)\n<{}>",
            binding.doc_id,
            binding.bound_at.timestamp(),
            binding.doc_url
        ),
        None => "No Google Doc configured".to_string(),
    };

    reply(ctx, format!("**{}**\n{}", auth, doc)).await
}

/// Sign in with Google.
#[poise::command(slash_command)]
pub async fn signin(app_ctx: ApplicationContext<'_>) -> Result<(), Error> {
    let ctx = poise::Context::Application(app_ctx);
    let user_id = ctx.author().id.get();
    let flow = DiscordAuthFlow::new(app_ctx, ctx.data().sign_in_timeout);

    let text = match ctx.data().sessions.sign_in(user_id, &flow).await {
        Ok(()) => "Signed in".to_string(),
        Err(e) => {
            tracing::warn!(user_id, "Auth error: {}", e);
            e.to_string()
        }
    };

    reply(ctx, text).await
}

/// Forget your Google sign-in.
#[poise::command(slash_command)]
pub async fn signout(ctx: Context<'_>) -> Result<(), Error> {
    ctx.data()
        .sessions
        .sign_out(ctx.author().id.get())
        .await?;
    reply(ctx, "Not signed in").await
}

/// Choose the Google Doc clips are appended to.
#[poise::command(slash_command)]
pub async fn bind(
    ctx: Context<'_>,
    #[description = "Google Doc URL, e.g. https://docs.google.com/document/d/<id>/edit"] url: String,
) -> Result<(), Error> {
    let text = match ctx.data().bindings.bind(ctx.author().id.get(), &url).await {
        Ok(binding) => format!("Saved successfully! Document ID: `{}`", binding.doc_id),
        Err(e) => e.to_string(),
    };
    reply(ctx, text).await
}
