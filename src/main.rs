// Entry point of the Google Doc clipper bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON files, Google APIs)
// - `discord/` = Discord-specific adapters (commands, toasts, sign-in flow)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register the context-menu and slash commands

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;

use crate::core::clipper::ClipperService;
use crate::core::notify::{ToastBoard, ToastTiming};
use crate::core::settings::{BindingService, SessionService};
use crate::discord::commands::presence;
use crate::discord::{Data, Error};
use crate::infra::google_docs::GoogleDocsClient;
use crate::infra::google_oauth::{GoogleOAuthClient, OAuthSettings};
use crate::infra::settings::{JsonBindingStore, JsonSessionStore};

/// How long `/gdoc signin` waits on each step before giving up.
const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(300);

fn env_millis(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let token = std::env::var("DISCORD_TOKEN").context(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    )?;

    // Keep runtime state in a dedicated folder so the repo root stays tidy.
    let data_dir = std::env::var("CLIPPER_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir))?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let binding_store = Arc::new(
        JsonBindingStore::open(format!("{}/bindings.json", data_dir))
            .await
            .context("Failed to load document bindings")?,
    );
    let session_store = Arc::new(
        JsonSessionStore::open(format!("{}/sessions.json", data_dir))
            .await
            .context("Failed to load sessions")?,
    );

    let oauth_settings = OAuthSettings::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let oauth_client =
        GoogleOAuthClient::new(oauth_settings).context("Invalid Google OAuth settings")?;

    let clipper = Arc::new(ClipperService::new(
        GoogleDocsClient::new(),
        Arc::clone(&binding_store),
        Arc::clone(&session_store),
    ));
    let bindings = Arc::new(BindingService::new(Arc::clone(&binding_store)));
    let sessions = Arc::new(SessionService::new(oauth_client, Arc::clone(&session_store)));

    let mut timing = ToastTiming::default();
    if let Some(visible) = env_millis("TOAST_VISIBLE_MS") {
        timing.visible = visible;
    }
    let toasts = Arc::new(ToastBoard::new(timing));

    let data = Data {
        clipper,
        bindings,
        sessions,
        toasts,
        sign_in_timeout: SIGN_IN_TIMEOUT,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    // Context-menu and slash interactions arrive regardless of intents.
    let intents = serenity::GatewayIntents::non_privileged();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::clip::append_to_doc(),
                discord::commands::gdoc::gdoc(),
            ],
            on_error: |error| {
                Box::pin(async move {
                    if let Err(e) = poise::builtins::on_error(error).await {
                        tracing::error!("Error while handling error: {}", e);
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up...");

                // The context-menu entry exists for every user once registered.
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                tracing::info!("Commands registered, bot is ready");
                presence::on_ready(ctx);

                Ok::<Data, Error>(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
