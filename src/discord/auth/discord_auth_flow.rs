// Interactive Google sign-in over Discord.
//
// 1. The bot replies (ephemerally) with a link button to Google's consent page
//    and a "Paste redirect URL" button.
// 2. After consenting, Google redirects the browser to the configured redirect
//    URI with `#access_token=...` in the address bar.
// 3. The user presses "Paste redirect URL" and pastes that address into a modal.
//
// Running out of time at either step counts as a cancelled sign-in.

use std::time::Duration;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use crate::core::settings::{AuthFlowError, AuthorizationFlow};
use crate::discord::commands::gdoc::ApplicationContext;

const INSTRUCTIONS: &str = "1. Press **Sign in with Google** and approve access.\n\
    2. Copy the full address your browser lands on (it contains `#access_token=`).\n\
    3. Press **Paste redirect URL** and paste it.";

#[derive(Debug, poise::Modal)]
#[name = "Finish Google sign-in"]
struct RedirectModal {
    #[name = "Redirect URL"]
    #[placeholder = "http://localhost/#access_token=..."]
    #[paragraph]
    redirect_url: Option<String>,
}

pub struct DiscordAuthFlow<'a> {
    ctx: ApplicationContext<'a>,
    timeout: Duration,
}

impl<'a> DiscordAuthFlow<'a> {
    pub fn new(ctx: ApplicationContext<'a>, timeout: Duration) -> Self {
        Self { ctx, timeout }
    }
}

#[async_trait]
impl<'a> AuthorizationFlow for DiscordAuthFlow<'a> {
    async fn launch(&self, authorization_url: &str) -> Result<Option<String>, AuthFlowError> {
        let ctx = poise::Context::Application(self.ctx);
        let paste_id = format!("gdoc-signin-{}", self.ctx.interaction.id);

        let buttons = serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new_link(authorization_url).label("Sign in with Google"),
            serenity::CreateButton::new(paste_id.clone())
                .label("Paste redirect URL")
                .style(serenity::ButtonStyle::Primary),
        ]);

        ctx.send(
            poise::CreateReply::default()
                .content(INSTRUCTIONS)
                .components(vec![buttons])
                .ephemeral(true),
        )
        .await
        .map_err(|e| AuthFlowError::Platform(e.to_string()))?;

        let press = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
            .author_id(ctx.author().id)
            .timeout(self.timeout)
            .filter(move |press| press.data.custom_id == paste_id)
            .await
            .ok_or(AuthFlowError::Cancelled)?;

        let modal = poise::execute_modal_on_component_interaction::<RedirectModal>(
            ctx,
            press,
            None,
            Some(self.timeout),
        )
        .await
        .map_err(|e| AuthFlowError::Platform(e.to_string()))?
        .ok_or(AuthFlowError::Cancelled)?;

        Ok(modal.redirect_url.filter(|url| !url.trim().is_empty()))
    }
}
