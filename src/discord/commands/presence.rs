// Bot presence shown in the member list.
//
// Discord-layer glue only: we work with Discord SDK types (Context,
// ActivityData, OnlineStatus) and point users at the command that sets
// everything up.

use poise::serenity_prelude as serenity;

/// Called once the bot is ready.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("for clips | /gdoc");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
