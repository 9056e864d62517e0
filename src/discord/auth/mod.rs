pub mod discord_auth_flow;

pub use discord_auth_flow::DiscordAuthFlow;
