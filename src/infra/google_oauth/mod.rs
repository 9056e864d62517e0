// Google sign-in: authorization URL + token introspection.

pub mod oauth_client;

pub use oauth_client::{GoogleOAuthClient, OAuthSettings};
