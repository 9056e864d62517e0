// =============================================================================
// GOOGLE OAUTH (IMPLICIT GRANT)
// =============================================================================
//
// Users sign in with the OAuth 2.0 implicit grant: Google redirects straight
// back with `#access_token=...` in the URL fragment, so there is no code
// exchange and no client secret.
//
// **Setup:**
// 1. Google Cloud Console > "APIs & Services" > enable the Google Docs API
// 2. Create an OAuth client ID of type "Web application"
// 3. Add the redirect URI you configure below to "Authorized redirect URIs"
//
// **Environment Variables:**
// - `GOOGLE_OAUTH_CLIENT_ID`    - OAuth client id (required)
// - `GOOGLE_OAUTH_REDIRECT_URI` - where Google sends the token (default `http://localhost`)
// - `GOOGLE_OAUTH_SCOPES`       - comma-separated scopes (default: Docs read/write)

use async_trait::async_trait;
use reqwest::Client;
use std::error::Error;
use url::Url;

use crate::core::settings::IdentityApi;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKENINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";
const DEFAULT_REDIRECT_URI: &str = "http://localhost";
const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/documents";

#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_endpoint: String,
    pub tokeninfo_endpoint: String,
}

impl OAuthSettings {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: vec![DEFAULT_SCOPE.to_string()],
            auth_endpoint: AUTH_ENDPOINT.to_string(),
            tokeninfo_endpoint: TOKENINFO_ENDPOINT.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let client_id = std::env::var("GOOGLE_OAUTH_CLIENT_ID")
            .map_err(|_| "GOOGLE_OAUTH_CLIENT_ID environment variable not set")?;

        let mut settings = Self::new(client_id);

        if let Ok(redirect_uri) = std::env::var("GOOGLE_OAUTH_REDIRECT_URI") {
            settings.redirect_uri = redirect_uri;
        }

        if let Ok(scopes) = std::env::var("GOOGLE_OAUTH_SCOPES") {
            let scopes: Vec<String> = scopes
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !scopes.is_empty() {
                settings.scopes = scopes;
            }
        }

        Ok(settings)
    }
}

/// Builds the sign-in URL and checks tokens against Google's tokeninfo endpoint.
pub struct GoogleOAuthClient {
    client: Client,
    authorization_url: String,
    tokeninfo_endpoint: String,
}

impl GoogleOAuthClient {
    pub fn new(settings: OAuthSettings) -> Result<Self, url::ParseError> {
        let scope = settings.scopes.join(" ");
        let authorization_url = Url::parse_with_params(
            &settings.auth_endpoint,
            &[
                ("client_id", settings.client_id.as_str()),
                ("redirect_uri", settings.redirect_uri.as_str()),
                ("response_type", "token"),
                ("scope", scope.as_str()),
            ],
        )?;

        Ok(Self {
            client: Client::new(),
            authorization_url: authorization_url.to_string(),
            tokeninfo_endpoint: settings.tokeninfo_endpoint,
        })
    }
}

#[async_trait]
impl IdentityApi for GoogleOAuthClient {
    fn authorization_url(&self) -> &str {
        &self.authorization_url
    }

    async fn verify_token(&self, token: &str) -> Result<bool, String> {
        let response = self
            .client
            .get(&self.tokeninfo_endpoint)
            .query(&[("access_token", token)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        tracing::debug!("Token introspection returned {}", response.status());
        Ok(response.status().is_success())
    }
}
