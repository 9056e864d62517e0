use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use super::settings_models::Session;
use super::settings_store::{SessionStore, StoreError};

/// Why the interactive sign-in did not yield a token.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error("Authorization was cancelled")]
    Cancelled,
    #[error("No response URL")]
    NoRedirect,
    #[error("No access token in response")]
    NoToken,
    #[error("{0}")]
    Platform(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Sign in failed: {0}")]
    Flow(#[from] AuthFlowError),
    #[error("Failed to update session: {0}")]
    Store(#[from] StoreError),
}

/// Signed-in state as shown by `/gdoc status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    SignedIn { since: DateTime<Utc> },
    SignedOut,
}

/// Identity provider operations the session service needs.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Implicit-grant authorization URL (`response_type=token`).
    fn authorization_url(&self) -> &str;

    /// Asks the provider whether it still accepts `token`.
    async fn verify_token(&self, token: &str) -> Result<bool, String>;
}

/// The user-facing part of the sign-in: show the authorization URL and hand
/// back the URL the provider redirected to, if any.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    async fn launch(&self, authorization_url: &str) -> Result<Option<String>, AuthFlowError>;
}

pub struct SessionService<I: IdentityApi, S: SessionStore> {
    identity: I,
    store: Arc<S>,
}

impl<I: IdentityApi, S: SessionStore> SessionService<I, S> {
    pub fn new(identity: I, store: Arc<S>) -> Self {
        Self { identity, store }
    }

    /// Reports whether the user is signed in. A stored token the provider no
    /// longer accepts is discarded on the spot.
    pub async fn status(&self, user_id: u64) -> Result<AuthState, SessionError> {
        let Some(session) = self.store.get_session(user_id).await? else {
            return Ok(AuthState::SignedOut);
        };

        match self.identity.verify_token(&session.access_token).await {
            Ok(true) => Ok(AuthState::SignedIn {
                since: session.signed_in_at,
            }),
            Ok(false) => {
                tracing::info!(user_id, "Stored token rejected by Google, discarding");
                self.store.remove_session(user_id).await?;
                Ok(AuthState::SignedOut)
            }
            Err(e) => {
                tracing::warn!(user_id, "Token introspection failed: {}", e);
                self.store.remove_session(user_id).await?;
                Ok(AuthState::SignedOut)
            }
        }
    }

    pub async fn sign_in<F>(&self, user_id: u64, flow: &F) -> Result<(), SessionError>
    where
        F: AuthorizationFlow + ?Sized,
    {
        let redirect = flow
            .launch(self.identity.authorization_url())
            .await?
            .ok_or(AuthFlowError::NoRedirect)?;
        let token = parse_redirect_token(&redirect)?;

        self.store.save_session(user_id, Session::new(token)).await?;
        tracing::info!(user_id, "User signed in to Google");
        Ok(())
    }

    /// Forgets the local credential. The token is not revoked remotely.
    pub async fn sign_out(&self, user_id: u64) -> Result<(), SessionError> {
        self.store.remove_session(user_id).await?;
        tracing::info!(user_id, "User signed out");
        Ok(())
    }
}

/// Pulls `access_token` out of the fragment of an implicit-grant redirect,
/// e.g. `http://localhost/#access_token=ya29...&token_type=Bearer`.
pub fn parse_redirect_token(redirect: &str) -> Result<String, AuthFlowError> {
    let redirect = redirect.trim();
    if redirect.is_empty() {
        return Err(AuthFlowError::NoRedirect);
    }

    let url = Url::parse(redirect).map_err(|_| AuthFlowError::NoToken)?;
    let fragment = url.fragment().ok_or(AuthFlowError::NoToken)?;

    url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
        .ok_or(AuthFlowError::NoToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::in_memory::InMemorySettingsStore;
    use std::sync::Mutex;

    struct FakeIdentity {
        accepts: Result<bool, String>,
    }

    #[async_trait]
    impl IdentityApi for FakeIdentity {
        fn authorization_url(&self) -> &str {
            "https://accounts.example/auth?response_type=token"
        }

        async fn verify_token(&self, _token: &str) -> Result<bool, String> {
            self.accepts.clone()
        }
    }

    struct ScriptedFlow {
        outcome: Mutex<Option<Result<Option<String>, AuthFlowError>>>,
        seen_url: Mutex<Option<String>>,
    }

    impl ScriptedFlow {
        fn new(outcome: Result<Option<String>, AuthFlowError>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                seen_url: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl AuthorizationFlow for ScriptedFlow {
        async fn launch(&self, authorization_url: &str) -> Result<Option<String>, AuthFlowError> {
            *self.seen_url.lock().unwrap() = Some(authorization_url.to_string());
            self.outcome.lock().unwrap().take().unwrap()
        }
    }

    fn service(
        accepts: Result<bool, String>,
        store: Arc<InMemorySettingsStore>,
    ) -> SessionService<FakeIdentity, InMemorySettingsStore> {
        SessionService::new(FakeIdentity { accepts }, store)
    }

    #[test]
    fn test_parse_redirect_token_from_fragment() {
        let token = parse_redirect_token(
            "https://abc.chromiumapp.org/#access_token=ya29.a0AfB&token_type=Bearer&expires_in=3599",
        )
        .unwrap();
        assert_eq!(token, "ya29.a0AfB");
    }

    #[test]
    fn test_parse_redirect_token_decodes_percent_escapes() {
        let token = parse_redirect_token("http://localhost/#access_token=a%2Fb&scope=x").unwrap();
        assert_eq!(token, "a/b");
    }

    #[test]
    fn test_parse_redirect_without_token() {
        assert!(matches!(
            parse_redirect_token("http://localhost/#error=access_denied"),
            Err(AuthFlowError::NoToken)
        ));
        assert!(matches!(
            parse_redirect_token("http://localhost/?access_token=in-query-not-fragment"),
            Err(AuthFlowError::NoToken)
        ));
        assert!(matches!(
            parse_redirect_token("  "),
            Err(AuthFlowError::NoRedirect)
        ));
    }

    #[tokio::test]
    async fn test_sign_in_stores_token() {
        let store = Arc::new(InMemorySettingsStore::new());
        let service = service(Ok(true), Arc::clone(&store));
        let flow = ScriptedFlow::new(Ok(Some(
            "http://localhost/#access_token=tok-1&token_type=Bearer".to_string(),
        )));

        service.sign_in(7, &flow).await.unwrap();

        assert_eq!(store.token(7).as_deref(), Some("tok-1"));
        assert_eq!(
            flow.seen_url.lock().unwrap().as_deref(),
            Some("https://accounts.example/auth?response_type=token")
        );
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_typed() {
        let store = Arc::new(InMemorySettingsStore::new());
        let service = service(Ok(true), Arc::clone(&store));

        let cancelled = ScriptedFlow::new(Err(AuthFlowError::Cancelled));
        assert!(matches!(
            service.sign_in(7, &cancelled).await,
            Err(SessionError::Flow(AuthFlowError::Cancelled))
        ));

        let no_redirect = ScriptedFlow::new(Ok(None));
        assert!(matches!(
            service.sign_in(7, &no_redirect).await,
            Err(SessionError::Flow(AuthFlowError::NoRedirect))
        ));

        let no_token = ScriptedFlow::new(Ok(Some("http://localhost/#state=1".to_string())));
        let err = service.sign_in(7, &no_token).await.unwrap_err();
        assert_eq!(err.to_string(), "Sign in failed: No access token in response");

        assert!(store.token(7).is_none());
    }

    #[tokio::test]
    async fn test_status_keeps_accepted_token() {
        let store = Arc::new(InMemorySettingsStore::new().with_token(3, "good"));
        let service = service(Ok(true), Arc::clone(&store));

        assert!(matches!(
            service.status(3).await.unwrap(),
            AuthState::SignedIn { .. }
        ));
        assert_eq!(store.token(3).as_deref(), Some("good"));
    }

    #[tokio::test]
    async fn test_status_discards_rejected_token() {
        let store = Arc::new(InMemorySettingsStore::new().with_token(3, "stale"));
        let service = service(Ok(false), Arc::clone(&store));

        assert_eq!(service.status(3).await.unwrap(), AuthState::SignedOut);
        assert!(store.token(3).is_none());
    }

    #[tokio::test]
    async fn test_status_discards_token_when_introspection_fails() {
        let store = Arc::new(InMemorySettingsStore::new().with_token(3, "maybe"));
        let service = service(Err("connection reset".to_string()), Arc::clone(&store));

        assert_eq!(service.status(3).await.unwrap(), AuthState::SignedOut);
        assert!(store.token(3).is_none());
    }

    #[tokio::test]
    async fn test_sign_out_removes_token() {
        let store = Arc::new(InMemorySettingsStore::new().with_token(3, "tok"));
        let service = service(Ok(true), Arc::clone(&store));

        service.sign_out(3).await.unwrap();
        assert!(store.token(3).is_none());
        assert_eq!(service.status(3).await.unwrap(), AuthState::SignedOut);
    }
}
