// =============================================================================
// GOOGLE DOCS CLIENT
// =============================================================================
//
// Talks to the Google Docs REST API on behalf of a signed-in user.
//
// **Calls used:**
// - `GET  /v1/documents/{id}`              - read the body to find where it ends
// - `POST /v1/documents/{id}:batchUpdate`  - insert the clip and link its URL
//
// Both calls authenticate with the user's OAuth access token (Bearer). Google
// answers failures with an error envelope:
//
// ```json
// { "error": { "code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND" } }
// ```
//
// The envelope's `message` is passed through to the user verbatim. When it is
// missing, the message names the failed call and the HTTP status instead.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::core::clipper::{AppendPlan, DocsError, DocumentsApi};

const DEFAULT_BASE_URL: &str = "https://docs.googleapis.com/v1";

// =============================================================================
// GOOGLE DOCS API RESPONSE STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Body {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuralElement {
    end_index: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// =============================================================================
// BATCH UPDATE REQUEST STRUCTURES
// =============================================================================

#[derive(Debug, Serialize)]
struct BatchUpdateBody {
    requests: Vec<DocRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum DocRequest {
    InsertText {
        location: Location,
        text: String,
    },
    UpdateTextStyle {
        range: Range,
        #[serde(rename = "textStyle")]
        text_style: TextStyle,
        fields: String,
    },
}

#[derive(Debug, Serialize)]
struct Location {
    index: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Range {
    start_index: i64,
    end_index: i64,
}

#[derive(Debug, Serialize)]
struct TextStyle {
    link: Link,
}

#[derive(Debug, Serialize)]
struct Link {
    url: String,
}

impl BatchUpdateBody {
    /// Insert first, then style: the link range refers to text the insert creates.
    fn for_plan(plan: &AppendPlan) -> Self {
        Self {
            requests: vec![
                DocRequest::InsertText {
                    location: Location { index: plan.index },
                    text: plan.text.clone(),
                },
                DocRequest::UpdateTextStyle {
                    range: Range {
                        start_index: plan.link_start,
                        end_index: plan.link_end,
                    },
                    text_style: TextStyle {
                        link: Link {
                            url: plan.link_url.clone(),
                        },
                    },
                    fields: "link".to_string(),
                },
            ],
        }
    }
}

fn last_block_end(document: &Document) -> Result<i64, DocsError> {
    document
        .body
        .as_ref()
        .and_then(|body| body.content.last())
        .and_then(|element| element.end_index)
        .ok_or(DocsError::EmptyDocument)
}

/// Request URLs carry the document id, which must not leak into the message
/// that auth-failure detection scans.
fn transport_error(e: reqwest::Error) -> DocsError {
    DocsError::Transport(e.without_url().to_string())
}

/// Google's message from an error envelope, if the body is one.
fn envelope_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()?
        .error?
        .message
        .filter(|m| !m.trim().is_empty())
}

// =============================================================================
// GOOGLE DOCS CLIENT
// =============================================================================

/// Client for the two Docs API calls the clipper makes.
pub struct GoogleDocsClient {
    client: Client,
    base_url: String,
}

impl GoogleDocsClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Points the client at another API root (used for local testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn remote_error(response: Response, action: &str) -> DocsError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = envelope_message(&body)
            .unwrap_or_else(|| format!("Failed to {} ({})", action, status));

        DocsError::Remote {
            status: Some(status),
            message,
        }
    }
}

impl Default for GoogleDocsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentsApi for GoogleDocsClient {
    async fn last_block_end_index(&self, doc_id: &str, token: &str) -> Result<i64, DocsError> {
        let url = format!("{}/documents/{}", self.base_url, doc_id);

        tracing::debug!("Fetching Google Doc structure: {}", doc_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response, "access document").await);
        }

        let document: Document = response
            .json()
            .await
            .map_err(transport_error)?;

        last_block_end(&document)
    }

    async fn apply_append(
        &self,
        doc_id: &str,
        token: &str,
        plan: &AppendPlan,
    ) -> Result<(), DocsError> {
        let url = format!("{}/documents/{}:batchUpdate", self.base_url, doc_id);

        tracing::debug!(
            "Appending {} chars to Google Doc {} at index {}",
            plan.text.chars().count(),
            doc_id,
            plan.index
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&BatchUpdateBody::for_plan(plan))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response, "append text").await);
        }

        Ok(())
    }
}
