use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path segment that precedes the document id in a Google Docs URL.
const DOC_PATH_MARKER: &str = "/document/d/";

/// The document a user's clips get appended to.
///
/// Only `doc_id` is used when talking to the Docs API; `doc_url` is kept so the
/// user can see what they pasted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocBinding {
    pub doc_url: String,
    pub doc_id: String,
    pub bound_at: DateTime<Utc>,
}

impl DocBinding {
    pub fn new(doc_url: impl Into<String>, doc_id: impl Into<String>) -> Self {
        Self {
            doc_url: doc_url.into(),
            doc_id: doc_id.into(),
            bound_at: Utc::now(),
        }
    }
}

/// Bearer credential obtained from the implicit-grant sign-in.
/// There is no refresh token: once Google rejects it, the user signs in again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            signed_in_at: Utc::now(),
        }
    }
}

/// Extracts the document ID from a Google Docs URL such as
/// `https://docs.google.com/document/d/<id>/edit`.
///
/// The id is the longest run of `[A-Za-z0-9_-]` right after `/document/d/`.
pub fn extract_doc_id(url: &str) -> Option<String> {
    let start = url.find(DOC_PATH_MARKER)? + DOC_PATH_MARKER.len();
    let id: String = url[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
