use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SuggestionConfig;

use super::fallback::{fallback_set, FallbackKind};
use super::set::SuggestionSet;

/// Suggestion-fetch boundary.
///
/// Contract: exactly one outbound request per invocation, no retries, and
/// no error surfaces to the caller — every failure mode resolves to a
/// substitute set.
#[async_trait::async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, transcript: &str) -> SuggestionSet;
}

/// Failure modes of one suggestion request, each mapped to its own
/// substitute message set.
#[derive(Debug, Clone, Error)]
pub enum SuggestError {
    #[error("suggestion request timed out")]
    Timeout,
    #[error("could not reach the suggestion service")]
    Connectivity,
    #[error("suggestion service replied with status {status}")]
    Server { status: u16 },
    #[error("suggestion request failed: {0}")]
    Other(String),
}

impl SuggestError {
    pub fn fallback_kind(&self) -> FallbackKind {
        match self {
            SuggestError::Timeout => FallbackKind::Timeout,
            SuggestError::Connectivity => FallbackKind::Connectivity,
            SuggestError::Server { .. } | SuggestError::Other(_) => FallbackKind::Server,
        }
    }
}

#[derive(Serialize)]
struct AskRequest<'a> {
    text: &'a str,
    #[serde(rename = "userId")]
    user_id: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    suggestions: Option<Vec<String>>,
}

/// Parse a suggestion-service response body into displayable items.
///
/// Anything other than a JSON object carrying a string array under
/// `suggestions` yields an empty list; blank items are dropped.
pub fn extract_suggestions(body: &str) -> Vec<String> {
    let parsed: Option<AskResponse> = serde_json::from_str(body).ok();
    let Some(items) = parsed.and_then(|r| r.suggestions) else {
        return Vec::new();
    };

    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// reqwest-backed client for the fixed suggestion endpoint.
pub struct HttpSuggestionClient {
    http: reqwest::Client,
    url: String,
    user_id: String,
}

impl HttpSuggestionClient {
    pub fn new(config: &SuggestionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        // The widget always identified its user; fall back to a per-run
        // anonymous id when none is configured.
        let user_id = config
            .user_id
            .clone()
            .unwrap_or_else(|| format!("anonymous-{}", Uuid::new_v4()));

        Ok(Self {
            http,
            url: config.url.clone(),
            user_id,
        })
    }

    async fn request(&self, transcript: &str) -> Result<Vec<String>, SuggestError> {
        let body = AskRequest {
            text: transcript,
            user_id: &self.user_id,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify)?;
        Ok(extract_suggestions(&body))
    }
}

fn classify(e: reqwest::Error) -> SuggestError {
    if e.is_timeout() {
        SuggestError::Timeout
    } else if e.is_connect() {
        SuggestError::Connectivity
    } else {
        SuggestError::Other(e.to_string())
    }
}

#[async_trait::async_trait]
impl SuggestionSource for HttpSuggestionClient {
    async fn suggest(&self, transcript: &str) -> SuggestionSet {
        match self.request(transcript).await {
            Ok(items) if !items.is_empty() => {
                info!("received {} suggestions", items.len());
                SuggestionSet::backend(items)
            }
            Ok(_) => {
                warn!("suggestion response carried no usable items");
                fallback_set(FallbackKind::EmptyResponse)
            }
            Err(e) => {
                warn!("suggestion request failed: {}", e);
                fallback_set(e.fallback_kind())
            }
        }
    }
}
