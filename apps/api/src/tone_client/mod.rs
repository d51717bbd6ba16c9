/// Tone Client — the single point of entry for calls to the external
/// tone/proofreading service.
///
/// The service is optional. `AppState` holds `Option<Arc<dyn ToneAnalyzer>>`;
/// when it is absent the polish report simply omits the tone weight.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::consistency::Severity;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ToneError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tone service unavailable after {retries} retries")]
    Unavailable { retries: u32 },
}

// ────────────────────────────────────────────────────────────────────────────
// Collaborator contract
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneScores {
    /// 0 – 100
    pub overall: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneIssue {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneRecommendation {
    #[serde(default)]
    pub title: Option<String>,
    pub description: String,
}

/// Result shape the tone service returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneResult {
    pub scores: ToneScores,
    #[serde(default)]
    pub issues: Vec<ToneIssue>,
    #[serde(default)]
    pub recommendations: Vec<ToneRecommendation>,
}

/// Optional tone/proofreading collaborator. Implement this to plug in a
/// different backend without touching handlers.
#[async_trait]
pub trait ToneAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<ToneResult, ToneError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Calls `POST {base_url}/analyze` with retry on 429 and 5xx.
#[derive(Clone)]
pub struct HttpToneAnalyzer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpToneAnalyzer {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ToneError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            endpoint: analyze_endpoint(base_url),
            api_key,
        })
    }
}

#[async_trait]
impl ToneAnalyzer for HttpToneAnalyzer {
    async fn analyze(&self, text: &str) -> Result<ToneResult, ToneError> {
        let body = AnalyzeRequest { text };
        let mut last_error: Option<ToneError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Tone call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ToneError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("Tone service returned {}: {}", status, message);
                last_error = Some(ToneError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ToneError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let result = parse_result(&body)?;
            debug!(
                "Tone analysis succeeded: overall={}, issues={}",
                result.scores.overall,
                result.issues.len()
            );
            return Ok(result);
        }

        Err(last_error.unwrap_or(ToneError::Unavailable {
            retries: MAX_RETRIES,
        }))
    }
}

fn parse_result(body: &str) -> Result<ToneResult, ToneError> {
    Ok(serde_json::from_str(body)?)
}

fn analyze_endpoint(base_url: &str) -> String {
    format!("{}/analyze", base_url.trim_end_matches('/'))
}
