// Outbound oracle boundary: a chat-completion-style HTTP JSON API that may
// answer a chart-suggestion request. One attempt per user action, bounded by
// an explicit request timeout; every failure here is recovered by the local
// resolver in the suggest layer.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const SYSTEM_INSTRUCTION: &str = "You are a helper that suggests chart specifications. \
Return ONLY a JSON object with keys: type, x, y (array), text. \
'type' is one of: line, bar, pie, doughnut, scatter. \
'x' is the column name to use as X. \
'y' is an array of column names to use as Y-series. \
'text' is a short human message. Do not include any extra text.";

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response carried no message content")]
    MissingContent,
}

/// Client for the remote suggestion oracle. Constructed once and shared;
/// absent credentials mean no client is constructed at all, which is how the
/// no-network short-circuit is enforced.
pub struct OracleClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl OracleClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(OracleClient {
            api_key,
            model,
            base_url,
            http,
        })
    }

    /// Build a client from `OPENAI_API_KEY` / `OPENAI_MODEL` /
    /// `OPENAI_BASE_URL`. Returns `None` when no credential is configured.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        OracleClient::new(api_key, model, base_url).ok()
    }

    /// Ask the oracle for a chart suggestion. Sends the column names and the
    /// raw prompt, returns the raw assistant text (expected, but not
    /// guaranteed, to be a JSON chart specification).
    pub async fn suggest(&self, prompt: &str, columns: &[String]) -> Result<String, OracleError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_INSTRUCTION},
                {"role": "user", "content": user_content(prompt, columns)}
            ],
            "max_tokens": 200,
            "temperature": 0.0
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: Value = response.json().await?;
        let content = reply["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(OracleError::MissingContent)?;

        Ok(content.to_string())
    }
}

fn user_content(prompt: &str, columns: &[String]) -> String {
    format!(
        "Dataset columns: {}\nPrompt: {}\nRespond in JSON exactly as requested.",
        columns.join(", "),
        prompt
    )
}
