//! Journal summarization collaborator.
//!
//! An optional outbound call to an OpenAI-style chat-completions endpoint.
//! This lives entirely outside the correlation pipeline: any failure here
//! degrades to a deterministic truncated fallback and never aborts or
//! corrupts an analysis run.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Explicit configuration for the summarizer, passed in by the caller —
/// never read from ambient process state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
  pub api_base:       String,
  /// Unset means "unconfigured": every call takes the fallback path.
  pub api_key:        Option<String>,
  pub model:          String,
  pub timeout_secs:   u64,
  /// Maximum characters of raw text returned by the fallback.
  pub fallback_chars: usize,
}

impl Default for SummarizerConfig {
  fn default() -> Self {
    Self {
      api_base:       "https://api.openai.com/v1".to_owned(),
      api_key:        None,
      model:          "gpt-4o-mini".to_owned(),
      timeout_secs:   30,
      fallback_chars: 280,
    }
  }
}

// ─── Errors (internal — callers only ever see the fallback) ──────────────────

#[derive(Debug, Error)]
enum SummarizeError {
  #[error("no API key configured")]
  Unconfigured,

  #[error("HTTP client construction failed: {0}")]
  Client(String),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("response carried no choices")]
  EmptyResponse,
}

// ─── Summarizer ──────────────────────────────────────────────────────────────

/// Wraps the chat-completions call plus its fallback.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct Summarizer {
  config: SummarizerConfig,
  client: Option<reqwest::Client>,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
  content: String,
}

impl Summarizer {
  /// A client that cannot be built (broken TLS backend) leaves the
  /// summarizer permanently on the fallback path rather than failing
  /// construction.
  pub fn new(config: SummarizerConfig) -> Self {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .ok();
    Self { config, client }
  }

  /// Summarize `text`, falling back to truncation when the remote call is
  /// unconfigured or fails for any reason. Always returns something usable.
  pub async fn summarize(&self, text: &str) -> String {
    match self.request(text).await {
      Ok(summary) => summary,
      Err(reason) => {
        tracing::warn!(%reason, "summarizer unavailable, truncating instead");
        self.fallback(text)
      }
    }
  }

  async fn request(&self, text: &str) -> Result<String, SummarizeError> {
    let api_key = self
      .config
      .api_key
      .as_deref()
      .ok_or(SummarizeError::Unconfigured)?;
    let client = self
      .client
      .as_ref()
      .ok_or_else(|| SummarizeError::Client("no client".to_owned()))?;

    let url = format!(
      "{}/chat/completions",
      self.config.api_base.trim_end_matches('/')
    );
    let payload = json!({
      "model": self.config.model,
      "messages": [
        {
          "role": "system",
          "content": "You are an assistant summarizing journal entries \
                      into concise weekly insights.",
        },
        { "role": "user", "content": format!("Summarize these entries:\n{text}") },
      ],
    });

    let response = client
      .post(url)
      .bearer_auth(api_key)
      .json(&payload)
      .send()
      .await?
      .error_for_status()?;

    let body: ChatResponse = response.json().await?;
    let choice = body.choices.into_iter().next();
    match choice {
      Some(c) => Ok(c.message.content.trim().to_owned()),
      None => Err(SummarizeError::EmptyResponse),
    }
  }

  /// Truncate on a character boundary; an ellipsis marks the cut.
  fn fallback(&self, text: &str) -> String {
    let limit = self.config.fallback_chars;
    if text.chars().count() <= limit {
      return text.to_owned();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push('…');
    truncated
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn unconfigured() -> Summarizer {
    Summarizer::new(SummarizerConfig::default())
  }

  #[tokio::test]
  async fn unconfigured_summarizer_falls_back_to_the_raw_text() {
    let summary = unconfigured().summarize("short entry").await;
    assert_eq!(summary, "short entry");
  }

  #[tokio::test]
  async fn fallback_truncates_long_text() {
    let summarizer = Summarizer::new(SummarizerConfig {
      fallback_chars: 10,
      ..SummarizerConfig::default()
    });
    let summary = summarizer.summarize("a much longer journal entry").await;
    assert_eq!(summary, "a much lon…");
  }

  #[tokio::test]
  async fn unreachable_endpoint_still_returns_the_fallback() {
    let summarizer = Summarizer::new(SummarizerConfig {
      api_base: "http://127.0.0.1:9".to_owned(),
      api_key: Some("test-key".to_owned()),
      timeout_secs: 1,
      ..SummarizerConfig::default()
    });
    let summary = summarizer.summarize("entry text").await;
    assert_eq!(summary, "entry text");
  }
}
