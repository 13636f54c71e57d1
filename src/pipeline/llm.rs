//! Generation service call: POST the prompt, pull the completion text out.
//!
//! The service speaks the classic completions shape:
//!
//! ```text
//! POST <endpoint>
//! Authorization: Bearer <key>
//! {"model": "...", "prompt": "...", "max_tokens": 1200, "temperature": 0.7, "top_p": 0.9}
//!
//! 200 {"choices": [{"text": "..."}], ...}
//! ```
//!
//! Exactly one attempt is made. The outcome is always a value: either the
//! generated text or a [`GenerationError`] the caller must show to the user.

use crate::config::McqConfig;
use crate::error::GenerationError;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Returned in place of questions when the response carries no
/// `choices[0].text`.
pub const NO_OUTPUT_PLACEHOLDER: &str = "⚠️ No output received.";

/// Longest error body excerpt kept in a [`GenerationError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
}

/// Send `prompt` to the generation service and return the cleaned reply.
///
/// `api_key` is passed separately from `config` so callers decide how a
/// missing key is handled before any request is made.
pub async fn generate_mcqs(
    prompt: &str,
    api_key: &str,
    config: &McqConfig,
) -> Result<String, GenerationError> {
    let start = Instant::now();
    let body = CompletionRequest {
        model: &config.model,
        prompt,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        top_p: config.top_p,
    };

    debug!(
        "POST {} model={} prompt_chars={}",
        config.endpoint,
        config.model,
        prompt.chars().count()
    );

    let transport = |e: reqwest::Error| GenerationError::Transport {
        endpoint: config.endpoint.clone(),
        detail: e.to_string(),
    };

    let response = reqwest::Client::new()
        .post(&config.endpoint)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            warn!("Generation request failed: {}", e);
            transport(e)
        })?;

    let status = response.status();
    let text = response.text().await.map_err(transport)?;

    // Any JSON body is read for `choices[0].text`, whatever the status.
    let json: Value = match serde_json::from_str(&text) {
        Ok(json) => json,
        Err(e) if status.is_success() => {
            return Err(GenerationError::MalformedResponse {
                detail: e.to_string(),
            })
        }
        Err(_) => {
            warn!("Generation service answered HTTP {}", status.as_u16());
            return Err(GenerationError::Status {
                endpoint: config.endpoint.clone(),
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }
    };
    if !status.is_success() {
        warn!(
            "Generation service answered HTTP {} with a JSON body",
            status.as_u16()
        );
    }

    let reply = clean_reply(completion_text(&json));
    info!(
        "Generation finished: {} chars in {}ms",
        reply.chars().count(),
        start.elapsed().as_millis()
    );
    Ok(reply)
}

/// `choices[0].text`, or the fixed placeholder when it is missing.
fn completion_text(json: &Value) -> &str {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
        .unwrap_or(NO_OUTPUT_PLACEHOLDER)
}

/// Trim the reply and every line in it; blank separator lines stay blank.
fn clean_reply(raw: &str) -> String {
    raw.trim().lines().map(str::trim).collect::<Vec<_>>().join("\n")
}
