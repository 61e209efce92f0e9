use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::ChatError;
use crate::state::EMPTY_ANSWER;

/// Requests that take longer than this are reported as transport failures.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct AnswerRequest<'a> {
    question: &'a str,
}

/// Client for the question-answering endpoint.
#[derive(Clone, Debug)]
pub struct AnswerClient {
    client: Client,
    endpoint: String,
}

impl AnswerClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `{"question": ...}` and turn whatever comes back into an answer or a `ChatError`.
    pub async fn ask(&self, question: &str) -> Result<String, ChatError> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&AnswerRequest { question })
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        interpret_response(status, &body)
    }
}

/// Map a status code and raw body onto the answer text.
///
/// A body that is not JSON is an error whatever the status. See `text_field`
/// for which values count when picking between `answer`, `message` and `data.answer`.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<String, ChatError> {
    let data: Value =
        serde_json::from_slice(body).map_err(|_| ChatError::MalformedResponse { status })?;

    if !(200..300).contains(&status) {
        let message = text_field(&data, "error")
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        return Err(ChatError::Http { status, message });
    }

    let answer = text_field(&data, "answer")
        .or_else(|| text_field(&data, "message"))
        .or_else(|| data.get("data").and_then(|nested| text_field(nested, "answer")))
        .unwrap_or_else(|| EMPTY_ANSWER.to_string());

    Ok(answer)
}

/// A field rendered as display text. Non-empty strings, non-zero numbers and
/// `true` count; empty, zero, `false`, null, arrays and objects count as missing.
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
