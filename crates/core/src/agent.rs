//! Transformation functions for the Assistants-style agent API
//!
//! URL construction, run status classification and extraction of the
//! assistant reply from a message list. No HTTP happens here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::FoundryConfig;

/// Error type for responses that do not match the expected contract
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("{0} response is missing an id")]
    MissingId(&'static str),

    #[error("Assistant response missing Dockerfile text")]
    MissingText,
}

/// Endpoint URLs for one configured service.
///
/// Every URL carries the `api-version` query parameter.
#[derive(Debug, Clone, Copy)]
pub struct Endpoints<'a> {
    config: &'a FoundryConfig,
}

impl<'a> Endpoints<'a> {
    pub fn new(config: &'a FoundryConfig) -> Self {
        Self { config }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}?api-version={}",
            self.config.endpoint, path, self.config.api_version
        )
    }

    pub fn threads(&self) -> String {
        self.url("threads")
    }

    pub fn messages(&self, thread_id: &str) -> String {
        self.url(&format!("threads/{thread_id}/messages"))
    }

    /// Message listing, newest first. The first page of a long thread then
    /// still holds the latest reply.
    pub fn list_messages(&self, thread_id: &str) -> String {
        format!("{}&order=desc", self.messages(thread_id))
    }

    pub fn runs(&self, thread_id: &str) -> String {
        self.url(&format!("threads/{thread_id}/runs"))
    }

    pub fn run(&self, thread_id: &str, run_id: &str) -> String {
        self.url(&format!("threads/{thread_id}/runs/{run_id}"))
    }
}

/// Status of a run as reported by the service.
///
/// The vocabulary belongs to the service; only the terminal values are
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Failed,
    Cancelled,
    /// Any non-terminal status, kept verbatim (`queued`, `in_progress`, ...)
    Pending(String),
}

impl RunStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            "cancelled" => RunStatus::Cancelled,
            other => RunStatus::Pending(other.to_string()),
        }
    }

    /// Read the `status` field of a run object. A missing field is an empty
    /// pending status.
    pub fn from_run(run: &Value) -> Self {
        Self::parse(run.get("status").and_then(Value::as_str).unwrap_or_default())
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Pending(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Pending(status) => status,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the `id` of a created thread or run.
pub fn extract_id(response: &Value, what: &'static str) -> Result<String, ProtocolError> {
    response
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(ProtocolError::MissingId(what))
}

/// Run `last_error` payload, if the service reported one.
pub fn run_last_error(run: &Value) -> Option<&Value> {
    run.get("last_error").filter(|e| !e.is_null())
}

/// Message list response
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MessageList {
    #[serde(default)]
    pub data: Vec<ThreadMessage>,
}

/// A single message in a thread
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ThreadMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

/// A typed part of a message body
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ContentPart {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Either a plain string or an object with a `value` field
    #[serde(default)]
    pub text: Option<Value>,
}

impl ContentPart {
    /// Text carried by this part, unwrapping `{ "value": ... }` once.
    pub fn text_value(&self) -> Option<&str> {
        if self.kind != "text" {
            return None;
        }
        match self.text.as_ref()? {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("value").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Find the reply of the assistant in a message list.
///
/// The list is expected newest first, as returned by
/// [`Endpoints::list_messages`], and is scanned from the start. In each
/// assistant message only the first `text` part counts; when it is empty the
/// scan moves on to the next older assistant message.
pub fn extract_assistant_text(messages: &MessageList) -> Result<String, ProtocolError> {
    messages
        .data
        .iter()
        .filter(|m| m.role == "assistant")
        .filter_map(|m| m.content.iter().find(|p| p.kind == "text"))
        .filter_map(ContentPart::text_value)
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(ProtocolError::MissingText)
}
