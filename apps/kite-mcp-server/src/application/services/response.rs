//! Tool response text.

use serde_json::Value;

use crate::application::error::DispatchError;
use crate::domain::command::CommandKind;

/// Outcome of a tool invocation: a single text block plus an error flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    /// Human-readable text.
    pub text: String,
    /// Whether the text describes a failure.
    pub is_error: bool,
}

impl ToolResponse {
    /// Successful response.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Failed response.
    #[must_use]
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Render a dispatch failure for `kind`.
    ///
    /// Gate and routing failures read as-is; everything else is prefixed
    /// with what the tool was doing.
    #[must_use]
    pub fn from_error(kind: CommandKind, err: &DispatchError) -> Self {
        match err {
            DispatchError::NotConfigured { .. } | DispatchError::UnknownCommand(_) => {
                Self::failure(err.to_string())
            }
            _ => Self::failure(format!("Error {}: {err}", kind.failure_context())),
        }
    }
}

/// Pretty-printed JSON.
pub(crate) fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// `heading:` followed by the value in a fenced JSON block.
pub(crate) fn json_block(heading: &str, value: &Value) -> String {
    format!("{heading}:\n```json\n{}\n```", pretty_json(value))
}

/// Whether a broker listing carries no entries.
pub(crate) fn is_empty_listing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
