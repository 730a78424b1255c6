// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PluginError>;

/// Errors surfaced by the host to callers of an extractor plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Expected {expected} for '{name}', but got {got}")]
    InvalidType {
        expected: String,
        got: String,
        name: String,
    },

    #[error("'{key}' does not need to be provided in {target}")]
    InvalidKey { key: String, target: String },

    /// A coded failure raised by a plugin (e.g. `SOUNDCLOUD_PLUGIN_NO_RESULT`).
    #[error("{message}")]
    Extractor { code: String, message: String },

    /// A failure from the plugin's underlying API library, passed through as-is.
    #[error(transparent)]
    Upstream(Box<dyn std::error::Error + Send + Sync>),
}

impl PluginError {
    pub fn invalid_type(
        expected: impl Into<String>,
        got: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            expected: expected.into(),
            got: got.into(),
            name: name.into(),
        }
    }

    pub fn extractor(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extractor {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn upstream<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream(Box::new(err))
    }

    /// Stable error code, usable for matching without inspecting messages.
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidType { .. } => "INVALID_TYPE",
            Self::InvalidKey { .. } => "INVALID_KEY",
            Self::Extractor { code, .. } => code,
            Self::Upstream(_) => "UPSTREAM",
        }
    }

    /// True when the error came from the API library rather than the host or plugin.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Short human description of a JSON value, used in `InvalidType` messages.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("{} (boolean)", b),
        Value::Number(n) => format!("{} (number)", n),
        Value::String(s) => format!("\"{}\" (string)", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
