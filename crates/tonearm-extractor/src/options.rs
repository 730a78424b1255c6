// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::{Map, Value};
use tonearm_domain::{check_invalid_key, describe_value, PluginError, Result};

const OPTIONS_NAME: &str = "SoundCloudPluginOptions";
const ALLOWED_KEYS: [&str; 2] = ["clientId", "oauthToken"];

/// Credentials handed to the SoundCloud API client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundCloudPluginOptions {
    pub client_id: Option<String>,
    pub oauth_token: Option<String>,
}

impl SoundCloudPluginOptions {
    /// Validate a loosely typed option object.
    ///
    /// `null` is treated as "no options". Anything else must be an object whose
    /// keys are drawn from `clientId` / `oauthToken` and whose values are
    /// strings (or null).
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(PluginError::invalid_type(
                    "object",
                    describe_value(other),
                    OPTIONS_NAME,
                ))
            }
        };

        check_invalid_key(object, &ALLOWED_KEYS, OPTIONS_NAME)?;

        Ok(Self {
            client_id: string_field(object, "clientId")?,
            oauth_token: string_field(object, "oauthToken")?,
        })
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(PluginError::invalid_type(
            "string",
            describe_value(other),
            key,
        )),
    }
}
