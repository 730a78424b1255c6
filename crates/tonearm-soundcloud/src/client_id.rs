// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{Result, SoundCloudError};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace};
use url::Url;

lazy_static! {
    static ref SCRIPT_SRC_REGEX: Regex =
        Regex::new(r#"<script crossorigin src="(?P<src>[^"]+)""#).expect("valid script regex");
    static ref CLIENT_ID_REGEX: Regex =
        Regex::new(r#"client_id\s*:\s*"(?P<id>[0-9A-Za-z_-]{16,})""#).expect("valid client id regex");
}

/// Supplies the `client_id` query parameter every API v2 request needs.
///
/// A configured id is used as-is. Otherwise the id embedded in the public web
/// player bundles is scraped on first use and kept for the client's lifetime.
#[derive(Debug, Clone)]
pub(crate) struct ClientIdSource {
    configured: Option<String>,
    web_url: String,
    discovered: Arc<RwLock<Option<String>>>,
}

impl ClientIdSource {
    pub(crate) fn new(configured: Option<String>, web_url: String) -> Self {
        Self {
            configured,
            web_url,
            discovered: Arc::new(RwLock::new(None)),
        }
    }

    pub(crate) async fn get(&self, http: &Client) -> Result<String> {
        if let Some(id) = &self.configured {
            return Ok(id.clone());
        }

        if let Some(id) = self.discovered.read().await.as_ref() {
            return Ok(id.clone());
        }

        let mut slot = self.discovered.write().await;
        if let Some(id) = slot.as_ref() {
            return Ok(id.clone());
        }

        let id = self.discover(http).await?;
        debug!(target: "soundcloud", "discovered client id from web player");
        *slot = Some(id.clone());
        Ok(id)
    }

    async fn discover(&self, http: &Client) -> Result<String> {
        let base = Url::parse(&self.web_url)?;
        trace!(target: "soundcloud", "GET {}", base);
        let page = http.get(base.clone()).send().await?.text().await?;

        // The id lives in one of the later bundles, so scan from the end.
        let scripts: Vec<Url> = SCRIPT_SRC_REGEX
            .captures_iter(&page)
            .filter_map(|captures| captures.name("src"))
            .filter_map(|src| base.join(src.as_str()).ok())
            .collect();

        for script in scripts.iter().rev() {
            trace!(target: "soundcloud", "GET {}", script);
            let response = http.get(script.clone()).send().await?;
            if !response.status().is_success() {
                continue;
            }
            let body = response.text().await?;
            if let Some(id) = extract_client_id(&body) {
                return Ok(id);
            }
        }

        Err(SoundCloudError::ClientIdUnavailable)
    }
}

fn extract_client_id(script: &str) -> Option<String> {
    CLIENT_ID_REGEX
        .captures(script)
        .and_then(|captures| captures.name("id").map(|m| m.as_str().to_string()))
}
