// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SoundCloudError>;

#[derive(Debug, Error)]
pub enum SoundCloudError {
    #[error("could not reach SoundCloud: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("SoundCloud is throttling requests (HTTP 429)")]
    RateLimitExceeded,

    #[error("unexpected SoundCloud payload: {0}")]
    InvalidResponse(String),

    #[error("nothing on SoundCloud at {0}")]
    NotFound(String),

    #[error("SoundCloud answered {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("no SoundCloud client id configured and none found on the web player")]
    ClientIdUnavailable,

    #[error("malformed SoundCloud URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
