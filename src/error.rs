//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DashScope API error: {0}")]
    Api(String),

    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    #[error("image generation failed: {0}")]
    Generation(String),

    #[error("unknown image format: {0}")]
    UnknownFormat(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
