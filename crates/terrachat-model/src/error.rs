// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use thiserror::Error;

/// Failure of a single provider call.  Callers treat every variant the same
/// way; the variants exist for logging.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("transport error: {0}")]
    Http(String),

    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Http(e.to_string())
    }
}
