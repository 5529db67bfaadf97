// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod error;
mod google;
mod grounding;
mod mock;
pub mod modes;
mod normalize;
mod provider;
mod request;
mod types;

pub use error::ProviderError;
pub use google::GoogleProvider;
pub use grounding::*;
pub use mock::{MockProvider, ScriptedMockProvider};
pub use modes::{ModeProfile, MODE_PROFILES};
pub use normalize::{normalize, FALLBACK_TEXT};
pub use provider::ModelProvider;
pub use request::{build_request, HISTORY_WINDOW, LOCATION_TOOLS, SYSTEM_INSTRUCTION};
pub use terrachat_config::Mode;
pub use types::*;

use std::time::Duration;

use anyhow::bail;
use terrachat_config::ModelConfig;
use tracing::error;

/// Construct a boxed [`ModelProvider`] from configuration.
///
/// Provider selection:
/// - `"google"` → [`GoogleProvider`]
/// - `"mock"` → [`MockProvider`] (echo-back)
///
/// A missing Google API key is logged, not returned: the client still starts
/// and every call fails later with [`ProviderError::MissingApiKey`].
pub fn from_config(cfg: &ModelConfig) -> anyhow::Result<Box<dyn ModelProvider>> {
    match cfg.provider.as_str() {
        "google" => {
            let key = resolve_api_key(cfg);
            if key.is_none() {
                error!(
                    env = cfg.api_key_env.as_deref().unwrap_or("-"),
                    "no Gemini API key configured; requests will fail"
                );
            }
            // 0 disables the request timeout
            let timeout = (cfg.timeout_secs > 0).then(|| Duration::from_secs(cfg.timeout_secs));
            Ok(Box::new(GoogleProvider::new(key, cfg.base_url.clone(), timeout)?))
        }
        "mock" => Ok(Box::new(MockProvider)),
        other => bail!("unknown model provider: {other}"),
    }
}

fn resolve_api_key(cfg: &ModelConfig) -> Option<String> {
    if let Some(k) = cfg.api_key.as_ref().filter(|k| !k.is_empty()) {
        return Some(k.clone());
    }
    cfg.api_key_env
        .as_deref()
        .and_then(|env| std::env::var(env).ok())
        .filter(|k| !k.is_empty())
}
