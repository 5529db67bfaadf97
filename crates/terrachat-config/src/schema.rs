// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider identifier: "google" | "mock"
    pub provider: String,
    /// Environment variable that holds the API key (read at runtime)
    pub api_key_env: Option<String>,
    /// Explicit API key; prefer api_key_env in config files to avoid secrets
    /// in version-controlled files
    pub api_key: Option<String>,
    /// Base URL override.  Useful for local proxies and the wire-format tests.
    pub base_url: Option<String>,
    /// Timeout in seconds for a single generateContent call; 0 means none
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "google".into(),
            api_key_env: Some("GEMINI_API_KEY".into()),
            api_key: None,
            base_url: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Mode selected when the client starts.
    pub default_mode: Mode,
    /// Fixed coordinates used as the device location.
    ///
    /// ```toml
    /// [chat.location]
    /// latitude = 59.3293
    /// longitude = 18.0686
    /// ```
    ///
    /// Leave unset to run without a location; Explorer mode then still
    /// searches, only without a geographic bias.
    pub location: Option<LocationConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Conversation profile.  The per-mode model and tool settings live in the
/// profile table of `terrachat-model`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Maps and search grounding, biased towards the current location
    #[default]
    Explorer,
    /// Deep reasoning without retrieval tools
    Reasoning,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Explorer, Mode::Reasoning];
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Explorer => write!(f, "explorer"),
            Mode::Reasoning => write!(f, "reasoning"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explorer" => Ok(Mode::Explorer),
            "reasoning" => Ok(Mode::Reasoning),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
