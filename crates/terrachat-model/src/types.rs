// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

// ─── Conversation turns ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of the conversation history as the builder sees it.
///
/// Fields are private so a turn cannot be edited after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: Role,
    text: String,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Device coordinates.  Only ever constructed from a successful acquisition;
/// "unknown" is `Option::None`, never `(0.0, 0.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationData {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

// ─── Vendor request ───────────────────────────────────────────────────────────

/// A single entry of the request `contents` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self { role, parts: vec![Part { text: text.into() }] }
    }
}

impl From<&ConversationTurn> for Content {
    fn from(turn: &ConversationTurn) -> Self {
        Self::text(turn.role(), turn.text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub text: String,
}

/// Retrieval capability the provider may use while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GoogleSearch,
    GoogleMaps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    pub retrieval_config: RetrievalConfig,
}

/// Biases place and search retrieval towards a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    pub lat_lng: LocationData,
}

/// Provider-agnostic request produced by [`crate::build_request`].
#[derive(Debug, Clone, PartialEq)]
pub struct VendorRequest {
    /// Provider-native model id (e.g. "gemini-2.5-flash")
    pub model: String,
    /// Truncated history followed by the new user turn
    pub contents: Vec<Content>,
    pub system_instruction: String,
    /// Empty when the mode runs without retrieval tools
    pub tools: Vec<Tool>,
    pub tool_config: Option<ToolConfig>,
}

impl VendorRequest {
    /// Text of the last user entry in `contents`.
    pub fn last_user_text(&self) -> Option<&str> {
        self.contents
            .iter()
            .rev()
            .find(|c| c.role == Role::User)
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
