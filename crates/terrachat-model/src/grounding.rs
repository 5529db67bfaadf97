// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Vendor response shape and the normalized, display-ready citation model.
//!
//! The `Vendor*` / `Raw*` types mirror what a provider hands back: every field
//! is optional and defaults when absent, so an empty object deserializes
//! cleanly.  [`ResponseEnvelope`] is what the conversation stores and renders.

use serde::{Deserialize, Serialize};

// ─── Vendor response (input of the normalizer) ───────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorResponse {
    /// Concatenated answer text, if the provider produced any
    pub text: Option<String>,
    pub candidates: Vec<Candidate>,
}

impl VendorResponse {
    /// Response carrying only answer text and no candidates.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), candidates: vec![] }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub grounding_metadata: Option<GroundingMetadata>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingMetadata {
    pub grounding_chunks: Vec<RawGroundingChunk>,
    pub web_search_queries: Vec<String>,
}

/// One chunk as sent by the provider.  Normally exactly one of `web` / `maps`
/// is set, but nothing in the wire format enforces that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGroundingChunk {
    pub web: Option<WebSource>,
    pub maps: Option<MapsSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapsSource {
    pub uri: Option<String>,
    pub title: Option<String>,
    pub place_answer_sources: Option<PlaceAnswerSources>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceAnswerSources {
    pub review_snippets: Vec<ReviewSnippet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSnippet {
    pub content: Option<String>,
}

// ─── Normalized model (output of the normalizer) ─────────────────────────────

/// A citation attached to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroundingChunk {
    Web(WebCitation),
    Map(MapCitation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebCitation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl WebCitation {
    /// Title to show, with a generic label when the provider sent none.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Web Source")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCitation {
    pub uri: Option<String>,
    pub title: Option<String>,
    /// Text of the first review snippet, if any.
    pub review_snippet: Option<String>,
}

impl MapCitation {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Unknown Location")
    }
}

/// Display model of one assistant answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Never empty.
    pub text: String,
    pub grounding_chunks: Vec<GroundingChunk>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_search_queries: Vec<String>,
}

impl ResponseEnvelope {
    pub fn web_citations(&self) -> Vec<&WebCitation> {
        self.grounding_chunks
            .iter()
            .filter_map(|c| match c {
                GroundingChunk::Web(w) => Some(w),
                GroundingChunk::Map(_) => None,
            })
            .collect()
    }

    pub fn map_citations(&self) -> Vec<&MapCitation> {
        self.grounding_chunks
            .iter()
            .filter_map(|c| match c {
                GroundingChunk::Map(m) => Some(m),
                GroundingChunk::Web(_) => None,
            })
            .collect()
    }

    pub fn has_citations(&self) -> bool {
        !self.grounding_chunks.is_empty()
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
