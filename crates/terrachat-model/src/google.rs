// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Google Gemini driver for the native Generative Language API.
//!
//! Uses the one-shot `generateContent` endpoint.  Search and Maps grounding
//! are requested through the `tools` / `toolConfig` body fields.
//!
//! # Auth
//! API key via `x-goog-api-key` header.
//!
//! # Endpoint pattern
//! `POST https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent`

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    Candidate, GroundingMetadata, ProviderError, Role, Tool, VendorRequest, VendorResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            client,
        })
    }
}

#[async_trait]
impl crate::ModelProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn generate(&self, req: VendorRequest) -> Result<VendorResponse, ProviderError> {
        let key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            req.model
        );
        let body = request_body(&req);

        debug!(
            model = %req.model,
            turns = req.contents.len(),
            tools = req.tools.len(),
            "sending Google Gemini request"
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }

        let raw: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(raw.into_vendor_response())
    }
}

/// Serialize a [`VendorRequest`] into the `generateContent` JSON body.
fn request_body(req: &VendorRequest) -> Value {
    let contents: Vec<Value> = req
        .contents
        .iter()
        .map(|c| {
            let parts: Vec<Value> = c.parts.iter().map(|p| json!({ "text": p.text })).collect();
            json!({ "role": wire_role(c.role), "parts": parts })
        })
        .collect();

    let mut body = json!({
        "contents": contents,
        "systemInstruction": { "parts": [{ "text": req.system_instruction }] },
    });
    if !req.tools.is_empty() {
        body["tools"] = req.tools.iter().map(|t| wire_tool(*t)).collect();
    }
    if let Some(cfg) = &req.tool_config {
        let ll = cfg.retrieval_config.lat_lng;
        body["toolConfig"] = json!({
            "retrievalConfig": {
                "latLng": { "latitude": ll.latitude, "longitude": ll.longitude }
            }
        });
    }
    body
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

fn wire_tool(tool: Tool) -> Value {
    match tool {
        Tool::GoogleSearch => json!({ "googleSearch": {} }),
        Tool::GoogleMaps => json!({ "googleMaps": {} }),
    }
}

/// Pull `error.message` out of a Google error body; fall back to the raw text.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}

// ─── Wire response ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GenerateContentResponse {
    candidates: Vec<WireCandidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireCandidate {
    content: Option<WireContent>,
    grounding_metadata: Option<GroundingMetadata>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireContent {
    parts: Vec<WirePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePart {
    text: Option<String>,
    thought: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Answer text is the first candidate's non-thought text parts, joined.
    fn into_vendor_response(self) -> VendorResponse {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            debug!(%reason, "prompt blocked by provider");
        }

        let text = self.candidates.first().and_then(|c| {
            let parts: Vec<&str> = c
                .content
                .as_ref()?
                .parts
                .iter()
                .filter(|p| p.thought != Some(true))
                .filter_map(|p| p.text.as_deref())
                .collect();
            (!parts.is_empty()).then(|| parts.concat())
        });

        let candidates = self
            .candidates
            .into_iter()
            .map(|c| Candidate {
                grounding_metadata: c.grounding_metadata,
                finish_reason: c.finish_reason,
            })
            .collect();

        VendorResponse { text, candidates }
    }
}
