// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Request builder: (history, new text, mode, location) → [`VendorRequest`].

use terrachat_config::Mode;
use tracing::trace;

use crate::{
    modes, Content, ConversationTurn, LocationData, RetrievalConfig, Role, Tool, ToolConfig,
    VendorRequest,
};

/// Number of prior turns sent with each request.  Older turns are dropped.
pub const HISTORY_WINDOW: usize = 10;

/// Tools attached in modes whose profile enables location tools.
pub const LOCATION_TOOLS: [Tool; 2] = [Tool::GoogleSearch, Tool::GoogleMaps];

/// Static system instruction attached to every request.
pub const SYSTEM_INSTRUCTION: &str = "\
You are TerraChat, a helpful AI assistant.
When in EXPLORER mode, you specialize in providing location-based information and up-to-date search results.
When in REASONING mode, you provide deep, thoughtful, and complex answers.
Always be polite, concise, and helpful.";

/// Build the provider request for one user turn.
///
/// `history` is read, never retained.  Only the last [`HISTORY_WINDOW`] turns
/// are included, in their original order, followed by `new_text` as a user
/// turn.
pub fn build_request(
    history: &[ConversationTurn],
    new_text: &str,
    mode: Mode,
    location: Option<LocationData>,
) -> VendorRequest {
    let profile = modes::profile(mode);

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut contents: Vec<Content> = history[start..].iter().map(Content::from).collect();
    contents.push(Content::text(Role::User, new_text));

    let (tools, tool_config) = if profile.location_tools {
        let tool_config = location.map(|lat_lng| ToolConfig {
            retrieval_config: RetrievalConfig { lat_lng },
        });
        (LOCATION_TOOLS.to_vec(), tool_config)
    } else {
        (Vec::new(), None)
    };

    trace!(
        %mode,
        model = profile.model,
        dropped = start,
        turns = contents.len(),
        geo_bias = tool_config.is_some(),
        "built request"
    );

    VendorRequest {
        model: profile.model.to_string(),
        contents,
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        tools,
        tool_config,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
