// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt::Write as _;
use std::io::Write;

use terrachat_core::ChatMessage;
use terrachat_model::{GroundingChunk, MapCitation, WebCitation, MODE_PROFILES};

/// Format an assistant message: answer text, then map places, then web sources.
pub fn render_message(msg: &ChatMessage) -> String {
    let mut out = String::new();
    if msg.is_error {
        let _ = writeln!(out, "Error: {}", msg.text);
        return out;
    }
    let _ = writeln!(out, "{}", msg.text.trim_end());

    let mut maps: Vec<&MapCitation> = Vec::new();
    let mut web: Vec<&WebCitation> = Vec::new();
    for chunk in &msg.grounding {
        match chunk {
            GroundingChunk::Map(m) => maps.push(m),
            GroundingChunk::Web(w) => web.push(w),
        }
    }

    if !maps.is_empty() {
        let _ = writeln!(out, "\nMap Locations");
        for m in maps {
            let _ = writeln!(out, "  • {}{}", m.display_title(), link_suffix(m.uri.as_deref()));
            if let Some(snippet) = &m.review_snippet {
                let _ = writeln!(out, "    \"{snippet}\"");
            }
        }
    }
    if !web.is_empty() {
        let _ = writeln!(out, "\nSources");
        for w in web {
            let _ = writeln!(out, "  • {}{}", w.display_title(), link_suffix(w.uri.as_deref()));
        }
    }
    if !msg.web_search_queries.is_empty() {
        let _ = writeln!(out, "\nSearched: {}", msg.web_search_queries.join(", "));
    }
    out
}

fn link_suffix(uri: Option<&str>) -> String {
    uri.map(|u| format!(" <{u}>")).unwrap_or_default()
}

/// Plain-text table of the mode registry.
pub fn render_modes() -> String {
    let id_w = MODE_PROFILES.iter().map(|p| p.mode.to_string().len()).max().unwrap_or(4).max(4);
    let model_w = MODE_PROFILES.iter().map(|p| p.model.len()).max().unwrap_or(5).max(5);
    let mut out = String::new();
    let _ = writeln!(out, "{:<id_w$}  {:<model_w$}  TOOLS  DESCRIPTION", "MODE", "MODEL");
    for p in MODE_PROFILES {
        let tools = if p.location_tools { "yes" } else { "no" };
        let _ = writeln!(
            out,
            "{:<id_w$}  {:<model_w$}  {:<5}  {}: {}",
            p.mode.to_string(),
            p.model,
            tools,
            p.label,
            p.description
        );
    }
    out
}

/// Write to stdout and flush, so output interleaves with the prompt.
pub fn write_stdout(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Write a diagnostic / status message to stderr.
pub fn write_stderr(msg: &str) {
    eprintln!("{msg}");
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
