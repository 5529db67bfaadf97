// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Response normalizer: [`VendorResponse`] → [`ResponseEnvelope`].

use tracing::debug;

use crate::{
    GroundingChunk, MapCitation, MapsSource, RawGroundingChunk, ResponseEnvelope, VendorResponse,
    WebCitation, WebSource,
};

/// Shown in place of an empty answer.
pub const FALLBACK_TEXT: &str = "I couldn't generate a text response.";

/// Turn a provider response into display data.
///
/// Missing pieces degrade to defaults: no text becomes [`FALLBACK_TEXT`], no
/// candidates or metadata become an empty citation list.
pub fn normalize(response: &VendorResponse) -> ResponseEnvelope {
    let text = match response.text.as_deref() {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => FALLBACK_TEXT.to_string(),
    };

    let Some(meta) = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
    else {
        return ResponseEnvelope { text, ..Default::default() };
    };

    let mut grounding_chunks = Vec::with_capacity(meta.grounding_chunks.len());
    let mut dropped = 0usize;
    for raw in &meta.grounding_chunks {
        let before = grounding_chunks.len();
        push_citations(raw, &mut grounding_chunks);
        if grounding_chunks.len() == before {
            dropped += 1;
        }
    }
    if dropped > 0 {
        debug!(dropped, "grounding chunks without web or maps descriptor skipped");
    }

    ResponseEnvelope {
        text,
        grounding_chunks,
        web_search_queries: meta.web_search_queries.clone(),
    }
}

/// A chunk carrying both descriptors contributes to both groups.
fn push_citations(raw: &RawGroundingChunk, out: &mut Vec<GroundingChunk>) {
    if let Some(web) = &raw.web {
        out.push(GroundingChunk::Web(web_citation(web)));
    }
    if let Some(maps) = &raw.maps {
        out.push(GroundingChunk::Map(map_citation(maps)));
    }
}

fn web_citation(src: &WebSource) -> WebCitation {
    WebCitation { uri: src.uri.clone(), title: src.title.clone() }
}

fn map_citation(src: &MapsSource) -> MapCitation {
    // Only the first snippet is surfaced; later ones are ignored even when
    // the first is blank.
    let review_snippet = src
        .place_answer_sources
        .as_ref()
        .and_then(|s| s.review_snippets.first())
        .and_then(|r| r.content.clone())
        .filter(|c| !c.is_empty());
    MapCitation { uri: src.uri.clone(), title: src.title.clone(), review_snippet }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(v: Value) -> VendorResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn empty_response_yields_fallback_and_no_citations() {
        let env = normalize(&parse(json!({})));
        assert_eq!(env.text, FALLBACK_TEXT);
        assert!(env.grounding_chunks.is_empty());
        assert!(env.web_search_queries.is_empty());
    }

    #[test]
    fn empty_text_uses_fallback() {
        let env = normalize(&VendorResponse::from_text(""));
        assert_eq!(env.text, FALLBACK_TEXT);
    }

    #[test]
    fn text_is_passed_through() {
        let env = normalize(&VendorResponse::from_text("  spaced  "));
        assert_eq!(env.text, "  spaced  ");
    }

    #[test]
    fn candidate_without_metadata_has_no_citations() {
        let env = normalize(&parse(json!({
            "text": "hi",
            "candidates": [{ "finishReason": "STOP" }]
        })));
        assert_eq!(env.text, "hi");
        assert!(env.grounding_chunks.is_empty());
    }

    #[test]
    fn web_and_map_chunks_are_grouped() {
        let env = normalize(&parse(json!({
            "text": "found it",
            "candidates": [{
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://a", "title": "A" } },
                        { "maps": {
                            "uri": "https://b",
                            "title": "B",
                            "placeAnswerSources": { "reviewSnippets": [{ "content": "nice" }] }
                        } }
                    ]
                }
            }]
        })));
        let web = env.web_citations();
        let maps = env.map_citations();
        assert_eq!(web.len(), 1);
        assert_eq!(maps.len(), 1);
        assert_eq!(web[0].uri.as_deref(), Some("https://a"));
        assert_eq!(web[0].title.as_deref(), Some("A"));
        assert_eq!(maps[0].uri.as_deref(), Some("https://b"));
        assert_eq!(maps[0].review_snippet.as_deref(), Some("nice"));
    }

    #[test]
    fn only_first_review_snippet_is_surfaced() {
        let env = normalize(&parse(json!({
            "candidates": [{
                "groundingMetadata": {
                    "groundingChunks": [{ "maps": {
                        "title": "Bakery",
                        "placeAnswerSources": { "reviewSnippets": [
                            { "content": "first" },
                            { "content": "second" }
                        ] }
                    } }]
                }
            }]
        })));
        assert_eq!(env.map_citations()[0].review_snippet.as_deref(), Some("first"));
    }

    #[test]
    fn blank_first_snippet_is_not_replaced_by_later_one() {
        let env = normalize(&parse(json!({
            "candidates": [{
                "groundingMetadata": {
                    "groundingChunks": [{ "maps": {
                        "placeAnswerSources": { "reviewSnippets": [{}, { "content": "later" }] }
                    } }]
                }
            }]
        })));
        assert!(env.map_citations()[0].review_snippet.is_none());
    }

    #[test]
    fn chunk_with_both_descriptors_lands_in_both_groups() {
        let env = normalize(&parse(json!({
            "candidates": [{
                "groundingMetadata": {
                    "groundingChunks": [{
                        "web": { "uri": "https://w" },
                        "maps": { "uri": "https://m" }
                    }]
                }
            }]
        })));
        assert_eq!(env.web_citations().len(), 1);
        assert_eq!(env.map_citations().len(), 1);
    }

    #[test]
    fn chunk_without_descriptor_is_skipped() {
        let env = normalize(&parse(json!({
            "candidates": [{
                "groundingMetadata": {
                    "groundingChunks": [{}, { "web": { "title": "kept" } }]
                }
            }]
        })));
        assert_eq!(env.grounding_chunks.len(), 1);
    }

    #[test]
    fn missing_citation_fields_stay_missing() {
        let env = normalize(&parse(json!({
            "candidates": [{
                "groundingMetadata": { "groundingChunks": [{ "web": {} }] }
            }]
        })));
        assert_eq!(
            env.grounding_chunks,
            vec![GroundingChunk::Web(WebCitation { uri: None, title: None })]
        );
    }

    #[test]
    fn only_first_candidate_is_consulted() {
        let env = normalize(&parse(json!({
            "candidates": [
                {},
                { "groundingMetadata": { "groundingChunks": [{ "web": { "uri": "https://x" } }] } }
            ]
        })));
        assert!(env.grounding_chunks.is_empty());
    }

    #[test]
    fn chunk_order_is_preserved() {
        let env = normalize(&parse(json!({
            "candidates": [{
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "title": "1" } },
                    { "maps": { "title": "2" } },
                    { "web": { "title": "3" } }
                ] }
            }]
        })));
        let titles: Vec<&str> = env
            .grounding_chunks
            .iter()
            .map(|c| match c {
                GroundingChunk::Web(w) => w.display_title(),
                GroundingChunk::Map(m) => m.display_title(),
            })
            .collect();
        assert_eq!(titles, vec!["1", "2", "3"]);
    }

    #[test]
    fn search_queries_pass_through() {
        let env = normalize(&parse(json!({
            "text": "t",
            "candidates": [{
                "groundingMetadata": {
                    "webSearchQueries": ["weather stockholm"]
                }
            }]
        })));
        assert_eq!(env.web_search_queries, vec!["weather stockholm"]);
    }
}
