// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use terrachat_config::Mode;
use terrachat_model::{
    build_request, normalize, ConversationTurn, GroundingChunk, ModelProvider, ProviderError,
    Role, VendorRequest, VendorResponse,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{LocationSource, LocationStatus};

/// Shown in place of an answer when the provider call fails.  Provider error
/// details go to the log, never to the conversation.
pub const ERROR_TEXT: &str =
    "I'm sorry, something went wrong while processing your request. Please try again.";

/// One displayed message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding: Vec<GroundingChunk>,
    /// Queries the provider ran for search grounding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_search_queries: Vec<String>,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            role,
            text: text.into(),
            is_error: false,
            grounding: Vec::new(),
            web_search_queries: Vec::new(),
        }
    }

    pub fn turn(&self) -> ConversationTurn {
        ConversationTurn::new(self.role, self.text.clone())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a request is already in flight")]
    Busy,
}

/// Proof that a turn was started.  Consumed by [`Conversation::complete`], so
/// a turn can be completed at most once.
#[derive(Debug)]
pub struct Ticket {
    epoch: u64,
}

/// A started turn: the request to hand to the provider plus its ticket.
#[derive(Debug)]
pub struct PendingTurn {
    pub request: VendorRequest,
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// An assistant message was appended.
    Answered,
    /// An error-flagged message was appended.
    Failed,
    /// The conversation was reset while the request was in flight; nothing
    /// was appended.
    Discarded,
}

/// Conversation state owned by the front-end.
///
/// Lifecycle per turn: idle → sending → answered | failed.  While sending,
/// further turns are refused with [`SendError::Busy`].
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    mode: Mode,
    location: LocationStatus,
    busy: bool,
    epoch: u64,
}

impl Conversation {
    pub fn new(mode: Mode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            info!(from = %self.mode, to = %mode, "mode changed");
            self.mode = mode;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn location(&self) -> LocationStatus {
        self.location
    }

    /// Turns sent as context.  Error-flagged messages are left out.
    pub fn history(&self) -> Vec<ConversationTurn> {
        self.messages
            .iter()
            .filter(|m| !m.is_error)
            .map(ChatMessage::turn)
            .collect()
    }

    /// Drop all messages.  A request still in flight is ignored when it
    /// completes.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.busy = false;
        self.epoch += 1;
        debug!(epoch = self.epoch, "conversation reset");
    }

    /// Start a turn: record the user message and build the request.
    pub fn begin(&mut self, text: &str) -> Result<PendingTurn, SendError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyMessage);
        }
        if self.busy {
            return Err(SendError::Busy);
        }

        let history = self.history();
        let request = build_request(&history, text, self.mode, self.location.coordinates());

        self.messages.push(ChatMessage::new(Role::User, text));
        self.busy = true;

        Ok(PendingTurn { request, ticket: Ticket { epoch: self.epoch } })
    }

    /// Finish a turn with the provider's result.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<VendorResponse, ProviderError>,
    ) -> TurnOutcome {
        if ticket.epoch != self.epoch {
            debug!("late result for a reset conversation dropped");
            return TurnOutcome::Discarded;
        }
        self.busy = false;

        match result {
            Ok(resp) => {
                let env = normalize(&resp);
                let mut msg = ChatMessage::new(Role::Assistant, env.text);
                msg.grounding = env.grounding_chunks;
                msg.web_search_queries = env.web_search_queries;
                self.messages.push(msg);
                TurnOutcome::Answered
            }
            Err(e) => {
                warn!(error = %e, "provider call failed");
                let mut msg = ChatMessage::new(Role::Assistant, ERROR_TEXT);
                msg.is_error = true;
                self.messages.push(msg);
                TurnOutcome::Failed
            }
        }
    }

    /// [`begin`](Self::begin), call `provider`, then [`complete`](Self::complete).
    pub async fn send(
        &mut self,
        provider: &dyn ModelProvider,
        text: &str,
    ) -> Result<TurnOutcome, SendError> {
        let PendingTurn { request, ticket } = self.begin(text)?;
        debug!(provider = provider.name(), model = %request.model, "dispatching turn");
        let result = provider.generate(request).await;
        Ok(self.complete(ticket, result))
    }

    /// Acquire the device location once.  Failure leaves the conversation
    /// without a location; it is never reported as a chat error.
    pub async fn request_location(&mut self, source: &dyn LocationSource) -> LocationStatus {
        self.location = LocationStatus::Requesting;
        self.location = match source.acquire().await {
            Ok(loc) => {
                debug!(latitude = loc.latitude, longitude = loc.longitude, "location acquired");
                LocationStatus::Active(loc)
            }
            Err(e) => {
                warn!(error = %e, "location unavailable");
                LocationStatus::Denied
            }
        };
        self.location
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedLocation, UnavailableLocation};
    use serde_json::json;
    use terrachat_model::{LocationData, ScriptedMockProvider, Tool, HISTORY_WINDOW};

    fn grounded_response() -> VendorResponse {
        serde_json::from_value(json!({
            "text": "Here you go",
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
        }))
        .unwrap()
    }

    // ── Happy path ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn successful_turn_appends_user_and_assistant() {
        let provider = ScriptedMockProvider::new(vec![Ok(grounded_response())]);
        let mut conv = Conversation::new(Mode::Explorer);

        let outcome = conv.send(&provider, "  where to eat?  ").await.unwrap();

        assert_eq!(outcome, TurnOutcome::Answered);
        assert!(!conv.is_busy());
        let msgs = conv.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[0].text, "where to eat?");
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].text, "Here you go");
        assert!(!msgs[1].is_error);
        assert_eq!(msgs[1].grounding.len(), 2);
        assert_ne!(msgs[0].id, msgs[1].id);
    }

    #[test]
    fn search_queries_are_kept_on_the_answer() {
        let resp: VendorResponse = serde_json::from_value(json!({
            "text": "Sunny",
            "candidates": [{
                "groundingMetadata": { "webSearchQueries": ["weather stockholm"] }
            }]
        }))
        .unwrap();
        let mut conv = Conversation::new(Mode::Explorer);
        let pending = conv.begin("weather?").unwrap();
        conv.complete(pending.ticket, Ok(resp));

        let answer = &conv.messages()[1];
        assert_eq!(answer.web_search_queries, vec!["weather stockholm"]);
        let stored = serde_json::to_value(answer).unwrap();
        assert_eq!(stored["web_search_queries"], json!(["weather stockholm"]));
        assert!(conv.messages()[0].web_search_queries.is_empty());
    }

    #[tokio::test]
    async fn empty_provider_answer_uses_fallback_text() {
        let provider = ScriptedMockProvider::new(vec![Ok(VendorResponse::default())]);
        let mut conv = Conversation::new(Mode::Reasoning);
        conv.send(&provider, "hello").await.unwrap();
        assert_eq!(conv.messages()[1].text, terrachat_model::FALLBACK_TEXT);
        assert!(conv.messages()[1].grounding.is_empty());
    }

    // ── Failure path ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn provider_failure_appends_one_error_turn() {
        let provider = ScriptedMockProvider::failing(ProviderError::Status {
            status: 429,
            message: "quota exceeded".into(),
        });
        let mut conv = Conversation::new(Mode::Explorer);

        let outcome = conv.send(&provider, "hello").await.unwrap();

        assert_eq!(outcome, TurnOutcome::Failed);
        assert_eq!(provider.call_count(), 1, "no automatic retry");
        let msgs = conv.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].text, "hello");
        assert!(!msgs[0].is_error);
        assert!(msgs[1].is_error);
        assert_eq!(msgs[1].text, ERROR_TEXT);
        assert!(!msgs[1].text.contains("quota"));
        assert!(!conv.is_busy());
    }

    #[tokio::test]
    async fn error_turns_are_not_sent_as_history() {
        let provider = ScriptedMockProvider::new(vec![
            Err(ProviderError::Http("offline".into())),
            Ok(VendorResponse::from_text("back")),
        ]);
        let mut conv = Conversation::new(Mode::Reasoning);
        conv.send(&provider, "first").await.unwrap();
        conv.send(&provider, "second").await.unwrap();

        let req = provider.last_request().unwrap();
        let texts: Vec<&str> = req.contents.iter().map(|c| c.parts[0].text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    // ── Busy flag / validation ────────────────────────────────────────────────

    #[test]
    fn second_begin_while_sending_is_refused() {
        let mut conv = Conversation::new(Mode::Explorer);
        let _pending = conv.begin("one").unwrap();
        assert!(conv.is_busy());
        assert_eq!(conv.begin("two").unwrap_err(), SendError::Busy);
        assert_eq!(conv.messages().len(), 1);
    }

    #[test]
    fn blank_message_is_refused() {
        let mut conv = Conversation::new(Mode::Explorer);
        assert_eq!(conv.begin("   \n").unwrap_err(), SendError::EmptyMessage);
        assert!(conv.messages().is_empty());
        assert!(!conv.is_busy());
    }

    #[test]
    fn request_excludes_the_new_user_message_from_history() {
        let mut conv = Conversation::new(Mode::Reasoning);
        let pending = conv.begin("only").unwrap();
        assert_eq!(pending.request.contents.len(), 1);
        assert_eq!(pending.request.last_user_text(), Some("only"));
    }

    #[test]
    fn long_conversation_is_windowed() {
        let mut conv = Conversation::new(Mode::Reasoning);
        for i in 0..8 {
            let p = conv.begin(&format!("q{i}")).unwrap();
            conv.complete(p.ticket, Ok(VendorResponse::from_text(format!("a{i}"))));
        }
        let pending = conv.begin("last").unwrap();
        assert_eq!(pending.request.contents.len(), HISTORY_WINDOW + 1);
        assert_eq!(pending.request.contents[0].parts[0].text, "q3");
    }

    // ── Reset ─────────────────────────────────────────────────────────────────

    #[test]
    fn late_result_after_reset_is_discarded() {
        let mut conv = Conversation::new(Mode::Explorer);
        let pending = conv.begin("hello").unwrap();
        conv.reset();
        assert!(!conv.is_busy());

        let outcome = conv.complete(pending.ticket, Ok(VendorResponse::from_text("late")));
        assert_eq!(outcome, TurnOutcome::Discarded);
        assert!(conv.messages().is_empty());
    }

    #[test]
    fn stale_ticket_does_not_complete_the_turn_started_after_reset() {
        let mut conv = Conversation::new(Mode::Explorer);
        let old = conv.begin("first question").unwrap();
        conv.reset();
        let fresh = conv.begin("second question").unwrap();

        let outcome = conv.complete(old.ticket, Ok(VendorResponse::from_text("stale")));
        assert_eq!(outcome, TurnOutcome::Discarded);
        assert!(conv.is_busy(), "turn after reset still in flight");
        assert_eq!(conv.messages().len(), 1);

        let outcome = conv.complete(fresh.ticket, Ok(VendorResponse::from_text("fresh")));
        assert_eq!(outcome, TurnOutcome::Answered);
        assert!(!conv.is_busy());
        let texts: Vec<&str> = conv.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["second question", "fresh"]);
    }

    #[test]
    fn reset_allows_a_new_turn() {
        let mut conv = Conversation::new(Mode::Explorer);
        let _old = conv.begin("hello").unwrap();
        conv.reset();
        let fresh = conv.begin("again").unwrap();
        assert_eq!(fresh.request.contents.len(), 1);
        let outcome = conv.complete(fresh.ticket, Ok(VendorResponse::from_text("ok")));
        assert_eq!(outcome, TurnOutcome::Answered);
    }

    // ── Mode and location ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn acquired_location_biases_explorer_requests() {
        let mut conv = Conversation::new(Mode::Explorer);
        let status = conv
            .request_location(&FixedLocation::new(40.0, -3.7).unwrap())
            .await;
        assert_eq!(status, LocationStatus::Active(LocationData::new(40.0, -3.7)));

        let pending = conv.begin("tapas?").unwrap();
        let cfg = pending.request.tool_config.expect("geo bias");
        assert_eq!(cfg.retrieval_config.lat_lng, LocationData::new(40.0, -3.7));
    }

    #[tokio::test]
    async fn denied_location_is_not_a_chat_error() {
        let mut conv = Conversation::new(Mode::Explorer);
        let status = conv.request_location(&UnavailableLocation).await;
        assert_eq!(status, LocationStatus::Denied);
        assert!(conv.messages().is_empty());

        let pending = conv.begin("anything near me?").unwrap();
        assert_eq!(pending.request.tools, vec![Tool::GoogleSearch, Tool::GoogleMaps]);
        assert!(pending.request.tool_config.is_none());
    }

    #[test]
    fn switching_mode_changes_the_model() {
        let mut conv = Conversation::new(Mode::Explorer);
        conv.set_mode(Mode::Reasoning);
        assert_eq!(conv.mode(), Mode::Reasoning);
        let pending = conv.begin("think hard").unwrap();
        assert_eq!(pending.request.model, "gemini-3-pro-preview");
        assert!(pending.request.tools.is_empty());
    }
}
