// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod conversation;
mod location;

pub use conversation::{
    ChatMessage, Conversation, PendingTurn, SendError, Ticket, TurnOutcome, ERROR_TEXT,
};
pub use location::{FixedLocation, LocationError, LocationSource, LocationStatus, UnavailableLocation};
