// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Mode registry: static profile for every conversation mode.
//!
//! Single source of truth for which model a mode talks to and whether it gets
//! the location-aware retrieval tools.  Adding a mode means adding a
//! [`Mode`] variant and one entry here; the request builder only reads the
//! table.

use terrachat_config::Mode;

/// Metadata describing one conversation mode.
#[derive(Debug, Clone)]
pub struct ModeProfile {
    pub mode: Mode,
    /// Provider-native model id sent with every request in this mode.
    pub model: &'static str,
    /// Human-readable name (e.g. `"Deep Reasoning"`).
    pub label: &'static str,
    /// One-line description shown by `terrachat modes`.
    pub description: &'static str,
    /// Attach search / maps tools and the location bias.
    pub location_tools: bool,
}

pub static MODE_PROFILES: &[ModeProfile] = &[
    ModeProfile {
        mode: Mode::Explorer,
        model: "gemini-2.5-flash",
        label: "Explorer (Maps & Search)",
        description: "Best for finding places, local info, and real-time facts.",
        location_tools: true,
    },
    ModeProfile {
        mode: Mode::Reasoning,
        model: "gemini-3-pro-preview",
        label: "Deep Reasoning",
        description: "Best for complex questions, coding, and creative writing.",
        location_tools: false,
    },
];

/// Look up the profile for `mode`.
///
/// # Panics
/// When `mode` has no table entry.  That is a build-time omission, not a
/// runtime condition, and the `every_mode_has_a_profile` test guards it.
pub fn profile(mode: Mode) -> &'static ModeProfile {
    MODE_PROFILES
        .iter()
        .find(|p| p.mode == mode)
        .unwrap_or_else(|| panic!("no profile registered for mode {mode}"))
}

// ── Unit tests ────────────────────────────────────────────────────────────────
