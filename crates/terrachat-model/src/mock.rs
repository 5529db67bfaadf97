// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::{ProviderError, VendorRequest, VendorResponse};

/// Deterministic mock provider.  Echoes the last user message back as the
/// answer, without citations.
#[derive(Default)]
pub struct MockProvider;

#[async_trait]
impl crate::ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, req: VendorRequest) -> Result<VendorResponse, ProviderError> {
        let reply = req.last_user_text().unwrap_or("[no input]");
        Ok(VendorResponse::from_text(format!("MOCK: {reply}")))
    }
}

/// A pre-scripted mock provider.  Each call to `generate` pops the next
/// scripted outcome from the front of the queue, so tests can specify exact
/// responses and failures without network access.
pub struct ScriptedMockProvider {
    scripts: Mutex<VecDeque<Result<VendorResponse, ProviderError>>>,
    /// The last `VendorRequest` seen by this provider.
    pub last_request: Arc<Mutex<Option<VendorRequest>>>,
    /// Number of `generate` calls so far.
    pub calls: Arc<Mutex<usize>>,
}

impl ScriptedMockProvider {
    pub fn new(scripts: Vec<Result<VendorResponse, ProviderError>>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            last_request: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Convenience: provider that returns a single text reply.
    pub fn always_text(reply: impl Into<String>) -> Self {
        Self::new(vec![Ok(VendorResponse::from_text(reply))])
    }

    /// Convenience: provider whose single call fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn last_request(&self) -> Option<VendorRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl crate::ModelProvider for ScriptedMockProvider {
    fn name(&self) -> &str {
        "scripted-mock"
    }

    async fn generate(&self, req: VendorRequest) -> Result<VendorResponse, ProviderError> {
        *self.last_request.lock().unwrap_or_else(PoisonError::into_inner) = Some(req);
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(VendorResponse::from_text("[no more scripts]")))
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
