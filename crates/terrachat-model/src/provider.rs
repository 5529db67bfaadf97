// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;

use crate::{ProviderError, VendorRequest, VendorResponse};

#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name for logs and status display.
    fn name(&self) -> &str;

    /// Send one request and wait for the complete answer.
    ///
    /// There is no partial delivery: the call resolves once with the whole
    /// response or with an error.
    async fn generate(&self, req: VendorRequest) -> Result<VendorResponse, ProviderError>;
}
