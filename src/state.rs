// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! Shared application state: the store and chain handles are injected
//! here once at startup and passed to handlers by axum, never reached
//! for as ambient globals.

use std::sync::Arc;

use crate::chain::ChainClient;
use crate::storage::ProfileStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub chain: Arc<dyn ChainClient>,
    pub allowed_origins: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        chain: Arc<dyn ChainClient>,
        allowed_origins: Vec<String>,
    ) -> Self {
        Self {
            store,
            chain,
            allowed_origins: Arc::new(allowed_origins),
        }
    }
}
