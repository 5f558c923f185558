// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! Mint simulation endpoint.
//!
//! Execution is not served over HTTP: signing belongs to the connected
//! wallet, so only the read-only cost quote lives here.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    chain::{self, SimulateOutcome},
    error::ApiError,
    state::AppState,
    storage::StoreError,
};

use super::check_origin;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SimulateRequest {
    pub wallet_address: String,
}

/// Quote the cost of minting for a wallet's profile.
///
/// Insufficient balance, RPC trouble and an ineligible profile all come
/// back as 200 with `ok = false` and a reason; the quote never mutates
/// state.
#[utoipa::path(
    post,
    path = "/api/mint/simulate",
    request_body = SimulateRequest,
    tag = "Mint",
    responses(
        (status = 200, description = "Simulation outcome", body = SimulateOutcome),
        (status = 400, description = "Missing wallet_address"),
        (status = 403, description = "Origin rejected"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn simulate_mint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<SimulateOutcome>, ApiError> {
    check_origin(&headers, &state.allowed_origins)?;

    if request.wallet_address.is_empty() {
        return Err(ApiError::bad_request("Wallet address is required"));
    }

    let profile = match state.store.get(&request.wallet_address) {
        Ok(profile) => profile,
        Err(StoreError::NotFound(_)) => {
            return Ok(Json(SimulateOutcome {
                required_lamports: 0,
                balance_lamports: 0,
                ok: false,
                reason: Some("No profile for this wallet".to_string()),
            }));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Json(chain::simulate(state.chain.as_ref(), &profile).await))
}
