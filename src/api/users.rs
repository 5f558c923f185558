// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! Profile fetch and save endpoints.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::ApiError,
    models::{
        validate_country_code, validate_emojis, validate_username, ProfilePatch, SaveResponse,
        UserResponse,
    },
    state::AppState,
    storage::StoreError,
};

use super::check_origin;

#[derive(Deserialize, IntoParams)]
pub struct UserQuery {
    /// Wallet address to look up.
    pub wallet_address: Option<String>,
}

/// Fetch the profile for a wallet address.
///
/// A wallet with no stored profile returns `{"username": null}` with
/// status 200; an empty result is not an error.
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserQuery),
    tag = "Users",
    responses(
        (status = 200, description = "Profile fields, or the no-profile sentinel", body = UserResponse),
        (status = 400, description = "Missing wallet_address"),
        (status = 403, description = "Origin rejected"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UserQuery>,
) -> Result<Json<UserResponse>, ApiError> {
    check_origin(&headers, &state.allowed_origins)?;

    let wallet_address = params
        .wallet_address
        .filter(|w| !w.is_empty())
        .ok_or_else(|| ApiError::bad_request("Wallet address is required"))?;

    match state.store.get(&wallet_address) {
        Ok(profile) => Ok(Json(profile.into())),
        Err(StoreError::NotFound(_)) => Ok(Json(UserResponse::empty())),
        Err(err) => Err(err.into()),
    }
}

/// Create or update a profile.
///
/// Validation fails fast in a fixed order: origin, required fields,
/// emoji list, country code. Username uniqueness is enforced by the
/// store inside the same transaction as the write, so the store's
/// conflict signal is the only source of a 409.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = ProfilePatch,
    tag = "Users",
    responses(
        (status = 200, description = "Profile saved", body = SaveResponse),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Origin or policy rejected"),
        (status = 409, description = "Username already taken"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn save_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<SaveResponse>, ApiError> {
    check_origin(&headers, &state.allowed_origins)?;

    if patch.wallet_address.is_empty() {
        return Err(ApiError::bad_request("Wallet address is required"));
    }

    if let Some(username) = patch.username.as_deref() {
        validate_username(username).map_err(ApiError::bad_request)?;
    }
    if let Some(emojis) = patch.emojis.as_deref() {
        validate_emojis(emojis).map_err(ApiError::bad_request)?;
    }
    if let Some(country_code) = patch.country_code.as_deref() {
        validate_country_code(country_code).map_err(ApiError::bad_request)?;
    }

    // A save that omits the username is only valid as an update to an
    // existing row (e.g. the nft_address follow-up write after a mint).
    if patch.username.is_none() {
        match state.store.get(&patch.wallet_address) {
            Ok(_) => {}
            Err(StoreError::NotFound(_)) => {
                return Err(ApiError::bad_request(
                    "Wallet address and username are required",
                ));
            }
            Err(err) => return Err(err.into()),
        }
    }

    tracing::debug!(wallet = %patch.wallet_address, "saving profile");
    state.store.upsert(patch)?;

    Ok(Json(SaveResponse { success: true }))
}
