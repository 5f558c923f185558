// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! # API Data Models
//!
//! Request and response structures for the REST API plus the stored
//! profile record. All wire types derive `Serialize`/`Deserialize` and
//! `ToSchema` for automatic JSON handling and OpenAPI documentation.
//!
//! ## Profile Lifecycle
//!
//! A profile is created on the first successful save for a wallet and is
//! never deleted. Fields arrive incrementally: identity fields first, the
//! token address in a second write after mint confirmation. The
//! [`MintPhase`] field tracks the mint saga so a crash between on-chain
//! confirmation and the follow-up persistence write is detectable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of emojis a profile may carry.
pub const MAX_EMOJIS: usize = 3;

/// Username length bounds (inclusive).
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;

// =============================================================================
// Stored Profile
// =============================================================================

/// Progress of the mint saga for a profile.
///
/// `Confirmed` without an `nft_address` on the profile means the on-chain
/// mint succeeded but the persistence write never landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum MintPhase {
    /// No mint in flight.
    #[default]
    Eligible,
    /// Transaction handed to the wallet for signing and submission.
    Submitting,
    /// Transaction confirmed on chain, token address not yet persisted.
    Confirmed,
    /// Token address written back to the profile. Terminal.
    Persisted,
}

/// A stored user profile, keyed by wallet address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Opaque chain address. Primary key, immutable once set.
    pub wallet_address: String,
    /// Display name, globally unique across all profiles.
    pub username: String,
    /// Up to [`MAX_EMOJIS`] short strings, ordered.
    pub emojis: Vec<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<String>,
    /// Soulbound token mint address. Set once, never cleared.
    pub nft_address: Option<String>,
    /// Mint saga progress.
    #[serde(default)]
    pub mint_phase: MintPhase,
    /// Set on first insert only.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every write.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Wire Types
// =============================================================================

/// Partial profile update. Only supplied fields are merged into the row.
///
/// Doubles as the `POST /api/users` request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfilePatch {
    /// Wallet address the patch applies to (required).
    pub wallet_address: String,
    /// New username. Required when no profile exists for the wallet yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Replacement emoji list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emojis: Option<Vec<String>>,
    /// Replacement country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Token address from a confirmed mint. Append-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_address: Option<String>,
}

/// Public profile fields returned by `GET /api/users`.
///
/// A wallet with no stored profile yields the sentinel
/// `{"username": null}` rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserResponse {
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emojis: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_address: Option<String>,
}

impl UserResponse {
    /// The "no profile" sentinel.
    pub fn empty() -> Self {
        Self {
            username: None,
            emojis: None,
            country_code: None,
            nft_address: None,
        }
    }
}

impl From<Profile> for UserResponse {
    fn from(profile: Profile) -> Self {
        Self {
            username: Some(profile.username),
            emojis: Some(profile.emojis),
            country_code: profile.country_code,
            nft_address: profile.nft_address,
        }
    }
}

/// Acknowledgement for a successful save.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveResponse {
    pub success: bool,
}

// =============================================================================
// Field Validation
// =============================================================================

/// Validate a username: 3-20 characters from `[a-zA-Z0-9_-]`.
///
/// Whitespace anywhere (including leading/trailing) is rejected.
pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(format!(
            "Username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err("Username may only contain letters, digits, '_' and '-'".to_string());
    }
    Ok(())
}

/// Validate an emoji list: at most [`MAX_EMOJIS`] non-empty short entries.
pub fn validate_emojis(emojis: &[String]) -> Result<(), String> {
    if emojis.len() > MAX_EMOJIS {
        return Err(format!(
            "Emojis must be a list with at most {MAX_EMOJIS} items"
        ));
    }
    if emojis
        .iter()
        .any(|e| e.trim().is_empty() || e.chars().count() > 8)
    {
        return Err("Each emoji entry must be a short non-empty string".to_string());
    }
    Ok(())
}

/// Validate a country code against the ISO 3166-1 alpha-2 enumeration.
pub fn validate_country_code(code: &str) -> Result<(), String> {
    isocountry::CountryCode::for_alpha2(code)
        .map(|_| ())
        .map_err(|_| format!("Unknown country code: {code}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_bounds_and_charset() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a-b_c123").is_ok());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(20)).is_ok());

        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(21)).is_err());
        assert!(validate_username("bob ").is_err());
        assert!(validate_username(" bob").is_err());
        assert!(validate_username("bo b").is_err());
        assert!(validate_username("böb").is_err());
        assert!(validate_username("bob!").is_err());
    }

    #[test]
    fn emoji_list_limits() {
        assert!(validate_emojis(&[]).is_ok());
        assert!(validate_emojis(&["🔥".into(), "🎉".into(), "💧".into()]).is_ok());

        let four: Vec<String> = vec!["🔥".into(), "🎉".into(), "💧".into(), "⚡".into()];
        assert!(validate_emojis(&four).is_err());
        assert!(validate_emojis(&["".into()]).is_err());
        assert!(validate_emojis(&["   ".into()]).is_err());
        assert!(validate_emojis(&["not an emoji at all".into()]).is_err());
    }

    #[test]
    fn country_codes_come_from_iso_enumeration() {
        assert!(validate_country_code("US").is_ok());
        assert!(validate_country_code("JP").is_ok());
        assert!(validate_country_code("XX").is_err());
        assert!(validate_country_code("usa").is_err());
        assert!(validate_country_code("").is_err());
    }

    #[test]
    fn user_response_sentinel_serializes_username_null() {
        let json = serde_json::to_string(&UserResponse::empty()).unwrap();
        assert_eq!(json, r#"{"username":null}"#);
    }

    #[test]
    fn user_response_from_profile_carries_public_fields() {
        let profile = Profile {
            wallet_address: "W1".into(),
            username: "alice".into(),
            emojis: vec!["🔥".into()],
            country_code: Some("US".into()),
            nft_address: None,
            mint_phase: MintPhase::Eligible,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response: UserResponse = profile.into();
        assert_eq!(response.username.as_deref(), Some("alice"));
        assert_eq!(response.emojis, Some(vec!["🔥".to_string()]));
        assert_eq!(response.country_code.as_deref(), Some("US"));
        assert_eq!(response.nft_address, None);
    }
}
