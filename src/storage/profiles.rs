// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! The [`ProfileStore`] trait and its error taxonomy.
//!
//! Handlers and the mint workflow receive the store as an explicitly
//! passed handle, so tests can substitute any implementation.

use crate::models::{MintPhase, Profile, ProfilePatch};

/// Errors surfaced by a profile store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row for the requested wallet address. Fetch paths translate
    /// this into the "no profile" sentinel, never into an API error.
    #[error("no profile for wallet {0}")]
    NotFound(String),

    /// A store-enforced invariant was violated (username taken, or an
    /// attempt to overwrite an already-set token address).
    #[error("{0}")]
    Conflict(String),

    /// A patch tried to create a profile without a username.
    #[error("a new profile requires a username")]
    MissingUsername,

    /// The store's access policy rejected the write.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Opaque upstream failure (database or serialization).
    #[error("storage error: {0}")]
    Storage(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<redb::DatabaseError> for StoreError {
    fn from(e: redb::DatabaseError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(e: redb::TransactionError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<redb::TableError> for StoreError {
    fn from(e: redb::TableError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(e: redb::StorageError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(e: redb::CommitError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

/// Typed access to the `users` rows.
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile for a wallet. `NotFound` when no row matches.
    fn get(&self, wallet_address: &str) -> StoreResult<Profile>;

    /// Merge the supplied fields into the row for `patch.wallet_address`,
    /// creating it if absent.
    ///
    /// - `created_at` is set only when no prior row existed;
    ///   `updated_at` is refreshed on every write.
    /// - A username held by any *other* wallet yields `Conflict`.
    /// - Changing an already-set `nft_address` to a different value
    ///   yields `Conflict`; re-sending the same value is a no-op.
    /// - Persisting `nft_address` advances the mint phase to
    ///   [`MintPhase::Persisted`].
    fn upsert(&self, patch: ProfilePatch) -> StoreResult<Profile>;

    /// Record mint saga progress for a wallet. Does not touch
    /// `updated_at`; phase changes are workflow bookkeeping, not profile
    /// edits.
    fn set_mint_phase(&self, wallet_address: &str, phase: MintPhase) -> StoreResult<()>;
}
