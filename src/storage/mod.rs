// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! # Profile Storage
//!
//! One row per wallet address, held in an embedded ACID database (redb).
//!
//! ## Table Layout
//!
//! - `profiles`: wallet_address → serialized [`crate::models::Profile`]
//! - `usernames`: username → wallet_address (uniqueness index)
//!
//! Both tables are updated inside a single write transaction, so the
//! username uniqueness invariant is enforced by the store itself: the
//! store's conflict signal is the only source of `Conflict` errors.

pub mod profiles;
pub mod redb_store;

pub use profiles::{ProfileStore, StoreError, StoreResult};
pub use redb_store::RedbProfileStore;
