// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! Soulbound Onboarding Service
//!
//! Wallet-connected onboarding backend: profiles (username, emojis,
//! country) keyed by wallet address, with a workflow to mint a single
//! non-transferable token to the user's wallet on Solana devnet.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `chain` - Solana integration: RPC client, signer delegation, mint workflow
//! - `storage` - Embedded profile store (redb)

pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
