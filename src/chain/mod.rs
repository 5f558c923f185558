// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! # Solana Chain Integration
//!
//! Everything that touches the chain sits behind two small traits:
//! [`ChainClient`] for RPC reads and transaction submission, and
//! [`WalletSigner`] for signature delegation. The mint workflow composes
//! the two and never holds private keys.

pub mod client;
pub mod mint;
pub mod signer;

pub use client::{ChainClient, ChainError, SolanaRpc, DEVNET_RPC_URL};
pub use mint::{simulate, MintConfig, MintError, MintWorkflow, SimulateOutcome};
pub use signer::{LocalSigner, WalletSigner};
