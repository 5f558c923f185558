// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! Signature delegation.
//!
//! The mint workflow builds transactions but never signs them itself;
//! a [`WalletSigner`] is handed in explicitly. In production that is the
//! user's connected wallet; [`LocalSigner`] covers development setups
//! and tests.

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer as _,
    transaction::Transaction,
};

use super::ChainError;

/// Signs prepared transactions on behalf of a wallet.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The wallet's public key (fee payer and token recipient).
    fn pubkey(&self) -> Pubkey;

    /// Sign the transaction with the given recent blockhash.
    async fn sign(
        &self,
        transaction: &mut Transaction,
        recent_blockhash: Hash,
    ) -> Result<(), ChainError>;
}

/// Keypair-backed signer for development and tests.
pub struct LocalSigner {
    keypair: Keypair,
}

impl LocalSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl WalletSigner for LocalSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign(
        &self,
        transaction: &mut Transaction,
        recent_blockhash: Hash,
    ) -> Result<(), ChainError> {
        transaction
            .try_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| ChainError::Signing(e.to_string()))
    }
}
