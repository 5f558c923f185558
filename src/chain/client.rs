// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! Solana RPC client for chain interactions.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

/// Public devnet RPC endpoint. The pre-provisioned mint lives on devnet,
/// so any deployment can reach it with just the mint address.
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Errors that can occur during chain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Confirmation failed: {0}")]
    Confirmation(String),
}

/// Read and submit operations against a Solana cluster.
///
/// The workflow awaits one call at a time; no operation here is
/// cancellable mid-flight.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Lamport balance of the given account.
    async fn balance(&self, owner: &Pubkey) -> Result<u64, ChainError>;

    /// A fresh blockhash to stamp a transaction with.
    async fn latest_blockhash(&self) -> Result<Hash, ChainError>;

    /// Minimum lamports for an account of `data_len` bytes to be
    /// rent-exempt.
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, ChainError>;

    /// Submit a signed transaction and await confirmation at the
    /// "confirmed" commitment level.
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, ChainError>;
}

/// [`ChainClient`] backed by a nonblocking Solana RPC connection.
pub struct SolanaRpc {
    client: RpcClient,
}

impl SolanaRpc {
    /// Connect to the given RPC endpoint at "confirmed" commitment.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url.into(), CommitmentConfig::confirmed()),
        }
    }

    /// Connect to the public devnet endpoint.
    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC_URL)
    }
}

#[async_trait]
impl ChainClient for SolanaRpc {
    async fn balance(&self, owner: &Pubkey) -> Result<u64, ChainError> {
        self.client
            .get_balance(owner)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn latest_blockhash(&self) -> Result<Hash, ChainError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, ChainError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, ChainError> {
        self.client
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(|e| ChainError::Confirmation(e.to_string()))
    }
}
