// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! Soulbound mint workflow.
//!
//! Two-phase interaction against a pre-provisioned Token-2022 mint:
//!
//! - **Simulate** quotes the rent-exempt cost of the
//!   mint-account-plus-metadata footprint plus a flat fee estimate and
//!   compares it with the wallet balance. It never fails hard: RPC
//!   trouble or insufficient funds come back as `ok = false` with a
//!   reason.
//! - **Execute** (after the user confirms the quoted cost) derives the
//!   associated token account, creates it if absent, mints exactly one
//!   unit at zero decimals, and awaits confirmation. Saga progress is
//!   recorded through the profile store so a crash between on-chain
//!   confirmation and the follow-up profile write is detectable.
//!
//! There is no automatic retry; a failed submission returns the profile
//! to `Eligible` and the user may try again.

use std::str::FromStr;

use serde::Serialize;
use solana_sdk::{
    native_token::lamports_to_sol, program_error::ProgramError, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id, instruction::create_associated_token_account_idempotent,
};
use spl_token_2022::{extension::ExtensionType, instruction::mint_to_checked, state::Mint};
use spl_token_metadata_interface::state::TokenMetadata;
use utoipa::ToSchema;

use crate::models::{MintPhase, Profile};
use crate::storage::{ProfileStore, StoreError};

use super::{ChainClient, ChainError, WalletSigner};

/// Flat fee estimate added on top of the rent quote, in lamports.
const FEE_ESTIMATE_LAMPORTS: u64 = 5_000;

/// Symbol stamped into the token metadata footprint.
const TOKEN_SYMBOL: &str = "VIIBNFT";

/// Errors from the mint workflow.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    #[error("Profile is not eligible for minting: {0}")]
    Ineligible(&'static str),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to build instruction: {0}")]
    Instruction(String),
}

impl From<ProgramError> for MintError {
    fn from(e: ProgramError) -> Self {
        MintError::Instruction(e.to_string())
    }
}

/// The pre-provisioned mint and its fixed authority, configured
/// out-of-band.
#[derive(Debug, Clone)]
pub struct MintConfig {
    pub mint: Pubkey,
    pub authority: Pubkey,
}

impl MintConfig {
    pub fn from_strs(mint: &str, authority: &str) -> Result<Self, ChainError> {
        Ok(Self {
            mint: Pubkey::from_str(mint)
                .map_err(|e| ChainError::InvalidAddress(e.to_string()))?,
            authority: Pubkey::from_str(authority)
                .map_err(|e| ChainError::InvalidAddress(e.to_string()))?,
        })
    }
}

/// Result of the simulate phase. `ok = false` carries a user-facing
/// reason; nothing on chain or in the store is mutated.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SimulateOutcome {
    /// Rent quote plus fee estimate.
    pub required_lamports: u64,
    /// Wallet balance at quote time.
    pub balance_lamports: u64,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SimulateOutcome {
    fn rejected(reason: String) -> Self {
        Self {
            required_lamports: 0,
            balance_lamports: 0,
            ok: false,
            reason: Some(reason),
        }
    }
}

/// Check the minting eligibility gate: identity fields present, no token
/// yet.
pub fn eligibility(profile: &Profile) -> Result<(), MintError> {
    if profile.username.is_empty() {
        return Err(MintError::Ineligible("username is not set"));
    }
    if profile.country_code.as_deref().unwrap_or("").is_empty() {
        return Err(MintError::Ineligible("country is not set"));
    }
    if profile.emojis.is_empty() {
        return Err(MintError::Ineligible("emojis are not set"));
    }
    if profile.nft_address.is_some() {
        return Err(MintError::Ineligible("a token has already been minted"));
    }
    Ok(())
}

/// Byte length of a Token-2022 mint account with a metadata pointer plus
/// the TLV-packed metadata for this profile.
fn metadata_footprint(profile: &Profile) -> Result<usize, MintError> {
    let mint_len =
        ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::MetadataPointer])?;

    let metadata = TokenMetadata {
        name: profile.username.clone(),
        symbol: TOKEN_SYMBOL.to_string(),
        uri: String::new(),
        additional_metadata: vec![
            (
                "country".to_string(),
                profile.country_code.clone().unwrap_or_default(),
            ),
            (
                "emojis".to_string(),
                serde_json::to_string(&profile.emojis).unwrap_or_default(),
            ),
        ],
        ..Default::default()
    };

    Ok(mint_len + metadata.tlv_size_of()?)
}

/// Quote the cost of minting for this profile against the wallet's
/// current balance. Soft-fails: all error paths produce `ok = false`.
pub async fn simulate(chain: &dyn ChainClient, profile: &Profile) -> SimulateOutcome {
    if let Err(err) = eligibility(profile) {
        return SimulateOutcome::rejected(err.to_string());
    }

    let wallet = match Pubkey::from_str(&profile.wallet_address) {
        Ok(wallet) => wallet,
        Err(e) => return SimulateOutcome::rejected(format!("Invalid wallet address: {e}")),
    };

    let footprint = match metadata_footprint(profile) {
        Ok(len) => len,
        Err(err) => return SimulateOutcome::rejected(err.to_string()),
    };

    let rent = match chain.minimum_balance_for_rent_exemption(footprint).await {
        Ok(rent) => rent,
        Err(err) => return SimulateOutcome::rejected(err.to_string()),
    };
    let required_lamports = rent + FEE_ESTIMATE_LAMPORTS;

    let balance_lamports = match chain.balance(&wallet).await {
        Ok(balance) => balance,
        Err(err) => return SimulateOutcome::rejected(err.to_string()),
    };

    if balance_lamports < required_lamports {
        return SimulateOutcome {
            required_lamports,
            balance_lamports,
            ok: false,
            reason: Some(format!(
                "Insufficient SOL balance. Required: {} SOL",
                lamports_to_sol(required_lamports)
            )),
        };
    }

    SimulateOutcome {
        required_lamports,
        balance_lamports,
        ok: true,
        reason: None,
    }
}

/// Orchestrates one mint for the signer's wallet. All collaborators are
/// passed in explicitly.
pub struct MintWorkflow<'a> {
    chain: &'a dyn ChainClient,
    signer: &'a dyn WalletSigner,
    store: &'a dyn ProfileStore,
    config: MintConfig,
}

impl<'a> MintWorkflow<'a> {
    pub fn new(
        chain: &'a dyn ChainClient,
        signer: &'a dyn WalletSigner,
        store: &'a dyn ProfileStore,
        config: MintConfig,
    ) -> Self {
        Self {
            chain,
            signer,
            store,
            config,
        }
    }

    /// Quote the mint cost for the signer's profile.
    pub async fn simulate(&self) -> SimulateOutcome {
        let wallet = self.signer.pubkey().to_string();
        match self.store.get(&wallet) {
            Ok(profile) => simulate(self.chain, &profile).await,
            Err(err) => SimulateOutcome::rejected(err.to_string()),
        }
    }

    /// Mint exactly one unit to the signer's wallet and return the mint
    /// address to persist as the profile's `nft_address`.
    ///
    /// Aborts with no partial profile mutation on any chain or signing
    /// failure; the caller remains responsible for the follow-up profile
    /// write (which is not transactional with the on-chain mint).
    pub async fn execute(&self) -> Result<String, MintError> {
        let wallet = self.signer.pubkey();
        let key = wallet.to_string();

        let profile = self.store.get(&key)?;
        eligibility(&profile)?;

        self.store.set_mint_phase(&key, MintPhase::Submitting)?;

        match self.submit(&wallet).await {
            Ok(signature) => {
                self.store.set_mint_phase(&key, MintPhase::Confirmed)?;
                tracing::info!(%signature, wallet = %key, "mint confirmed");
                Ok(self.config.mint.to_string())
            }
            Err(err) => {
                // The user may retry; roll the saga back to Eligible.
                if let Err(reset) = self.store.set_mint_phase(&key, MintPhase::Eligible) {
                    tracing::warn!(error = %reset, wallet = %key, "failed to reset mint phase");
                }
                tracing::error!(error = %err, wallet = %key, "mint failed");
                Err(err)
            }
        }
    }

    async fn submit(&self, wallet: &Pubkey) -> Result<Signature, MintError> {
        let token_program = spl_token_2022::id();

        let ata = get_associated_token_address_with_program_id(
            wallet,
            &self.config.mint,
            &token_program,
        );
        let create_ata = create_associated_token_account_idempotent(
            wallet,
            wallet,
            &self.config.mint,
            &token_program,
        );
        let mint_one = mint_to_checked(
            &token_program,
            &self.config.mint,
            &ata,
            &self.config.authority,
            &[],
            1,
            0,
        )?;

        let mut transaction =
            Transaction::new_with_payer(&[create_ata, mint_one], Some(wallet));
        let recent_blockhash = self.chain.latest_blockhash().await?;

        self.signer.sign(&mut transaction, recent_blockhash).await?;

        Ok(self.chain.send_and_confirm(&transaction).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;
    use chrono::Utc;
    use solana_sdk::hash::Hash;
    use tempfile::TempDir;

    use super::*;
    use crate::chain::client::testing::FakeChain;
    use crate::models::ProfilePatch;
    use crate::storage::RedbProfileStore;

    struct FakeSigner {
        pubkey: Pubkey,
    }

    #[async_trait]
    impl WalletSigner for FakeSigner {
        fn pubkey(&self) -> Pubkey {
            self.pubkey
        }

        async fn sign(
            &self,
            transaction: &mut Transaction,
            recent_blockhash: Hash,
        ) -> Result<(), ChainError> {
            transaction.message.recent_blockhash = recent_blockhash;
            Ok(())
        }
    }

    fn eligible_profile(wallet: &str) -> Profile {
        Profile {
            wallet_address: wallet.to_string(),
            username: "alice".into(),
            emojis: vec!["🔥".into()],
            country_code: Some("US".into()),
            nft_address: None,
            mint_phase: MintPhase::Eligible,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_config() -> MintConfig {
        MintConfig {
            mint: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
        }
    }

    fn seeded_store(wallet: &Pubkey) -> (RedbProfileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RedbProfileStore::open(&dir.path().join("profiles.redb")).unwrap();
        store
            .upsert(ProfilePatch {
                wallet_address: wallet.to_string(),
                username: Some("alice".into()),
                emojis: Some(vec!["🔥".into()]),
                country_code: Some("US".into()),
                nft_address: None,
            })
            .unwrap();
        (store, dir)
    }

    #[test]
    fn eligibility_gate_covers_all_four_boundaries() {
        let wallet = Pubkey::new_unique().to_string();

        assert!(eligibility(&eligible_profile(&wallet)).is_ok());

        let mut no_username = eligible_profile(&wallet);
        no_username.username = String::new();
        assert!(matches!(
            eligibility(&no_username),
            Err(MintError::Ineligible(_))
        ));

        let mut no_country = eligible_profile(&wallet);
        no_country.country_code = None;
        assert!(matches!(
            eligibility(&no_country),
            Err(MintError::Ineligible(_))
        ));

        let mut no_emojis = eligible_profile(&wallet);
        no_emojis.emojis.clear();
        assert!(matches!(
            eligibility(&no_emojis),
            Err(MintError::Ineligible(_))
        ));

        let mut already_minted = eligible_profile(&wallet);
        already_minted.nft_address = Some("MINT123".into());
        assert!(matches!(
            eligibility(&already_minted),
            Err(MintError::Ineligible(_))
        ));
    }

    #[tokio::test]
    async fn simulate_quotes_rent_plus_fee() {
        let chain = FakeChain::default();
        let profile = eligible_profile(&Pubkey::new_unique().to_string());

        let outcome = simulate(&chain, &profile).await;
        assert!(outcome.ok, "reason: {:?}", outcome.reason);
        assert!(outcome.required_lamports > FEE_ESTIMATE_LAMPORTS);
        assert_eq!(outcome.balance_lamports, chain.balance);
    }

    #[tokio::test]
    async fn simulate_reports_insufficient_balance() {
        let chain = FakeChain {
            balance: 1,
            ..FakeChain::default()
        };
        let profile = eligible_profile(&Pubkey::new_unique().to_string());

        let outcome = simulate(&chain, &profile).await;
        assert!(!outcome.ok);
        assert!(outcome.reason.unwrap().contains("Insufficient SOL balance"));
    }

    #[tokio::test]
    async fn simulate_soft_fails_on_rpc_error() {
        let chain = FakeChain {
            fail_rpc: true,
            ..FakeChain::default()
        };
        let profile = eligible_profile(&Pubkey::new_unique().to_string());

        let outcome = simulate(&chain, &profile).await;
        assert!(!outcome.ok);
        assert!(outcome.reason.is_some());
    }

    #[tokio::test]
    async fn simulate_rejects_ineligible_profile() {
        let chain = FakeChain::default();
        let mut profile = eligible_profile(&Pubkey::new_unique().to_string());
        profile.nft_address = Some("MINT123".into());

        let outcome = simulate(&chain, &profile).await;
        assert!(!outcome.ok);
        assert_eq!(chain.submissions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn execute_mints_and_records_saga_phases() {
        let wallet = Pubkey::new_unique();
        let (store, _dir) = seeded_store(&wallet);
        let chain = FakeChain::default();
        let signer = FakeSigner { pubkey: wallet };
        let config = test_config();
        let expected_mint = config.mint.to_string();

        let workflow = MintWorkflow::new(&chain, &signer, &store, config);
        let nft_address = workflow.execute().await.unwrap();

        assert_eq!(nft_address, expected_mint);
        assert_eq!(chain.submissions.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.get(&wallet.to_string()).unwrap().mint_phase,
            MintPhase::Confirmed
        );

        // The follow-up profile write completes the saga.
        store
            .upsert(ProfilePatch {
                wallet_address: wallet.to_string(),
                username: None,
                emojis: None,
                country_code: None,
                nft_address: Some(nft_address),
            })
            .unwrap();
        assert_eq!(
            store.get(&wallet.to_string()).unwrap().mint_phase,
            MintPhase::Persisted
        );
    }

    #[tokio::test]
    async fn execute_failure_returns_profile_to_eligible() {
        let wallet = Pubkey::new_unique();
        let (store, _dir) = seeded_store(&wallet);
        let chain = FakeChain {
            fail_submit: true,
            ..FakeChain::default()
        };
        let signer = FakeSigner { pubkey: wallet };

        let workflow = MintWorkflow::new(&chain, &signer, &store, test_config());
        let err = workflow.execute().await.unwrap_err();

        assert!(matches!(err, MintError::Chain(_)));
        let profile = store.get(&wallet.to_string()).unwrap();
        assert_eq!(profile.mint_phase, MintPhase::Eligible);
        assert_eq!(profile.nft_address, None);
    }

    #[tokio::test]
    async fn execute_refuses_when_token_already_minted() {
        let wallet = Pubkey::new_unique();
        let (store, _dir) = seeded_store(&wallet);
        store
            .upsert(ProfilePatch {
                wallet_address: wallet.to_string(),
                username: None,
                emojis: None,
                country_code: None,
                nft_address: Some("MINT123".into()),
            })
            .unwrap();

        let chain = FakeChain::default();
        let signer = FakeSigner { pubkey: wallet };

        let workflow = MintWorkflow::new(&chain, &signer, &store, test_config());
        let err = workflow.execute().await.unwrap_err();

        assert!(matches!(err, MintError::Ineligible(_)));
        assert_eq!(chain.submissions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn workflow_simulate_reads_profile_from_store() {
        let wallet = Pubkey::new_unique();
        let (store, _dir) = seeded_store(&wallet);
        let chain = FakeChain::default();
        let signer = FakeSigner { pubkey: wallet };

        let workflow = MintWorkflow::new(&chain, &signer, &store, test_config());
        let outcome = workflow.simulate().await;
        assert!(outcome.ok, "reason: {:?}", outcome.reason);

        // Unknown wallet soft-fails instead of erroring.
        let stranger = FakeSigner {
            pubkey: Pubkey::new_unique(),
        };
        let workflow = MintWorkflow::new(&chain, &stranger, &store, test_config());
        let outcome = workflow.simulate().await;
        assert!(!outcome.ok);
    }
}
