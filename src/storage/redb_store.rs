// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! redb-backed profile store.
//!
//! Rows are JSON-encoded [`Profile`] values. The username index lives in
//! the same database and is maintained in the same write transaction as
//! the row it guards, which makes check-then-write races impossible: two
//! concurrent saves of the same name serialize on the write transaction
//! and the second one sees the index entry.

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::{MintPhase, Profile, ProfilePatch};
use crate::storage::{ProfileStore, StoreError, StoreResult};

/// Primary table: wallet_address → serialized Profile (JSON bytes).
const PROFILES: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

/// Uniqueness index: username → wallet_address.
const USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("usernames");

/// Embedded ACID profile store.
pub struct RedbProfileStore {
    db: Database,
    read_only: bool,
}

impl RedbProfileStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PROFILES)?;
            let _ = write_txn.open_table(USERNAMES)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db,
            read_only: false,
        })
    }

    /// Open the database with writes disabled. Any write attempt fails
    /// with `PermissionDenied`, matching a hosted store's policy
    /// rejection.
    pub fn open_read_only(path: &Path) -> StoreResult<Self> {
        let mut store = Self::open(path)?;
        store.read_only = true;
        Ok(store)
    }

    fn guard_writable(&self) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::PermissionDenied(
                "store is in read-only mode".to_string(),
            ));
        }
        Ok(())
    }
}

impl ProfileStore for RedbProfileStore {
    fn get(&self, wallet_address: &str) -> StoreResult<Profile> {
        let read_txn = self.db.begin_read()?;
        let profiles = read_txn.open_table(PROFILES)?;

        match profiles.get(wallet_address)? {
            Some(bytes) => Ok(serde_json::from_slice(bytes.value())?),
            None => Err(StoreError::NotFound(wallet_address.to_string())),
        }
    }

    fn upsert(&self, patch: ProfilePatch) -> StoreResult<Profile> {
        self.guard_writable()?;

        let wallet = patch.wallet_address.as_str();
        let now = Utc::now();

        let write_txn = self.db.begin_write()?;
        let profile = {
            let mut profiles = write_txn.open_table(PROFILES)?;
            let mut usernames = write_txn.open_table(USERNAMES)?;

            let existing: Option<Profile> = match profiles.get(wallet)? {
                Some(bytes) => Some(serde_json::from_slice(bytes.value())?),
                None => None,
            };

            // Uniqueness check against the index, inside the transaction.
            if let Some(name) = patch.username.as_deref() {
                let owner = usernames.get(name)?.map(|g| g.value().to_string());
                if let Some(owner) = owner {
                    if owner != wallet {
                        return Err(StoreError::Conflict(
                            "Username is already taken".to_string(),
                        ));
                    }
                }
            }

            let mut profile = match existing {
                Some(profile) => profile,
                None => {
                    let username = patch.username.clone().ok_or(StoreError::MissingUsername)?;
                    Profile {
                        wallet_address: wallet.to_string(),
                        username,
                        emojis: Vec::new(),
                        country_code: None,
                        nft_address: None,
                        mint_phase: MintPhase::Eligible,
                        created_at: now,
                        updated_at: now,
                    }
                }
            };

            if let Some(name) = patch.username {
                if name != profile.username {
                    usernames.remove(profile.username.as_str())?;
                    profile.username = name;
                }
            }
            // Keep the index current for renames and first inserts alike.
            usernames.insert(profile.username.as_str(), wallet)?;

            if let Some(emojis) = patch.emojis {
                profile.emojis = emojis;
            }
            if let Some(country_code) = patch.country_code {
                profile.country_code = Some(country_code);
            }
            if let Some(nft_address) = patch.nft_address {
                match profile.nft_address.as_deref() {
                    Some(current) if current != nft_address => {
                        return Err(StoreError::Conflict(
                            "Profile already has a minted token".to_string(),
                        ));
                    }
                    _ => {
                        profile.nft_address = Some(nft_address);
                        profile.mint_phase = MintPhase::Persisted;
                    }
                }
            }

            profile.updated_at = now;

            let bytes = serde_json::to_vec(&profile)?;
            profiles.insert(wallet, bytes.as_slice())?;
            profile
        };
        write_txn.commit()?;

        Ok(profile)
    }

    fn set_mint_phase(&self, wallet_address: &str, phase: MintPhase) -> StoreResult<()> {
        self.guard_writable()?;

        let write_txn = self.db.begin_write()?;
        {
            let mut profiles = write_txn.open_table(PROFILES)?;

            let mut profile: Profile = match profiles.get(wallet_address)? {
                Some(bytes) => serde_json::from_slice(bytes.value())?,
                None => return Err(StoreError::NotFound(wallet_address.to_string())),
            };
            profile.mint_phase = phase;

            let bytes = serde_json::to_vec(&profile)?;
            profiles.insert(wallet_address, bytes.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }
}
