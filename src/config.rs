// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory for the embedded profile database | `/data` |
//! | `ALLOWED_ORIGINS` | Comma-separated Origin allow-list | empty |
//! | `SOLANA_RPC_URL` | Solana RPC endpoint | devnet |
//! | `NFT_MINT_ADDRESS` | Pre-provisioned token mint address | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use crate::chain::DEVNET_RPC_URL;

/// Environment variable name for the profile database directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Origins allowed to call the API. A request carrying an `Origin`
    /// header not on this list is rejected with 403.
    pub allowed_origins: Vec<String>,
    pub rpc_url: String,
    /// The pre-provisioned soulbound mint. Created out-of-band; only its
    /// address is needed here. Simulation works without it.
    pub mint_address: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/data"));
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let rpc_url =
            env::var("SOLANA_RPC_URL").unwrap_or_else(|_| DEVNET_RPC_URL.to_string());
        let mint_address = env::var("NFT_MINT_ADDRESS").ok();
        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            host,
            port,
            data_dir,
            allowed_origins,
            rpc_url,
            mint_address,
            log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_list_splits_and_trims() {
        let parse = |v: &str| -> Vec<String> {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        };

        assert_eq!(
            parse("https://a.example, https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(parse("").is_empty());
        assert!(parse(" , ").is_empty());
    }
}
