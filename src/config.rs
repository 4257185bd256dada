//! Layered configuration using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults (devnet, the deployed program id, the AST reward mint)
//! 2. `movie-review.toml` in the working directory, or the file passed with `--config`
//! 3. Environment variables: `MOVIE_REVIEW_*`, nested keys separated by `__`
//!
//! ```toml
//! cluster = "devnet"
//! commitment = "confirmed"
//! program_id = "3F4fsF8VBR2sqWMPLLwAuL9ACxwt8QM8HZJdGm9BVJMy"
//!
//! [rewards]
//! enabled = true
//! mint = "8Jv5UC3tUGXSe1MpPBJpdLAbeniWkP18M3cyYirLZ9Nt"
//! decimals = 9
//!
//! [server]
//! bind = "0.0.0.0:3000"
//! ```

use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::{
    cluster::Cluster,
    error::{parse_pubkey, Result},
};

pub const DEFAULT_CONFIG_FILE: &str = "movie-review.toml";
pub const ENV_PREFIX: &str = "MOVIE_REVIEW_";

pub const DEFAULT_PROGRAM_ID: &str = "3F4fsF8VBR2sqWMPLLwAuL9ACxwt8QM8HZJdGm9BVJMy";
pub const DEFAULT_REWARD_MINT: &str = "8Jv5UC3tUGXSe1MpPBJpdLAbeniWkP18M3cyYirLZ9Nt";
pub const DEFAULT_ACTION_ICON: &str = "https://variety.com/wp-content/uploads/2023/03/Movie-Theater-Film-Cinema-Exhibition-Placeholder.jpg?w=1000&h=562&crop=1";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub cluster: Cluster,
    /// Overrides the cluster's public RPC endpoint.
    pub rpc_url: Option<String>,
    pub commitment: String,
    pub program_id: String,
    /// Signer used by the CLI mutations.
    pub keypair: Option<PathBuf>,
    pub rewards: RewardsConfig,
    pub server: ServerConfig,
    pub action: ActionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardsConfig {
    /// Whether the deployed program expects the reward accounts on review instructions.
    pub enabled: bool,
    pub mint: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionConfig {
    pub icon: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster: Cluster::Devnet,
            rpc_url: None,
            commitment: String::from("confirmed"),
            program_id: String::from(DEFAULT_PROGRAM_ID),
            keypair: None,
            rewards: RewardsConfig {
                enabled: true,
                mint: String::from(DEFAULT_REWARD_MINT),
                decimals: 9,
            },
            server: ServerConfig {
                bind: String::from("0.0.0.0:3000"),
            },
            action: ActionConfig {
                icon: String::from(DEFAULT_ACTION_ICON),
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.cluster.rpc_url().to_string())
    }

    pub fn commitment(&self) -> CommitmentConfig {
        match self.commitment.as_str() {
            "processed" => CommitmentConfig::processed(),
            "finalized" => CommitmentConfig::finalized(),
            _ => CommitmentConfig::confirmed(),
        }
    }

    pub fn program_id(&self) -> Result<Pubkey> {
        parse_pubkey(&self.program_id)
    }

    pub fn reward_mint(&self) -> Result<Pubkey> {
        parse_pubkey(&self.rewards.mint)
    }
}
