use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[serde(alias = "mainnet")]
    MainnetBeta,
    Testnet,
    #[default]
    Devnet,
    Localnet,
}

impl Cluster {
    pub fn rpc_url(self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Localnet => "http://localhost:8899",
        }
    }

    /// CAIP-2 chain id advertised in the `x-blockchain-ids` action header.
    pub fn blockchain_id(self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
            Cluster::Testnet => "solana:4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z",
            Cluster::Devnet | Cluster::Localnet => "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1",
        }
    }

    fn explorer_query(self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "",
            Cluster::Testnet => "?cluster=testnet",
            Cluster::Devnet => "?cluster=devnet",
            Cluster::Localnet => "?cluster=custom&customUrl=http%3A%2F%2Flocalhost%3A8899",
        }
    }

    pub fn explorer_tx_url(self, signature: &str) -> String {
        format!("https://explorer.solana.com/tx/{signature}{}", self.explorer_query())
    }

    pub fn explorer_address_url(self, address: &str) -> String {
        format!("https://explorer.solana.com/address/{address}{}", self.explorer_query())
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Testnet => "testnet",
            Cluster::Devnet => "devnet",
            Cluster::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "testnet" => Ok(Cluster::Testnet),
            "devnet" => Ok(Cluster::Devnet),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            other => Err(format!("unknown cluster: {other}")),
        }
    }
}
