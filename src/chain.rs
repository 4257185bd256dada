//! Seam between the service and the cluster's JSON-RPC API.

use async_trait::async_trait;
use solana_account_decoder_client_types::UiAccountEncoding;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

use crate::error::Result;

#[async_trait]
pub trait Chain: Send + Sync {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    /// Accounts owned by `program_id` whose data starts with `discriminator`.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Account)>>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature>;
}

pub struct RpcChain {
    client: RpcClient,
}

impl RpcChain {
    pub fn new(url: String, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url, commitment),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl Chain for RpcChain {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        tracing::debug!("getAccountInfo {}", address);

        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await?;

        Ok(response.value)
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Account)>> {
        tracing::debug!("getProgramAccounts {} filtered by {:?}", program_id, discriminator);

        // Base58 account data is capped at 128 bytes; program accounts are larger.
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                0,
                discriminator,
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.client.commitment()),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        let accounts = self
            .client
            .get_program_accounts_with_config(program_id, config)
            .await?;

        Ok(accounts)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        let signature = self
            .client
            .send_and_confirm_transaction_with_spinner(transaction)
            .await?;

        tracing::info!("Transaction confirmed: {}", signature);

        Ok(signature)
    }
}
