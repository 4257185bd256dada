//! Data access for the movie review program.
//!
//! Reads go through `getProgramAccounts` filtered by account discriminator;
//! writes are returned as unsigned transactions with the user as fee payer so
//! that a wallet (or the CLI keypair) can sign them.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use solana_sdk::{
    instruction::Instruction, message::Message, pubkey::Pubkey, signature::Signature,
    signer::Signer, transaction::Transaction,
};

use spl_token::state::Account as TokenAccount;
use solana_program::program_pack::Pack;

use crate::{
    chain::Chain,
    error::{Error, Result},
    instruction::{self, RewardAccounts},
    pda::{find_movie_address, find_review_address, find_user_vault_address, reward_token_address},
    state::{serialize_pubkey, MovieAccount, MovieReview, ProgramAccount},
    validation::{MovieForm, ReviewForm},
};

/// A decoded program account together with its address.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord<T> {
    #[serde(serialize_with = "serialize_pubkey")]
    pub public_key: Pubkey,
    pub account: T,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramAccountInfo {
    #[serde(serialize_with = "serialize_pubkey")]
    pub address: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub owner: Pubkey,
    pub executable: bool,
    pub lamports: u64,
    pub data_len: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RewardBalance {
    #[serde(serialize_with = "serialize_pubkey")]
    pub vault: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub token_account: Pubkey,
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSettings {
    pub mint: Pubkey,
    pub decimals: u8,
    /// Append the reward accounts to `createReview`/`updateReview`.
    pub attach_accounts: bool,
}

#[derive(Clone)]
pub struct MovieService {
    chain: Arc<dyn Chain>,
    program_id: Pubkey,
    rewards: Option<RewardSettings>,
}

impl MovieService {
    pub fn new(chain: Arc<dyn Chain>, program_id: Pubkey) -> Self {
        Self {
            chain,
            program_id,
            rewards: None,
        }
    }

    pub fn with_rewards(mut self, rewards: RewardSettings) -> Self {
        self.rewards = Some(rewards);
        self
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    fn reward_accounts(&self) -> Option<RewardAccounts> {
        self.rewards
            .filter(|rewards| rewards.attach_accounts)
            .map(|rewards| RewardAccounts { mint: rewards.mint })
    }

    async fn all<T: ProgramAccount>(&self) -> Result<Vec<ProgramRecord<T>>> {
        let accounts = self
            .chain
            .get_program_accounts(&self.program_id, &T::DISCRIMINATOR)
            .await?;

        let records = accounts
            .into_iter()
            .filter_map(|(address, account)| match T::decode(&address, &account.data) {
                Ok(decoded) => Some(ProgramRecord {
                    public_key: address,
                    account: decoded,
                }),
                Err(e) => {
                    tracing::warn!("Skipping undecodable {} account: {}", T::NAME, e);
                    None
                }
            })
            .collect();

        Ok(records)
    }

    async fn fetch<T: ProgramAccount>(&self, address: &Pubkey) -> Result<Option<ProgramRecord<T>>> {
        let Some(account) = self.chain.get_account(address).await? else {
            return Ok(None);
        };

        if account.owner != self.program_id {
            return Ok(None);
        }

        Ok(Some(ProgramRecord {
            public_key: *address,
            account: T::decode(address, &account.data)?,
        }))
    }

    pub async fn list_movies(&self) -> Result<Vec<ProgramRecord<MovieAccount>>> {
        self.all().await
    }

    pub async fn list_reviews(&self) -> Result<Vec<ProgramRecord<MovieReview>>> {
        self.all().await
    }

    pub async fn my_reviews(&self, reviewer: &Pubkey) -> Result<Vec<ProgramRecord<MovieReview>>> {
        let mut reviews = self.list_reviews().await?;
        reviews.retain(|review| review.account.reviewer == *reviewer);
        Ok(reviews)
    }

    pub async fn reviews_for_movie(&self, movie: &Pubkey) -> Result<Vec<ProgramRecord<MovieReview>>> {
        let mut reviews = self.list_reviews().await?;
        reviews.retain(|review| review.account.movie_address == *movie);
        Ok(reviews)
    }

    pub async fn find_movie(&self, address: &Pubkey) -> Result<Option<ProgramRecord<MovieAccount>>> {
        self.fetch(address).await
    }

    pub async fn find_movie_by_name(&self, name: &str) -> Result<ProgramRecord<MovieAccount>> {
        let (address, _) = find_movie_address(name, &self.program_id)?;

        self.fetch(&address)
            .await?
            .ok_or_else(|| Error::MovieNotFound(name.to_string()))
    }

    pub async fn find_review(
        &self,
        movie: &Pubkey,
        reviewer: &Pubkey,
    ) -> Result<Option<ProgramRecord<MovieReview>>> {
        let (address, _) = find_review_address(movie, reviewer, &self.program_id);
        self.fetch(&address).await
    }

    pub async fn program_account(&self) -> Result<ProgramAccountInfo> {
        let account = self
            .chain
            .get_account(&self.program_id)
            .await?
            .ok_or_else(|| Error::ProgramNotFound(self.program_id.to_string()))?;

        Ok(ProgramAccountInfo {
            address: self.program_id,
            owner: account.owner,
            executable: account.executable,
            lamports: account.lamports,
            data_len: account.data.len(),
        })
    }

    /// Balance of the user's reward vault; zero until the first reward is minted.
    pub async fn reward_balance(&self, user: &Pubkey) -> Result<RewardBalance> {
        let rewards = self.rewards.ok_or(Error::RewardsNotConfigured)?;

        let (vault, _) = find_user_vault_address(user, &self.program_id);
        let token_account = reward_token_address(user, &rewards.mint, &self.program_id);

        let amount = match self.chain.get_account(&token_account).await? {
            Some(account) => {
                // Token-2022 accounts share the base layout and append extensions.
                let base = account
                    .data
                    .get(..TokenAccount::LEN)
                    .ok_or_else(|| Error::AccountDecode {
                        address: token_account.to_string(),
                        reason: format!("{} bytes is shorter than a token account", account.data.len()),
                    })?;
                TokenAccount::unpack_from_slice(base)
                    .map_err(|e| Error::AccountDecode {
                        address: token_account.to_string(),
                        reason: e.to_string(),
                    })?
                    .amount
            }
            None => 0,
        };

        Ok(RewardBalance {
            vault,
            token_account,
            amount,
            decimals: rewards.decimals,
            ui_amount: format_token_amount(amount, rewards.decimals),
        })
    }

    async fn unsigned(&self, instruction: Instruction, payer: &Pubkey) -> Result<Transaction> {
        let blockhash = self.chain.latest_blockhash().await?;
        let message = Message::new_with_blockhash(&[instruction], Some(payer), &blockhash);

        Ok(Transaction::new_unsigned(message))
    }

    pub async fn create_movie_transaction(&self, user: &Pubkey, form: &MovieForm) -> Result<Transaction> {
        match self.find_movie_by_name(&form.name).await {
            Ok(_) => return Err(Error::MovieExists(form.name.clone())),
            Err(Error::MovieNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let instruction = instruction::create_movie(&self.program_id, user, form)?;
        self.unsigned(instruction, user).await
    }

    pub async fn create_review_transaction(
        &self,
        user: &Pubkey,
        movie: &Pubkey,
        form: &ReviewForm,
    ) -> Result<Transaction> {
        if self.find_movie(movie).await?.is_none() {
            return Err(Error::MovieNotFound(movie.to_string()));
        }

        let instruction = instruction::create_review(
            &self.program_id,
            user,
            movie,
            form,
            self.reward_accounts().as_ref(),
        );
        self.unsigned(instruction, user).await
    }

    pub async fn create_review_for_movie_name(
        &self,
        user: &Pubkey,
        movie_name: &str,
        form: &ReviewForm,
    ) -> Result<Transaction> {
        let movie = self.find_movie_by_name(movie_name).await?;
        self.create_review_transaction(user, &movie.public_key, form).await
    }

    async fn require_own_review(&self, user: &Pubkey, movie: &Pubkey) -> Result<()> {
        match self.find_review(movie, user).await? {
            Some(review) if review.account.reviewer == *user => Ok(()),
            _ => Err(Error::ReviewNotFound {
                movie: movie.to_string(),
                reviewer: user.to_string(),
            }),
        }
    }

    pub async fn update_review_transaction(
        &self,
        user: &Pubkey,
        movie: &Pubkey,
        form: &ReviewForm,
    ) -> Result<Transaction> {
        self.require_own_review(user, movie).await?;

        let instruction = instruction::update_review(
            &self.program_id,
            user,
            movie,
            form,
            self.reward_accounts().as_ref(),
        );
        self.unsigned(instruction, user).await
    }

    pub async fn delete_review_transaction(&self, user: &Pubkey, movie: &Pubkey) -> Result<Transaction> {
        self.require_own_review(user, movie).await?;

        let instruction = instruction::delete_movie_review(&self.program_id, user, movie);
        self.unsigned(instruction, user).await
    }

    /// Signs with a local keypair and sends.
    pub async fn submit<S: Signer>(&self, mut transaction: Transaction, signer: &S) -> Result<Signature> {
        let blockhash = transaction.message.recent_blockhash;
        transaction.try_sign(&[signer], blockhash)?;

        self.chain.send_transaction(&transaction).await
    }
}

/// Wire encoding expected by wallets: bincode, then base64.
pub fn encode_transaction(transaction: &Transaction) -> Result<String> {
    let bytes = bincode::serialize(transaction)?;
    Ok(STANDARD.encode(bytes))
}

/// Formats a raw token amount with `decimals` places, trimming trailing zeros.
pub fn format_token_amount(amount: u64, decimals: u8) -> String {
    // Past 10^38 the factor no longer fits, but every u64 is already a pure fraction.
    let (whole, fraction) = match 10u128.checked_pow(decimals as u32) {
        Some(factor) => (amount as u128 / factor, amount as u128 % factor),
        None => (0, amount as u128),
    };

    if fraction == 0 {
        return whole.to_string();
    }

    let fraction = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_amounts() {
        assert_eq!(format_token_amount(0, 9), "0");
        assert_eq!(format_token_amount(5_000_000_000_000, 9), "5000");
        assert_eq!(format_token_amount(1_500_000_000, 9), "1.5");
        assert_eq!(format_token_amount(1, 9), "0.000000001");
        assert_eq!(format_token_amount(42, 0), "42");
        assert_eq!(format_token_amount(u64::MAX, 19), "1.8446744073709551615");
    }

    #[test]
    fn token_amounts_with_oversized_decimals() {
        assert_eq!(format_token_amount(0, 39), "0");
        assert_eq!(format_token_amount(5, 40), format!("0.{}5", "0".repeat(39)));
        assert_eq!(format_token_amount(u64::MAX, u8::MAX).len(), 2 + u8::MAX as usize);
    }
}
