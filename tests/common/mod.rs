#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use solana_program::program_pack::Pack;
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use spl_token::state::{Account as TokenAccount, AccountState};

use movie_review_client::{
    chain::Chain,
    cluster::Cluster,
    error::{Error, ReviewError, Result},
    pda::{find_movie_address, find_review_address, reward_token_address, TOKEN_2022_PROGRAM_ID},
    server::model::AppState,
    service::{MovieService, RewardSettings},
    state::{MovieAccount, MovieReview, ProgramAccount},
};

pub const REWARD_DECIMALS: u8 = 9;

/// In-memory cluster holding accounts and recording sent transactions.
pub struct FakeChain {
    pub accounts: Mutex<HashMap<Pubkey, Account>>,
    pub sent: Mutex<Vec<Transaction>>,
    pub blockhash: Hash,
    pub reject_with: Mutex<Option<ReviewError>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            blockhash: Hash::new_unique(),
            reject_with: Mutex::new(None),
        }
    }

    pub fn insert(&self, address: Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(address, account);
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Chain for FakeChain {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Account)>> {
        let mut accounts: Vec<(Pubkey, Account)> = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, account)| account.owner == *program_id && account.data.starts_with(discriminator))
            .map(|(address, account)| (*address, account.clone()))
            .collect();
        accounts.sort_by_key(|(address, _)| *address);
        Ok(accounts)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.blockhash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        if let Some(error) = *self.reject_with.lock().unwrap() {
            return Err(Error::Program(error));
        }

        self.sent.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

pub fn program_owned(program_id: &Pubkey, data: Vec<u8>) -> Account {
    Account {
        lamports: 1_000_000,
        data,
        owner: *program_id,
        executable: false,
        rent_epoch: 0,
    }
}

pub fn insert_movie(chain: &FakeChain, program_id: &Pubkey, name: &str) -> Pubkey {
    let (address, bump) = find_movie_address(name, program_id).unwrap();
    let movie = MovieAccount {
        release_year: 2014,
        bump,
        movie: name.to_string(),
        director: String::from("Christopher Nolan"),
        hero: String::from("Matthew McConaughey"),
    };

    let mut data = movie.encode();
    data.resize(MovieAccount::SPACE, 0);
    chain.insert(address, program_owned(program_id, data));

    address
}

pub fn insert_review(
    chain: &FakeChain,
    program_id: &Pubkey,
    movie: &Pubkey,
    reviewer: &Pubkey,
    rating: u8,
) -> Pubkey {
    let (address, bump) = find_review_address(movie, reviewer, program_id);
    let review = MovieReview {
        movie_rating: rating,
        movie_address: *movie,
        review_comment: String::from("Docking scene still holds up"),
        reviewer_name: String::from("Murph"),
        bump,
        reviewer: *reviewer,
    };

    let mut data = review.encode();
    data.resize(MovieReview::SPACE, 0);
    chain.insert(address, program_owned(program_id, data));

    address
}

/// Token-2022 account for the user's vault, with trailing extension bytes.
pub fn insert_reward_balance(
    chain: &FakeChain,
    program_id: &Pubkey,
    mint: &Pubkey,
    user: &Pubkey,
    amount: u64,
) -> Pubkey {
    let address = reward_token_address(user, mint, program_id);
    let token = TokenAccount {
        mint: *mint,
        owner: *user,
        amount,
        state: AccountState::Initialized,
        ..TokenAccount::default()
    };

    let mut data = vec![0u8; TokenAccount::LEN + 12];
    token.pack_into_slice(&mut data[..TokenAccount::LEN]);

    chain.insert(
        address,
        Account {
            lamports: 2_039_280,
            data,
            owner: TOKEN_2022_PROGRAM_ID,
            executable: false,
            rent_epoch: 0,
        },
    );

    address
}

pub struct TestContext {
    pub chain: Arc<FakeChain>,
    pub program_id: Pubkey,
    pub reward_mint: Pubkey,
    pub service: MovieService,
}

impl TestContext {
    pub fn new(attach_reward_accounts: bool) -> Self {
        let chain = Arc::new(FakeChain::new());
        let program_id = Pubkey::new_unique();
        let reward_mint = Pubkey::new_unique();

        let service = MovieService::new(chain.clone(), program_id).with_rewards(RewardSettings {
            mint: reward_mint,
            decimals: REWARD_DECIMALS,
            attach_accounts: attach_reward_accounts,
        });

        Self {
            chain,
            program_id,
            reward_mint,
            service,
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            service: self.service.clone(),
            cluster: Cluster::Devnet,
            action_icon: String::from("https://example.com/icon.png"),
        }
    }
}
