//! Program-derived addresses used by the movie review program.

use solana_sdk::pubkey::{Pubkey, MAX_SEED_LEN};

use spl_associated_token_account::get_associated_token_address_with_program_id;

use crate::error::{Error, Result};

pub const MOVIE_SEED: &[u8] = b"movie";
pub const REVIEW_SEED: &[u8] = b"review";
pub const USER_VAULT_SEED: &[u8] = b"user_vault";
pub const MINT_AUTH_SEED: &[u8] = b"mint_auth";

/// Reward tokens are minted by Token-2022.
pub const TOKEN_2022_PROGRAM_ID: Pubkey = spl_token_2022::ID;

fn find(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(Error::InvalidSeed(String::from_utf8_lossy(seed).into_owned()));
    }

    Pubkey::try_find_program_address(seeds, program_id)
        .ok_or_else(|| Error::InvalidSeed(format!("no viable bump for {} seeds", seeds.len())))
}

pub fn find_movie_address(movie_name: &str, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find(&[MOVIE_SEED, movie_name.as_bytes()], program_id)
}

pub fn find_review_address(
    movie: &Pubkey,
    reviewer: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REVIEW_SEED, movie.as_ref(), reviewer.as_ref()], program_id)
}

pub fn find_user_vault_address(user: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[USER_VAULT_SEED, user.as_ref()], program_id)
}

pub fn find_mint_authority_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[MINT_AUTH_SEED], program_id)
}

/// Token-2022 associated account holding a user's accrued rewards.
///
/// The owner is the user vault PDA, which is off-curve.
pub fn reward_token_address(user: &Pubkey, reward_mint: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (vault, _) = find_user_vault_address(user, program_id);
    get_associated_token_address_with_program_id(&vault, reward_mint, &TOKEN_2022_PROGRAM_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_address_matches_raw_derivation() {
        let program_id = Pubkey::new_unique();
        let (address, bump) = find_movie_address("Interstellar", &program_id).unwrap();

        assert_eq!(
            (address, bump),
            Pubkey::find_program_address(&[b"movie", b"Interstellar"], &program_id)
        );
    }

    #[test]
    fn movie_address_rejects_oversize_name() {
        let program_id = Pubkey::new_unique();
        let name = "x".repeat(MAX_SEED_LEN + 1);

        assert!(matches!(
            find_movie_address(&name, &program_id),
            Err(Error::InvalidSeed(_))
        ));
    }

    #[test]
    fn review_address_is_per_movie_and_reviewer() {
        let program_id = Pubkey::new_unique();
        let movie_a = Pubkey::new_unique();
        let movie_b = Pubkey::new_unique();
        let reviewer = Pubkey::new_unique();

        let (a, _) = find_review_address(&movie_a, &reviewer, &program_id);
        let (b, _) = find_review_address(&movie_b, &reviewer, &program_id);
        let (again, _) = find_review_address(&movie_a, &reviewer, &program_id);

        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn token_2022_program_id_is_canonical() {
        assert_eq!(
            TOKEN_2022_PROGRAM_ID.to_string(),
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb"
        );
        assert_ne!(TOKEN_2022_PROGRAM_ID, spl_token::ID);
    }

    #[test]
    fn reward_account_belongs_to_vault() {
        let program_id = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (vault, _) = find_user_vault_address(&user, &program_id);

        assert_eq!(
            reward_token_address(&user, &mint, &program_id),
            get_associated_token_address_with_program_id(&vault, &mint, &TOKEN_2022_PROGRAM_ID)
        );
        assert_ne!(
            reward_token_address(&user, &mint, &program_id),
            spl_associated_token_account::get_associated_token_address(&vault, &mint)
        );
    }
}
