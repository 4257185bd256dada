use solana_program::program_error::ProgramError;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use solana_system_interface::program::id as system_program_id;

use spl_associated_token_account::id as associated_token_program_id;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    error::Result,
    pda::{
        find_mint_authority_address, find_movie_address, find_review_address,
        find_user_vault_address, reward_token_address, TOKEN_2022_PROGRAM_ID,
    },
    validation::{MovieForm, ReviewForm},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieReviewInstruction {
    CreateMovie {
        movie: String,
        director: String,
        hero: String,
        release_year: u16,
    },
    CreateReview {
        movie_rating: u8,
        review_comment: String,
        reviewer_name: String,
    },
    UpdateReview {
        movie_rating: u8,
        review_comment: String,
        reviewer_name: String,
    },
    DeleteMovieReview,
}

impl MovieReviewInstruction {
    pub const CREATE_MOVIE: [u8; 8] = [16, 217, 163, 168, 229, 18, 135, 254];
    pub const CREATE_REVIEW: [u8; 8] = [69, 237, 87, 43, 238, 125, 40, 1];
    pub const UPDATE_REVIEW: [u8; 8] = [254, 84, 60, 221, 68, 163, 94, 29];
    pub const DELETE_MOVIE_REVIEW: [u8; 8] = [145, 87, 218, 149, 170, 123, 217, 101];

    pub fn unpack(input: &[u8]) -> std::result::Result<Self, ProgramError> {
        let (discriminator, rest) = input
            .split_first_chunk::<8>()
            .ok_or(ProgramError::InvalidInstructionData)?;

        Ok(match *discriminator {
            Self::CREATE_MOVIE => {
                let payload = CreateMoviePayload::try_from_slice(rest)
                    .map_err(|_| ProgramError::InvalidInstructionData)?;

                Self::CreateMovie {
                    movie: payload.movie,
                    director: payload.director,
                    hero: payload.hero,
                    release_year: payload.release_year,
                }
            }
            Self::CREATE_REVIEW => {
                let payload = ReviewPayload::try_from_slice(rest)
                    .map_err(|_| ProgramError::InvalidInstructionData)?;

                Self::CreateReview {
                    movie_rating: payload.movie_rating,
                    review_comment: payload.review_comment,
                    reviewer_name: payload.reviewer_name,
                }
            }
            Self::UPDATE_REVIEW => {
                let payload = ReviewPayload::try_from_slice(rest)
                    .map_err(|_| ProgramError::InvalidInstructionData)?;

                Self::UpdateReview {
                    movie_rating: payload.movie_rating,
                    review_comment: payload.review_comment,
                    reviewer_name: payload.reviewer_name,
                }
            }
            Self::DELETE_MOVIE_REVIEW => {
                if !rest.is_empty() {
                    return Err(ProgramError::InvalidInstructionData);
                }
                Self::DeleteMovieReview
            }

            _ => return Err(ProgramError::InvalidInstructionData),
        })
    }

    /// Anchor wire format: discriminator followed by the Borsh-encoded arguments.
    pub fn pack(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(64);

        let written = match self {
            Self::CreateMovie {
                movie,
                director,
                hero,
                release_year,
            } => {
                data.extend_from_slice(&Self::CREATE_MOVIE);
                CreateMoviePayloadRef {
                    movie,
                    director,
                    hero,
                    release_year: *release_year,
                }
                .serialize(&mut data)
            }
            Self::CreateReview {
                movie_rating,
                review_comment,
                reviewer_name,
            } => {
                data.extend_from_slice(&Self::CREATE_REVIEW);
                ReviewPayloadRef {
                    movie_rating: *movie_rating,
                    review_comment,
                    reviewer_name,
                }
                .serialize(&mut data)
            }
            Self::UpdateReview {
                movie_rating,
                review_comment,
                reviewer_name,
            } => {
                data.extend_from_slice(&Self::UPDATE_REVIEW);
                ReviewPayloadRef {
                    movie_rating: *movie_rating,
                    review_comment,
                    reviewer_name,
                }
                .serialize(&mut data)
            }
            Self::DeleteMovieReview => {
                data.extend_from_slice(&Self::DELETE_MOVIE_REVIEW);
                Ok(())
            }
        };
        // Writing into a Vec cannot fail.
        written.ok();

        data
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateMovie { .. } => "createMovie",
            Self::CreateReview { .. } => "createReview",
            Self::UpdateReview { .. } => "updateReview",
            Self::DeleteMovieReview => "deleteMovieReview",
        }
    }
}

#[derive(BorshDeserialize)]
struct CreateMoviePayload {
    movie: String,
    director: String,
    hero: String,
    release_year: u16,
}

#[derive(BorshDeserialize)]
struct ReviewPayload {
    movie_rating: u8,
    review_comment: String,
    reviewer_name: String,
}

#[derive(BorshSerialize)]
struct CreateMoviePayloadRef<'a> {
    movie: &'a String,
    director: &'a String,
    hero: &'a String,
    release_year: u16,
}

#[derive(BorshSerialize)]
struct ReviewPayloadRef<'a> {
    movie_rating: u8,
    review_comment: &'a String,
    reviewer_name: &'a String,
}

/// Extra accounts expected by program builds that accrue AST rewards on
/// `createReview` and `updateReview`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardAccounts {
    pub mint: Pubkey,
}

impl RewardAccounts {
    fn account_metas(&self, user: &Pubkey, program_id: &Pubkey) -> Vec<AccountMeta> {
        let (user_vault, _) = find_user_vault_address(user, program_id);
        let (mint_authority, _) = find_mint_authority_address(program_id);

        vec![
            AccountMeta::new(user_vault, false),
            AccountMeta::new(reward_token_address(user, &self.mint, program_id), false),
            AccountMeta::new(self.mint, false),
            AccountMeta::new_readonly(mint_authority, false),
            AccountMeta::new_readonly(system_program_id(), false),
            AccountMeta::new_readonly(associated_token_program_id(), false),
            AccountMeta::new_readonly(TOKEN_2022_PROGRAM_ID, false),
        ]
    }
}

pub fn create_movie(program_id: &Pubkey, user: &Pubkey, form: &MovieForm) -> Result<Instruction> {
    let (movie_account, _) = find_movie_address(&form.name, program_id)?;

    let data = MovieReviewInstruction::CreateMovie {
        movie: form.name.clone(),
        director: form.director.clone(),
        hero: form.hero.clone(),
        release_year: form.release_year,
    }
    .pack();

    Ok(Instruction::new_with_bytes(
        *program_id,
        &data,
        vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(movie_account, false),
            AccountMeta::new_readonly(system_program_id(), false),
        ],
    ))
}

pub fn create_review(
    program_id: &Pubkey,
    user: &Pubkey,
    movie_account: &Pubkey,
    form: &ReviewForm,
    rewards: Option<&RewardAccounts>,
) -> Instruction {
    let (movie_review, _) = find_review_address(movie_account, user, program_id);

    let data = MovieReviewInstruction::CreateReview {
        movie_rating: form.rating,
        review_comment: form.comment.clone(),
        reviewer_name: form.reviewer_name.clone(),
    }
    .pack();

    let mut accounts = vec![
        AccountMeta::new(*user, true),
        AccountMeta::new_readonly(*movie_account, false),
        AccountMeta::new(movie_review, false),
    ];
    match rewards {
        Some(rewards) => accounts.extend(rewards.account_metas(user, program_id)),
        None => accounts.push(AccountMeta::new_readonly(system_program_id(), false)),
    }

    Instruction::new_with_bytes(*program_id, &data, accounts)
}

pub fn update_review(
    program_id: &Pubkey,
    user: &Pubkey,
    movie_account: &Pubkey,
    form: &ReviewForm,
    rewards: Option<&RewardAccounts>,
) -> Instruction {
    let (movie_review, _) = find_review_address(movie_account, user, program_id);

    let data = MovieReviewInstruction::UpdateReview {
        movie_rating: form.rating,
        review_comment: form.comment.clone(),
        reviewer_name: form.reviewer_name.clone(),
    }
    .pack();

    let mut accounts = vec![
        AccountMeta::new(*user, true),
        AccountMeta::new_readonly(*movie_account, false),
        AccountMeta::new(movie_review, false),
    ];
    if let Some(rewards) = rewards {
        accounts.extend(rewards.account_metas(user, program_id));
    }

    Instruction::new_with_bytes(*program_id, &data, accounts)
}

/// Closes the caller's review; rent goes back to the reviewer.
pub fn delete_movie_review(program_id: &Pubkey, user: &Pubkey, movie_account: &Pubkey) -> Instruction {
    let (movie_review, _) = find_review_address(movie_account, user, program_id);

    Instruction::new_with_bytes(
        *program_id,
        &MovieReviewInstruction::DeleteMovieReview.pack(),
        vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(movie_review, false),
            AccountMeta::new_readonly(*movie_account, false),
        ],
    )
}
