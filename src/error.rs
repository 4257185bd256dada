use solana_client::client_error::ClientError;
use solana_sdk::{
    instruction::InstructionError, pubkey::ParsePubkeyError, signer::SignerError,
    transaction::TransactionError,
};

use thiserror::Error;

use crate::validation::ValidationError;

/// Custom errors raised by the movie review program.
///
/// Anchor numbers user errors from 6000 in declaration order, so the
/// discriminant plus [`ReviewError::OFFSET`] is the on-chain code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewError {
    // Error 6000
    #[error("Invalid user to create movie, only admin can create movie")]
    InvalidUserToCreateMovie,
    // Error 6001
    #[error("Movie review account already exists")]
    MovieReviewAccountAlreadyExists,
    // Error 6002
    #[error("Invalid Movie, Movie does not exist")]
    InvalidMovie,
    // Error 6003
    #[error("Review comment is too long")]
    ReviewCommentTooLong,
    // Error 6004
    #[error("Reviewer name is too long")]
    ReviewerNameTooLong,
    // Error 6005
    #[error("Invalid movie rating, must be between 1 and 10")]
    InvalidMovieRating,
    // Error 6006
    #[error("Unauthorized review update attempt")]
    UnauthorizedReviewUpdate,
    // Error 6007
    #[error("Invalid mint authority for the AST mint")]
    InvalidMintAuthority,
    // Error 6008
    #[error("Cooling period not yet passed for withdrawal")]
    CoolingPeriodNotPassed,
}

impl ReviewError {
    pub const OFFSET: u32 = 6000;

    const ALL: [ReviewError; 9] = [
        ReviewError::InvalidUserToCreateMovie,
        ReviewError::MovieReviewAccountAlreadyExists,
        ReviewError::InvalidMovie,
        ReviewError::ReviewCommentTooLong,
        ReviewError::ReviewerNameTooLong,
        ReviewError::InvalidMovieRating,
        ReviewError::UnauthorizedReviewUpdate,
        ReviewError::InvalidMintAuthority,
        ReviewError::CoolingPeriodNotPassed,
    ];

    pub fn code(self) -> u32 {
        Self::OFFSET + self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        let index = code.checked_sub(Self::OFFSET)? as usize;
        Self::ALL.get(index).copied()
    }

    /// Extracts a program rejection from a failed transaction, if that is what it was.
    pub fn from_transaction_error(error: &TransactionError) -> Option<Self> {
        match error {
            TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
                Self::from_code(*code)
            }
            _ => None,
        }
    }
}

/// Errors returned by the client library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("RPC request failed: {0}")]
    Rpc(#[from] Box<ClientError>),

    /// The program rejected the transaction; the message is the program's own.
    #[error("{0}")]
    Program(ReviewError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to decode account {address}: {reason}")]
    AccountDecode { address: String, reason: String },

    #[error("Movie not found: {0}")]
    MovieNotFound(String),

    #[error("Movie already exists: {0}")]
    MovieExists(String),

    #[error("Review not found for movie {movie} and reviewer {reviewer}")]
    ReviewNotFound { movie: String, reviewer: String },

    #[error("Program account {0} does not exist")]
    ProgramNotFound(String),

    #[error("Seed exceeds the maximum seed length: {0}")]
    InvalidSeed(String),

    #[error("Invalid address {value}: {source}")]
    InvalidPubkey {
        value: String,
        #[source]
        source: ParsePubkeyError,
    },

    #[error("Failed to serialize transaction: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Reward mint is not configured")]
    RewardsNotConfigured,

    #[error("Failed to sign transaction: {0}")]
    Signing(#[from] SignerError),
}

impl From<ClientError> for Error {
    fn from(error: ClientError) -> Self {
        match error
            .get_transaction_error()
            .as_ref()
            .and_then(ReviewError::from_transaction_error)
        {
            Some(review_error) => Error::Program(review_error),
            None => Error::Rpc(Box::new(error)),
        }
    }
}

impl From<ReviewError> for Error {
    fn from(error: ReviewError) -> Self {
        Error::Program(error)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parses a base58 address, keeping the offending input in the error.
pub fn parse_pubkey(value: &str) -> Result<solana_sdk::pubkey::Pubkey> {
    value.parse().map_err(|source| Error::InvalidPubkey {
        value: value.to_string(),
        source,
    })
}
