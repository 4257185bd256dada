use solana_sdk::pubkey::Pubkey;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;

use crate::error::{Error, Result};

pub const DISCRIMINATOR_LEN: usize = 8;

/// Anchor-owned account: an 8-byte discriminator followed by the Borsh body.
pub trait ProgramAccount: BorshDeserialize + BorshSerialize {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN];
    const NAME: &'static str;

    /// Decodes account data, ignoring the zero padding after the body.
    fn decode(address: &Pubkey, data: &[u8]) -> Result<Self> {
        let decode_error = |reason: String| Error::AccountDecode {
            address: address.to_string(),
            reason,
        };

        let (discriminator, mut body) = data
            .split_at_checked(DISCRIMINATOR_LEN)
            .ok_or_else(|| decode_error(format!("{} bytes is shorter than the discriminator", data.len())))?;

        if discriminator != Self::DISCRIMINATOR {
            return Err(decode_error(format!("not a {} account", Self::NAME)));
        }

        Self::deserialize(&mut body).map_err(|e| decode_error(e.to_string()))
    }

    fn encode(&self) -> Vec<u8> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        // Writing into a Vec cannot fail.
        self.serialize(&mut data).ok();
        data
    }
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MovieAccount {
    pub release_year: u16,
    pub bump: u8,
    pub movie: String,
    pub director: String,
    pub hero: String,
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MovieReview {
    pub movie_rating: u8,
    #[serde(serialize_with = "serialize_pubkey")]
    pub movie_address: Pubkey,
    pub review_comment: String,
    pub reviewer_name: String,
    pub bump: u8,
    #[serde(serialize_with = "serialize_pubkey")]
    pub reviewer: Pubkey,
}

impl MovieAccount {
    pub const MAX_FIELD_LEN: usize = 100;

    pub const SPACE: usize = DISCRIMINATOR_LEN
        + 2                             // release_year
        + 1                             // bump
        + (4 + Self::MAX_FIELD_LEN)     // movie
        + (4 + Self::MAX_FIELD_LEN)     // director
        + (4 + Self::MAX_FIELD_LEN);    // hero
}

impl MovieReview {
    pub const MAX_COMMENT_LEN: usize = 200;
    pub const MAX_REVIEWER_NAME_LEN: usize = 50;

    pub const SPACE: usize = DISCRIMINATOR_LEN
        + 1                                     // movie_rating
        + 32                                    // movie_address
        + (4 + Self::MAX_COMMENT_LEN)           // review_comment
        + (4 + Self::MAX_REVIEWER_NAME_LEN)     // reviewer_name
        + 1                                     // bump
        + 32;                                   // reviewer
}

impl ProgramAccount for MovieAccount {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [16, 227, 16, 231, 200, 106, 89, 6];
    const NAME: &'static str = "MovieAccount";
}

impl ProgramAccount for MovieReview {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [215, 156, 48, 235, 255, 205, 137, 94];
    const NAME: &'static str = "MovieReview";
}

pub(crate) fn serialize_pubkey<S: serde::Serializer>(
    key: &Pubkey,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(key)
}
