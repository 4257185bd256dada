//! Form validation applied before a transaction is built.
//!
//! The program enforces the same limits on-chain; checking them here turns a
//! failed transaction into an immediate, readable error.

use chrono::Datelike;
use thiserror::Error;

use solana_sdk::pubkey::MAX_SEED_LEN;

use crate::state::{MovieAccount, MovieReview};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;
pub const MIN_RELEASE_YEAR: u16 = 1900;
/// Release years may be up to this many years in the future.
pub const RELEASE_YEAR_LOOKAHEAD: u16 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at most {max} bytes, got {len}")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
    #[error("Rating must be between 1 and 10, got {0}")]
    RatingOutOfRange(i64),
    #[error("Release year must be between {min} and {max}, got {year}")]
    ReleaseYearOutOfRange { year: i64, min: u16, max: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieForm {
    pub name: String,
    pub director: String,
    pub hero: String,
    pub release_year: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub rating: u8,
    pub comment: String,
    pub reviewer_name: String,
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            len: value.len(),
        });
    }
    Ok(())
}

/// Rating arrives as an arbitrary number from forms and query strings.
pub fn rating(value: i64) -> Result<u8, ValidationError> {
    if value < MIN_RATING as i64 || value > MAX_RATING as i64 {
        return Err(ValidationError::RatingOutOfRange(value));
    }
    Ok(value as u8)
}

pub fn release_year(value: i64, current_year: i32) -> Result<u16, ValidationError> {
    let max = (current_year as i64 + RELEASE_YEAR_LOOKAHEAD as i64).clamp(0, u16::MAX as i64) as u16;
    if value < MIN_RELEASE_YEAR as i64 || value > max as i64 {
        return Err(ValidationError::ReleaseYearOutOfRange {
            year: value,
            min: MIN_RELEASE_YEAR,
            max,
        });
    }
    Ok(value as u16)
}

/// The movie name doubles as a PDA seed, so it is capped at the seed length.
pub fn movie_name(name: &str) -> Result<(), ValidationError> {
    required("Movie name", name)?;
    max_len("Movie name", name, MAX_SEED_LEN.min(MovieAccount::MAX_FIELD_LEN))
}

pub fn validate_movie(
    name: &str,
    director: &str,
    hero: &str,
    release_year_input: i64,
) -> Result<MovieForm, ValidationError> {
    movie_name(name)?;
    required("Director", director)?;
    max_len("Director", director, MovieAccount::MAX_FIELD_LEN)?;
    required("Hero", hero)?;
    max_len("Hero", hero, MovieAccount::MAX_FIELD_LEN)?;
    let release_year = release_year(release_year_input, chrono::Utc::now().year())?;

    Ok(MovieForm {
        name: name.to_string(),
        director: director.to_string(),
        hero: hero.to_string(),
        release_year,
    })
}

pub fn validate_review(
    rating_input: i64,
    comment: &str,
    reviewer_name: &str,
) -> Result<ReviewForm, ValidationError> {
    let rating = rating(rating_input)?;
    required("Review comment", comment)?;
    max_len("Review comment", comment, MovieReview::MAX_COMMENT_LEN)?;
    required("Reviewer name", reviewer_name)?;
    max_len("Reviewer name", reviewer_name, MovieReview::MAX_REVIEWER_NAME_LEN)?;

    Ok(ReviewForm {
        rating,
        comment: comment.to_string(),
        reviewer_name: reviewer_name.to_string(),
    })
}
