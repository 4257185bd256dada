use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use solana_sdk::pubkey::Pubkey;

use crate::{
    error::{parse_pubkey, Error},
    pda::find_movie_address,
    server::model::{AppState, DeleteReviewRequest, ReviewFilter, ReviewRequest, TransactionDto},
    service::encode_transaction,
    validation::{validate_review, ValidationError},
};

/// Resolves the target movie from an address or, failing that, a name.
fn movie_address(
    state: &AppState,
    movie: Option<&str>,
    movie_name: Option<&str>,
) -> Result<Pubkey, Error> {
    match (movie, movie_name) {
        (Some(address), _) => parse_pubkey(address),
        (None, Some(name)) => Ok(find_movie_address(name, state.service.program_id())?.0),
        (None, None) => Err(ValidationError::Required("Movie").into()),
    }
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
) -> Result<impl IntoResponse, Error> {
    let mut reviews = match filter.reviewer.as_deref() {
        Some(reviewer) => state.service.my_reviews(&parse_pubkey(reviewer)?).await?,
        None => state.service.list_reviews().await?,
    };

    if let Some(movie) = filter.movie.as_deref() {
        let movie = parse_pubkey(movie)?;
        reviews.retain(|review| review.account.movie_address == movie);
    }

    Ok((StatusCode::OK, Json(reviews)))
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = parse_pubkey(&request.user)?;
    let form = validate_review(request.rating, &request.comment, &request.reviewer_name)?;

    let transaction = match (request.movie.as_deref(), request.movie_name.as_deref()) {
        (Some(movie), _) => {
            let movie = parse_pubkey(movie)?;
            state.service.create_review_transaction(&user, &movie, &form).await?
        }
        (None, Some(name)) => {
            state
                .service
                .create_review_for_movie_name(&user, name, &form)
                .await?
        }
        (None, None) => return Err(ValidationError::Required("Movie").into()),
    };

    Ok((
        StatusCode::OK,
        Json(TransactionDto {
            transaction: encode_transaction(&transaction)?,
        }),
    ))
}

pub async fn update_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = parse_pubkey(&request.user)?;
    let movie = movie_address(&state, request.movie.as_deref(), request.movie_name.as_deref())?;
    let form = validate_review(request.rating, &request.comment, &request.reviewer_name)?;

    let transaction = state.service.update_review_transaction(&user, &movie, &form).await?;

    Ok((
        StatusCode::OK,
        Json(TransactionDto {
            transaction: encode_transaction(&transaction)?,
        }),
    ))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Json(request): Json<DeleteReviewRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = parse_pubkey(&request.user)?;
    let movie = movie_address(&state, request.movie.as_deref(), request.movie_name.as_deref())?;

    let transaction = state.service.delete_review_transaction(&user, &movie).await?;

    Ok((
        StatusCode::OK,
        Json(TransactionDto {
            transaction: encode_transaction(&transaction)?,
        }),
    ))
}
