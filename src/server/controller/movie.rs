use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::{parse_pubkey, Error},
    server::model::{AppState, CreateMovieRequest, TransactionDto},
    service::encode_transaction,
    validation::validate_movie,
};

pub async fn list_movies(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let movies = state.service.list_movies().await?;

    Ok((StatusCode::OK, Json(movies)))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let movie = state.service.find_movie_by_name(&name).await?;

    Ok((StatusCode::OK, Json(movie)))
}

/// Builds an unsigned `createMovie` transaction; only the program's admin can land it.
pub async fn create_movie(
    State(state): State<AppState>,
    Json(request): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = parse_pubkey(&request.user)?;
    let form = validate_movie(
        &request.name,
        &request.director,
        &request.hero,
        request.release_year,
    )?;

    let transaction = state.service.create_movie_transaction(&user, &form).await?;

    tracing::info!("Built createMovie transaction for {:?} by {}", form.name, user);

    Ok((
        StatusCode::OK,
        Json(TransactionDto {
            transaction: encode_transaction(&transaction)?,
        }),
    ))
}
