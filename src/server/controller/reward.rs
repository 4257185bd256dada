use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::{parse_pubkey, Error},
    server::model::AppState,
};

pub async fn get_rewards(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let wallet = parse_pubkey(&wallet)?;
    let balance = state.service.reward_balance(&wallet).await?;

    Ok((StatusCode::OK, Json(balance)))
}
