use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    error::Error,
    server::model::{AppState, HealthDto},
};

pub async fn get_program_account(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let info = state.service.program_account().await?;

    Ok((StatusCode::OK, Json(info)))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthDto {
        status: String::from("ok"),
        cluster: state.cluster.to_string(),
        program_id: state.service.program_id().to_string(),
    })
}
