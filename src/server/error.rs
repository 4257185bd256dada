//! HTTP mapping for library errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{error::Error, server::model::ErrorDto};

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidPubkey { .. } | Error::InvalidSeed(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::MovieNotFound(_) | Error::ReviewNotFound { .. } | Error::ProgramNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Error::MovieExists(_) => StatusCode::CONFLICT,
            Error::Program(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to a client; internal failures are not described.
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => String::from("Internal server error"),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{}", self);
        }

        (
            status,
            Json(ErrorDto {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}
