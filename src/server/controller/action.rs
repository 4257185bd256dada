//! Review-submission action: a wallet renders the GET descriptor as a form
//! and POSTs the filled-in fields back for an unsigned transaction.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{parse_pubkey, Error},
    server::model::{
        ActionGetResponse, ActionLinks, ActionParameter, ActionPostRequest, ActionPostResponse,
        ActionRule, ActionsJson, AppState, ErrorDto, LinkedAction,
    },
    service::encode_transaction,
    validation::validate_review,
};

pub const ACTION_PATH: &str = "/api/movies/submit-review";
pub const ACTION_VERSION: &str = "2.4";

const ALLOWED_METHODS: &str = "GET,POST,PUT,OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, Content-Encoding, Accept-Encoding, X-Accept-Action-Version, X-Accept-Blockchain-Ids";
const EXPOSED_HEADERS: &str = "X-Action-Version, X-Blockchain-Ids";

pub fn action_headers(state: &AppState) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
    headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static(EXPOSED_HEADERS));
    headers.insert("x-blockchain-ids", HeaderValue::from_static(state.cluster.blockchain_id()));
    headers.insert("x-action-version", HeaderValue::from_static(ACTION_VERSION));
    headers
}

fn respond<T: Serialize>(state: &AppState, status: StatusCode, body: T) -> Response {
    (status, action_headers(state), Json(body)).into_response()
}

fn fail(state: &AppState, status: StatusCode, message: impl Into<String>) -> Response {
    respond(state, status, ErrorDto { error: message.into() })
}

fn fail_with(state: &AppState, error: Error) -> Response {
    let status = error.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Error processing action request: {}", error);
    }
    fail(state, status, error.public_message())
}

/// CORS preflight; wallets will not render the action without it.
pub async fn options(State(state): State<AppState>) -> Response {
    (StatusCode::OK, action_headers(&state)).into_response()
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorQuery {
    pub movie: Option<String>,
    pub movie_name: Option<String>,
    pub movie_director: Option<String>,
    pub movie_hero: Option<String>,
    pub movie_release_year: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub async fn get_descriptor(
    State(state): State<AppState>,
    Query(query): Query<DescriptorQuery>,
) -> Response {
    let (Some(movie), Some(movie_name), Some(_), Some(_), Some(_)) = (
        present(&query.movie),
        present(&query.movie_name),
        present(&query.movie_director),
        present(&query.movie_hero),
        present(&query.movie_release_year),
    ) else {
        return fail(&state, StatusCode::BAD_REQUEST, "Missing required parameters");
    };
    let movie = match parse_pubkey(movie) {
        Ok(movie) => movie,
        Err(e) => return fail_with(&state, e),
    };

    let descriptor = ActionGetResponse {
        icon: state.action_icon.clone(),
        label: format!("Review {movie_name}"),
        title: String::from("Submit Movie Review"),
        description: format!(
            "Share your thoughts about {movie_name}: rate it, add comments, and be part of the community!"
        ),
        links: ActionLinks {
            actions: vec![LinkedAction {
                kind: String::from("transaction"),
                label: String::from("Submit Review"),
                href: format!("{ACTION_PATH}?movie={movie}"),
                parameters: vec![
                    ActionParameter {
                        name: String::from("reviewer_name"),
                        label: String::from("Your Name"),
                        kind: String::from("text"),
                        min: None,
                        max: None,
                        required: true,
                    },
                    ActionParameter {
                        name: String::from("rating"),
                        label: String::from("Rating (1-10)"),
                        kind: String::from("number"),
                        min: Some(1),
                        max: Some(10),
                        required: true,
                    },
                    ActionParameter {
                        name: String::from("comment"),
                        label: String::from("Your Comment"),
                        kind: String::from("textarea"),
                        min: None,
                        max: None,
                        required: true,
                    },
                ],
            }],
        },
    };

    respond(&state, StatusCode::OK, descriptor)
}

#[derive(Deserialize, Debug, Default)]
pub struct SubmitQuery {
    pub movie: Option<String>,
}

pub async fn post_review(
    State(state): State<AppState>,
    Query(query): Query<SubmitQuery>,
    body: Bytes,
) -> Response {
    let Some(movie) = present(&query.movie) else {
        return fail(&state, StatusCode::BAD_REQUEST, "Missing movie parameter");
    };

    let request: ActionPostRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return fail(&state, StatusCode::BAD_REQUEST, format!("Invalid request body: {e}"));
        }
    };

    let Some(data) = request.data else {
        return fail(&state, StatusCode::BAD_REQUEST, "Missing review data");
    };
    let Some(rating) = data.rating.value() else {
        return fail(&state, StatusCode::BAD_REQUEST, "Rating must be a number");
    };

    let result = build_review_transaction(
        &state,
        movie,
        &request.account,
        rating,
        &data.comment,
        &data.reviewer_name,
    )
    .await;

    match result {
        Ok(transaction) => respond(
            &state,
            StatusCode::OK,
            ActionPostResponse {
                kind: String::from("transaction"),
                transaction,
                message: None,
            },
        ),
        Err(e) => fail_with(&state, e),
    }
}

async fn build_review_transaction(
    state: &AppState,
    movie: &str,
    account: &str,
    rating: i64,
    comment: &str,
    reviewer_name: &str,
) -> Result<String, Error> {
    let movie = parse_pubkey(movie)?;
    let user = parse_pubkey(account)?;
    let form = validate_review(rating, comment, reviewer_name)?;

    let transaction = state
        .service
        .create_review_transaction(&user, &movie, &form)
        .await?;

    tracing::info!("Built review transaction for {} on movie {}", user, movie);

    encode_transaction(&transaction)
}

/// Maps website paths to the action API for wallet unfurling.
pub async fn actions_json(State(state): State<AppState>) -> Response {
    respond(
        &state,
        StatusCode::OK,
        ActionsJson {
            rules: vec![ActionRule {
                path_pattern: String::from("/api/movies/**"),
                api_path: String::from("/api/movies/**"),
            }],
        },
    )
}
