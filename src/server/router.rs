//! HTTP routes for the dashboard API and the review action.

use axum::{routing::get, Router};

use crate::server::{
    controller::{action, movie, program, review, reward},
    model::AppState,
};

/// Registered endpoints:
/// - `GET|POST|OPTIONS /api/movies/submit-review` - review action (blink)
/// - `GET /actions.json` - action path mapping
/// - `GET|POST /api/movies`, `GET /api/movies/{name}`
/// - `GET|POST|PUT|DELETE /api/reviews`
/// - `GET /api/rewards/{wallet}`
/// - `GET /api/program`, `GET /api/health`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            action::ACTION_PATH,
            get(action::get_descriptor)
                .post(action::post_review)
                .options(action::options),
        )
        .route("/actions.json", get(action::actions_json).options(action::options))
        .route("/api/movies", get(movie::list_movies).post(movie::create_movie))
        .route("/api/movies/{name}", get(movie::get_movie))
        .route(
            "/api/reviews",
            get(review::list_reviews)
                .post(review::create_review)
                .put(review::update_review)
                .delete(review::delete_review),
        )
        .route("/api/rewards/{wallet}", get(reward::get_rewards))
        .route("/api/program", get(program::get_program_account))
        .route("/api/health", get(program::health))
}

pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}
