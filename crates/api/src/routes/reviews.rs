//! Registered under `/reviews`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// ```text
/// GET    /                    list_reviews
/// GET    /{id}                get_review
/// POST   /{id}                review_submission
/// POST   /{id}/withdraw       withdraw_submission
/// GET    /{id}/conflicts      list_conflicts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::list_reviews))
        .route(
            "/{id}",
            get(reviews::get_review).post(reviews::review_submission),
        )
        .route("/{id}/withdraw", post(reviews::withdraw_submission))
        .route("/{id}/conflicts", get(reviews::list_conflicts))
}
