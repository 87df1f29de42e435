//! Registered under `/articles`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{articles, collaborators};
use crate::state::AppState;

/// ```text
/// GET    /                                  list_articles
/// POST   /                                  create_article
/// GET    /{id}                              get_article
/// PUT    /{id}                              update_article
/// DELETE /{id}                              delete_article
/// GET    /{id}/versions                     list_versions
/// POST   /{id}/submissions                  submit_edit
/// GET    /{id}/collaborators                list_collaborators
/// PUT    /{id}/collaborators                upsert_collaborator
/// DELETE /{id}/collaborators/{user_id}      remove_collaborator
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/{id}/versions", get(articles::list_versions))
        .route("/{id}/submissions", post(articles::submit_edit))
        .route(
            "/{id}/collaborators",
            get(collaborators::list_collaborators).put(collaborators::upsert_collaborator),
        )
        .route(
            "/{id}/collaborators/{user_id}",
            delete(collaborators::remove_collaborator),
        )
}
