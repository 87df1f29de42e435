pub mod articles;
pub mod health;
pub mod reviews;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /articles                                  list, create
/// /articles/{id}                             get, update, delete
/// /articles/{id}/versions                    version history
/// /articles/{id}/submissions                 submit an edit (POST)
/// /articles/{id}/collaborators               list, grant (PUT)
/// /articles/{id}/collaborators/{user_id}     revoke (DELETE)
///
/// /reviews                                   list submissions
/// /reviews/{id}                              detail, approve/reject (POST)
/// /reviews/{id}/withdraw                     withdraw own submission (POST)
/// /reviews/{id}/conflicts                    conflict audit trail
///
/// /versions/{id}/diff                        version against its base
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/articles", articles::router())
        .nest("/reviews", reviews::router())
        .nest("/versions", versions::router())
}
