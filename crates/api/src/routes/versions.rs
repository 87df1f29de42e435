use axum::routing::get;
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

/// Version routes, registered as `/versions`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/diff", get(versions::get_version_diff))
}
