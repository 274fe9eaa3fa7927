use axum::Router;

use crate::presentation::AppState;

pub(crate) mod auth;
pub(crate) mod categories;
pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/categories", categories::router(state.clone()))
        .nest("/posts", posts::router(state))
}
