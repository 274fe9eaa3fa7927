use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::categories::{
    create_category, delete_category, get_category, list_categories, patch_category,
    update_category,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_categories))
        .route("/{slug}", get(get_category));

    let protected = Router::new()
        .route("/", post(create_category))
        .route(
            "/{slug}",
            put(update_category)
                .patch(patch_category)
                .delete(delete_category),
        )
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
