//! HTTP endpoints.

mod accounts;
mod ads;
mod cats;
mod comments;
mod favorites;
mod home;

use axum::{Router, extract::DefaultBodyLimit, middleware};

use crate::middleware::{AppState, auth_middleware, csrf_middleware};

/// Create the application router.
///
/// Every route except favorite/unfavorite runs behind CSRF verification.
/// Those two accept cross-site posts by design: they are idempotent toggles
/// called from page scripts and answer with an empty body.
pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    let protected = Router::new()
        .merge(home::router())
        .merge(accounts::router())
        .merge(ads::router())
        .merge(comments::router())
        .merge(cats::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            csrf_middleware,
        ));

    protected
        .merge(favorites::router())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
