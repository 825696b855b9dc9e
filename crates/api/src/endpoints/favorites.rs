//! Favorite endpoints.
//!
//! Mounted outside CSRF verification, see [`super::router`].

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::post,
};
use classifieds_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::empty_ok};

async fn favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(ad_id): Path<String>,
) -> AppResult<Response> {
    state.favorite_service.add(&ad_id, &user).await?;
    Ok(empty_ok())
}

async fn unfavorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(ad_id): Path<String>,
) -> AppResult<Response> {
    state.favorite_service.remove(&ad_id, &user).await?;
    Ok(empty_ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ads/ad/{id}/favorite", post(favorite))
        .route("/ads/ad/{id}/unfavorite", post(unfavorite))
}
