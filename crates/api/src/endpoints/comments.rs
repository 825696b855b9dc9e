//! Comment endpoints.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};
use classifieds_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::found};

fn detail_path(ad_id: &str) -> String {
    format!("/ads/ad/{ad_id}")
}

/// Posted comment. The text is stored as submitted.
#[derive(Debug, Deserialize)]
pub struct CommentSubmission {
    comment: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(ad_id): Path<String>,
    Form(form): Form<CommentSubmission>,
) -> AppResult<Response> {
    let text = form
        .comment
        .ok_or_else(|| AppError::BadRequest("comment is required".to_string()))?;

    let comment = state.comment_service.create(&ad_id, &user, text).await?;
    Ok(found(&detail_path(&comment.ad_id)))
}

/// Comment delete confirmation.
#[derive(Serialize)]
pub struct CommentDeleteView {
    id: String,
    ad_id: String,
    text: String,
}

async fn delete_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<CommentDeleteView>> {
    let comment = state.comment_service.get_owned(&id, &user.id).await?;
    Ok(Json(CommentDeleteView {
        id: comment.id,
        ad_id: comment.ad_id,
        text: comment.text,
    }))
}

async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let ad_id = state.comment_service.delete(&id, &user.id).await?;
    Ok(found(&detail_path(&ad_id)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ads/ad/{id}/comment", post(create))
        .route("/ads/comment/{id}/delete", get(delete_page).post(delete))
}
