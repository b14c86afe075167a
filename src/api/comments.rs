//! Comment API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::CommentResponse;

/// Routes nested under `/articles`
pub fn article_router() -> Router<AppState> {
    Router::new().route("/{id}/comments", get(list_comments).post(create_comment))
}

/// Routes nested under `/comments`
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_comment))
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCommentRequest {
    pub password: String,
}

/// GET /api/v1/articles/{id}/comments
async fn list_comments(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state.comment_service.list_by_article(article_id).await?;
    Ok(Json(comments.iter().map(CommentResponse::from).collect()))
}

/// POST /api/v1/articles/{id}/comments
async fn create_comment(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let comment = state
        .comment_service
        .create(article_id, body.content, body.password)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

/// DELETE /api/v1/comments/{id}
async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<DeleteCommentRequest>,
) -> Result<StatusCode, ApiError> {
    state.comment_service.delete(id, &body.password).await?;
    Ok(StatusCode::NO_CONTENT)
}
