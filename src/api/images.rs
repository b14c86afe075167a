//! Article image endpoints
//!
//! - POST /api/v1/articles/{id}/images - multipart `password`, `image`, optional `board`
//! - DELETE /api/v1/articles/{id}/images/{image_id} - `{password}` body, optional `?board=`
//!
//! The `board` value is echoed back so clients can return to the board they came from.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ImageDeleteResponse, ImageResponse, ImageUploadResponse};
use crate::services::ImageUpload;

/// Build the image router, nested under `/articles`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/images", post(upload_image))
        .route("/{id}/images/{image_id}", delete(delete_image))
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    pub board: Option<i64>,
}

/// POST /api/v1/articles/{id}/images
async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageUploadResponse>), ApiError> {
    let mut password: Option<String> = None;
    let mut board: Option<i64> = None;
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "password" => {
                password = Some(field.text().await.map_err(|e| {
                    ApiError::validation_error(format!("Failed to read password: {}", e))
                })?);
            }
            "board" => {
                let text = field.text().await.map_err(|e| {
                    ApiError::validation_error(format!("Failed to read board: {}", e))
                })?;
                let text = text.trim();
                if !text.is_empty() {
                    board = Some(text.parse().map_err(|_| {
                        ApiError::validation_error(format!("Invalid board id: {}", text))
                    })?);
                }
            }
            "image" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;

                upload = Some(ImageUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => continue,
        }
    }

    let password = password.ok_or_else(|| ApiError::validation_error("Password is required"))?;
    let upload = upload.ok_or_else(|| ApiError::validation_error("No image provided"))?;

    let image = state.article_service.add_image(id, upload, &password).await?;
    let status = if image.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ImageUploadResponse {
            article_id: id,
            image: image.as_ref().map(ImageResponse::from),
            board,
        }),
    ))
}

/// DELETE /api/v1/articles/{id}/images/{image_id}
async fn delete_image(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(i64, i64)>,
    Query(query): Query<BoardQuery>,
    Json(body): Json<DeleteImageRequest>,
) -> Result<Json<ImageDeleteResponse>, ApiError> {
    let deleted = state
        .article_service
        .delete_image(id, image_id, &body.password)
        .await?;

    Ok(Json(ImageDeleteResponse {
        article_id: id,
        deleted,
        board: query.board,
    }))
}
