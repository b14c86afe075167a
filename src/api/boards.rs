//! Board API endpoints
//!
//! - GET /api/v1/boards - every board and every article, newest first
//! - GET /api/v1/boards/{board_id} - every board, the selected board and its articles

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{summaries, BoardListResponse, BoardResponse};

/// Build the board router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_boards))
        .route("/{board_id}", get(get_board))
}

/// GET /api/v1/boards
async fn list_boards(State(state): State<AppState>) -> Result<Json<BoardListResponse>, ApiError> {
    let boards = state.board_service.list_all().await?;
    let articles = state.article_service.read_all().await?;

    Ok(Json(BoardListResponse {
        boards: boards.iter().map(BoardResponse::from).collect(),
        selected: None,
        articles: summaries(&articles, true),
    }))
}

/// GET /api/v1/boards/{board_id}
async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> Result<Json<BoardListResponse>, ApiError> {
    let detail = state.board_service.read(board_id).await?;
    let boards = state.board_service.list_all().await?;

    Ok(Json(BoardListResponse {
        boards: boards.iter().map(BoardResponse::from).collect(),
        selected: Some(BoardResponse::from(&detail.board)),
        articles: summaries(&detail.articles, true),
    }))
}
