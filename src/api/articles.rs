//! Article API endpoints
//!
//! Provides endpoints for:
//! - Creating, reading, updating and deleting articles
//! - Previous/next navigation scoped by the `board` query parameter
//! - Hashtag lookup and keyword search

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{
    summaries, ArticleResponse, ArticleSummary, ArticleViewResponse, HashtagArticlesResponse,
    SearchResponse,
};
use crate::db::repositories::ALL_BOARDS;
use crate::models::{CreateArticleInput, UpdateArticleInput};
use crate::services::normalize_tag;

/// Build the article router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_article))
        .route("/hashtag", get(articles_by_hashtag))
        .route("/search", get(search_articles))
        .route(
            "/{id}",
            get(get_article).put(update_article).delete(delete_article),
        )
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub board_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ArticleViewQuery {
    #[serde(default)]
    pub board: i64,
}

#[derive(Debug, Deserialize)]
pub struct HashtagQuery {
    pub tag: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_criteria")]
    pub criteria: String,
    #[serde(default)]
    pub board_id: i64,
}

fn default_criteria() -> String {
    "title".to_string()
}

/// POST /api/v1/articles
async fn create_article(
    State(state): State<AppState>,
    Json(body): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let input = CreateArticleInput {
        board_id: body.board_id,
        title: body.title,
        content: body.content,
        password: body.password,
    };

    let detail = state.article_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// GET /api/v1/articles/{id}?board=N
async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ArticleViewQuery>,
) -> Result<Json<ArticleViewResponse>, ApiError> {
    let detail = state.article_service.read_one(id).await?;
    let before = state.article_service.get_front(query.board, id).await?;
    let after = state.article_service.get_back(query.board, id).await?;

    Ok(Json(ArticleViewResponse {
        article: detail.into(),
        board: query.board,
        before: before.as_ref().map(ArticleSummary::from),
        after: after.as_ref().map(ArticleSummary::from),
    }))
}

/// PUT /api/v1/articles/{id}
async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateArticleRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let input = UpdateArticleInput {
        title: body.title,
        content: body.content,
    };

    let detail = state.article_service.update(id, input, &body.password).await?;
    Ok(Json(detail.into()))
}

/// DELETE /api/v1/articles/{id}
///
/// Answers 204 whether or not a mismatched password was ignored.
async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state.article_service.delete(id, &body.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/articles/hashtag?tag=T
async fn articles_by_hashtag(
    State(state): State<AppState>,
    Query(query): Query<HashtagQuery>,
) -> Result<Json<HashtagArticlesResponse>, ApiError> {
    let articles = state.article_service.by_tag(&query.tag).await?;

    Ok(Json(HashtagArticlesResponse {
        tag: normalize_tag(&query.tag).to_string(),
        articles: summaries(&articles, false),
    }))
}

/// GET /api/v1/articles/search?q=Q&criteria=title&board_id=N
async fn search_articles(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let board_name = if query.board_id == ALL_BOARDS {
        None
    } else {
        Some(state.board_service.get(query.board_id).await?.name)
    };

    let articles = state
        .article_service
        .search(query.board_id, &query.criteria, &query.q)
        .await?;

    Ok(Json(SearchResponse {
        query: query.q,
        criteria: query.criteria,
        board_id: query.board_id,
        board_name,
        articles: summaries(&articles, false),
    }))
}
