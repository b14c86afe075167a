//! API layer - HTTP handlers and routing
//!
//! JSON endpoints live under `/api/v1`:
//! - Board listing and board pages
//! - Article CRUD, navigation, hashtag lookup and search
//! - Article image upload and removal
//! - Comment creation and removal
//!
//! Stored images are served from `/uploads`.

pub mod articles;
pub mod boards;
pub mod comments;
pub mod images;
pub mod middleware;
pub mod responses;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::db::repositories::{
    SqlxArticleImageRepository, SqlxArticleRepository, SqlxBoardRepository,
    SqlxCommentRepository, SqlxHashTagRepository,
};
use crate::db::DynDatabasePool;
use crate::services::{ArticleService, BoardService, CommentService, ImageStorage, PasswordGate};

pub use middleware::{ApiError, AppState};

/// Multipart framing allowance on top of the largest accepted image
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Wire repositories and services over a pool
pub fn build_state(pool: DynDatabasePool, config: &Config) -> AppState {
    let board_repo = SqlxBoardRepository::boxed(pool.clone());
    let article_repo = SqlxArticleRepository::boxed(pool.clone());
    let comment_repo = SqlxCommentRepository::boxed(pool.clone());
    let hashtag_repo = SqlxHashTagRepository::boxed(pool.clone());
    let image_repo = SqlxArticleImageRepository::boxed(pool);

    let gate = PasswordGate::new(config.access.password_mismatch);

    let board_service = Arc::new(BoardService::new(board_repo.clone(), article_repo.clone()));
    let article_service = Arc::new(ArticleService::new(
        article_repo.clone(),
        board_repo,
        hashtag_repo,
        image_repo,
        comment_repo.clone(),
        ImageStorage::new(config.upload.clone()),
        gate,
    ));
    let comment_service = Arc::new(CommentService::new(comment_repo, article_repo, gate));

    AppState {
        board_service,
        article_service,
        comment_service,
        upload_config: Arc::new(config.upload.clone()),
    }
}

/// Build the `/api/v1` router
pub fn build_api_router() -> Router<AppState> {
    let article_routes = articles::router()
        .merge(images::router())
        .merge(comments::article_router());

    Router::new()
        .nest("/boards", boards::router())
        .nest("/articles", article_routes)
        .nest("/comments", comments::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);
    match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => tracing::warn!("Ignoring invalid CORS origin: {}", cors_origin),
    }

    let body_limit = usize::try_from(state.upload_config.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(|| async { Redirect::to("/api/v1/boards") }))
        .nest("/api/v1", build_api_router())
        .nest_service("/uploads", ServeDir::new(&state.upload_config.path))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordMismatchPolicy;
    use crate::db::{create_test_pool, migrations};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

    struct Harness {
        server: TestServer,
        _uploads: TempDir,
    }

    async fn harness(policy: PasswordMismatchPolicy) -> Harness {
        let uploads = TempDir::new().unwrap();
        let mut config = Config::default();
        config.upload.path = uploads.path().to_path_buf();
        config.access.password_mismatch = policy;

        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let state = build_state(pool, &config);
        state
            .board_service
            .seed_defaults(&config.boards.defaults)
            .await
            .unwrap();

        let app = build_router(state, &config.server.cors_origin);
        Harness {
            server: TestServer::new(app).unwrap(),
            _uploads: uploads,
        }
    }

    async fn create_article(server: &TestServer, board_id: i64, title: &str, content: &str) -> Value {
        let response = server
            .post("/api/v1/articles")
            .json(&json!({
                "board_id": board_id,
                "title": title,
                "content": content,
                "password": "pw",
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()
    }

    fn titles(body: &Value) -> Vec<String> {
        body["articles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_root_redirects_to_boards() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        let response = h.server.get("/").await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("location").to_str().unwrap(), "/api/v1/boards");
    }

    #[tokio::test]
    async fn test_board_listing_newest_first() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        create_article(&h.server, 1, "first", "").await;
        create_article(&h.server, 2, "second", "").await;
        create_article(&h.server, 1, "third", "").await;

        let body = h.server.get("/api/v1/boards").await.json::<Value>();
        assert_eq!(body["boards"].as_array().unwrap().len(), 4);
        assert!(body["selected"].is_null());
        assert_eq!(titles(&body), vec!["third", "second", "first"]);

        let body = h.server.get("/api/v1/boards/1").await.json::<Value>();
        assert_eq!(body["selected"]["name"], "Free Board");
        assert_eq!(titles(&body), vec!["third", "first"]);

        let response = h.server.get("/api/v1/boards/99").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_article_lifecycle() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        let created = create_article(&h.server, 2, "hello", "about #rust and #axum").await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["board"]["id"], 2);
        assert_eq!(created["hashtags"], json!(["rust", "axum"]));
        assert!(created.get("password").is_none());

        let response = h
            .server
            .put(&format!("/api/v1/articles/{}", id))
            .json(&json!({"title": "hello again", "content": "#sqlx", "password": "pw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let updated = response.json::<Value>();
        assert_eq!(updated["title"], "hello again");
        assert_eq!(updated["hashtags"], json!(["sqlx"]));

        let response = h
            .server
            .delete(&format!("/api/v1/articles/{}", id))
            .json(&json!({"password": "pw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        let response = h.server.get(&format!("/api/v1/articles/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_article_validation() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;

        let response = h
            .server
            .post("/api/v1/articles")
            .json(&json!({"board_id": 1, "title": "  ", "content": "", "password": "pw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = h
            .server
            .post("/api/v1/articles")
            .json(&json!({"board_id": 42, "title": "t", "content": "", "password": "pw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_password_ignored() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        let id = create_article(&h.server, 1, "keep", "").await["id"].as_i64().unwrap();

        let response = h
            .server
            .put(&format!("/api/v1/articles/{}", id))
            .json(&json!({"title": "changed", "content": "", "password": "nope"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["title"], "keep");

        let response = h
            .server
            .delete(&format!("/api/v1/articles/{}", id))
            .json(&json!({"password": "nope"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        let response = h.server.get(&format!("/api/v1/articles/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let h = harness(PasswordMismatchPolicy::Reject).await;
        let id = create_article(&h.server, 1, "keep", "").await["id"].as_i64().unwrap();

        let response = h
            .server
            .delete(&format!("/api/v1/articles/{}", id))
            .json(&json!({"password": "nope"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(response.json::<Value>()["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_article_navigation_scope() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        let a = create_article(&h.server, 1, "a", "").await["id"].as_i64().unwrap();
        let b = create_article(&h.server, 2, "b", "").await["id"].as_i64().unwrap();
        let c = create_article(&h.server, 1, "c", "").await["id"].as_i64().unwrap();

        let body = h
            .server
            .get(&format!("/api/v1/articles/{}", b))
            .await
            .json::<Value>();
        assert_eq!(body["board"], 0);
        assert_eq!(body["before"]["id"], a);
        assert_eq!(body["after"]["id"], c);

        let body = h
            .server
            .get(&format!("/api/v1/articles/{}", a))
            .add_query_param("board", 1)
            .await
            .json::<Value>();
        assert_eq!(body["board"], 1);
        assert!(body["before"].is_null());
        assert_eq!(body["after"]["id"], c);
    }

    #[tokio::test]
    async fn test_hashtag_and_search() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        create_article(&h.server, 1, "Rust tips", "#rust").await;
        create_article(&h.server, 2, "rust news", "#rust #news").await;
        create_article(&h.server, 2, "other", "nothing here").await;

        let body = h
            .server
            .get("/api/v1/articles/hashtag")
            .add_query_param("tag", "#rust")
            .await
            .json::<Value>();
        assert_eq!(body["tag"], "rust");
        assert_eq!(titles(&body), vec!["Rust tips", "rust news"]);

        let body = h
            .server
            .get("/api/v1/articles/search")
            .add_query_param("q", "rust")
            .await
            .json::<Value>();
        assert_eq!(body["criteria"], "title");
        assert!(body["board_name"].is_null());
        assert_eq!(titles(&body), vec!["rust news"]);

        let body = h
            .server
            .get("/api/v1/articles/search")
            .add_query_param("q", "#")
            .add_query_param("criteria", "content")
            .add_query_param("board_id", 2)
            .await
            .json::<Value>();
        assert_eq!(body["board_name"], "Development Board");
        assert_eq!(titles(&body), vec!["rust news"]);

        let response = h
            .server
            .get("/api/v1/articles/search")
            .add_query_param("q", "x")
            .add_query_param("criteria", "author")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = h
            .server
            .get("/api/v1/articles/search")
            .add_query_param("q", "x")
            .add_query_param("board_id", 77)
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_comments() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        let id = create_article(&h.server, 1, "t", "").await["id"].as_i64().unwrap();

        let response = h
            .server
            .post(&format!("/api/v1/articles/{}/comments", id))
            .json(&json!({"content": "nice", "password": "cpw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let comment_id = response.json::<Value>()["id"].as_i64().unwrap();

        let article = h
            .server
            .get(&format!("/api/v1/articles/{}", id))
            .await
            .json::<Value>();
        assert_eq!(article["article"]["comments"][0]["content"], "nice");

        let listed = h
            .server
            .get(&format!("/api/v1/articles/{}/comments", id))
            .await
            .json::<Value>();
        assert_eq!(listed[0]["id"], comment_id);

        let response = h
            .server
            .delete(&format!("/api/v1/comments/{}", comment_id))
            .json(&json!({"password": "cpw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        let article = h
            .server
            .get(&format!("/api/v1/articles/{}", id))
            .await
            .json::<Value>();
        assert!(article["article"]["comments"].as_array().unwrap().is_empty());

        let response = h
            .server
            .post("/api/v1/articles/999/comments")
            .json(&json!({"content": "lost", "password": "cpw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = h
            .server
            .post("/api/v1/articles/999/comments")
            .json(&json!({"content": "", "password": "cpw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_image_upload_serve_and_delete() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        let id = create_article(&h.server, 1, "pics", "").await["id"].as_i64().unwrap();

        let form = MultipartForm::new()
            .add_text("password", "pw")
            .add_text("board", "1")
            .add_part(
                "image",
                Part::bytes(PNG.to_vec()).file_name("a.png").mime_type("image/png"),
            );
        let response = h
            .server
            .post(&format!("/api/v1/articles/{}/images", id))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["board"], 1);
        let image_id = body["image"]["id"].as_i64().unwrap();
        let link = body["image"]["link"].as_str().unwrap().to_string();
        assert!(link.starts_with("/uploads/"));

        let served = h.server.get(&link).await;
        assert_eq!(served.status_code(), StatusCode::OK);
        assert_eq!(served.as_bytes().as_ref(), PNG);

        let response = h
            .server
            .delete(&format!("/api/v1/articles/{}/images/{}", id, image_id))
            .add_query_param("board", 1)
            .json(&json!({"password": "pw"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["deleted"], true);
        assert_eq!(body["board"], 1);

        let served = h.server.get(&link).await;
        assert_eq!(served.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_image_upload_rejects_bad_input() {
        let h = harness(PasswordMismatchPolicy::Ignore).await;
        let id = create_article(&h.server, 1, "pics", "").await["id"].as_i64().unwrap();

        let form = MultipartForm::new().add_text("password", "pw").add_part(
            "image",
            Part::bytes(b"plain".to_vec()).file_name("a.txt").mime_type("text/plain"),
        );
        let response = h
            .server
            .post(&format!("/api/v1/articles/{}/images", id))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let form = MultipartForm::new().add_text("password", "pw");
        let response = h
            .server
            .post(&format!("/api/v1/articles/{}/images", id))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let form = MultipartForm::new().add_text("password", "nope").add_part(
            "image",
            Part::bytes(PNG.to_vec()).file_name("a.png").mime_type("image/png"),
        );
        let response = h
            .server
            .post(&format!("/api/v1/articles/{}/images", id))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.json::<Value>()["image"].is_null());
    }
}
