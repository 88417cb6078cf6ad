use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::data::DbPool;

pub mod cards;
pub mod entries;
pub mod extract;
pub mod health;
pub mod stats;
pub mod tools;

/// Builds the application router. With `static_dir`, every path outside
/// `/api` and `/health` is served from that directory, falling back to its
/// `index.html` so the frontend can route client-side.
pub fn app(pool: DbPool, static_dir: Option<&Path>) -> Router {
    let entries_router = Router::new()
        .route("/", get(entries::list_entries).post(entries::create_entry))
        .route("/search", get(entries::search_entries))
        .route("/{id}", get(entries::get_entry).delete(entries::delete_entry))
        .with_state(pool.clone());

    let cards_router = Router::new()
        .route("/", get(cards::list_cards).post(cards::create_card))
        .route("/due", get(cards::due_cards))
        .route("/{id}", get(cards::get_card).delete(cards::delete_card))
        .route("/{id}/review", post(cards::review_card))
        .route("/{id}/reviews", get(cards::card_reviews))
        .route("/{id}/preview", get(cards::preview_card))
        .with_state(pool.clone());

    let tools_router = Router::new()
        .route("/", get(tools::list_tools))
        .route("/{name}", post(tools::call_tool))
        .with_state(pool.clone());

    let api_router = Router::new()
        .nest("/entries", entries_router)
        .nest("/cards", cards_router)
        .nest("/tools", tools_router)
        .route("/stats", get(stats::get_stats).with_state(pool))
        .fallback(health::api_not_found);

    let router = Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_router);

    let router = match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router.route("/", get(health::root)),
    };

    router.layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::TestDb;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn raw(app: &Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, text) = raw(app, method, uri, body.map(|b| b.to_string())).await;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, value)
    }

    async fn create_card(app: &Router, body: Value) -> i64 {
        let (status, created) = send(app, Method::POST, "/api/cards", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        created["card"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let db = TestDb::new();
        let app = app(db.pool.clone(), None);

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "lifelogger");
        assert_eq!(body["mode"], "api-only");

        let (_, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, Method::GET, "/api/nothing/here", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Not found"}));
    }

    #[tokio::test]
    async fn test_serves_frontend_build() {
        let db = TestDb::new();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<div id=\"app\"></div>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets").join("app.js"), "start();").unwrap();
        let app = app(db.pool.clone(), Some(dir.path()));

        let (status, body) = raw(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<div id=\"app\"></div>");

        let (status, body) = raw(&app, Method::GET, "/assets/app.js", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "start();");

        // client-side routes get the frontend's index page
        let (status, body) = raw(&app, Method::GET, "/cards/12/review", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<div id=\"app\"></div>");

        let (status, body) = send(&app, Method::GET, "/api/nothing/here", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");

        let (_, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(body["status"], "healthy");
        let (_, stats) = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(stats["total_cards"], 0);
    }

    #[tokio::test]
    async fn test_entries_api() {
        let db = TestDb::new();
        let app = app(db.pool.clone(), None);

        let (status, entry) = send(
            &app,
            Method::POST,
            "/api/entries",
            Some(json!({"content": "Tokio runs futures", "tags": ["rust", "async"]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = entry["id"].as_i64().unwrap();
        assert_eq!(entry["tags"], json!(["async", "rust"]));

        send(&app, Method::POST, "/api/entries", Some(json!({"content": "Plain note"}))).await;

        let (status, body) = send(&app, Method::POST, "/api/entries", Some(json!({"content": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Content is required");
        assert_eq!(body["status"], 400);

        let (_, list) = send(&app, Method::GET, "/api/entries?tags=rust&tags=async", None).await;
        assert_eq!(list["total"], 1);
        let (_, list) = send(&app, Method::GET, "/api/entries?limit=1", None).await;
        assert_eq!(list["total"], 2);
        assert_eq!(list["entries"].as_array().unwrap().len(), 1);

        let (_, found) = send(&app, Method::GET, "/api/entries/search?q=tokio", None).await;
        assert_eq!(found["entries"][0]["id"], id);

        let (status, _) = send(&app, Method::GET, &format!("/api/entries/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::DELETE, &format!("/api/entries/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, Method::GET, &format!("/api/entries/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], format!("Entry {id} not found"));
    }

    #[tokio::test]
    async fn test_review_api() {
        let db = TestDb::new();
        let app = app(db.pool.clone(), None);
        let id = create_card(
            &app,
            json!({"card_type": "basic", "front": "Capital of Peru?", "back": "Lima", "tags": ["geo"]}),
        )
        .await;

        let (status, preview) = send(&app, Method::GET, &format!("/api/cards/{id}/preview"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preview, json!({"again": 1, "hard": 1, "good": 2, "easy": 3}));

        let (status, result) = send(
            &app,
            Method::POST,
            &format!("/api/cards/{id}/review"),
            Some(json!({"rating": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["card"]["interval_days"], 2);
        assert_eq!(result["card"]["tags"], json!(["geo"]));
        assert_eq!(result["review"]["card_id"], id);
        assert_eq!(result["message"], "Recorded good (2). Next review in 2 day(s).");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/cards/{id}/review"),
            Some(json!({"rating": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().ends_with("got 4"));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/cards/9999/review",
            Some(json!({"rating": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, history) = send(&app, Method::GET, &format!("/api/cards/{id}/reviews"), None).await;
        assert_eq!(history["reviews"].as_array().unwrap().len(), 1);
        let (status, _) = send(&app, Method::GET, "/api/cards/9999/reviews", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, due) = send(&app, Method::GET, "/api/cards/due", None).await;
        assert_eq!(due["total"], 0);

        let (_, stats) = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(stats["total_cards"], 1);
        assert_eq!(stats["reviews_this_week"], 1);
    }

    #[tokio::test]
    async fn test_malformed_review_bodies() {
        let db = TestDb::new();
        let app = app(db.pool.clone(), None);
        let id = create_card(&app, json!({"card_type": "cloze", "front": "{{Ferris}} is a crab"})).await;
        let uri = format!("/api/cards/{id}/review");

        let (status, body) = send(&app, Method::POST, &uri, Some(json!({"rating": 4294967296i64}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "rating must be 0 (again), 1 (hard), 2 (good), or 3 (easy), got 4294967296"
        );

        for payload in [json!({"rating": 2.5}), json!({"rating": "2"}), json!({})] {
            let (status, body) = send(&app, Method::POST, &uri, Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["status"], 400);
            assert!(body["error"].is_string());
        }

        let (status, body) = raw(&app, Method::POST, &uri, Some("{\"rating\":".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["status"], 400);

        let (status, body) = raw(&app, Method::POST, "/api/entries", Some("[1, 2]".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(serde_json::from_str::<Value>(&body).unwrap()["error"].is_string());

        let (_, history) = send(&app, Method::GET, &format!("{uri}s"), None).await;
        assert!(history["reviews"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cards_api() {
        let db = TestDb::new();
        let app = app(db.pool.clone(), None);

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/cards",
            Some(json!({"card_type": "reversible", "front": "uno", "back": "one"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["reverse_card"]["back"], "uno");
        create_card(&app, json!({"card_type": "cloze", "front": "{{Rust}} is a language"})).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/cards",
            Some(json!({"card_type": "basic", "front": "no back"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "back is required for basic cards");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/cards",
            Some(json!({"card_type": "basic", "front": "q", "back": "a", "entry_id": 404})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = send(&app, Method::GET, "/api/cards?card_type=reversible", None).await;
        assert_eq!(list["total"], 2);
        let (status, _) = send(&app, Method::GET, "/api/cards?card_type=essay", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, due) = send(&app, Method::GET, "/api/cards/due?limit=2", None).await;
        assert_eq!(due["total"], 3);
        assert_eq!(due["cards"].as_array().unwrap().len(), 2);

        let id = created["card"]["id"].as_i64().unwrap();
        let (status, _) = send(&app, Method::DELETE, &format!("/api/cards/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &format!("/api/cards/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tools_api() {
        let db = TestDb::new();
        let app = app(db.pool.clone(), None);

        let (_, tools) = send(&app, Method::GET, "/api/tools", None).await;
        assert_eq!(tools.as_array().unwrap().len(), 7);

        let (status, logged) = send(
            &app,
            Method::POST,
            "/api/tools/log_entry",
            Some(json!({"content": "from a tool"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(logged["entry"]["content"], "from a tool");

        let (status, stats) = send(&app, Method::POST, "/api/tools/get_stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_entries"], 1);

        let (status, body) = send(&app, Method::POST, "/api/tools/nope", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Unknown tool: nope");
    }
}
