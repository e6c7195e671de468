use axum::{
    extract::DefaultBodyLimit, http::StatusCode, middleware::from_fn_with_state, routing::get,
    Router,
};
use std::sync::Arc;

use crate::features::auth::{require_media_auth, MediaAuthorizer};
use crate::features::media::dtos::MAX_UPLOAD_SIZE;
use crate::features::media::handlers::{delete_media, list_media, upload_media};
use crate::features::media::services::MediaService;

/// Create routes for the media feature
///
/// One method-routed endpoint. The authorizer gate runs before dispatch,
/// and verbs other than GET/POST/DELETE get a 404.
pub fn routes(service: Arc<MediaService>, authorizer: Arc<dyn MediaAuthorizer>) -> Router {
    Router::new()
        .route(
            "/api/media",
            get(list_media)
                .post(upload_media)
                .delete(delete_media)
                .fallback(unsupported_method)
                // Allow body size up to MAX_UPLOAD_SIZE + buffer for multipart overhead
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 1024 * 1024)),
        )
        .route_layer(from_fn_with_state(authorizer, require_media_auth))
        .with_state(service)
}

async fn unsupported_method() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::features::auth::StaticTokenAuthorizer;
    use crate::shared::test_helpers::{DenyAllAuthorizer, RecordingStore};

    fn server_with(store: Arc<RecordingStore>, authorizer: Arc<dyn MediaAuthorizer>) -> TestServer {
        let service = Arc::new(MediaService::new(store, "cdn.example.com".to_string()));
        TestServer::new(routes(service, authorizer)).unwrap()
    }

    fn allowing() -> Arc<dyn MediaAuthorizer> {
        Arc::new(StaticTokenAuthorizer::new(None))
    }

    #[tokio::test]
    async fn test_get_returns_items_and_offset() {
        let store = Arc::new(RecordingStore::with_cursor(
            &["assets/cat.png", "notes.txt"],
            "next-token",
        ));
        let server = server_with(store.clone(), allowing());

        let response = server.get("/api/media").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["src"], "https://cdn.example.com/assets/cat.png");
        assert_eq!(items[0]["type"], "file");
        assert_eq!(body["offset"], "next-token");

        // Default limit reaches the backend unchanged
        let calls = store.list_calls.lock().unwrap();
        assert_eq!(calls[0], ("".to_string(), 500, None));
    }

    #[tokio::test]
    async fn test_get_omits_offset_on_last_page() {
        let store = Arc::new(RecordingStore::with_objects(&["notes.txt"]));
        let server = server_with(store, allowing());

        let response = server.get("/api/media").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert!(body.get("offset").is_none());
    }

    #[tokio::test]
    async fn test_get_normalizes_root_directory_spellings() {
        for directory in ["", "/", "''"] {
            let store = Arc::new(RecordingStore::with_objects(&[]));
            let server = server_with(store.clone(), allowing());

            let response = server
                .get("/api/media")
                .add_query_param("directory", directory)
                .await;
            response.assert_status_ok();

            let calls = store.list_calls.lock().unwrap();
            assert_eq!(calls[0].0, "", "directory={:?}", directory);
        }
    }

    #[tokio::test]
    async fn test_get_passes_directory_as_prefix() {
        let store = Arc::new(RecordingStore::with_objects(&[]));
        let server = server_with(store.clone(), allowing());

        let response = server
            .get("/api/media")
            .add_query_param("directory", "assets/2024")
            .add_query_param("limit", "25")
            .add_query_param("offset", "resume-here")
            .await;
        response.assert_status_ok();

        let calls = store.list_calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (
                "assets/2024".to_string(),
                25,
                Some("resume-here".to_string())
            )
        );
    }

    #[tokio::test]
    async fn test_get_failure_returns_normalized_message() {
        let store = Arc::new(RecordingStore::failing(
            r#"{"error": {"message": "no such bucket"}}"#,
        ));
        let server = server_with(store, allowing());

        let response = server.get("/api/media").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body["e"], "no such bucket");
    }

    #[tokio::test]
    async fn test_post_uploads_under_directory_key() {
        let store = Arc::new(RecordingStore::with_objects(&[]));
        let server = server_with(store.clone(), allowing());

        let form = MultipartForm::new()
            .add_text("directory", "/assets/")
            .add_part(
                "file",
                Part::bytes(b"pixels".to_vec())
                    .file_name("cat.png")
                    .mime_type("image/png"),
            );

        let response = server.post("/api/media").multipart(form).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["key"], "assets/cat.png");
        assert_eq!(body["bucket"], "test-bucket");

        let puts = store.puts.lock().unwrap();
        assert_eq!(
            puts[0],
            ("assets/cat.png".to_string(), 6, "image/png".to_string())
        );
    }

    #[tokio::test]
    async fn test_post_without_file_is_bad_request() {
        let store = Arc::new(RecordingStore::with_objects(&[]));
        let server = server_with(store.clone(), allowing());

        let form = MultipartForm::new().add_text("directory", "/assets/");
        let response = server.post("/api/media").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_post_failure_has_no_body() {
        let store = Arc::new(RecordingStore::failing("boom"));
        let server = server_with(store, allowing());

        let form = MultipartForm::new()
            .add_text("directory", "/assets/")
            .add_part(
                "file",
                Part::bytes(b"pixels".to_vec())
                    .file_name("cat.png")
                    .mime_type("image/png"),
            );

        let response = server.post("/api/media").multipart(form).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_delete_uses_second_media_segment() {
        let store = Arc::new(RecordingStore::with_objects(&[]));
        let server = server_with(store.clone(), allowing());

        let response = server
            .delete("/api/media")
            .add_query_param("media", "ignored/key123")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["public_id"], "key123");
        assert_eq!(store.deletes.lock().unwrap()[0], "key123");
    }

    #[tokio::test]
    async fn test_delete_failure_has_no_body() {
        let store = Arc::new(RecordingStore::failing("boom"));
        let server = server_with(store, allowing());

        let response = server
            .delete("/api/media")
            .add_query_param("media", "ignored/key123")
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_denied_authorizer_short_circuits_every_verb() {
        let store = Arc::new(RecordingStore::with_objects(&["assets/cat.png"]));
        let server = server_with(store.clone(), Arc::new(DenyAllAuthorizer));

        let get = server.get("/api/media").await;
        get.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = get.json();
        assert_eq!(body["message"], "sorry this user is not authorized");

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"pixels".to_vec()).file_name("cat.png"),
        );
        let post = server.post("/api/media").multipart(form).await;
        post.assert_status(StatusCode::UNAUTHORIZED);

        let delete = server
            .delete("/api/media")
            .add_query_param("media", "ignored/key123")
            .await;
        delete.assert_status(StatusCode::UNAUTHORIZED);

        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_not_found() {
        let store = Arc::new(RecordingStore::with_objects(&[]));
        let server = server_with(store, allowing());

        let response = server.method(Method::PUT, "/api/media").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_token_gate_end_to_end() {
        let store = Arc::new(RecordingStore::with_objects(&[]));
        let server = server_with(
            store,
            Arc::new(StaticTokenAuthorizer::new(Some("sekrit".to_string()))),
        );

        let denied = server.get("/api/media").await;
        denied.assert_status(StatusCode::UNAUTHORIZED);

        let allowed = server
            .get("/api/media")
            .authorization_bearer("sekrit")
            .await;
        allowed.assert_status_ok();
    }
}
