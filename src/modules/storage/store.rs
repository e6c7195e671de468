//! Object-storage boundary types
//!
//! The media feature talks to storage through the `ObjectStore` trait so the
//! backend can be swapped for an in-memory fake in tests. The production
//! implementation lives in `s3_store`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage credentials: {0}")]
    Credentials(String),

    #[error("{0}")]
    Backend(String),
}

/// One object descriptor as returned by a listing call.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object key within the bucket
    pub key: String,
    /// Object size in bytes
    pub size: u64,
    /// Last-modified timestamp as reported by the backend
    pub last_modified: String,
    /// Entity tag, if the backend provided one
    pub etag: Option<String>,
}

/// One page of a listing, with the cursor for the next page.
///
/// The cursor is an opaque backend token and is passed back verbatim on the
/// next call.
#[derive(Debug, Clone)]
pub struct ObjectPage {
    pub objects: Vec<StoredObject>,
    pub next_cursor: Option<String>,
}

/// Result of a put call.
#[derive(Debug, Clone)]
pub struct PutOutcome {
    pub bucket: String,
    pub key: String,
    /// Direct URL of the stored object on the storage endpoint
    pub location: String,
    pub etag: Option<String>,
}

/// Storage primitives the media handler needs: list, put, delete.
///
/// Implementations must be safe for concurrent use by multiple in-flight
/// requests; the handle is built once and shared.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects under `prefix`, at most `max_keys` per page. `cursor`
    /// resumes a previous listing.
    async fn list_objects(
        &self,
        prefix: &str,
        max_keys: usize,
        cursor: Option<String>,
    ) -> Result<ObjectPage, StorageError>;

    /// Store `data` under `key` with the given content type.
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<PutOutcome, StorageError>;

    /// Remove the object stored under `key`.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}

/// Produce a display string from an arbitrary JSON-shaped failure value.
///
/// Storage backends are not consistent about error shapes: some raise bare
/// strings, some `{message}`, some `{error: {message}}`. Precedence: string
/// as-is, then top-level `message`, then nested `error.message`, then a
/// fixed generic phrase.
pub fn normalize_error(value: &Value) -> String {
    if let Some(s) = value.as_str() {
        return s.to_string();
    }
    if let Some(msg) = value.get("message").and_then(Value::as_str) {
        return msg.to_string();
    }
    if let Some(msg) = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return msg.to_string();
    }
    "an error occurred".to_string()
}

/// Normalize raw error text: JSON payloads go through `normalize_error`,
/// anything that does not parse is treated as a bare string.
pub fn normalize_error_text(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => normalize_error(&value),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_error_bare_string() {
        assert_eq!(normalize_error(&json!("boom")), "boom");
    }

    #[test]
    fn test_normalize_error_top_level_message() {
        assert_eq!(normalize_error(&json!({"message": "x"})), "x");
    }

    #[test]
    fn test_normalize_error_nested_message() {
        assert_eq!(normalize_error(&json!({"error": {"message": "y"}})), "y");
    }

    #[test]
    fn test_normalize_error_unknown_shape() {
        assert_eq!(normalize_error(&json!({})), "an error occurred");
        assert_eq!(normalize_error(&json!(42)), "an error occurred");
        assert_eq!(normalize_error(&json!({"message": 7})), "an error occurred");
        assert_eq!(normalize_error(&json!(null)), "an error occurred");
    }

    #[test]
    fn test_normalize_error_prefers_top_level_message() {
        let value = json!({"message": "outer", "error": {"message": "inner"}});
        assert_eq!(normalize_error(&value), "outer");
    }

    #[test]
    fn test_normalize_error_text_plain() {
        assert_eq!(normalize_error_text("connection refused"), "connection refused");
    }

    #[test]
    fn test_normalize_error_text_json_payload() {
        assert_eq!(normalize_error_text(r#"{"message": "access denied"}"#), "access denied");
        assert_eq!(normalize_error_text(r#"{"error": {"message": "no such bucket"}}"#), "no such bucket");
        assert_eq!(normalize_error_text("{}"), "an error occurred");
    }

    #[test]
    fn test_normalize_error_text_json_string_literal() {
        // A quoted JSON string parses to the string case
        assert_eq!(normalize_error_text(r#""boom""#), "boom");
    }
}
