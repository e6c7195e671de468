use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::media::dtos::{
    DeleteResponseDto, MediaListQuery, MediaListResponseDto, UploadResponseDto,
};
use crate::features::media::models::MediaItem;
use crate::modules::storage::{normalize_error_text, ObjectStore};

/// Service for media operations against the object store
pub struct MediaService {
    store: Arc<dyn ObjectStore>,
    cdn_base_url: String,
}

impl MediaService {
    pub fn new(store: Arc<dyn ObjectStore>, cdn_base_url: String) -> Self {
        Self {
            store,
            cdn_base_url,
        }
    }

    /// List objects under the query's directory and project them into
    /// media items.
    pub async fn list(&self, query: &MediaListQuery) -> Result<MediaListResponseDto> {
        let page = self
            .store
            .list_objects(&query.prefix(), query.max_keys(), query.offset.clone())
            .await
            .map_err(|e| AppError::List(normalize_error_text(&e.to_string())))?;

        // Folder synthesis is not implemented; the frontend tolerates an
        // empty folder list ahead of the files.
        let folders: Vec<MediaItem> = Vec::new();
        let files = page
            .objects
            .iter()
            .map(|object| MediaItem::from_key(&object.key, &self.cdn_base_url));
        let items = folders.into_iter().chain(files).collect();

        Ok(MediaListResponseDto {
            items,
            offset: page.next_cursor,
        })
    }

    /// Send a staged upload to the object store as a single put.
    ///
    /// `staging` is consumed; the temporary file is removed when it drops,
    /// on success and failure alike.
    pub async fn upload(
        &self,
        directory: &str,
        filename: &str,
        content_type: &str,
        staging: NamedTempFile,
    ) -> Result<UploadResponseDto> {
        let key = build_object_key(directory, filename);

        let data = tokio::fs::read(staging.path())
            .await
            .map_err(|e| AppError::Upload(format!("failed to read staged upload: {}", e)))?;

        debug!("uploading {} staged bytes to key '{}'", data.len(), key);

        let outcome = self
            .store
            .put_object(&key, data, content_type)
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        info!("media uploaded: key={}", outcome.key);
        Ok(outcome.into())
    }

    /// Delete the object stored under `key`.
    pub async fn delete(&self, key: &str) -> Result<DeleteResponseDto> {
        self.store
            .delete_object(key)
            .await
            .map_err(|e| AppError::Delete(e.to_string()))?;

        info!("media deleted: key={}", key);
        Ok(DeleteResponseDto {
            public_id: key.to_string(),
        })
    }
}

/// Object key for an upload: directory with its leading slash stripped,
/// concatenated with the original filename. The caller is expected to send
/// directories with a trailing slash ("/assets/").
pub fn build_object_key(directory: &str, filename: &str) -> String {
    let directory = directory.strip_prefix('/').unwrap_or(directory);
    format!("{}{}", directory, filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::RecordingStore;
    use std::io::Write;

    fn staged(content: &[u8]) -> NamedTempFile {
        let mut staging = NamedTempFile::new().unwrap();
        staging.write_all(content).unwrap();
        staging.flush().unwrap();
        staging
    }

    #[test]
    fn test_build_object_key_strips_leading_slash() {
        assert_eq!(build_object_key("/assets/", "cat.png"), "assets/cat.png");
        assert_eq!(build_object_key("assets/", "cat.png"), "assets/cat.png");
        assert_eq!(build_object_key("/", "cat.png"), "cat.png");
        assert_eq!(build_object_key("", "cat.png"), "cat.png");
    }

    #[tokio::test]
    async fn test_upload_removes_staging_file() {
        let store = Arc::new(RecordingStore::with_objects(&[]));
        let service = MediaService::new(store.clone(), "cdn.example.com".to_string());

        let staging = staged(b"pixels");
        let path = staging.path().to_path_buf();
        service
            .upload("/assets/", "cat.png", "image/png", staging)
            .await
            .unwrap();

        assert!(!path.exists());
        assert_eq!(store.puts.lock().unwrap()[0].0, "assets/cat.png");
    }

    #[tokio::test]
    async fn test_upload_removes_staging_file_on_failure() {
        let store = Arc::new(RecordingStore::failing("boom"));
        let service = MediaService::new(store, "cdn.example.com".to_string());

        let staging = staged(b"pixels");
        let path = staging.path().to_path_buf();
        let result = service
            .upload("/assets/", "cat.png", "image/png", staging)
            .await;

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_list_failure_normalizes_backend_message() {
        let store = Arc::new(RecordingStore::failing(r#"{"message": "access denied"}"#));
        let service = MediaService::new(store, "cdn.example.com".to_string());

        let query: MediaListQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        match service.list(&query).await {
            Err(AppError::List(message)) => assert_eq!(message, "access denied"),
            other => panic!("expected list error, got {:?}", other.map(|_| ())),
        }
    }
}
