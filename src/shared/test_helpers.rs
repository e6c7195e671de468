#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use crate::core::error::AppError;
#[cfg(test)]
use crate::features::auth::MediaAuthorizer;
#[cfg(test)]
use crate::modules::storage::{
    ObjectPage, ObjectStore, PutOutcome, StorageError, StoredObject,
};

/// In-memory object store recording every call it receives.
#[cfg(test)]
pub struct RecordingStore {
    pub objects: Vec<StoredObject>,
    pub next_cursor: Option<String>,
    /// When set, every call fails with this backend message
    pub fail_with: Option<String>,
    pub list_calls: Mutex<Vec<(String, usize, Option<String>)>>,
    /// (key, byte length, content type) per put
    pub puts: Mutex<Vec<(String, usize, String)>>,
    pub deletes: Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingStore {
    pub fn with_objects(keys: &[&str]) -> Self {
        Self {
            objects: keys
                .iter()
                .map(|key| StoredObject {
                    key: key.to_string(),
                    size: 4,
                    last_modified: "2024-01-01T00:00:00.000Z".to_string(),
                    etag: Some("\"d41d8cd98f00b204e9800998ecf8427e\"".to_string()),
                })
                .collect(),
            next_cursor: None,
            fail_with: None,
            list_calls: Mutex::new(Vec::new()),
            puts: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_cursor(keys: &[&str], next_cursor: &str) -> Self {
        Self {
            next_cursor: Some(next_cursor.to_string()),
            ..Self::with_objects(keys)
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::with_objects(&[])
        }
    }

    pub fn call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
            + self.puts.lock().unwrap().len()
            + self.deletes.lock().unwrap().len()
    }

    fn fail(&self) -> Option<StorageError> {
        self.fail_with
            .as_ref()
            .map(|message| StorageError::Backend(message.clone()))
    }
}

#[cfg(test)]
#[async_trait]
impl ObjectStore for RecordingStore {
    async fn list_objects(
        &self,
        prefix: &str,
        max_keys: usize,
        cursor: Option<String>,
    ) -> Result<ObjectPage, StorageError> {
        if let Some(error) = self.fail() {
            return Err(error);
        }
        self.list_calls
            .lock()
            .unwrap()
            .push((prefix.to_string(), max_keys, cursor));

        let objects = self
            .objects
            .iter()
            .filter(|object| object.key.starts_with(prefix))
            .take(max_keys)
            .cloned()
            .collect();

        Ok(ObjectPage {
            objects,
            next_cursor: self.next_cursor.clone(),
        })
    }

    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<PutOutcome, StorageError> {
        if let Some(error) = self.fail() {
            return Err(error);
        }
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), data.len(), content_type.to_string()));

        Ok(PutOutcome {
            bucket: "test-bucket".to_string(),
            key: key.to_string(),
            location: format!("http://localhost:9000/test-bucket/{}", key),
            etag: Some("\"abc123\"".to_string()),
        })
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        if let Some(error) = self.fail() {
            return Err(error);
        }
        self.deletes.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

/// Authorizer that denies every request.
#[cfg(test)]
pub struct DenyAllAuthorizer;

#[cfg(test)]
#[async_trait]
impl MediaAuthorizer for DenyAllAuthorizer {
    async fn authorize(
        &self,
        _request: &axum::http::request::Parts,
    ) -> Result<bool, AppError> {
        Ok(false)
    }
}
