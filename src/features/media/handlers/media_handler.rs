use axum::{
    extract::{
        multipart::Field,
        Multipart, Query, State,
    },
    Json,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::debug;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::media::dtos::{
    DeleteMediaQuery, DeleteResponseDto, MediaListQuery, MediaListResponseDto, UploadMediaDto,
    UploadResponseDto,
};
use crate::features::media::services::MediaService;

/// List media assets
///
/// Returns the objects under `directory` projected into media items, plus
/// an opaque cursor when more pages exist.
#[utoipa::path(
    get,
    path = "/api/media",
    tag = "media",
    params(MediaListQuery),
    responses(
        (status = 200, description = "Media items under the directory", body = MediaListResponseDto),
        (status = 401, description = "Authorization check failed"),
        (status = 500, description = "Storage backend failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_media(
    State(service): State<Arc<MediaService>>,
    Query(query): Query<MediaListQuery>,
) -> Result<Json<MediaListResponseDto>, AppError> {
    query
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let response = service.list(&query).await?;
    Ok(Json(response))
}

/// Upload a media asset
///
/// Accepts multipart/form-data with:
/// - `file`: the file to upload (required)
/// - `directory`: target directory within the bucket
#[utoipa::path(
    post,
    path = "/api/media",
    tag = "media",
    request_body(
        content = UploadMediaDto,
        content_type = "multipart/form-data",
        description = "Media upload form with a single file and its target directory",
    ),
    responses(
        (status = 200, description = "Backend upload result", body = UploadResponseDto),
        (status = 400, description = "Malformed multipart body"),
        (status = 401, description = "Authorization check failed"),
        (status = 500, description = "Storage backend failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_media(
    State(service): State<Arc<MediaService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponseDto>, AppError> {
    let mut staged: Option<(NamedTempFile, String, String)> = None;
    let mut directory = String::new();

    // Process multipart fields
    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        debug!("failed to read multipart field: {}", e);
        AppError::BadRequest(format!("failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let staging = stage_to_temp_file(&mut field).await?;
                staged = Some((staging, filename, content_type));
            }
            "directory" => {
                directory = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read directory field: {}", e))
                })?;
            }
            _ => {
                // Ignore unknown fields
                debug!("ignoring unknown field: {}", field_name);
            }
        }
    }

    let (staging, filename, content_type) =
        staged.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;

    let response = service
        .upload(&directory, &filename, &content_type, staging)
        .await?;

    Ok(Json(response))
}

/// Stream a multipart field into a scoped temporary file.
///
/// The file is deleted when the returned handle drops, whichever way the
/// upload ends.
async fn stage_to_temp_file(field: &mut Field<'_>) -> Result<NamedTempFile, AppError> {
    let mut staging = NamedTempFile::new()
        .map_err(|e| AppError::Upload(format!("failed to create staging file: {}", e)))?;

    let mut staged_bytes: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read file data: {}", e)))?
    {
        staging
            .write_all(&chunk)
            .map_err(|e| AppError::Upload(format!("failed to stage upload: {}", e)))?;
        staged_bytes += chunk.len() as u64;
        // Progress is diagnostic only, never surfaced to the caller
        debug!("staged {} bytes", staged_bytes);
    }

    staging
        .flush()
        .map_err(|e| AppError::Upload(format!("failed to stage upload: {}", e)))?;

    Ok(staging)
}

/// Delete a media asset
///
/// `media` is a path-like value; its second segment is the storage key.
#[utoipa::path(
    delete,
    path = "/api/media",
    tag = "media",
    params(DeleteMediaQuery),
    responses(
        (status = 200, description = "Deleted key under public_id", body = DeleteResponseDto),
        (status = 400, description = "No storage key in the media parameter"),
        (status = 401, description = "Authorization check failed"),
        (status = 500, description = "Storage backend failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_media(
    State(service): State<Arc<MediaService>>,
    Query(query): Query<DeleteMediaQuery>,
) -> Result<Json<DeleteResponseDto>, AppError> {
    let key = query
        .key()
        .ok_or_else(|| AppError::BadRequest("media must contain a storage key".to_string()))?;

    let response = service.delete(key).await?;
    Ok(Json(response))
}
