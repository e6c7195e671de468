use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::media::models::MediaItem;
use crate::modules::storage::PutOutcome;
use crate::shared::constants::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

/// Maximum upload size in bytes (100MB)
pub const MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024;

/// Query parameters for listing media
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct MediaListQuery {
    /// Directory to list; empty, "/" and "''" all mean the bucket root
    pub directory: Option<String>,

    /// Maximum number of items per page (default: 500)
    #[serde(default = "default_list_limit")]
    #[validate(range(min = 1, max = 1000))]
    #[param(minimum = 1, maximum = 1000)]
    pub limit: usize,

    /// Opaque pagination cursor from a previous response
    pub offset: Option<String>,
}

fn default_list_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

impl MediaListQuery {
    /// Listing prefix for the storage call. The frontend sends several
    /// spellings of "root" (empty, "/", a literal '' token); all of them
    /// mean no prefix filter. Anything else passes through unchanged.
    pub fn prefix(&self) -> String {
        normalize_directory(self.directory.as_deref())
    }

    /// Limit clamped to what the backend accepts
    pub fn max_keys(&self) -> usize {
        self.limit.min(MAX_LIST_LIMIT)
    }
}

pub fn normalize_directory(directory: Option<&str>) -> String {
    match directory {
        Some("") | Some("/") | Some("''") | None => String::new(),
        Some(dir) => dir.to_string(),
    }
}

/// Response for a media listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaListResponseDto {
    /// Folders (always empty, see DESIGN.md) followed by files
    pub items: Vec<MediaItem>,
    /// Cursor for the next page, omitted on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Upload media request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadMediaDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Target directory within the bucket
    #[schema(example = "/assets/")]
    pub directory: Option<String>,
}

/// Backend upload result returned to the caller verbatim
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponseDto {
    /// Bucket the object was stored in
    pub bucket: String,
    /// Object key
    pub key: String,
    /// Direct URL of the stored object
    pub location: String,
    /// Entity tag reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl From<PutOutcome> for UploadResponseDto {
    fn from(outcome: PutOutcome) -> Self {
        Self {
            bucket: outcome.bucket,
            key: outcome.key,
            location: outcome.location,
            etag: outcome.etag,
        }
    }
}

/// Query parameters for deleting media
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DeleteMediaQuery {
    /// Path-like value; the first segment is discarded and the second is
    /// the storage key
    pub media: String,
}

impl DeleteMediaQuery {
    /// Storage key: the second `/`-separated segment of `media`.
    pub fn key(&self) -> Option<&str> {
        self.media.split('/').nth(1).filter(|key| !key.is_empty())
    }
}

/// Response for a successful delete
///
/// The key is reported under `public_id`, a naming carryover the frontend
/// depends on.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponseDto {
    pub public_id: String,
}
