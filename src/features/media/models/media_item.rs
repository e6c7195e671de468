//! Media item projection
//!
//! Maps a raw storage object descriptor onto the representation the CMS
//! front end consumes. Pure string work, no I/O.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Path marker after which a CDN transformation token can be spliced
pub const TRANSFORM_MARKER: &str = "/image/upload/";

/// Thumbnail transformation: 125x125, fill crop, automatic quality
pub const THUMBNAIL_TRANSFORM: &str = "w_125,h_125,c_fill,q_auto/";

/// Inline placeholder shown for video files instead of a real thumbnail
pub const VIDEO_PREVIEW_PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg%20xmlns='http://www.w3.org/2000/svg'%20width='125'%20height='125'%20viewBox='0%200%2024%2024'%3E%3Cpath%20d='M8%205v14l11-7z'/%3E%3C/svg%3E";

/// Filename extensions treated as video (no on-the-fly thumbnailing)
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogv", "mov", "avi", "mkv"];

/// One media asset as presented to the CMS front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Storage key of the object
    pub id: String,
    /// Final path segment of the public URL
    pub filename: String,
    /// Everything before the last path separator of the public URL's path
    pub directory: String,
    /// Public CDN-backed URL
    pub src: String,
    /// Thumbnail URL, or an inline placeholder for video types
    pub preview_src: String,
    /// Always the literal "file"; directories are never projected
    #[serde(rename = "type")]
    pub media_type: String,
}

impl MediaItem {
    /// Project a storage object key onto a `MediaItem` using the CDN host
    /// from configuration. Idempotent: the same key and host always yield
    /// the same item.
    pub fn from_key(key: &str, cdn_base_url: &str) -> Self {
        let src = public_url(key, cdn_base_url);

        // Derive directory/filename from the encoded path component so the
        // split matches what the URL actually serves.
        let path = format!("/{}", encode_key(key));
        let (directory, filename) = match path.rsplit_once('/') {
            Some((dir, file)) => (dir.to_string(), file.to_string()),
            None => (String::new(), path),
        };

        let preview_src = if is_video_filename(&filename) {
            VIDEO_PREVIEW_PLACEHOLDER.to_string()
        } else {
            transform_url(&src, THUMBNAIL_TRANSFORM)
        };

        Self {
            id: key.to_string(),
            filename,
            directory,
            src,
            preview_src,
            media_type: "file".to_string(),
        }
    }
}

/// Public URL for a key: fixed https scheme + CDN host + encoded key.
pub fn public_url(key: &str, cdn_base_url: &str) -> String {
    format!(
        "https://{}/{}",
        cdn_base_url.trim_end_matches('/'),
        encode_key(key)
    )
}

/// Percent-encode a key per path segment, preserving separators.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Splice a transformation token into a URL after the `/image/upload/`
/// marker. A URL without the marker, or with more than one occurrence, is
/// returned unchanged; not every CDN supports this convention.
pub fn transform_url(url: &str, transformation: &str) -> String {
    let mut occurrences = url.match_indices(TRANSFORM_MARKER);
    match (occurrences.next(), occurrences.next()) {
        (Some((index, _)), None) => {
            let splice_at = index + TRANSFORM_MARKER.len();
            format!("{}{}{}", &url[..splice_at], transformation, &url[splice_at..])
        }
        _ => url.to_string(),
    }
}

fn is_video_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_derives_directory_and_filename() {
        let item = MediaItem::from_key("assets/cat.png", "cdn.example.com");
        assert_eq!(item.id, "assets/cat.png");
        assert_eq!(item.src, "https://cdn.example.com/assets/cat.png");
        assert_eq!(item.directory, "/assets");
        assert_eq!(item.filename, "cat.png");
        assert_eq!(item.media_type, "file");
    }

    #[test]
    fn test_projection_root_key() {
        let item = MediaItem::from_key("cat.png", "cdn.example.com");
        assert_eq!(item.src, "https://cdn.example.com/cat.png");
        assert_eq!(item.directory, "");
        assert_eq!(item.filename, "cat.png");
    }

    #[test]
    fn test_projection_encodes_key_segments() {
        let item = MediaItem::from_key("photo albums/my cat.png", "cdn.example.com");
        assert_eq!(item.src, "https://cdn.example.com/photo%20albums/my%20cat.png");
        assert_eq!(item.directory, "/photo%20albums");
        assert_eq!(item.filename, "my%20cat.png");
    }

    #[test]
    fn test_projection_is_idempotent() {
        let first = MediaItem::from_key("assets/cat.png", "cdn.example.com");
        let second = MediaItem::from_key("assets/cat.png", "cdn.example.com");
        assert_eq!(first, second);
    }

    #[test]
    fn test_video_files_get_placeholder_preview() {
        for name in ["clip.mp4", "clip.MOV", "a/b/clip.webm"] {
            let item = MediaItem::from_key(name, "cdn.example.com");
            assert_eq!(item.preview_src, VIDEO_PREVIEW_PLACEHOLDER, "{}", name);
        }
    }

    #[test]
    fn test_image_preview_uses_thumbnail_transform() {
        let item = MediaItem::from_key("image/upload/cat.png", "cdn.example.com");
        assert_eq!(
            item.preview_src,
            "https://cdn.example.com/image/upload/w_125,h_125,c_fill,q_auto/cat.png"
        );
    }

    #[test]
    fn test_preview_without_marker_is_plain_src() {
        let item = MediaItem::from_key("assets/cat.png", "cdn.example.com");
        assert_eq!(item.preview_src, item.src);
    }

    #[test]
    fn test_transform_url_splices_once() {
        assert_eq!(
            transform_url("https://cdn/image/upload/cat.png", "t_thumb/"),
            "https://cdn/image/upload/t_thumb/cat.png"
        );
    }

    #[test]
    fn test_transform_url_no_marker_is_noop() {
        let url = "https://cdn/assets/cat.png";
        assert_eq!(transform_url(url, "t_thumb/"), url);
    }

    #[test]
    fn test_transform_url_duplicate_marker_is_noop() {
        let url = "https://cdn/image/upload/a/image/upload/cat.png";
        assert_eq!(transform_url(url, "t_thumb/"), url);
    }

    #[test]
    fn test_serializes_with_frontend_field_names() {
        let item = MediaItem::from_key("assets/cat.png", "cdn.example.com");
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("previewSrc").is_some());
        assert_eq!(value["type"], "file");
    }
}
