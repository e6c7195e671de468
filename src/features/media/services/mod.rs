mod media_service;

pub use media_service::{build_object_key, MediaService};
