pub mod media_handler;

pub use media_handler::{delete_media, list_media, upload_media};
