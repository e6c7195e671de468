//! Storage module for media objects
//!
//! Defines the object-store boundary the media feature is written against
//! and the rust-s3 backed implementation used in production.

mod s3_store;
mod store;

pub use s3_store::S3ObjectStore;
pub use store::{
    normalize_error, normalize_error_text, ObjectPage, ObjectStore, PutOutcome, StorageError,
    StoredObject,
};
