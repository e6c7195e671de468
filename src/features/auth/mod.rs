mod authorizer;

pub use authorizer::{require_media_auth, MediaAuthorizer, StaticTokenAuthorizer};
