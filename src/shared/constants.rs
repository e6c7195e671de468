/// Default page size for media listings
pub const DEFAULT_LIST_LIMIT: usize = 500;

/// Maximum page size the storage backend accepts per listing call
pub const MAX_LIST_LIMIT: usize = 1000;
