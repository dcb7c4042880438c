/// Number of categories returned by the popularity fallback when the caller
/// does not supply a limit.
pub const DEFAULT_POPULAR_LIMIT: usize = 10;

/// Longest slug produced by slug generation.
pub const MAX_SLUG_LENGTH: usize = 100;

/// Numbered suffixes tried for a derived slug before a random one is used.
pub const MAX_SLUG_SUFFIX_ATTEMPTS: u32 = 20;

/// Prefix used for slugs derived from names with no usable characters.
pub const FALLBACK_SLUG_PREFIX: &str = "category";

// Popularity weights per counter.
pub const VIEW_WEIGHT: i64 = 1;
pub const CART_ADD_WEIGHT: i64 = 3;
pub const ORDER_WEIGHT: i64 = 5;
