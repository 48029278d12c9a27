//! Store parameters.

/// Number of resident slots in a [`crate::BufferCache`] built with
/// [`crate::BufferCache::new`].
pub const DEFAULT_SLOTS: usize = 64;

/// Buckets in the cache's hash table. Must be a power of two.
pub const HASH_BUCKETS: usize = 32;

/// Longest byte-string the string store can intern; bounded by the one-byte
/// length field of the on-disk entry.
pub const MAX_STRING_LEN: usize = 255;
