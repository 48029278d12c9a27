//! Engine parameters.

/// Default number of temporary slots.
pub const DEFAULT_MAX_TEMPORARIES: u32 = 256;

/// Default number of variable slots.
pub const DEFAULT_MAX_VARIABLES: u32 = 256;

/// Default call-stack depth limit.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

/// Default heap arena size in bytes.
pub const DEFAULT_HEAP_SIZE: u32 = 64 * 1024;

/// Alignment of heap allocations.
pub const HEAP_ALIGN: u32 = 8;

/// Lowest address the heap allocator hands out; keeps 0 reserved as the
/// null address.
pub const HEAP_BASE: u32 = 8;
