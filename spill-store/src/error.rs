use std::io;

use thiserror::Error;

/// Store error variants.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying file operation failed.
    #[error("store i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The byte-string exceeds the one-byte length field.
    #[error("string of {0} bytes exceeds the interning limit")]
    StringTooLong(usize),
    /// The store file has grown past what its offsets can address.
    #[error("store is full")]
    StoreFull,
    /// A record index or string offset outside the store, including the
    /// reserved null index 0.
    #[error("index {0} is not addressable in this store")]
    BadIndex(u64),
    /// The file contents don't parse as a sequence of records.
    #[error("store file is corrupt at offset {0}")]
    Corrupt(u64),
}
