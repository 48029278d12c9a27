//! Paged on-disk object stores and the buffer cache of the spillc pipeline.
//!
//! The compiler runs in a few tens of kilobytes of RAM, so nothing that
//! grows with the program being compiled lives in memory: interned strings,
//! tokens, AST nodes, symbol entries and TAC instructions are all spilled
//! into append-only files of fixed-size little-endian records. A single
//! [`BufferCache`] fronts the AST and symbol stores with a fixed pool of
//! write-back LRU slots; everything else is read and written directly.
//!
//! Every store is an explicit value owned by the caller; there is no global
//! state anywhere in this crate.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod ast;
pub mod cache;
pub mod consts;
mod error;
mod hash;
pub mod records;
pub mod strings;
pub mod sym;
pub mod tac;
pub mod tokens;

pub use ast::{AstKind, AstNode, AstStore};
pub use cache::{BufferCache, CacheStats, Mode};
pub use error::StoreError;
pub use hash::hash_bytes;
pub use records::{RecIdx, Record, RecordStore};
pub use strings::{StrOffset, StringStore};
pub use sym::{SymEntry, SymKind, SymStore};
pub use tac::TacStore;
pub use tokens::{Token, TokenKind, TokenStore};
