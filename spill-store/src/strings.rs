//! Append-only interned byte-string arena.
//!
//! The on-disk format is a raw sequence of `<len: u8><bytes><0: u8>`
//! entries with no header. An interned string is identified by the 16-bit
//! byte offset of its length byte; offset 0 is reserved to mean "none", so
//! a fresh store starts with a single pad byte and real offsets begin at 1.
//!
//! Deduplication runs through an in-memory directory mapping the hash of
//! the bytes to candidate offsets; the directory is rebuilt by scanning the
//! file on [`StringStore::open`].

use crate::{consts::MAX_STRING_LEN, hash::hash_bytes, StoreError};

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Byte offset of an interned string inside its store file. 0 means "none".
pub type StrOffset = u16;

/// File-backed interning arena for the lexer's strings.
#[derive(Debug)]
pub struct StringStore {
    file: File,
    /// Current file length; the offset the next entry will get.
    len: u64,
    dir: HashMap<u32, Vec<StrOffset>>,
}

impl StringStore {
    /// Create a fresh store at `path`, truncating whatever was there.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        // Reserve offset 0 as the null sentinel.
        file.write_all(&[0])?;
        Ok(Self {
            file,
            len: 1,
            dir: HashMap::new(),
        })
    }

    /// Open an existing store and rebuild the directory from its contents.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.seek(SeekFrom::End(0))?;
        if len == 0 {
            file.write_all(&[0])?;
            return Ok(Self {
                file,
                len: 1,
                dir: HashMap::new(),
            });
        }

        let mut dir: HashMap<u32, Vec<StrOffset>> = HashMap::new();
        file.seek(SeekFrom::Start(1))?;
        let mut reader = BufReader::new(&mut file);
        let mut pos: u64 = 1;
        while pos < len {
            if pos > StrOffset::MAX as u64 {
                return Err(StoreError::Corrupt(pos));
            }
            let mut header = [0u8; 1];
            reader.read_exact(&mut header)?;
            let slen = header[0] as u64;
            if pos + 1 + slen + 1 > len {
                return Err(StoreError::Corrupt(pos));
            }
            let mut bytes = vec![0u8; slen as usize + 1];
            reader.read_exact(&mut bytes)?;
            if bytes[slen as usize] != 0 {
                return Err(StoreError::Corrupt(pos));
            }
            bytes.truncate(slen as usize);
            dir.entry(hash_bytes(&bytes)).or_default().push(pos as StrOffset);
            pos += 1 + slen + 1;
        }

        Ok(Self { file, len, dir })
    }

    /// Intern `bytes`, returning the offset of the single entry holding
    /// that byte-string.
    ///
    /// Two calls with identical bytes return identical offsets for the
    /// lifetime of the file.
    pub fn intern(&mut self, bytes: &[u8]) -> Result<StrOffset, StoreError> {
        if bytes.len() > MAX_STRING_LEN {
            return Err(StoreError::StringTooLong(bytes.len()));
        }

        let h = hash_bytes(bytes);
        if let Some(candidates) = self.dir.get(&h) {
            let candidates = candidates.clone();
            for off in candidates {
                if self.get(off)? == bytes {
                    return Ok(off);
                }
            }
        }

        if self.len > StrOffset::MAX as u64 {
            return Err(StoreError::StoreFull);
        }
        let off = self.len as StrOffset;

        self.file.seek(SeekFrom::Start(self.len))?;
        self.file.write_all(&[bytes.len() as u8])?;
        self.file.write_all(bytes)?;
        self.file.write_all(&[0])?;
        self.len += 1 + bytes.len() as u64 + 1;

        self.dir.entry(h).or_default().push(off);
        Ok(off)
    }

    /// Read the byte-string at `off`.
    ///
    /// Seeks are explicit, so reads interleave freely with [`Self::intern`].
    pub fn get(&mut self, off: StrOffset) -> Result<Vec<u8>, StoreError> {
        if off == 0 || (off as u64) >= self.len {
            return Err(StoreError::BadIndex(off as u64));
        }
        self.file.seek(SeekFrom::Start(off as u64))?;
        let mut header = [0u8; 1];
        self.file.read_exact(&mut header)?;
        let mut bytes = vec![0u8; header[0] as usize];
        self.file.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Number of distinct strings interned so far.
    pub fn distinct(&self) -> usize {
        self.dir.values().map(Vec::len).sum()
    }
}
