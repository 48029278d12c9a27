//! Write-back LRU buffer cache over the AST and symbol stores.
//!
//! The compiler never holds more than a fixed pool of AST or symbol records
//! in memory. Records are read on demand and written back lazily: a slot is
//! persisted when it is evicted, deleted via [`BufferCache::flush`], or the
//! cache is dropped. Lookup by `(mode, index)` is O(1) through a small hash
//! table with per-slot chaining.
//!
//! The recency and free lists are index-based intrusive rings with sentinel
//! anchors. Every slot is a member of exactly one ring from construction to
//! teardown, which makes the classic "touch an unlinked node" crash
//! unrepresentable. The most recently used slot sits right after the LRU
//! anchor; the eviction victim is the slot right before it.
//!
//! Borrow contract: `get_*` and `new_*` hand out `&mut` references into the
//! slot pool, so the borrow ends at the next call on the cache, exactly the
//! lifetime the slot contents are guaranteed for.

use crate::ast::{AstNode, AstStore};
use crate::consts::{DEFAULT_SLOTS, HASH_BUCKETS};
use crate::records::RecIdx;
use crate::sym::{SymEntry, SymStore};
use crate::StoreError;

/// Chain terminator for the hash links.
const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which backing store a cached record belongs to.
pub enum Mode {
    /// AST node store.
    Ast,
    /// Symbol store.
    Sym,
}

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: usize,
    next: usize,
}

#[derive(Debug)]
enum Entry {
    Ast(AstNode),
    Sym(SymEntry),
}

#[derive(Debug)]
struct Slot {
    /// Identity of the cached record; `None` while the slot is unused.
    key: Option<(Mode, RecIdx)>,
    /// Set iff the in-core copy differs from the on-disk record.
    modified: bool,
    entry: Entry,
    /// Hash chain link, [`NIL`]-terminated.
    hnext: usize,
}

#[derive(Debug, Default, Clone, Copy)]
/// Cache activity counters.
pub struct CacheStats {
    /// Lookups answered from a resident slot.
    pub hits: u64,
    /// Lookups that had to read the backing store.
    pub misses: u64,
    /// Slots reclaimed from the recency ring.
    pub evictions: u64,
    /// Records written back to their store.
    pub writebacks: u64,
}

/// Fixed-pool write-back LRU cache keyed by `(mode, record index)`.
///
/// Owns both backing stores for its lifetime; dropping the cache flushes
/// them best-effort, [`Self::close`] flushes with error reporting.
#[derive(Debug)]
pub struct BufferCache {
    ast: AstStore,
    sym: SymStore,
    slots: Vec<Slot>,
    /// Ring links for the slots plus the two sentinel anchors; index
    /// `slots.len()` is the free anchor, `slots.len() + 1` the LRU anchor.
    links: Vec<Link>,
    buckets: [usize; HASH_BUCKETS],
    stats: CacheStats,
}

impl BufferCache {
    /// Build a cache with [`DEFAULT_SLOTS`] resident slots.
    pub fn new(ast: AstStore, sym: SymStore) -> Self {
        Self::with_capacity(DEFAULT_SLOTS, ast, sym)
    }

    /// Build a cache with `capacity` resident slots.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero.
    pub fn with_capacity(capacity: usize, ast: AstStore, sym: SymStore) -> Self {
        assert!(capacity > 0, "buffer cache needs at least one slot");

        let slots = (0..capacity)
            .map(|_| Slot {
                key: None,
                modified: false,
                entry: Entry::Ast(AstNode::default()),
                hnext: NIL,
            })
            .collect();

        // All slots start on the free ring; the LRU ring starts empty.
        let free = capacity;
        let lru = capacity + 1;
        let mut links = (0..capacity)
            .map(|i| Link {
                prev: if i == 0 { free } else { i - 1 },
                next: if i + 1 == capacity { free } else { i + 1 },
            })
            .collect::<Vec<_>>();
        links.push(Link {
            prev: capacity - 1,
            next: 0,
        });
        links.push(Link { prev: lru, next: lru });

        Self {
            ast,
            sym,
            slots,
            links,
            buckets: [NIL; HASH_BUCKETS],
            stats: CacheStats::default(),
        }
    }

    /// Number of resident slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Activity counters.
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Whether `(mode, idx)` is resident, without touching the recency ring.
    pub fn contains(&self, mode: Mode, idx: RecIdx) -> bool {
        self.find(mode, idx).is_some()
    }

    /// Borrow the AST node at `idx`, reading it from the store on a miss.
    ///
    /// The slot becomes most recently used and is treated as a prospective
    /// write: it will be persisted on eviction or flush.
    pub fn get_ast(&mut self, idx: RecIdx) -> Result<&mut AstNode, StoreError> {
        let s = self.fetch(Mode::Ast, idx)?;
        match &mut self.slots[s].entry {
            Entry::Ast(rec) => Ok(rec),
            Entry::Sym(_) => unreachable!("ast fetch resolved to a sym slot"),
        }
    }

    /// Borrow the symbol entry at `idx`, reading it from the store on a
    /// miss. Same recency and write-back behavior as [`Self::get_ast`].
    pub fn get_sym(&mut self, idx: RecIdx) -> Result<&mut SymEntry, StoreError> {
        let s = self.fetch(Mode::Sym, idx)?;
        match &mut self.slots[s].entry {
            Entry::Sym(rec) => Ok(rec),
            Entry::Ast(_) => unreachable!("sym fetch resolved to an ast slot"),
        }
    }

    /// Allocate a fresh AST record on disk and return its index together
    /// with the resident, modified slot.
    pub fn new_ast(&mut self) -> Result<(RecIdx, &mut AstNode), StoreError> {
        let s = self.allocate(Mode::Ast)?;
        let slot = &mut self.slots[s];
        match (slot.key, &mut slot.entry) {
            (Some((_, idx)), Entry::Ast(rec)) => Ok((idx, rec)),
            _ => unreachable!("ast allocation resolved to a sym slot"),
        }
    }

    /// Allocate a fresh symbol record on disk and return its index together
    /// with the resident, modified slot.
    pub fn new_sym(&mut self) -> Result<(RecIdx, &mut SymEntry), StoreError> {
        let s = self.allocate(Mode::Sym)?;
        let slot = &mut self.slots[s];
        match (slot.key, &mut slot.entry) {
            (Some((_, idx)), Entry::Sym(rec)) => Ok((idx, rec)),
            _ => unreachable!("sym allocation resolved to an ast slot"),
        }
    }

    /// Mark the AST record at `idx` as free and hand its slot back to the
    /// free ring. The record stays discoverable in the hash table until the
    /// slot is physically reused.
    pub fn delete_ast(&mut self, idx: RecIdx) -> Result<(), StoreError> {
        self.remove(Mode::Ast, idx)
    }

    /// Symbol-store counterpart of [`Self::delete_ast`].
    pub fn delete_sym(&mut self, idx: RecIdx) -> Result<(), StoreError> {
        self.remove(Mode::Sym, idx)
    }

    /// Write back every modified slot. After an `Ok` return, the backing
    /// stores hold the latest value of every record the cache touched.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        for s in 0..self.slots.len() {
            self.write_back(s)?;
        }
        Ok(())
    }

    /// Flush and tear the cache down. Unlike dropping, a failed write-back
    /// is reported instead of logged.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.flush()
    }

    fn free_anchor(&self) -> usize {
        self.slots.len()
    }

    fn lru_anchor(&self) -> usize {
        self.slots.len() + 1
    }

    fn ring_unlink(&mut self, i: usize) {
        let Link { prev, next } = self.links[i];
        self.links[prev].next = next;
        self.links[next].prev = prev;
    }

    fn ring_insert_after(&mut self, anchor: usize, i: usize) {
        let next = self.links[anchor].next;
        self.links[i] = Link { prev: anchor, next };
        self.links[anchor].next = i;
        self.links[next].prev = i;
    }

    fn ring_insert_before(&mut self, anchor: usize, i: usize) {
        let prev = self.links[anchor].prev;
        self.links[i] = Link { prev, next: anchor };
        self.links[prev].next = i;
        self.links[anchor].prev = i;
    }

    fn bucket(idx: RecIdx) -> usize {
        idx as usize & (HASH_BUCKETS - 1)
    }

    fn hash_insert(&mut self, s: usize, idx: RecIdx) {
        let b = Self::bucket(idx);
        self.slots[s].hnext = self.buckets[b];
        self.buckets[b] = s;
    }

    fn hash_remove(&mut self, s: usize) {
        let Some((_, idx)) = self.slots[s].key else {
            return;
        };
        let b = Self::bucket(idx);
        let mut cur = self.buckets[b];
        if cur == s {
            self.buckets[b] = self.slots[s].hnext;
            self.slots[s].hnext = NIL;
            return;
        }
        while cur != NIL {
            let next = self.slots[cur].hnext;
            if next == s {
                self.slots[cur].hnext = self.slots[s].hnext;
                self.slots[s].hnext = NIL;
                return;
            }
            cur = next;
        }
    }

    /// Hash lookup by identity. No recency effect.
    fn find(&self, mode: Mode, idx: RecIdx) -> Option<usize> {
        let mut cur = self.buckets[Self::bucket(idx)];
        while cur != NIL {
            if self.slots[cur].key == Some((mode, idx)) {
                return Some(cur);
            }
            cur = self.slots[cur].hnext;
        }
        None
    }

    /// Make `s` the most recently used slot and mark it as a prospective
    /// write.
    fn touch(&mut self, s: usize) {
        self.ring_unlink(s);
        let lru = self.lru_anchor();
        self.ring_insert_after(lru, s);
        self.slots[s].modified = true;
    }

    fn write_back(&mut self, s: usize) -> Result<(), StoreError> {
        if !self.slots[s].modified {
            return Ok(());
        }
        let Some((mode, idx)) = self.slots[s].key else {
            return Ok(());
        };
        match &self.slots[s].entry {
            Entry::Ast(rec) => self.ast.update(idx, rec)?,
            Entry::Sym(rec) => self.sym.update(idx, rec)?,
        }
        self.slots[s].modified = false;
        self.stats.writebacks += 1;
        tracing::debug!(?mode, idx, "wrote back cache slot");
        Ok(())
    }

    /// Produce a clean, unused slot on the free ring, evicting the least
    /// recently used slot when no free one is left. The victim is written
    /// back before its hash entry disappears so the last update is never
    /// lost.
    fn take_slot(&mut self) -> Result<usize, StoreError> {
        let free = self.free_anchor();
        let mut s = self.links[free].next;
        if s == free {
            let victim = self.links[self.lru_anchor()].prev;
            debug_assert_ne!(victim, self.lru_anchor(), "slot pool is empty");
            self.stats.evictions += 1;
            tracing::debug!(slot = victim, "evicting least recently used slot");
            s = victim;
        }
        self.write_back(s)?;
        self.hash_remove(s);
        self.slots[s].key = None;
        self.ring_unlink(s);
        self.ring_insert_after(free, s);
        Ok(s)
    }

    fn fetch(&mut self, mode: Mode, idx: RecIdx) -> Result<usize, StoreError> {
        if idx == 0 {
            return Err(StoreError::BadIndex(0));
        }
        if let Some(s) = self.find(mode, idx) {
            self.stats.hits += 1;
            self.touch(s);
            return Ok(s);
        }

        self.stats.misses += 1;
        let s = self.take_slot()?;
        let entry = match mode {
            Mode::Ast => Entry::Ast(self.ast.get(idx)?),
            Mode::Sym => Entry::Sym(self.sym.get(idx)?),
        };
        let slot = &mut self.slots[s];
        slot.entry = entry;
        slot.key = Some((mode, idx));
        slot.modified = false;
        self.hash_insert(s, idx);
        self.touch(s);
        Ok(s)
    }

    /// Take a slot and bind it to a freshly appended on-disk record. Slot
    /// reuse is always eviction followed by allocation; a resident slot
    /// never changes its index.
    fn allocate(&mut self, mode: Mode) -> Result<usize, StoreError> {
        let s = self.take_slot()?;
        let (idx, entry) = match mode {
            Mode::Ast => {
                let rec = AstNode::default();
                (self.ast.add(&rec)?, Entry::Ast(rec))
            }
            Mode::Sym => {
                let rec = SymEntry::default();
                (self.sym.add(&rec)?, Entry::Sym(rec))
            }
        };
        let slot = &mut self.slots[s];
        slot.entry = entry;
        slot.key = Some((mode, idx));
        self.hash_insert(s, idx);
        self.touch(s);
        Ok(s)
    }

    fn remove(&mut self, mode: Mode, idx: RecIdx) -> Result<(), StoreError> {
        let s = self.fetch(mode, idx)?;
        match &mut self.slots[s].entry {
            Entry::Ast(rec) => *rec = AstNode::default(),
            Entry::Sym(rec) => *rec = SymEntry::default(),
        }
        self.slots[s].modified = false;
        self.ring_unlink(s);
        let free = self.free_anchor();
        self.ring_insert_before(free, s);
        Ok(())
    }
}

impl Drop for BufferCache {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            tracing::warn!(%err, "failed to flush buffer cache on drop");
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl BufferCache {
    /// Assert that the free and recency rings are disjoint, well linked and
    /// together cover the whole slot pool.
    pub fn assert_ring_invariants(&self) {
        let mut seen = vec![false; self.slots.len()];
        for anchor in [self.free_anchor(), self.lru_anchor()] {
            let mut prev = anchor;
            let mut cur = self.links[anchor].next;
            let mut steps = 0;
            while cur != anchor {
                assert!(cur < self.slots.len(), "ring link out of range");
                assert!(!seen[cur], "slot {cur} linked into two rings");
                assert_eq!(self.links[cur].prev, prev, "broken prev link at {cur}");
                seen[cur] = true;
                prev = cur;
                cur = self.links[cur].next;
                steps += 1;
                assert!(steps <= self.slots.len(), "ring does not close");
            }
            assert_eq!(self.links[anchor].prev, prev, "anchor prev mismatch");
        }
        assert!(seen.into_iter().all(|v| v), "slot missing from both rings");
    }

    /// Modified bit of a resident slot, `None` when not resident.
    pub fn resident_modified(&self, mode: Mode, idx: RecIdx) -> Option<bool> {
        self.find(mode, idx).map(|s| self.slots[s].modified)
    }
}
