//! Single-port, write-back, write-allocate set-associative cache.
//!
//! The cache accepts one outstanding access at a time. Hits complete within
//! the issuing cycle; the requester observes the result via
//! [`Cache::request_status`]. A miss enqueues line transactions against the
//! backing store: a write-back of the victim first when it is dirty, then a
//! fill of the requested line. Line transactions move in fixed-width beats,
//! one beat per store round-trip. Once the queue drains, the original access
//! replays internally and completes as a hit.
//!
//! Issuing a new access while [`Cache::is_busy`] is a core bug and trips a
//! debug assertion; the pipeline stalls instead of double-issuing.

pub mod policies;

use std::collections::VecDeque;

use tracing::trace;

use crate::common::SimError;
use crate::config::CacheConfig;
use crate::core::units::cache::policies::ReplacementPolicy;
use crate::mem::BackingStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessKind {
    Read,
    Write,
}

/// One cache line with its tag state.
struct Line {
    data: Vec<u8>,
    /// Base address of the cached line, meaningful only when valid.
    addr: u32,
    valid: bool,
    dirty: bool,
}

impl Line {
    fn new(line_bytes: usize) -> Self {
        Self {
            data: vec![0; line_bytes],
            addr: 0,
            valid: false,
            dirty: false,
        }
    }

    /// Word-wide little-endian read for the hit path (`num_bytes` <= 4).
    fn read_word(&self, offset: usize, num_bytes: usize) -> u32 {
        let mut value: u32 = 0;
        for i in 0..num_bytes {
            value |= u32::from(self.data[offset + i]) << (8 * i);
        }
        value
    }

    /// Word-wide little-endian write for the hit path (`num_bytes` <= 4).
    fn write_word(&mut self, value: u32, offset: usize, num_bytes: usize) {
        for i in 0..num_bytes {
            self.data[offset + i] = (value >> (8 * i)) as u8;
        }
    }

    /// One beat of line data, for write-backs.
    fn beat(&self, offset: usize, num_bytes: usize) -> &[u8] {
        &self.data[offset..offset + num_bytes]
    }

    /// Installs one beat of fill data.
    fn fill(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

/// The access currently held by the cache port.
struct Request {
    kind: AccessKind,
    addr: u32,
    data: u32,
    num_bytes: u32,
    /// Set once the first lookup has been classified as a hit or a miss, so
    /// the post-fill replay does not count twice.
    classified: bool,
}

/// One line-granularity transaction against the backing store.
struct LineTransaction {
    kind: AccessKind,
    /// Line-aligned base address.
    addr: u32,
    set: usize,
    way: usize,
    bytes_done: usize,
    /// A beat has been issued to the store and its result not yet consumed.
    awaiting_store: bool,
}

/// A single-port set-associative cache.
pub struct Cache {
    name: &'static str,
    sets: usize,
    line_bytes: usize,
    fill_beat_bytes: usize,
    /// Indexed `[way][set]`.
    lines: Vec<Vec<Line>>,
    policy: Box<dyn ReplacementPolicy>,
    request: Option<Request>,
    result: Option<u32>,
    transactions: VecDeque<LineTransaction>,
    processed_this_cycle: bool,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Cache {
    /// Builds a cache from the shared cache configuration.
    ///
    /// `name` labels trace output ("icache" or "dcache").
    pub fn new(name: &'static str, config: &CacheConfig) -> Self {
        let lines = (0..config.ways)
            .map(|_| (0..config.sets).map(|_| Line::new(config.line_bytes)).collect())
            .collect();
        Self {
            name,
            sets: config.sets,
            line_bytes: config.line_bytes,
            // A zero beat width would never move a fill forward.
            fill_beat_bytes: config.fill_beat_bytes.max(1),
            lines,
            policy: policies::build(config.policy, config.sets, config.ways),
            request: None,
            result: None,
            transactions: VecDeque::new(),
            processed_this_cycle: false,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Whether the port holds an unfinished access.
    pub fn is_busy(&self) -> bool {
        self.request.is_some()
    }

    /// Result of the last completed access, if the requester has not
    /// observed a newer issue since. Reads carry the loaded value; writes
    /// echo the stored value.
    pub fn request_status(&self) -> Option<u32> {
        self.result
    }

    /// Hit count since construction.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Miss count since construction.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Dirty-victim write-backs since construction.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Issues a read of `num_bytes` at `addr` and processes it immediately,
    /// so a hit completes within the issuing cycle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Misaligned`] when the access crosses a cache
    /// line boundary; the cache array cannot serve a straddling access.
    pub fn send_read(
        &mut self,
        addr: u32,
        num_bytes: u32,
        store: &mut BackingStore,
    ) -> Result<(), SimError> {
        debug_assert!(!self.is_busy(), "read issued to busy cache port");
        self.check_within_line(addr, num_bytes)?;
        self.result = None;
        self.request = Some(Request {
            kind: AccessKind::Read,
            addr,
            data: 0,
            num_bytes,
            classified: false,
        });
        self.process(store);
        self.processed_this_cycle = true;
        Ok(())
    }

    /// Issues a write of the low `num_bytes` of `value` at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Misaligned`] when the access crosses a cache
    /// line boundary.
    pub fn send_write(
        &mut self,
        value: u32,
        addr: u32,
        num_bytes: u32,
        store: &mut BackingStore,
    ) -> Result<(), SimError> {
        debug_assert!(!self.is_busy(), "write issued to busy cache port");
        self.check_within_line(addr, num_bytes)?;
        self.result = None;
        self.request = Some(Request {
            kind: AccessKind::Write,
            addr,
            data: value,
            num_bytes,
            classified: false,
        });
        self.process(store);
        self.processed_this_cycle = true;
        Ok(())
    }

    fn check_within_line(&self, addr: u32, num_bytes: u32) -> Result<(), SimError> {
        let offset = addr as usize % self.line_bytes;
        if offset + num_bytes as usize > self.line_bytes {
            return Err(SimError::Misaligned {
                addr,
                size: num_bytes,
            });
        }
        Ok(())
    }

    /// Advances the pending access by one cycle.
    ///
    /// Skipped when the issuing stage already ran [`Self::send_read`] or
    /// [`Self::send_write`] this cycle; the issue path processed the access.
    pub fn clock(&mut self, store: &mut BackingStore) {
        if self.request.is_some() && !self.processed_this_cycle {
            self.process(store);
        }
        self.processed_this_cycle = false;
    }

    fn set_index(&self, addr: u32) -> usize {
        (addr as usize / self.line_bytes) & (self.sets - 1)
    }

    fn tag(&self, addr: u32) -> u32 {
        addr / self.line_bytes as u32
    }

    fn line_addr(&self, addr: u32) -> u32 {
        addr - (addr % self.line_bytes as u32)
    }

    fn lookup(&self, addr: u32) -> Option<usize> {
        let set = self.set_index(addr);
        let tag = self.tag(addr);
        (0..self.lines.len()).find(|&way| {
            let line = &self.lines[way][set];
            line.valid && self.tag(line.addr) == tag
        })
    }

    /// Runs the port state machine: replay the held access against the
    /// array, queueing line transactions on a miss, then advance those
    /// transactions.
    fn process(&mut self, store: &mut BackingStore) {
        if self.transactions.is_empty() {
            self.process_lookup();
        }
        self.process_transactions(store);
    }

    fn process_lookup(&mut self) {
        let Some(mut request) = self.request.take() else {
            return;
        };

        if let Some(way) = self.lookup(request.addr) {
            if !request.classified {
                self.hits += 1;
            }
            let set = self.set_index(request.addr);
            let offset = request.addr as usize % self.line_bytes;
            let line = &mut self.lines[way][set];
            let data = match request.kind {
                AccessKind::Read => line.read_word(offset, request.num_bytes as usize),
                AccessKind::Write => {
                    line.write_word(request.data, offset, request.num_bytes as usize);
                    line.dirty = true;
                    request.data
                }
            };
            self.policy.touch(set, way);
            trace!(
                cache = self.name,
                addr = format_args!("{:#010x}", request.addr),
                data = format_args!("{data:#x}"),
                "hit"
            );
            self.result = Some(data);
            return;
        }

        // Miss: pick a victim, write it back if dirty, then fill.
        if !request.classified {
            self.misses += 1;
            request.classified = true;
        }
        let set = self.set_index(request.addr);
        let way = self.policy.get_victim(set);
        let victim = &self.lines[way][set];
        let victim_dirty = victim.valid && victim.dirty;
        let victim_addr = self.line_addr(victim.addr);
        trace!(
            cache = self.name,
            addr = format_args!("{:#010x}", request.addr),
            set,
            way,
            "miss"
        );

        if victim_dirty {
            self.evictions += 1;
            self.transactions.push_back(LineTransaction {
                kind: AccessKind::Write,
                addr: victim_addr,
                set,
                way,
                bytes_done: 0,
                awaiting_store: false,
            });
        }
        self.transactions.push_back(LineTransaction {
            kind: AccessKind::Read,
            addr: self.line_addr(request.addr),
            set,
            way,
            bytes_done: 0,
            awaiting_store: false,
        });
        self.request = Some(request);
    }

    fn process_transactions(&mut self, store: &mut BackingStore) {
        loop {
            let Some(front) = self.transactions.front() else {
                return;
            };
            let (kind, addr, set, way) = (front.kind, front.addr, front.set, front.way);
            let mut bytes_done = front.bytes_done;
            let mut awaiting = front.awaiting_store;

            if awaiting {
                let Some(data) = store.take_result() else {
                    return;
                };
                if kind == AccessKind::Read {
                    self.lines[way][set].fill(bytes_done, &data);
                }
                awaiting = false;
                bytes_done += data.len();
            }

            if bytes_done == self.line_bytes {
                let line = &mut self.lines[way][set];
                if kind == AccessKind::Read {
                    line.addr = addr;
                }
                line.valid = true;
                line.dirty = false;
                self.transactions.pop_front();
                // A write-back may have the fill queued behind it; start the
                // fill within the same cycle. Once the queue drains, the held
                // access replays on the next clock and completes as a hit.
                continue;
            }

            if store.is_available() {
                let beat_addr = addr + bytes_done as u32;
                // The last beat of an odd-width line is narrower.
                let beat_bytes = self.fill_beat_bytes.min(self.line_bytes - bytes_done);
                match kind {
                    AccessKind::Read => store.send_read(beat_addr, beat_bytes as u32),
                    AccessKind::Write => {
                        store.send_write(self.lines[way][set].beat(bytes_done, beat_bytes), beat_addr);
                    }
                }
                awaiting = true;
            }

            if let Some(front) = self.transactions.front_mut() {
                front.bytes_done = bytes_done;
                front.awaiting_store = awaiting;
            }
            return;
        }
    }
}
