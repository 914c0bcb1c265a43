//! Fixed-latency backing store.
//!
//! The store accepts one outstanding request at a time and completes it a
//! configurable number of cycles later. Clients (the two caches) poll
//! [`BackingStore::take_result`] and must consume a completed result before
//! anyone issues the next request; [`BackingStore::is_available`] encodes
//! that handshake. Issuing while unavailable is a core bug and trips a debug
//! assertion.
//!
//! Requests move raw bytes, so one beat can be as wide as a whole cache
//! line; the store has no word-size ceiling of its own.

use tracing::trace;

use crate::common::SimError;
use crate::mem::MemoryImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessKind {
    Read,
    Write,
}

struct Request {
    kind: AccessKind,
    addr: u32,
    /// Bytes to write, or a zeroed buffer sized for the read.
    data: Vec<u8>,
    cycles_left: u64,
}

/// The timed memory endpoint below the caches.
pub struct BackingStore {
    image: MemoryImage,
    latency: u64,
    request: Option<Request>,
    result: Option<Vec<u8>>,
}

impl BackingStore {
    /// Wraps `image` with a request protocol of the given fixed latency.
    ///
    /// A latency of zero is clamped to one: completion is always observed on
    /// a later cycle than the issue.
    pub fn new(image: MemoryImage, latency: u64) -> Self {
        Self {
            image,
            latency: latency.max(1),
            request: None,
            result: None,
        }
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.request.is_some()
    }

    /// Whether a new request may be issued: idle and no unconsumed result.
    ///
    /// The result gate stops one cache from clobbering a completion the
    /// other cache has not picked up yet.
    pub fn is_available(&self) -> bool {
        self.request.is_none() && self.result.is_none()
    }

    /// Consumes the completed result, if any.
    ///
    /// Reads yield the bytes loaded; writes echo the bytes written back
    /// (callers ignore them).
    pub fn take_result(&mut self) -> Option<Vec<u8>> {
        self.result.take()
    }

    /// Issues a timed read of `num_bytes` at `addr`.
    pub fn send_read(&mut self, addr: u32, num_bytes: u32) {
        debug_assert!(self.is_available(), "read issued to unavailable store");
        trace!(addr = format_args!("{addr:#010x}"), num_bytes, "store read");
        self.request = Some(Request {
            kind: AccessKind::Read,
            addr,
            data: vec![0; num_bytes as usize],
            cycles_left: self.latency,
        });
    }

    /// Issues a timed write of `bytes` at `addr`.
    pub fn send_write(&mut self, bytes: &[u8], addr: u32) {
        debug_assert!(self.is_available(), "write issued to unavailable store");
        trace!(
            addr = format_args!("{addr:#010x}"),
            num_bytes = bytes.len(),
            "store write"
        );
        self.request = Some(Request {
            kind: AccessKind::Write,
            addr,
            data: bytes.to_vec(),
            cycles_left: self.latency,
        });
    }

    /// Advances the store by one cycle, completing the in-flight request
    /// when its countdown reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] when the completing access overruns
    /// the image.
    pub fn clock(&mut self) -> Result<(), SimError> {
        let Some(request) = self.request.as_mut() else {
            return Ok(());
        };

        request.cycles_left -= 1;
        if request.cycles_left > 0 {
            return Ok(());
        }

        match request.kind {
            AccessKind::Read => self.image.read_into(request.addr, &mut request.data)?,
            AccessKind::Write => self.image.write_from(request.addr, &request.data)?,
        }
        self.result = self.request.take().map(|r| r.data);
        Ok(())
    }

    /// Read-only view of the underlying image.
    pub fn image(&self) -> &MemoryImage {
        &self.image
    }
}
