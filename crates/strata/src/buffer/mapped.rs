// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! File-mapped growable buffer.

use super::{BufferError, GrowableBuffer};
use crate::config::RuntimeConfig;
use crate::transport::{FileTransport, TransportError};
use std::fmt;
use std::io;
use std::ptr::NonNull;
use std::slice;

/// Growable buffer whose bytes live directly in a file's pages.
///
/// Capacity growth delegates to the transport's `resize`: the file is
/// extended (zero-filled by the OS) and the mapping grown to cover it, so
/// serialized bytes land in the file as they are written and persisting
/// skips the copy a heap buffer pays. The buffer owns its transport; the
/// mapping lives exactly as long as the buffer-transport pair.
///
/// `data()` points into the live mapping and is stable until the next grow
/// or drop. Dropping releases the mapping without truncating the file.
pub struct MappedBuffer {
    transport: FileTransport,
    base: Option<NonNull<u8>>,
    size: usize,
    capacity: usize,
    config: RuntimeConfig,
}

// SAFETY: the mapping base is exclusively owned through the transport; no
// aliasing access exists outside this buffer.
unsafe impl Send for MappedBuffer {}

impl MappedBuffer {
    /// Wrap a transport opened with [`FileTransport::open_mapped`].
    ///
    /// An existing file (append mode) is adopted as-is: its on-disk size
    /// becomes the initial size and capacity.
    pub fn new(transport: FileTransport, config: RuntimeConfig) -> Result<Self, BufferError> {
        if !transport.is_mapped() {
            return Err(BufferError::Transport(TransportError::InvalidState {
                path: transport.path().to_string(),
                operation: "MappedBuffer::new (transport not opened mapped)",
                state: transport.state(),
            }));
        }
        let on_disk = transport.size_on_disk()? as usize;
        let mut buffer = Self {
            transport,
            base: None,
            size: on_disk,
            capacity: on_disk,
            config,
        };
        if on_disk > 0 {
            buffer.base = buffer.transport.resize(on_disk as u64)?;
        }
        Ok(buffer)
    }

    /// Commit the buffer's contents: trim the file to exactly the logical
    /// size.
    ///
    /// The bytes are already resident in the file through the mapping, so
    /// no copy happens; only the pending extension is confirmed. Afterwards
    /// the reported capacity equals `size` — committing truncates the
    /// capacity bookkeeping down to the logical size.
    pub fn write_through(&mut self) -> Result<(), BufferError> {
        log::trace!("[BUFFER] write-through {} bytes (mapped)", self.size);
        self.base = self.transport.resize(self.size as u64)?;
        self.capacity = self.size;
        if self.config.strict_checks {
            let on_disk = self.transport.size_on_disk()?;
            if on_disk != self.size as u64 {
                return Err(BufferError::Transport(TransportError::Resize {
                    path: self.transport.path().to_string(),
                    size: self.size as u64,
                    source: io::Error::other(format!("file reports {on_disk} bytes after commit")),
                }));
            }
        }
        Ok(())
    }

    /// Sync dirty pages to the file (`msync`). Confirmation only; the
    /// write-visibility contract holds without it.
    pub fn flush(&mut self) -> Result<(), BufferError> {
        self.transport.flush()?;
        Ok(())
    }

    /// Borrow the owning transport (e.g. to query the on-disk size).
    #[must_use]
    pub fn transport(&self) -> &FileTransport {
        &self.transport
    }

    /// Release the mapping and hand the transport back, e.g. to close it.
    #[must_use]
    pub fn into_transport(self) -> FileTransport {
        self.transport
    }
}

impl fmt::Debug for MappedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedBuffer")
            .field("path", &self.transport.path())
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl GrowableBuffer for MappedBuffer {
    fn data(&self) -> Result<&[u8], BufferError> {
        if self.capacity == 0 {
            return Err(BufferError::Unallocated);
        }
        let base = self.base.ok_or(BufferError::Unallocated)?;
        // SAFETY: base points at a live mapping covering at least
        // `capacity` bytes (the mapping is page-rounded above it), and the
        // buffer exclusively owns the region.
        Ok(unsafe { slice::from_raw_parts(base.as_ptr(), self.capacity) })
    }

    fn data_mut(&mut self) -> Result<&mut [u8], BufferError> {
        if self.capacity == 0 {
            return Err(BufferError::Unallocated);
        }
        let base = self.base.ok_or(BufferError::Unallocated)?;
        // SAFETY: as `data`, plus &mut self guarantees unique access.
        Ok(unsafe { slice::from_raw_parts_mut(base.as_ptr(), self.capacity) })
    }

    fn size(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn reserve(&mut self, capacity: usize) -> Result<(), BufferError> {
        if capacity < self.size {
            return Err(BufferError::ReserveBelowSize {
                requested: capacity,
                size: self.size,
            });
        }
        if capacity <= self.capacity {
            return Ok(());
        }
        // ftruncate zero-fills the extension, which is what guarantees the
        // newly exposed capacity reads as zero. On failure the previous
        // mapping and capacity are unchanged and still queryable.
        self.base = self.transport.resize(capacity as u64)?;
        self.capacity = capacity;
        log::trace!("[BUFFER] mapped capacity grown to {capacity}");
        Ok(())
    }

    fn resize(&mut self, new_size: usize) -> Result<(), BufferError> {
        if new_size > self.capacity {
            return Err(BufferError::SizeExceedsCapacity {
                requested: new_size,
                capacity: self.capacity,
            });
        }
        self.size = new_size;
        Ok(())
    }
}
