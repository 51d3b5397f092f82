// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Heap-backed growable buffer.

use super::{BufferError, GrowableBuffer};
use crate::config::RuntimeConfig;
use crate::transport::{TransportError, TransportSet};

/// Growable buffer held in a plain owned allocation.
///
/// The backing vector is kept zero-filled out to `capacity`, so bytes newly
/// exposed by a grow always read as zero. Persisting requires an explicit
/// [`write_through`](Self::write_through) to a transport set.
pub struct HeapBuffer {
    bytes: Vec<u8>,
    size: usize,
    config: RuntimeConfig,
}

impl HeapBuffer {
    /// Empty buffer: zero size, zero capacity.
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            bytes: Vec::new(),
            size: 0,
            config,
        }
    }

    /// Push `[0, size)` through the selected transport(s) as one logical
    /// write (chunked internally by the transport).
    pub fn write_through(
        &self,
        transports: &mut TransportSet,
        index: Option<usize>,
    ) -> Result<(), BufferError> {
        if self.config.strict_checks && transports.is_empty() {
            return Err(BufferError::Transport(TransportError::NoSuchTransport {
                index: index.unwrap_or(0),
                count: 0,
            }));
        }
        log::trace!("[BUFFER] write-through {} bytes (heap)", self.size);
        transports.write_files(&self.bytes[..self.size], index)?;
        Ok(())
    }

    /// Forward a flush to the selected transport(s).
    pub fn flush(
        &self,
        transports: &mut TransportSet,
        index: Option<usize>,
    ) -> Result<(), BufferError> {
        transports.flush_files(index)?;
        Ok(())
    }
}

impl GrowableBuffer for HeapBuffer {
    fn data(&self) -> Result<&[u8], BufferError> {
        if self.bytes.is_empty() {
            return Err(BufferError::Unallocated);
        }
        Ok(&self.bytes)
    }

    fn data_mut(&mut self) -> Result<&mut [u8], BufferError> {
        if self.bytes.is_empty() {
            return Err(BufferError::Unallocated);
        }
        Ok(&mut self.bytes)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn reserve(&mut self, capacity: usize) -> Result<(), BufferError> {
        if capacity < self.size {
            return Err(BufferError::ReserveBelowSize {
                requested: capacity,
                size: self.size,
            });
        }
        if capacity > self.bytes.len() {
            // Zero-fills the newly exposed region.
            self.bytes.resize(capacity, 0);
            log::trace!("[BUFFER] heap capacity grown to {capacity}");
        }
        Ok(())
    }

    fn resize(&mut self, new_size: usize) -> Result<(), BufferError> {
        if new_size > self.bytes.len() {
            return Err(BufferError::SizeExceedsCapacity {
                requested: new_size,
                capacity: self.bytes.len(),
            });
        }
        self.size = new_size;
        Ok(())
    }
}
