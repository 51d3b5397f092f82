// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Growable byte buffers with independent size and capacity.
//!
//! A buffer tracks a logical `size` (bytes in use) inside a reserved
//! `capacity`, with `0 <= size <= capacity` always. Two backends share the
//! contract:
//!
//! - [`HeapBuffer`] holds an owned allocation and pushes bytes through a
//!   [`TransportSet`](crate::transport::TransportSet) explicitly;
//! - [`MappedBuffer`] aliases its bytes directly onto a file's pages, so
//!   persisting is bookkeeping rather than a copy.
//!
//! Newly exposed capacity always reads as zero: the heap backend zero-fills
//! on growth, the mapped backend inherits `ftruncate`'s zero-fill of file
//! extensions. Growing never disturbs bytes in `[0, size)`.

mod heap;
mod mapped;

pub use heap::HeapBuffer;
pub use mapped::MappedBuffer;

use crate::transport::TransportError;
use thiserror::Error;

/// Errors from buffer operations. Precondition violations are usage errors;
/// `Transport` wraps resource errors from the backing file.
#[derive(Debug, Error)]
pub enum BufferError {
    /// `reserve` may never shrink below the current logical size.
    #[error("cannot reserve {requested} bytes below the current size {size}")]
    ReserveBelowSize { requested: usize, size: usize },

    /// `resize` may not exceed the reserved capacity.
    #[error("resize to {requested} bytes exceeds the reserved capacity {capacity}")]
    SizeExceedsCapacity { requested: usize, capacity: usize },

    /// `data` on a buffer with zero capacity fails fast instead of handing
    /// out a dangling region.
    #[error("buffer has no reserved capacity")]
    Unallocated,

    /// Failure in the backing transport (mapped backend growth,
    /// write-through, flush).
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The shared size/capacity contract of both buffer backends.
pub trait GrowableBuffer {
    /// Reserved bytes, `[0, capacity)` readable. Fails with
    /// [`BufferError::Unallocated`] at zero capacity.
    fn data(&self) -> Result<&[u8], BufferError>;

    /// Mutable access to the reserved bytes.
    fn data_mut(&mut self) -> Result<&mut [u8], BufferError>;

    /// Logical bytes in use.
    fn size(&self) -> usize;

    /// Reserved bytes.
    fn capacity(&self) -> usize;

    /// Grow (never shrink) the reserved capacity to at least `capacity`
    /// bytes. New capacity reads as zero; bytes in `[0, size)` are
    /// preserved exactly. Reserving below the current size is a
    /// precondition violation.
    fn reserve(&mut self, capacity: usize) -> Result<(), BufferError>;

    /// Set the logical size. Requires `new_size <= capacity`; touches no
    /// bytes (growth is already zero-guaranteed by `reserve`).
    fn resize(&mut self, new_size: usize) -> Result<(), BufferError>;

    /// Reserved bytes not yet in use.
    fn available(&self) -> usize {
        self.capacity() - self.size()
    }
}
