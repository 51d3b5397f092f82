// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! # strata — self-describing scientific I/O data plane
//!
//! Core building blocks for step-based scientific writers: applications
//! declare typed, possibly multi-dimensional variables and attributes in a
//! registry, a serializer visits them through closed-set kind dispatch and
//! appends bytes into a growable buffer, and the buffer persists through
//! batched POSIX file transports — or skips the copy entirely by living
//! directly in a memory-mapped file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strata::{EntityRegistry, GrowableBuffer, HeapBuffer, RuntimeConfig};
//! use strata::{FileTransport, OpenMode, TransportSet};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::default();
//!
//!     let mut registry = EntityRegistry::new(config);
//!     registry.define_scalar("temperature", 36.6_f64)?;
//!
//!     let mut buffer = HeapBuffer::new(config);
//!     buffer.reserve(1024)?;
//!     buffer.resize(8)?;
//!     buffer.data_mut()?[..8].copy_from_slice(&36.6_f64.to_le_bytes());
//!
//!     let mut transports = TransportSet::new();
//!     transports.add(FileTransport::open("out.bp", OpenMode::Write, config)?);
//!     buffer.write_through(&mut transports, None)?;
//!     transports.close_files()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                      Producer / Engine                       |
//! |    define / find / visit typed entities, drive the steps     |
//! +--------------------------------------------------------------+
//! |                        Registry Layer                        |
//! |   EntityRegistry -> per-kind EntityStore (slot arenas)       |
//! |   closed-set Kind dispatch (no virtual calls)                |
//! +--------------------------------------------------------------+
//! |                        Buffer Layer                          |
//! |   HeapBuffer (owned bytes)  |  MappedBuffer (file pages)     |
//! +--------------------------------------------------------------+
//! |                       Transport Layer                        |
//! |   FileTransport: batched POSIX I/O, EINTR retry, mmap grow   |
//! |   TransportSet: fan-out to one or more files                 |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EntityRegistry`] | Name directory over heterogeneous typed entities |
//! | [`Kind`] | Closed catalog of supported payload types |
//! | [`HeapBuffer`] / [`MappedBuffer`] | Growable byte buffers, two backends |
//! | [`FileTransport`] | Chunked, retry-safe POSIX file I/O |
//! | [`TransportSet`] | Fan-out of one buffer over several files |
//!
//! ## Concurrency
//!
//! Everything here is single-threaded per instance: no internal locking,
//! external synchronization required for sharing. Blocking OS calls are not
//! cancellable mid-flight.

/// Growable byte buffers (heap and file-mapped backends).
pub mod buffer;
/// Crate-wide constants and per-instance runtime configuration.
pub mod config;
/// Name-to-handle registry over heterogeneous typed entities.
pub mod registry;
/// Batched POSIX file transports and the fan-out set.
pub mod transport;
/// Closed catalog of supported payload types.
pub mod types;

pub use buffer::{BufferError, GrowableBuffer, HeapBuffer, MappedBuffer};
pub use config::{RuntimeConfig, CURRENT_POSITION, MAX_FILE_BATCH_SIZE};
pub use registry::{
    Dims, Entity, EntityData, EntityRegistry, EntityStore, EntityVisitor, EntityVisitorMut,
    Handle, RegistryError,
};
pub use transport::{
    FileTransport, OpenMode, TransportError, TransportSet, TransportState,
};
pub use types::{Complex32, Complex64, Kind, LongDouble, Payload};
