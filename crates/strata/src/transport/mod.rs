// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Batched, retry-safe POSIX file I/O.
//!
//! [`FileTransport`] wraps one file descriptor with chunked read/write
//! (bounded by the configured batch size), transparent retry of interrupted
//! syscalls, and an optional shared mapping of the file used by the
//! memory-mapped buffer backend. [`TransportSet`] fans one buffer's
//! flush/write calls out to one or more transports.
//!
//! Every blocking call here surfaces a typed [`TransportError`] with path
//! context; the only internal retry is the `EINTR` loop in read/write.
//! Visibility, not durability: nothing fsyncs unless a caller asks.

mod file;
mod mapping;
mod set;

pub use file::{FileTransport, OpenMode, TransportState};
pub use set::TransportSet;

use std::fmt;
use std::io;

/// Resource errors from transport operations.
///
/// OS/environment failures, never retried internally (except the `EINTR`
/// loop inside read/write, which is not surfaced).
#[derive(Debug)]
pub enum TransportError {
    /// The path could not be created/accessed in the requested mode.
    Open { path: String, source: io::Error },

    /// An absolute seek failed, or landed at a different offset than
    /// requested.
    Seek {
        path: String,
        wanted: u64,
        source: io::Error,
    },

    /// A low-level write failed for a reason other than interruption.
    Write { path: String, source: io::Error },

    /// A low-level read failed, or the file ended before the requested
    /// length was filled.
    Read { path: String, source: io::Error },

    /// Truncating/extending the file, or growing its mapping, failed. The
    /// prior mapping (if any) is still intact and valid.
    Resize {
        path: String,
        size: u64,
        source: io::Error,
    },

    /// `fstat` on the open descriptor failed.
    Stat { path: String, source: io::Error },

    /// Closing the descriptor failed. The descriptor is considered released
    /// regardless; the transport never double-closes.
    Close { path: String, source: io::Error },

    /// Syncing the mapping to its file failed.
    Flush { path: String, source: io::Error },

    /// Operation invoked outside its required transport state.
    InvalidState {
        path: String,
        operation: &'static str,
        state: TransportState,
    },

    /// Transport index out of range for the set.
    NoSuchTransport { index: usize, count: usize },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "could not open file {path}: {source}")
            }
            Self::Seek { path, wanted, source } => {
                write!(f, "could not seek to offset {wanted} in file {path}: {source}")
            }
            Self::Write { path, source } => {
                write!(f, "could not write to file {path}: {source}")
            }
            Self::Read { path, source } => {
                write!(f, "could not read from file {path}: {source}")
            }
            Self::Resize { path, size, source } => {
                write!(f, "could not resize file {path} to {size} bytes: {source}")
            }
            Self::Stat { path, source } => {
                write!(f, "could not get size of file {path}: {source}")
            }
            Self::Close { path, source } => {
                write!(f, "could not close file {path}: {source}")
            }
            Self::Flush { path, source } => {
                write!(f, "could not sync mapping of file {path}: {source}")
            }
            Self::InvalidState {
                path,
                operation,
                state,
            } => {
                write!(f, "{operation} on file {path} invalid in state {state}")
            }
            Self::NoSuchTransport { index, count } => {
                write!(f, "transport index {index} out of range (set holds {count})")
            }
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Seek { source, .. }
            | Self::Write { source, .. }
            | Self::Read { source, .. }
            | Self::Resize { source, .. }
            | Self::Stat { source, .. }
            | Self::Close { source, .. }
            | Self::Flush { source, .. } => Some(source),
            Self::InvalidState { .. } | Self::NoSuchTransport { .. } => None,
        }
    }
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
