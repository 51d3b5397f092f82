// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! POSIX file transport with batched, interrupt-tolerant I/O.

use super::mapping::{page_size, MappedRegion};
use super::{Result, TransportError};
use crate::config::{RuntimeConfig, CURRENT_POSITION};
use std::ffi::CString;
use std::fmt;
use std::io;
use std::ptr::NonNull;

/// Requested access when opening a transport.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OpenMode {
    /// Create or truncate, read-write.
    Write,
    /// Create or open positioned at the end, read-write.
    Append,
    /// Open existing, read-only.
    Read,
}

/// Lifecycle state of a transport. Operations outside the matching state
/// fail with [`TransportError::InvalidState`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransportState {
    /// No descriptor held.
    Closed,
    /// Open for reading only.
    OpenRead,
    /// Open for writing (created/truncated).
    OpenWrite,
    /// Open for appending.
    OpenAppend,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed",
            Self::OpenRead => "open-read",
            Self::OpenWrite => "open-write",
            Self::OpenAppend => "open-append",
        })
    }
}

/// One open file descriptor with chunked, retry-safe read/write and an
/// optional shared mapping of the file.
///
/// Single-threaded; all calls are potentially blocking OS calls and none
/// are cancellable mid-flight. Within one transport, reads and writes are
/// totally ordered by call order.
pub struct FileTransport {
    path: String,
    fd: libc::c_int,
    state: TransportState,
    mapping: Option<MappedRegion>,
    mapped_mode: bool,
    config: RuntimeConfig,
}

impl FileTransport {
    /// Open `path` in the requested mode. No retry: an inaccessible path
    /// fails immediately with [`TransportError::Open`].
    pub fn open(path: &str, mode: OpenMode, config: RuntimeConfig) -> Result<Self> {
        Self::open_impl(path, mode, false, config)
    }

    /// As [`open`](Self::open), but with the file mapping enabled: `resize`
    /// keeps a shared mapping of the file current and returns its base.
    ///
    /// Mapped mode requires write access, so `mode` must be `Write` or
    /// `Append`.
    pub fn open_mapped(path: &str, mode: OpenMode, config: RuntimeConfig) -> Result<Self> {
        if mode == OpenMode::Read {
            return Err(TransportError::Open {
                path: path.to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "mapped mode requires write or append access",
                ),
            });
        }
        Self::open_impl(path, mode, true, config)
    }

    fn open_impl(
        path: &str,
        mode: OpenMode,
        mapped_mode: bool,
        config: RuntimeConfig,
    ) -> Result<Self> {
        let c_path = CString::new(path).map_err(|_| TransportError::Open {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"),
        })?;

        let (flags, state) = match mode {
            OpenMode::Write => (
                libc::O_RDWR | libc::O_CREAT | libc::O_TRUNC,
                TransportState::OpenWrite,
            ),
            OpenMode::Append => (
                libc::O_RDWR | libc::O_APPEND | libc::O_CREAT,
                TransportState::OpenAppend,
            ),
            OpenMode::Read => (libc::O_RDONLY, TransportState::OpenRead),
        };

        // SAFETY: c_path is a valid NUL-terminated string, flags/mode are
        // valid open(2) arguments; the return value is checked below.
        let fd = unsafe { libc::open(c_path.as_ptr(), flags, 0o666 as libc::c_uint) };
        if fd < 0 {
            return Err(TransportError::Open {
                path: path.to_string(),
                source: io::Error::last_os_error(),
            });
        }

        log::debug!("[FILE] open {path} mode={mode:?} mapped={mapped_mode} fd={fd}");
        Ok(Self {
            path: path.to_string(),
            fd,
            state,
            mapping: None,
            mapped_mode,
            config,
        })
    }

    /// Path this transport was opened with.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// True when the transport was opened with the mapping enabled.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.mapped_mode
    }

    fn require_state(&self, operation: &'static str, allowed: &[TransportState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(TransportError::InvalidState {
                path: self.path.clone(),
                operation,
                state: self.state,
            })
        }
    }

    fn seek_to(&self, start: u64) -> Result<()> {
        if start == CURRENT_POSITION {
            return Ok(());
        }
        // SAFETY: fd is valid while the transport is open; lseek has no
        // memory preconditions.
        let landed = unsafe { libc::lseek(self.fd, start as libc::off_t, libc::SEEK_SET) };
        if landed < 0 {
            return Err(TransportError::Seek {
                path: self.path.clone(),
                wanted: start,
                source: io::Error::last_os_error(),
            });
        }
        if landed as u64 != start {
            return Err(TransportError::Seek {
                path: self.path.clone(),
                wanted: start,
                source: io::Error::other(format!("landed at offset {landed}")),
            });
        }
        Ok(())
    }

    /// Write one chunk completely, looping on partial writes and retrying
    /// interrupted calls indefinitely.
    fn write_chunk(&self, mut chunk: &[u8]) -> Result<()> {
        while !chunk.is_empty() {
            // SAFETY: the pointer/length come from a live slice and fd is a
            // valid open descriptor.
            let written = unsafe { libc::write(self.fd, chunk.as_ptr().cast(), chunk.len()) };
            if written < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(TransportError::Write {
                    path: self.path.clone(),
                    source: err,
                });
            }
            chunk = &chunk[written as usize..];
        }
        Ok(())
    }

    fn read_chunk(&self, mut chunk: &mut [u8]) -> Result<()> {
        while !chunk.is_empty() {
            // SAFETY: the pointer/length come from a live mutable slice and
            // fd is a valid open descriptor.
            let got = unsafe { libc::read(self.fd, chunk.as_mut_ptr().cast(), chunk.len()) };
            if got < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(TransportError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
            if got == 0 {
                // EOF before the requested length: a partial read must not
                // claim success.
                return Err(TransportError::Read {
                    path: self.path.clone(),
                    source: io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("file ended with {} bytes still unread", chunk.len()),
                    ),
                });
            }
            chunk = &mut chunk[got as usize..];
        }
        Ok(())
    }

    /// Write `buffer` at `start`, or at the current position when `start`
    /// is [`CURRENT_POSITION`].
    ///
    /// The transfer is split into chunks of at most the configured batch
    /// size regardless of `buffer.len()`; each chunk loops on partial
    /// writes and only the interrupted-call condition is retried.
    pub fn write(&mut self, buffer: &[u8], start: u64) -> Result<()> {
        self.require_state(
            "write",
            &[TransportState::OpenWrite, TransportState::OpenAppend],
        )?;
        self.seek_to(start)?;
        let batch = self.config.max_batch_size.max(1);
        log::trace!(
            "[FILE] write {} bytes to {} in {} batch(es)",
            buffer.len(),
            self.path,
            buffer.len().div_ceil(batch).max(1)
        );
        for chunk in buffer.chunks(batch) {
            self.write_chunk(chunk)?;
        }
        Ok(())
    }

    /// Read `buffer.len()` bytes from `start` (or the current position).
    /// Chunking, seek verification, and retry policy mirror
    /// [`write`](Self::write); a short file fails with
    /// [`TransportError::Read`], never a silent partial fill.
    pub fn read(&mut self, buffer: &mut [u8], start: u64) -> Result<()> {
        self.require_state(
            "read",
            &[
                TransportState::OpenRead,
                TransportState::OpenWrite,
                TransportState::OpenAppend,
            ],
        )?;
        self.seek_to(start)?;
        let batch = self.config.max_batch_size.max(1);
        for chunk in buffer.chunks_mut(batch) {
            self.read_chunk(chunk)?;
        }
        Ok(())
    }

    /// Make the file exactly `size` bytes (truncate or extend).
    ///
    /// In mapped mode the file's mapping is grown to cover the new size
    /// (page-rounded) and its base address is returned: extension in place
    /// is attempted first, and when the kernel refuses, a full replacement
    /// mapping is built *before* the old one is released, so a failure
    /// leaves the prior mapping intact and valid.
    pub fn resize(&mut self, size: u64) -> Result<Option<NonNull<u8>>> {
        self.require_state(
            "resize",
            &[TransportState::OpenWrite, TransportState::OpenAppend],
        )?;
        // SAFETY: fd is valid; ftruncate has no memory preconditions.
        let rc = unsafe { libc::ftruncate(self.fd, size as libc::off_t) };
        if rc < 0 {
            return Err(TransportError::Resize {
                path: self.path.clone(),
                size,
                source: io::Error::last_os_error(),
            });
        }
        if self.config.strict_checks {
            let on_disk = self.size_on_disk()?;
            if on_disk != size {
                return Err(TransportError::Resize {
                    path: self.path.clone(),
                    size,
                    source: io::Error::other(format!(
                        "file reports {on_disk} bytes after truncate"
                    )),
                });
            }
        }
        if !self.mapped_mode {
            return Ok(None);
        }
        self.grow_mapping(size)?;
        Ok(self.mapping.as_ref().map(MappedRegion::base))
    }

    fn grow_mapping(&mut self, size: u64) -> Result<()> {
        let page = page_size();
        let new_len = (size as usize).div_ceil(page) * page;
        match &mut self.mapping {
            // Shrinks and no-ops keep the existing (larger) mapping; pages
            // beyond the file are simply never exposed by the buffer.
            Some(region) if new_len <= region.len() => Ok(()),
            Some(region) => {
                if region.try_extend(self.fd, new_len) {
                    log::trace!("[FILE] mapping of {} extended to {new_len}", self.path);
                    return Ok(());
                }
                // In-place extension refused. Build the replacement first;
                // the old mapping is released only once the new one exists.
                log::debug!("[FILE] remapping {} at {new_len} bytes", self.path);
                let fresh =
                    MappedRegion::map(self.fd, new_len).map_err(|source| TransportError::Resize {
                        path: self.path.clone(),
                        size,
                        source,
                    })?;
                self.mapping = Some(fresh);
                Ok(())
            }
            None if new_len == 0 => Ok(()),
            None => {
                let region =
                    MappedRegion::map(self.fd, new_len).map_err(|source| TransportError::Resize {
                        path: self.path.clone(),
                        size,
                        source,
                    })?;
                self.mapping = Some(region);
                Ok(())
            }
        }
    }

    /// Current on-disk size of the file, via `fstat`.
    pub fn size_on_disk(&self) -> Result<u64> {
        self.require_state(
            "size_on_disk",
            &[
                TransportState::OpenRead,
                TransportState::OpenWrite,
                TransportState::OpenAppend,
            ],
        )?;
        // SAFETY: st is a properly sized out-parameter; fstat fills it or
        // fails, and the result is only read on success.
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        // SAFETY: fd is valid while the transport is open.
        let rc = unsafe { libc::fstat(self.fd, &mut st) };
        if rc < 0 {
            return Err(TransportError::Stat {
                path: self.path.clone(),
                source: io::Error::last_os_error(),
            });
        }
        Ok(st.st_size as u64)
    }

    /// Sync the mapping (if any) to the file. A plain-file transport has
    /// nothing to flush; ordering across calls already guarantees
    /// visibility, and durability is the caller's policy.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(region) = &self.mapping {
            region.sync().map_err(|source| TransportError::Flush {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Unmap any active mapping, then close the descriptor.
    ///
    /// Even when the underlying `close` fails, the descriptor is considered
    /// released: the transport transitions to `Closed` and never
    /// double-closes.
    pub fn close(&mut self) -> Result<()> {
        if self.state == TransportState::Closed {
            return Ok(());
        }
        self.mapping = None;
        // SAFETY: fd is valid and closed exactly once; the state change
        // below prevents any further use.
        let rc = unsafe { libc::close(self.fd) };
        self.fd = -1;
        self.state = TransportState::Closed;
        log::debug!("[FILE] close {}", self.path);
        if rc < 0 {
            return Err(TransportError::Close {
                path: self.path.clone(),
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for FileTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTransport")
            .field("path", &self.path)
            .field("state", &self.state)
            .field("mapped", &self.mapped_mode)
            .finish_non_exhaustive()
    }
}

impl Drop for FileTransport {
    fn drop(&mut self) {
        // Best-effort teardown for abandoned transports.
        if self.state != TransportState::Closed {
            self.mapping = None;
            // SAFETY: fd is still valid here; close is called exactly once.
            unsafe {
                libc::close(self.fd);
            }
            self.fd = -1;
            self.state = TransportState::Closed;
        }
    }
}
