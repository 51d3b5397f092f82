// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! RAII wrapper around a shared file mapping.
//!
//! Owns one `mmap` region backed by an open file descriptor and guarantees
//! `munmap` on every exit path, including a failed grow. Growing prefers
//! extending the existing region in place (mapping the file's next pages at
//! the address immediately after the current end); when the kernel places
//! the delta elsewhere, only the stray pages are torn down and the prior
//! mapping stays valid, so the caller can build a full replacement before
//! releasing anything.

use std::io;
use std::ptr::{self, NonNull};

/// Platform page size, with a conventional fallback if `sysconf` fails.
pub(crate) fn page_size() -> usize {
    // SAFETY: sysconf with a valid name constant has no preconditions.
    let value = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if value > 0 {
        value as usize
    } else {
        4096
    }
}

/// Exclusively owned shared mapping of the leading `len` bytes of a file.
pub struct MappedRegion {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: the region is exclusively owned by one FileTransport; nothing else
// may unmap or remap it, so moving it across threads is sound.
unsafe impl Send for MappedRegion {}

impl MappedRegion {
    /// Map the first `len` bytes of `fd` read-write and shared.
    ///
    /// `len` must be non-zero and no larger than the file (page-rounded);
    /// the caller extends the file first via `ftruncate`.
    pub fn map(fd: libc::c_int, len: usize) -> io::Result<Self> {
        debug_assert!(len > 0, "zero-length mappings are never created");
        // SAFETY:
        // - null hint lets the kernel choose the address
        // - fd is a valid open descriptor owned by the calling transport
        // - PROT_READ|PROT_WRITE with MAP_SHARED aliases the file's pages
        // - offset 0 maps from the start of the file
        // - MAP_FAILED is checked below
        let raw = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };
        if raw == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        let ptr = NonNull::new(raw.cast::<u8>())
            .ok_or_else(|| io::Error::other("mmap returned a null mapping"))?;
        Ok(Self { ptr, len })
    }

    /// Try to grow the mapping in place to `new_len` bytes.
    ///
    /// Maps the file range `[len, new_len)` at the address immediately after
    /// the current end. Returns `true` on success. On any failure the prior
    /// mapping is left fully intact: a delta the kernel placed elsewhere is
    /// unmapped before returning `false`, and nothing else is touched.
    pub fn try_extend(&mut self, fd: libc::c_int, new_len: usize) -> bool {
        debug_assert!(new_len > self.len, "extend only grows");
        let delta = new_len - self.len;
        // SAFETY: self.ptr..self.ptr+len is our live mapping; one past its
        // end is a valid address value to use as a placement hint.
        let hint = unsafe { self.ptr.as_ptr().add(self.len) };
        // SAFETY:
        // - hint is only a hint (no MAP_FIXED), the kernel may ignore it
        // - fd is valid and the file covers [len, new_len) after ftruncate
        // - offset len continues the file exactly where the mapping ends
        let got = unsafe {
            libc::mmap(
                hint.cast(),
                delta,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                self.len as libc::off_t,
            )
        };
        if got == libc::MAP_FAILED {
            return false;
        }
        if got == hint.cast() {
            self.len = new_len;
            return true;
        }
        // The kernel placed the delta elsewhere: discard only the stray
        // pages, leaving the original mapping untouched.
        // SAFETY: got/delta describe exactly the mapping created above.
        unsafe {
            libc::munmap(got, delta);
        }
        false
    }

    /// Flush dirty pages to the backing file (`msync`, synchronous).
    pub fn sync(&self) -> io::Result<()> {
        // SAFETY: ptr/len describe our live mapping; MS_SYNC is a valid flag.
        let rc = unsafe { libc::msync(self.ptr.as_ptr().cast(), self.len, libc::MS_SYNC) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Base address of the mapping. Stable until the region is grown,
    /// replaced, or dropped.
    #[must_use]
    pub fn base(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Mapped length in bytes (page-rounded by the caller).
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        // SAFETY: ptr/len describe the mapping we exclusively own; after
        // this the region is never touched again.
        unsafe {
            libc::munmap(self.ptr.as_ptr().cast(), self.len);
        }
    }
}
