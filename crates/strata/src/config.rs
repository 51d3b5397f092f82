// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Crate-wide constants and runtime configuration.
//!
//! All tunables live here; nothing else in the crate hardcodes batch sizes
//! or sentinels. [`RuntimeConfig`] is captured once when a registry, buffer,
//! or transport is constructed and consulted locally afterwards — there is
//! no process-global debug flag.

/// Maximum byte count issued per low-level `read(2)`/`write(2)` call.
///
/// Just under 2 GiB: several platforms cap a single call at `SSIZE_MAX` or
/// lower, so larger transfers are always split into batches of at most this
/// size, no matter how big the buffer is.
pub const MAX_FILE_BATCH_SIZE: usize = 2_147_381_248;

/// Sentinel offset meaning "no seek, use the current file position".
///
/// Passed as `start` to [`FileTransport::write`](crate::transport::FileTransport::write)
/// and [`FileTransport::read`](crate::transport::FileTransport::read).
pub const CURRENT_POSITION: u64 = u64::MAX;

/// Per-instance configuration for registries, buffers, and transports.
///
/// Captured at construction; changing a config value later never affects
/// already-built instances.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Enable extra (redundant) validation: empty-name rejection in the
    /// registry, post-`ftruncate` size confirmation in the transport.
    /// Defaults to on in debug builds, off in release.
    pub strict_checks: bool,

    /// Chunk limit for batched file I/O. Tests shrink this to exercise the
    /// chunking loop with small payloads.
    pub max_batch_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            strict_checks: cfg!(debug_assertions),
            max_batch_size: MAX_FILE_BATCH_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Config with every extra check enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_checks: true,
            ..Self::default()
        }
    }

    /// Config with extra checks disabled regardless of build profile.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            strict_checks: false,
            ..Self::default()
        }
    }

    /// Override the I/O batch limit. `max_batch_size` must be non-zero.
    #[must_use]
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        debug_assert!(max_batch_size > 0, "batch size must be non-zero");
        self.max_batch_size = max_batch_size;
        self
    }
}
