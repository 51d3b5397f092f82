// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Fan-out of buffer writes over one or more file transports.

use super::{FileTransport, Result, TransportError};
use crate::config::CURRENT_POSITION;

/// Thin aggregator owning the transports a buffer writes through.
///
/// A `None` index addresses every transport in the set; `Some(i)` addresses
/// one. Transports are injected by the owning engine, never created here.
#[derive(Default)]
pub struct TransportSet {
    transports: Vec<FileTransport>,
}

impl TransportSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transport, returning its index within the set.
    pub fn add(&mut self, transport: FileTransport) -> usize {
        self.transports.push(transport);
        self.transports.len() - 1
    }

    /// Number of transports held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transports.len()
    }

    /// True when the set holds no transports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    /// Borrow one transport by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FileTransport> {
        self.transports.get(index)
    }

    /// Mutably borrow one transport by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut FileTransport> {
        self.transports.get_mut(index)
    }

    fn transport_at(&mut self, index: usize) -> Result<&mut FileTransport> {
        let count = self.transports.len();
        self.transports
            .get_mut(index)
            .ok_or(TransportError::NoSuchTransport { index, count })
    }

    /// Write `data` at the current position of the selected transport(s).
    pub fn write_files(&mut self, data: &[u8], index: Option<usize>) -> Result<()> {
        match index {
            Some(i) => self.transport_at(i)?.write(data, CURRENT_POSITION),
            None => {
                for transport in &mut self.transports {
                    transport.write(data, CURRENT_POSITION)?;
                }
                Ok(())
            }
        }
    }

    /// Flush the selected transport(s).
    pub fn flush_files(&mut self, index: Option<usize>) -> Result<()> {
        match index {
            Some(i) => self.transport_at(i)?.flush(),
            None => {
                for transport in &mut self.transports {
                    transport.flush()?;
                }
                Ok(())
            }
        }
    }

    /// Close every transport. All are closed even if one fails; the first
    /// failure is reported.
    pub fn close_files(&mut self) -> Result<()> {
        let mut first_err = None;
        for transport in &mut self.transports {
            if let Err(err) = transport.close() {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
