// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Boundary to the USB Bulk-Only Transport collaborator.
//!
//! The command layer never builds Command Block Wrappers or touches raw USB
//! transfers; it hands a ready CDB plus an optional data phase to an
//! implementation of [`UsbTransport`] and interprets the result.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by the bulk transport for a single command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The command did not complete within the given deadline.
    #[error("command timed out")]
    Timeout,

    /// The status phase reported command failure; sense data should be
    /// fetched to learn why.
    #[error("device reported command failure")]
    CommandFailed,

    /// The device produced no status at all.
    #[error("no response from device")]
    NoResponse,

    /// Transfer-level failure (babble, stall recovery failed, ...).
    #[error("transport I/O failure: {0}")]
    Io(String),
}

/// Data phase accompanying a command: device-to-host, host-to-device, or
/// none (TEST UNIT READY).
#[derive(Debug)]
pub enum DataPhase<'a> {
    In(&'a mut [u8]),
    Out(&'a [u8]),
    None,
}

impl DataPhase<'_> {
    /// Reborrow for another dispatch attempt without giving up the buffer.
    pub fn reborrow(&mut self) -> DataPhase<'_> {
        match self {
            DataPhase::In(buf) => DataPhase::In(buf),
            DataPhase::Out(buf) => DataPhase::Out(buf),
            DataPhase::None => DataPhase::None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DataPhase::In(buf) => buf.len(),
            DataPhase::Out(buf) => buf.len(),
            DataPhase::None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One SCSI command dispatched over the bulk transport.
///
/// `timeout = None` means no artificial deadline (the No-Timeout command
/// class); `Some(d)` bounds the whole command including its data phase.
/// Returns the number of data bytes actually moved.
pub trait UsbTransport {
    fn execute(
        &mut self,
        lun: u8,
        cdb: &[u8],
        data: DataPhase<'_>,
        timeout: Option<Duration>,
    ) -> Result<usize, TransportError>;
}
