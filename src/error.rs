// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

/// Outcome of a boot-layer operation that did not succeed.
///
/// Transient conditions (`DeviceNotReady`, transport timeouts) are retried
/// internally up to the configured budgets before one of these surfaces;
/// everything else surfaces on first occurrence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsbBootError {
    /// A response buffer was shorter than the structure requires.
    #[error("response shorter than the structure requires")]
    MalformedResponse,

    /// TEST UNIT READY never succeeded within the retry budget.
    #[error("device not ready")]
    DeviceNotReady,

    /// Unit-attention sense observed; cached geometry must not be trusted
    /// until the media is re-detected.
    #[error("media may have been changed")]
    MediaMayHaveChanged,

    /// Removable slot is empty.
    #[error("no media present")]
    NoMedia,

    /// Requested LBA range exceeds the last known LBA. Checked locally,
    /// never sent to the device.
    #[error("LBA range exceeds device capacity")]
    OutOfRange,

    /// Caller buffer does not match `block_count * block_len`.
    #[error("buffer length mismatch: expected {expected} bytes, got {got}")]
    InvalidBuffer { expected: usize, got: usize },

    /// Device reported a non-recoverable hardware failure.
    #[error("hardware error reported by device")]
    HardwareError,

    /// Device rejected the command parameters.
    #[error("illegal request rejected by device")]
    IllegalRequest,

    /// Media is write protected.
    #[error("media is write protected")]
    DataProtect,

    /// Transport timed out or gave no response after exhausting retries.
    #[error("device not responding")]
    DeviceNotResponding,

    /// INQUIRY returned a peripheral device type this layer cannot drive.
    #[error("unsupported peripheral device type {0:#04x}")]
    UnsupportedDevice(u8),
}
