// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Single-command dispatch with sense classification, and the bounded
//! retry wrapper around it.
//!
//! A failed status phase alone does not say why a command failed; the
//! reason lives in the sense data. Every failed dispatch is therefore
//! followed by an immediate REQUEST SENSE (No-Timeout class) whose decoded
//! triple decides retry vs. surface.

use std::{thread, time::Duration};

use tracing::{debug, warn};

use crate::{
    cfg::config::BootConfig,
    control_block::{
        CDB_LEN,
        request_sense::{ASC_NO_MEDIA, SENSE_DATA_LEN, SenseData, SenseKey, build_request_sense},
    },
    device::UsbMassDevice,
    error::UsbBootError,
    transport::{DataPhase, TransportError, UsbTransport},
};

/// Static timeout class of an opcode. INQUIRY and REQUEST SENSE are
/// defined to return promptly and run without an artificial deadline;
/// everything else is bounded by the general command timeout and eligible
/// for retry when it expires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CmdTimeout {
    NoTimeout,
    Group1,
}

impl CmdTimeout {
    fn bound(self, cfg: &BootConfig) -> Option<Duration> {
        match self {
            CmdTimeout::NoTimeout => None,
            CmdTimeout::Group1 => Some(cfg.general_cmd_timeout()),
        }
    }
}

/// Dispatch one command. On a failed status phase, fetch and classify
/// sense data; the returned error kind encodes whether the caller may
/// retry (`DeviceNotReady`, `DeviceNotResponding`) or must surface.
pub(crate) fn exec_cmd<T: UsbTransport>(
    dev: &mut UsbMassDevice<T>,
    cdb: &[u8],
    data: DataPhase<'_>,
    class: CmdTimeout,
) -> Result<usize, UsbBootError> {
    let timeout = class.bound(&dev.cfg);
    match dev.transport.execute(dev.lun, cdb, data, timeout) {
        Ok(n) => Ok(n),
        Err(TransportError::Timeout | TransportError::NoResponse) => {
            Err(UsbBootError::DeviceNotResponding)
        },
        Err(TransportError::CommandFailed | TransportError::Io(_)) => {
            let sense = fetch_sense(dev)?;
            let err = classify_sense(&sense);
            debug!(opcode = cdb[0], ?sense, %err, "command failed");
            if matches!(err, UsbBootError::NoMedia | UsbBootError::MediaMayHaveChanged) {
                dev.media_present = false;
            }
            Err(err)
        },
    }
}

/// Dispatch with the general retry budget: transient failures (not ready,
/// timeout, no response) are re-attempted up to `command_retry` times, with
/// the unit-ready stall between not-ready attempts; everything else
/// surfaces immediately.
pub(crate) fn exec_cmd_with_retry<T: UsbTransport>(
    dev: &mut UsbMassDevice<T>,
    cdb: &[u8],
    mut data: DataPhase<'_>,
    class: CmdTimeout,
) -> Result<usize, UsbBootError> {
    let retries = dev.cfg.command_retry;
    let stall = dev.cfg.unit_ready_stall();
    let mut last = UsbBootError::DeviceNotResponding;

    for attempt in 1..=retries {
        match exec_cmd(dev, cdb, data.reborrow(), class) {
            Ok(n) => return Ok(n),
            Err(UsbBootError::DeviceNotReady) => {
                debug!(attempt, retries, "unit not ready, stalling before retry");
                last = UsbBootError::DeviceNotReady;
                if attempt < retries {
                    thread::sleep(stall);
                }
            },
            Err(UsbBootError::DeviceNotResponding) => {
                debug!(attempt, retries, "no response, retrying");
                last = UsbBootError::DeviceNotResponding;
            },
            Err(e) => return Err(e),
        }
    }

    warn!(retries, %last, "command retry budget exhausted");
    Err(last)
}

/// Issue REQUEST SENSE (No-Timeout class) and decode the triple.
fn fetch_sense<T: UsbTransport>(
    dev: &mut UsbMassDevice<T>,
) -> Result<SenseData, UsbBootError> {
    let mut cdb = [0u8; CDB_LEN];
    build_request_sense(&mut cdb, dev.lun, SENSE_DATA_LEN as u8);

    let mut buf = [0u8; SENSE_DATA_LEN];
    let n = dev
        .transport
        .execute(dev.lun, &cdb, DataPhase::In(&mut buf), None)
        .map_err(|e| {
            warn!(%e, "request sense itself failed");
            UsbBootError::DeviceNotResponding
        })?;
    SenseData::parse(&buf[..n])
}

/// Map a decoded sense triple onto the retry-vs-fail error kinds.
fn classify_sense(sense: &SenseData) -> UsbBootError {
    match sense.key {
        // Nothing actionable in the sense data; treat like a dropped
        // status and let the wrapper re-attempt.
        SenseKey::NoSense | SenseKey::Recovered => UsbBootError::DeviceNotResponding,
        SenseKey::NotReady if sense.asc == ASC_NO_MEDIA => UsbBootError::NoMedia,
        SenseKey::NotReady => UsbBootError::DeviceNotReady,
        SenseKey::UnitAttention if sense.asc == ASC_NO_MEDIA => UsbBootError::NoMedia,
        SenseKey::UnitAttention => UsbBootError::MediaMayHaveChanged,
        SenseKey::IllegalRequest => UsbBootError::IllegalRequest,
        SenseKey::DataProtect => UsbBootError::DataProtect,
        // HardwareError and everything unlisted (medium error, aborted,
        // vendor keys) is device-reported and not transient.
        _ => UsbBootError::HardwareError,
    }
}
