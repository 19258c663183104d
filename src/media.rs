// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Media discovery and change detection.
//!
//! SCSI makes "not ready" and "media changed" observably distinct only
//! through sense data, so every readiness check pairs TEST UNIT READY with
//! a REQUEST SENSE on failure (done inside the dispatch layer). No I/O is
//! trusted until these operations have populated the cached geometry.

use std::thread;

use tracing::{debug, warn};

use crate::{
    control_block::{
        CDB_LEN,
        inquiry::{INQUIRY_DATA_LEN, InquiryData, Pdt, build_inquiry},
        read_capacity::{READ_CAPACITY_DATA_LEN, build_read_capacity, parse_read_capacity},
        test_unit_ready::build_test_unit_ready,
    },
    device::{MediaState, UsbMassDevice},
    error::UsbBootError,
    exec::{CmdTimeout, exec_cmd, exec_cmd_with_retry},
    transport::{DataPhase, UsbTransport},
};

impl<T: UsbTransport> UsbMassDevice<T> {
    /// Poll TEST UNIT READY until the unit reports ready, up to the
    /// init-media retry budget with the unit-ready stall between failed
    /// attempts. Returns `DeviceNotReady` once the budget is exhausted.
    ///
    /// Unit attentions encountered here are absorbed: fetching their sense
    /// clears the condition, and the next attempt reflects the real state.
    /// A definitively empty slot (`NoMedia`) and device-fatal errors
    /// surface immediately.
    pub fn is_unit_ready(&mut self) -> Result<(), UsbBootError> {
        let mut cdb = [0u8; CDB_LEN];
        build_test_unit_ready(&mut cdb, self.lun);

        let retries = self.cfg.init_media_retry;
        let stall = self.cfg.unit_ready_stall();

        for attempt in 1..=retries {
            match exec_cmd(self, &cdb, DataPhase::None, CmdTimeout::Group1) {
                Ok(_) => {
                    debug!(attempt, "unit ready");
                    return Ok(());
                },
                Err(
                    UsbBootError::DeviceNotReady
                    | UsbBootError::DeviceNotResponding
                    | UsbBootError::MediaMayHaveChanged,
                ) => {
                    debug!(attempt, retries, "unit not ready yet");
                    if attempt < retries {
                        thread::sleep(stall);
                    }
                },
                Err(e) => {
                    self.media_present = false;
                    return Err(e);
                },
            }
        }

        warn!(retries, "unit never became ready");
        self.state = MediaState::NotReady;
        Err(UsbBootError::DeviceNotReady)
    }

    /// Initial parameter discovery: wait for readiness, then INQUIRY for
    /// the device type and removable flag, then READ CAPACITY for the
    /// geometry. On success the cached geometry is valid and
    /// `media_present` is set.
    pub fn get_params(&mut self) -> Result<(), UsbBootError> {
        self.state = MediaState::Probing;
        self.media_present = false;

        if let Err(e) = self.is_unit_ready() {
            self.state = MediaState::NotReady;
            return Err(e);
        }

        let mut cdb = [0u8; CDB_LEN];
        build_inquiry(&mut cdb, self.lun, INQUIRY_DATA_LEN as u8);
        let mut inq_buf = [0u8; INQUIRY_DATA_LEN];
        let n = exec_cmd_with_retry(
            self,
            &cdb,
            DataPhase::In(&mut inq_buf),
            CmdTimeout::NoTimeout,
        )?;
        let inq = InquiryData::parse(&inq_buf[..n])?;
        let pdt = Pdt::try_from(inq.pdt)?;
        debug!(
            vendor = %inq.vendor(),
            product = %inq.product(),
            ?pdt,
            removable = inq.removable,
            "inquiry data"
        );
        self.pdt = Some(pdt);
        self.removable = inq.removable;

        build_read_capacity(&mut cdb, self.lun);
        let mut cap_buf = [0u8; READ_CAPACITY_DATA_LEN];
        let n = exec_cmd_with_retry(
            self,
            &cdb,
            DataPhase::In(&mut cap_buf),
            CmdTimeout::Group1,
        )?;
        let cap = parse_read_capacity(&cap_buf[..n])?;
        self.block_len = cap.block_len.get();
        self.last_lba = cap.last_lba.get();
        self.media_present = true;
        self.state = MediaState::Ready;
        debug!(
            block_len = self.block_len,
            last_lba = self.last_lba,
            "media parameters cached"
        );
        Ok(())
    }

    /// Check whether removable media is present and whether it changed.
    /// A detected change re-runs `get_params` so the geometry is fresh
    /// before any I/O is trusted; an empty slot clears `media_present` and
    /// surfaces `NoMedia`. For non-removable media this is a no-op.
    pub fn detect_media(&mut self) -> Result<(), UsbBootError> {
        if !self.removable {
            return Ok(());
        }

        let mut cdb = [0u8; CDB_LEN];
        build_test_unit_ready(&mut cdb, self.lun);

        match exec_cmd(self, &cdb, DataPhase::None, CmdTimeout::Group1) {
            Ok(_) => {
                if !self.media_present {
                    // Media appeared since the last check.
                    debug!("media inserted, reading parameters");
                    return self.get_params();
                }
                Ok(())
            },
            Err(UsbBootError::MediaMayHaveChanged) => {
                debug!("media change detected, re-reading parameters");
                self.state = MediaState::MediaChanged;
                self.get_params()
            },
            Err(e @ UsbBootError::NoMedia) => {
                debug!("no media present");
                self.media_present = false;
                self.state = MediaState::NotReady;
                Err(e)
            },
            Err(e @ (UsbBootError::DeviceNotReady | UsbBootError::DeviceNotResponding)) => {
                self.media_present = false;
                self.state = MediaState::NotReady;
                Err(e)
            },
            Err(e) => Err(e),
        }
    }
}
