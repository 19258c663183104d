// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Chunked block transfer over READ(10)/WRITE(10).
//!
//! Neither the transport nor the device command queue is guaranteed to
//! accept arbitrarily large single transfers, so requests are split into
//! chunks of at most `io_blocks` blocks (128 by default, 64 KB at 512-byte
//! blocks). The first failed chunk aborts the rest; data already moved by
//! prior chunks stays in the caller's buffer, and the caller must treat
//! everything past the last confirmed chunk as undefined.

use tracing::debug;

use crate::{
    control_block::{
        CDB_LEN,
        read::{CacheFlags, build_read10},
        write::build_write10,
    },
    device::UsbMassDevice,
    error::UsbBootError,
    exec::{CmdTimeout, exec_cmd_with_retry},
    transport::{DataPhase, UsbTransport},
};

impl<T: UsbTransport> UsbMassDevice<T> {
    /// Read `total` blocks starting at `lba` into `buf`. The buffer must
    /// be exactly `total * block_len` bytes.
    pub fn read_blocks(
        &mut self,
        lba: u32,
        total: u32,
        buf: &mut [u8],
    ) -> Result<(), UsbBootError> {
        self.check_request(lba, total, buf.len())?;

        let block_len = self.block_len as usize;
        let mut cdb = [0u8; CDB_LEN];
        let mut lba = lba;
        let mut remaining = total;
        let mut offset = 0usize;

        while remaining > 0 {
            let chunk = remaining.min(self.cfg.io_blocks as u32) as u16;
            let len = chunk as usize * block_len;
            build_read10(&mut cdb, self.lun, lba, chunk, CacheFlags::empty());
            debug!(lba, blocks = chunk, "read chunk");
            exec_cmd_with_retry(
                self,
                &cdb,
                DataPhase::In(&mut buf[offset..offset + len]),
                CmdTimeout::Group1,
            )?;
            lba += chunk as u32;
            offset += len;
            remaining -= chunk as u32;
        }
        Ok(())
    }

    /// Write `total` blocks starting at `lba` from `buf`. The buffer must
    /// be exactly `total * block_len` bytes.
    pub fn write_blocks(
        &mut self,
        lba: u32,
        total: u32,
        buf: &[u8],
    ) -> Result<(), UsbBootError> {
        self.check_request(lba, total, buf.len())?;

        let block_len = self.block_len as usize;
        let mut cdb = [0u8; CDB_LEN];
        let mut lba = lba;
        let mut remaining = total;
        let mut offset = 0usize;

        while remaining > 0 {
            let chunk = remaining.min(self.cfg.io_blocks as u32) as u16;
            let len = chunk as usize * block_len;
            build_write10(&mut cdb, self.lun, lba, chunk, CacheFlags::empty());
            debug!(lba, blocks = chunk, "write chunk");
            exec_cmd_with_retry(
                self,
                &cdb,
                DataPhase::Out(&buf[offset..offset + len]),
                CmdTimeout::Group1,
            )?;
            lba += chunk as u32;
            offset += len;
            remaining -= chunk as u32;
        }
        Ok(())
    }

    /// Local validation, done before anything reaches the transport: media
    /// present, LBA range within the last known LBA, buffer sized to the
    /// requested block count.
    fn check_request(
        &self,
        lba: u32,
        total: u32,
        buf_len: usize,
    ) -> Result<(), UsbBootError> {
        if !self.media_present {
            return Err(UsbBootError::NoMedia);
        }
        if total > 0 {
            match lba.checked_add(total - 1) {
                Some(end) if end <= self.last_lba => {},
                _ => return Err(UsbBootError::OutOfRange),
            }
        }
        let expected = total as usize * self.block_len as usize;
        if buf_len != expected {
            return Err(UsbBootError::InvalidBuffer {
                expected,
                got: buf_len,
            });
        }
        Ok(())
    }
}
