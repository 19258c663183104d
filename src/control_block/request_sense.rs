// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REQUEST SENSE — CDB filler plus fixed-format sense-data parser.
//!
//! CDB layout (bootability subset, padded to 12 bytes):
//!   [0] = 0x03 (REQUEST SENSE)
//!   [1] = LUN (high 3 bits)
//!   [2]..[3] = reserved (0)
//!   [4] = ALLOCATION LENGTH
//!   [5]..[11] = reserved/pad (0)

use std::fmt;

use crate::{
    control_block::{CDB_LEN, lun_field},
    error::UsbBootError,
};

pub const REQUEST_SENSE_OPCODE: u8 = 0x03;

/// Fixed-format sense data is 18 bytes.
pub const SENSE_DATA_LEN: usize = 18;

/// ASC values the media state machine branches on.
pub const ASC_NOT_READY: u8 = 0x04;
pub const ASC_MEDIA_CHANGE: u8 = 0x28;
pub const ASC_NO_MEDIA: u8 = 0x3A;

/// Fill a bootability REQUEST SENSE CDB.
#[inline]
pub fn build_request_sense(cdb: &mut [u8; CDB_LEN], lun: u8, allocation_len: u8) {
    cdb.fill(0);
    cdb[0] = REQUEST_SENSE_OPCODE;
    cdb[1] = lun_field(lun);
    cdb[4] = allocation_len;
}

/// Sense keys of the SCSI three-level error classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SenseKey {
    NoSense,
    Recovered,
    NotReady,
    MediumError,
    HardwareError,
    IllegalRequest,
    UnitAttention,
    DataProtect,
    BlankCheck,
    Vendor,
    Aborted,
    VolumeOverflow,
    Miscompare,
    Reserved(u8),
}

impl From<u8> for SenseKey {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0x00 => SenseKey::NoSense,
            0x01 => SenseKey::Recovered,
            0x02 => SenseKey::NotReady,
            0x03 => SenseKey::MediumError,
            0x04 => SenseKey::HardwareError,
            0x05 => SenseKey::IllegalRequest,
            0x06 => SenseKey::UnitAttention,
            0x07 => SenseKey::DataProtect,
            0x08 => SenseKey::BlankCheck,
            0x09 => SenseKey::Vendor,
            0x0B => SenseKey::Aborted,
            0x0D => SenseKey::VolumeOverflow,
            0x0E => SenseKey::Miscompare,
            other => SenseKey::Reserved(other),
        }
    }
}

/// The triple that drives every retry-vs-fail decision.
///
/// Layout (fixed format):
///   byte 2  : sense key (low 4 bits)
///   byte 12 : additional sense code
///   byte 13 : additional sense code qualifier
#[derive(Clone, PartialEq, Eq)]
pub struct SenseData {
    pub key: SenseKey,
    pub asc: u8,
    pub ascq: u8,
}

impl SenseData {
    /// Parse fixed-format sense data (needs >= 18 bytes).
    pub fn parse(buf: &[u8]) -> Result<Self, UsbBootError> {
        if buf.len() < SENSE_DATA_LEN {
            return Err(UsbBootError::MalformedResponse);
        }
        Ok(Self {
            key: SenseKey::from(buf[2]),
            asc: buf[12],
            ascq: buf[13],
        })
    }
}

impl fmt::Debug for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenseData")
            .field("key", &self.key)
            .field("asc", &format_args!("{:#04x}", self.asc))
            .field("ascq", &format_args!("{:#04x}", self.ascq))
            .field("description", &asc_ascq_to_str(self.asc, self.ascq))
            .finish()
    }
}

/// Return the SPC description for a given ASC/ASCQ pair.
///
/// * If the pair is not present in the table, returns `"UNSPECIFIED /
///   vendor specific"`.
#[inline]
pub fn asc_ascq_to_str(asc: u8, ascq: u8) -> &'static str {
    hot_table(asc, ascq).unwrap_or("UNSPECIFIED / vendor specific")
}

fn hot_table(asc: u8, ascq: u8) -> Option<&'static str> {
    Some(match (asc, ascq) {
        (0x00, 0x00) => "No additional sense information",
        (0x04, 0x00) => "Not ready - cause not reportable",
        (0x04, 0x01) => "Logical unit is in process of becoming ready",
        (0x04, 0x04) => "Not ready - format in progress",
        (0x11, 0x00) => "Medium error - unrecovered read error",
        (0x24, 0x00) => "Illegal request - invalid field in CDB",
        (0x25, 0x00) => "Illegal request - logical unit not supported",
        (0x27, 0x00) => "Write protected",
        (0x28, 0x00) => "Not ready to ready change, medium may have changed",
        (0x29, 0x00) => "Power on, reset, or bus device reset occurred",
        (0x3A, 0x00) => "Medium not present",
        _ => return None,
    })
}
