// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! INQUIRY — CDB filler plus standard-data parser.
//!
//! CDB layout (bootability subset, padded to 12 bytes):
//!   [0] = 0x12 (INQUIRY)
//!   [1] = LUN (high 3 bits)
//!   [2]..[3] = reserved (0)
//!   [4] = ALLOCATION LENGTH
//!   [5]..[11] = reserved/pad (0)

use crate::{
    control_block::{CDB_LEN, lun_field},
    error::UsbBootError,
};

pub const INQUIRY_OPCODE: u8 = 0x12;

/// Standard INQUIRY data is at least 36 bytes.
pub const INQUIRY_DATA_LEN: usize = 36;

/// Peripheral device types this layer can drive.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pdt {
    DirectAccess = 0x00,
    Cdrom = 0x05,
    Optical = 0x07,
    SimpleDirect = 0x0E,
}

impl From<Pdt> for u8 {
    #[inline]
    fn from(p: Pdt) -> u8 {
        p as u8
    }
}

impl TryFrom<u8> for Pdt {
    type Error = UsbBootError;

    #[inline]
    fn try_from(v: u8) -> Result<Self, UsbBootError> {
        use Pdt::*;
        Ok(match v {
            0x00 => DirectAccess,
            0x05 => Cdrom,
            0x07 => Optical,
            0x0E => SimpleDirect,
            other => return Err(UsbBootError::UnsupportedDevice(other)),
        })
    }
}

/// Fill a bootability INQUIRY CDB.
#[inline]
pub fn build_inquiry(cdb: &mut [u8; CDB_LEN], lun: u8, allocation_len: u8) {
    cdb.fill(0);
    cdb[0] = INQUIRY_OPCODE;
    cdb[1] = lun_field(lun);
    cdb[4] = allocation_len;
}

/// Fields of the standard INQUIRY data the boot layer cares about.
///
/// Layout:
///   byte 0  : PDT (low 5 bits)
///   byte 1  : RMB (bit 7)
///   bytes 8..16  : vendor id (ASCII, space padded)
///   bytes 16..32 : product id
///   bytes 32..36 : product revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryData {
    pub pdt: u8,
    pub removable: bool,
    pub vendor_id: [u8; 8],
    pub product_id: [u8; 16],
    pub product_revision: [u8; 4],
}

impl InquiryData {
    /// Parse standard INQUIRY data (needs >= 36 bytes).
    pub fn parse(buf: &[u8]) -> Result<Self, UsbBootError> {
        if buf.len() < INQUIRY_DATA_LEN {
            return Err(UsbBootError::MalformedResponse);
        }

        let mut vendor_id = [0u8; 8];
        let mut product_id = [0u8; 16];
        let mut product_revision = [0u8; 4];
        vendor_id.copy_from_slice(&buf[8..16]);
        product_id.copy_from_slice(&buf[16..32]);
        product_revision.copy_from_slice(&buf[32..36]);

        Ok(Self {
            pdt: buf[0] & 0x1F,
            removable: buf[1] & 0x80 != 0,
            vendor_id,
            product_id,
            product_revision,
        })
    }

    pub fn vendor(&self) -> String {
        trim_ascii(&self.vendor_id)
    }

    pub fn product(&self) -> String {
        trim_ascii(&self.product_id)
    }

    pub fn revision(&self) -> String {
        trim_ascii(&self.product_revision)
    }
}

fn trim_ascii(bytes: &[u8]) -> String {
    let s: String = bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect();
    s.trim().to_string()
}
