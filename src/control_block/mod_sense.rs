// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! MODE SENSE (6 / 10) — CDB fillers plus parameter-header parsers.
//!
//! The block layer is LBA-based and takes its geometry from READ CAPACITY,
//! so the media state machine never issues these; they are part of the
//! bootability command table and kept for hosts that need mode pages.

use zerocopy::{
    FromBytes, Immutable, KnownLayout,
    byteorder::{BigEndian, U16},
};

use crate::{
    control_block::{CDB_LEN, lun_field},
    error::UsbBootError,
};

pub const MODE_SENSE6_OPCODE: u8 = 0x1A;
pub const MODE_SENSE10_OPCODE: u8 = 0x5A;

/// MODE SENSE(6) carries a 6-byte CDB, the one command of the subset not
/// padded to 12 bytes.
pub const MODE_SENSE6_CDB_LEN: usize = 6;

/// Fill a MODE SENSE(6) CDB.
/// Layout:
///   [0]=0x1A, [1]=LUN (high 3 bits), [2]=PAGE CODE, [3]=reserved,
///   [4]=ALLOCATION LENGTH, [5]=CONTROL (0)
#[inline]
pub fn build_mode_sense6(
    cdb: &mut [u8; MODE_SENSE6_CDB_LEN],
    lun: u8,
    page_code: u8,
    allocation_len: u8,
) {
    cdb.fill(0);
    cdb[0] = MODE_SENSE6_OPCODE;
    cdb[1] = lun_field(lun);
    cdb[2] = page_code;
    cdb[4] = allocation_len;
}

/// Fill a MODE SENSE(10) CDB.
/// Layout (padded to 12 bytes):
///   [0]=0x5A, [1]=LUN (high 3 bits), [2]=PAGE CODE, [3]..[6]=reserved,
///   [7..9]=PARAMETER LIST LENGTH (big-endian), [9]..[11]=reserved/pad
#[inline]
pub fn build_mode_sense10(
    cdb: &mut [u8; CDB_LEN],
    lun: u8,
    page_code: u8,
    para_list_len: u16,
) {
    cdb.fill(0);
    cdb[0] = MODE_SENSE10_OPCODE;
    cdb[1] = lun_field(lun);
    cdb[2] = page_code;
    cdb[7..9].copy_from_slice(&para_list_len.to_be_bytes());
}

/// 4-byte parameter header preceding MODE SENSE(6) page data.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct ModeSense6ParaHeader {
    pub mode_data_len: u8,
    pub medium_type: u8,
    pub device_para: u8,
    pub blk_des_len: u8,
}

/// 8-byte parameter header preceding MODE SENSE(10) page data. Length
/// fields are big-endian.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct ModeSense10ParaHeader {
    pub mode_data_len: U16<BigEndian>,
    pub reserved: [u8; 4],
    pub blk_des_len: U16<BigEndian>,
}

/// Parse a MODE SENSE(6) parameter header (needs >= 4 bytes).
#[inline]
pub fn parse_mode_sense6_header(buf: &[u8]) -> Result<&ModeSense6ParaHeader, UsbBootError> {
    let (raw, _rest) = ModeSense6ParaHeader::ref_from_prefix(buf)
        .map_err(|_| UsbBootError::MalformedResponse)?;
    Ok(raw)
}

/// Parse a MODE SENSE(10) parameter header (needs >= 8 bytes).
#[inline]
pub fn parse_mode_sense10_header(
    buf: &[u8],
) -> Result<&ModeSense10ParaHeader, UsbBootError> {
    let (raw, _rest) = ModeSense10ParaHeader::ref_from_prefix(buf)
        .map_err(|_| UsbBootError::MalformedResponse)?;
    Ok(raw)
}
