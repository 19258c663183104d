// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use zerocopy::{
    FromBytes, Immutable, KnownLayout,
    byteorder::{BigEndian, U32},
};

use crate::{
    control_block::{CDB_LEN, lun_field},
    error::UsbBootError,
};

pub const READ_CAPACITY_OPCODE: u8 = 0x25;

/// READ CAPACITY parameter data is 8 bytes.
pub const READ_CAPACITY_DATA_LEN: usize = 8;

/// Fill a bootability READ CAPACITY CDB.
///
/// Layout (padded to 12 bytes):
///   [0] = 0x25, [1] = LUN (high 3 bits), [2]..[11] = reserved/pad (0)
#[inline]
pub fn build_read_capacity(cdb: &mut [u8; CDB_LEN], lun: u8) {
    cdb.fill(0);
    cdb[0] = READ_CAPACITY_OPCODE;
    cdb[1] = lun_field(lun);
}

/// Raw 8-byte parameter data returned by READ CAPACITY.
///
/// Both fields are big-endian as per SCSI specification. `last_lba` is the
/// highest valid LBA, not the block count.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct ReadCapacityData {
    /// Last valid logical block address (bytes 0-3).
    pub last_lba: U32<BigEndian>,
    /// Block length in bytes (bytes 4-7).
    pub block_len: U32<BigEndian>,
}

impl ReadCapacityData {
    #[inline]
    pub fn total_bytes(&self) -> u64 {
        (self.last_lba.get() as u64 + 1) * self.block_len.get() as u64
    }
}

/// Parse READ CAPACITY parameter data (needs >= 8 bytes).
#[inline]
pub fn parse_read_capacity(buf: &[u8]) -> Result<&ReadCapacityData, UsbBootError> {
    let (raw, _rest) = ReadCapacityData::ref_from_prefix(buf)
        .map_err(|_| UsbBootError::MalformedResponse)?;
    Ok(raw)
}
