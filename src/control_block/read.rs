// SPDX-License-Identifier: AGPL-3.0-or-later GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::control_block::{CDB_LEN, lun_field};

pub const READ10_OPCODE: u8 = 0x28;

bitflags::bitflags! {
    /// Cache-control bits carried in byte 1 alongside the LUN field. The
    /// block engine leaves them zero; callers needing forced unit access
    /// can set FUA.
    #[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CacheFlags: u8 {
        const DPO = 0x10;
        const FUA = 0x08;
    }
}

/// Build a bootability **READ(10)** CDB.
///
/// * `lun`    – logical unit, top 3 bits of byte 1
/// * `lba`    – 32-bit Logical-Block Address to start reading from
/// * `blocks` – number of contiguous blocks to transfer (max 65 535)
/// * `flags`  – DPO/FUA cache-control bits
///
/// Layout (padded to 12 bytes):
/// - byte 0     : OPERATION CODE = 0x28
/// - byte 1     : LUN (high 3 bits) | DPO/FUA
/// - bytes 2..6 : LBA (big-endian, 32-bit)
/// - byte 6     : reserved
/// - bytes 7..9 : TRANSFER LENGTH (big-endian, 16-bit)
/// - bytes 9..12: reserved/pad
#[inline]
pub fn build_read10(
    cdb: &mut [u8; CDB_LEN],
    lun: u8,
    lba: u32,
    blocks: u16,
    flags: CacheFlags,
) {
    cdb.fill(0);
    cdb[0] = READ10_OPCODE;
    cdb[1] = lun_field(lun) | flags.bits();
    cdb[2..6].copy_from_slice(&lba.to_be_bytes());
    cdb[7..9].copy_from_slice(&blocks.to_be_bytes());
}
