// SPDX-License-Identifier: AGPL-3.0-or-later GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::control_block::{CDB_LEN, lun_field, read::CacheFlags};

pub const WRITE10_OPCODE: u8 = 0x2A;

/// Build a bootability **WRITE(10)** CDB.
///
/// * `lun`    – logical unit, top 3 bits of byte 1
/// * `lba`    – 32-bit Logical-Block Address to start writing at
/// * `blocks` – number of contiguous blocks to transfer (max 65 535)
/// * `flags`  – DPO/FUA cache-control bits
///
/// Same layout as READ(10) with opcode 0x2A.
#[inline]
pub fn build_write10(
    cdb: &mut [u8; CDB_LEN],
    lun: u8,
    lba: u32,
    blocks: u16,
    flags: CacheFlags,
) {
    cdb.fill(0);
    cdb[0] = WRITE10_OPCODE;
    cdb[1] = lun_field(lun) | flags.bits();
    cdb[2..6].copy_from_slice(&lba.to_be_bytes());
    cdb[7..9].copy_from_slice(&blocks.to_be_bytes());
}
