// SPDX-License-Identifier: AGPL-3.0-or-later GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::control_block::{CDB_LEN, lun_field};

pub const TEST_UNIT_READY_OPCODE: u8 = 0x00;

/// Fill a bootability TEST UNIT READY CDB (opcode 0x00, LUN in byte 1,
/// everything else zero).
#[inline]
pub fn build_test_unit_ready(cdb: &mut [u8; CDB_LEN], lun: u8) {
    cdb.fill(0);
    cdb[0] = TEST_UNIT_READY_OPCODE;
    cdb[1] = lun_field(lun);
}
