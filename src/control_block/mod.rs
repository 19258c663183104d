// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! CDB fillers and response parsers for the USB Mass Storage Bootability
//! command subset. All multi-byte numeric fields are big-endian; reserved
//! and pad bytes are zero-filled.

pub mod inquiry;
pub mod mod_sense;
pub mod read;
pub mod read_capacity;
pub mod request_sense;
pub mod test_unit_ready;
pub mod write;

/// Bootability CDBs are carried as fixed 12-byte blocks (commands shorter
/// than 12 bytes are padded with trailing zeroes).
pub const CDB_LEN: usize = 12;

/// The LUN occupies the top 3 bits of CDB byte 1.
#[inline]
pub(crate) fn lun_field(lun: u8) -> u8 {
    (lun & 0x07) << 5
}
