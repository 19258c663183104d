use hex_literal::hex;
use usb_boot_rs::control_block::{
    read::{CacheFlags, build_read10},
    write::build_write10,
};

#[test]
fn test_read10_cdb_layout() {
    let mut cdb = [0u8; 12];
    build_read10(&mut cdb, 2, 0x0102_0304, 0x0506, CacheFlags::empty());
    assert_eq!(cdb, hex!("28 40 01 02 03 04 00 05 06 00 00 00"));
}

#[test]
fn test_write10_cdb_layout() {
    let mut cdb = [0u8; 12];
    build_write10(&mut cdb, 2, 0x0102_0304, 0x0506, CacheFlags::empty());
    assert_eq!(cdb, hex!("2A 40 01 02 03 04 00 05 06 00 00 00"));
}

#[test]
fn test_read10_lun_field() {
    for lun in 0u8..8 {
        let mut cdb = [0u8; 12];
        build_read10(&mut cdb, lun, 0, 1, CacheFlags::empty());
        assert_eq!(cdb[1] >> 5, lun);
    }
}

#[test]
fn test_cache_flags_share_byte1_with_lun() {
    let mut cdb = [0u8; 12];
    build_write10(&mut cdb, 7, 0, 1, CacheFlags::FUA);
    assert_eq!(cdb[1], 0xE0 | 0x08);

    build_read10(&mut cdb, 0, 0, 1, CacheFlags::DPO | CacheFlags::FUA);
    assert_eq!(cdb[1], 0x18);
}

#[test]
fn test_transfer_length_is_big_endian() {
    let mut cdb = [0u8; 12];
    build_read10(&mut cdb, 0, 0, 128, CacheFlags::empty());
    assert_eq!(&cdb[7..9], &[0x00, 0x80]);
}
