use anyhow::Result;
use usb_boot_rs::{UsbBootError, UsbMassDevice};

use crate::unit_tests::fake_transport::{FakeTransport, Reply};

const READ10: u8 = 0x28;
const WRITE10: u8 = 0x2A;

fn ready_device(
    extra: Vec<Reply>,
    last_lba: u32,
    block_len: u32,
) -> UsbMassDevice<FakeTransport> {
    let mut script = FakeTransport::ready_script(true, last_lba, block_len);
    script.extend(extra);
    let mut dev = UsbMassDevice::new(FakeTransport::new(script), 0);
    dev.get_params().expect("setup get_params");
    dev
}

fn chunk_of(cdb: &[u8]) -> (u32, u16) {
    let lba = u32::from_be_bytes([cdb[2], cdb[3], cdb[4], cdb[5]]);
    let blocks = u16::from_be_bytes([cdb[7], cdb[8]]);
    (lba, blocks)
}

#[test]
fn test_read_splits_into_128_block_chunks() -> Result<()> {
    // 600 blocks = 4 * 128 + 88, so five READ10 commands.
    let chunks: [u16; 5] = [128, 128, 128, 128, 88];
    let extra = chunks
        .iter()
        .enumerate()
        .map(|(i, &blocks)| Reply::Data(vec![i as u8 + 1; blocks as usize * 512]))
        .collect();
    let mut dev = ready_device(extra, 99_999, 512);

    let mut buf = vec![0u8; 600 * 512];
    dev.read_blocks(100, 600, &mut buf)?;

    let reads: Vec<(u32, u16)> = dev
        .transport()
        .cdbs
        .iter()
        .filter(|c| c[0] == READ10)
        .map(|c| chunk_of(c))
        .collect();
    assert_eq!(
        reads,
        vec![(100, 128), (228, 128), (356, 128), (484, 128), (612, 88)]
    );

    // Chunk boundaries land where they should in the caller's buffer.
    assert_eq!(buf[0], 1);
    assert_eq!(buf[128 * 512 - 1], 1);
    assert_eq!(buf[128 * 512], 2);
    assert_eq!(buf[600 * 512 - 1], 5);
    Ok(())
}

#[test]
fn test_write_moves_all_bytes() -> Result<()> {
    let extra = vec![Reply::Good; 2];
    let mut dev = ready_device(extra, 99_999, 512);

    let data: Vec<u8> = (0..200u32 * 512).map(|i| i as u8).collect();
    dev.write_blocks(0, 200, &data)?;

    assert_eq!(dev.transport().count_opcode(WRITE10), 2);
    assert_eq!(dev.transport().written, data);
    Ok(())
}

#[test]
fn test_write_aborts_on_first_failed_chunk() {
    // Chunk 3 of 5 reports a hardware error; chunks 4-5 are never sent.
    let extra = vec![
        Reply::Good,
        Reply::Good,
        Reply::Check {
            key: 0x04,
            asc: 0x00,
            ascq: 0x00,
        },
    ];
    let mut dev = ready_device(extra, 99_999, 512);

    let data = vec![0xCD; 600 * 512];
    let err = dev
        .write_blocks(0, 600, &data)
        .expect_err("third chunk fails");

    assert_eq!(err, UsbBootError::HardwareError);
    assert_eq!(dev.transport().count_opcode(WRITE10), 3);
    // Only the two confirmed chunks reached the device.
    assert_eq!(dev.transport().written.len(), 2 * 128 * 512);
}

#[test]
fn test_out_of_range_is_local() {
    let mut dev = ready_device(vec![], 1999, 512);
    let commands_after_setup = dev.transport().cdbs.len();

    let mut buf = vec![0u8; 20 * 512];
    assert_eq!(
        dev.read_blocks(1990, 20, &mut buf),
        Err(UsbBootError::OutOfRange)
    );
    let mut buf = vec![0u8; 512];
    assert_eq!(
        dev.read_blocks(2000, 1, &mut buf),
        Err(UsbBootError::OutOfRange)
    );
    // Range checks never reach the transport.
    assert_eq!(dev.transport().cdbs.len(), commands_after_setup);
}

#[test]
fn test_last_lba_is_inclusive() -> Result<()> {
    let extra = vec![Reply::Data(vec![0u8; 512])];
    let mut dev = ready_device(extra, 1999, 512);

    let mut buf = vec![0u8; 512];
    dev.read_blocks(1999, 1, &mut buf)?;
    Ok(())
}

#[test]
fn test_lba_overflow_is_out_of_range() {
    let mut dev = ready_device(vec![], 1999, 512);
    let mut buf = vec![0u8; 2 * 512];
    assert_eq!(
        dev.read_blocks(u32::MAX, 2, &mut buf),
        Err(UsbBootError::OutOfRange)
    );
}

#[test]
fn test_buffer_must_match_block_count() {
    let mut dev = ready_device(vec![], 1999, 512);
    let mut buf = vec![0u8; 512];
    assert_eq!(
        dev.read_blocks(0, 2, &mut buf),
        Err(UsbBootError::InvalidBuffer {
            expected: 1024,
            got: 512
        })
    );
}

#[test]
fn test_no_media_blocks_io() {
    // Device never probed: geometry unknown, media not present.
    let mut dev = UsbMassDevice::new(FakeTransport::new(vec![]), 0);
    let mut buf = vec![0u8; 512];
    assert_eq!(dev.read_blocks(0, 1, &mut buf), Err(UsbBootError::NoMedia));
    assert!(dev.transport().cdbs.is_empty());
}

#[test]
fn test_zero_blocks_is_a_noop() -> Result<()> {
    let mut dev = ready_device(vec![], 1999, 512);
    let commands_after_setup = dev.transport().cdbs.len();

    dev.read_blocks(0, 0, &mut [])?;
    dev.write_blocks(0, 0, &[])?;

    assert_eq!(dev.transport().cdbs.len(), commands_after_setup);
    Ok(())
}
