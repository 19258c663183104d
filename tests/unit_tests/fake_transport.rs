//! Scripted in-memory transport: every non-REQUEST-SENSE command consumes
//! the next scripted reply; a `Check` reply parks sense bytes that the
//! following REQUEST SENSE picks up, mirroring how a real device holds
//! sense until fetched.

use std::{collections::VecDeque, time::Duration};

use usb_boot_rs::transport::{DataPhase, TransportError, UsbTransport};

pub const SENSE_LEN: usize = 18;

#[derive(Debug, Clone)]
pub enum Reply {
    /// Command succeeds; bytes are copied into an `In` data phase.
    Data(Vec<u8>),
    /// Command succeeds with no device-to-host data (TUR, WRITE10).
    Good,
    /// Status phase fails; the given sense triple is returned by the next
    /// REQUEST SENSE.
    Check { key: u8, asc: u8, ascq: u8 },
    Timeout,
    NoResponse,
}

pub struct FakeTransport {
    script: VecDeque<Reply>,
    pending_sense: Option<[u8; SENSE_LEN]>,
    /// Every CDB seen, REQUEST SENSE included.
    pub cdbs: Vec<Vec<u8>>,
    /// Timeout passed with each command, same order as `cdbs`.
    pub timeouts: Vec<Option<Duration>>,
    /// Bytes captured from successful `Out` data phases.
    pub written: Vec<u8>,
}

impl FakeTransport {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            script: script.into(),
            pending_sense: None,
            cdbs: Vec::new(),
            timeouts: Vec::new(),
            written: Vec::new(),
        }
    }

    pub fn count_opcode(&self, opcode: u8) -> usize {
        self.cdbs.iter().filter(|c| c[0] == opcode).count()
    }

    pub fn sense_bytes(key: u8, asc: u8, ascq: u8) -> [u8; SENSE_LEN] {
        let mut b = [0u8; SENSE_LEN];
        b[0] = 0x70; // fixed format, current error
        b[2] = key;
        b[7] = 10; // additional sense length
        b[12] = asc;
        b[13] = ascq;
        b
    }

    pub fn inquiry_bytes(pdt: u8, removable: bool) -> Vec<u8> {
        let mut b = vec![0u8; 36];
        b[0] = pdt;
        b[1] = if removable { 0x80 } else { 0x00 };
        b[4] = 31;
        b[8..16].copy_from_slice(b"FAKEVEND");
        b[16..32].copy_from_slice(b"FAKE PRODUCT    ");
        b[32..36].copy_from_slice(b"0001");
        b
    }

    pub fn capacity_bytes(last_lba: u32, block_len: u32) -> Vec<u8> {
        let mut b = Vec::with_capacity(8);
        b.extend_from_slice(&last_lba.to_be_bytes());
        b.extend_from_slice(&block_len.to_be_bytes());
        b
    }

    /// TUR ok + INQUIRY + READ CAPACITY: the replies `get_params` consumes
    /// on its happy path.
    pub fn ready_script(removable: bool, last_lba: u32, block_len: u32) -> Vec<Reply> {
        vec![
            Reply::Good,
            Reply::Data(Self::inquiry_bytes(0x00, removable)),
            Reply::Data(Self::capacity_bytes(last_lba, block_len)),
        ]
    }
}

impl UsbTransport for FakeTransport {
    fn execute(
        &mut self,
        _lun: u8,
        cdb: &[u8],
        data: DataPhase<'_>,
        timeout: Option<Duration>,
    ) -> Result<usize, TransportError> {
        self.cdbs.push(cdb.to_vec());
        self.timeouts.push(timeout);

        // REQUEST SENSE is answered out of band from the parked sense.
        if cdb[0] == 0x03 {
            let sense = self
                .pending_sense
                .take()
                .unwrap_or_else(|| Self::sense_bytes(0, 0, 0));
            if let DataPhase::In(buf) = data {
                let n = sense.len().min(buf.len());
                buf[..n].copy_from_slice(&sense[..n]);
                return Ok(n);
            }
            return Ok(0);
        }

        let reply = self
            .script
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command: {cdb:02X?}"));

        match reply {
            Reply::Data(d) => match data {
                DataPhase::In(buf) => {
                    let n = d.len().min(buf.len());
                    buf[..n].copy_from_slice(&d[..n]);
                    Ok(n)
                },
                DataPhase::Out(_) | DataPhase::None => Ok(0),
            },
            Reply::Good => match data {
                DataPhase::Out(buf) => {
                    self.written.extend_from_slice(buf);
                    Ok(buf.len())
                },
                DataPhase::In(_) | DataPhase::None => Ok(0),
            },
            Reply::Check { key, asc, ascq } => {
                self.pending_sense = Some(Self::sense_bytes(key, asc, ascq));
                Err(TransportError::CommandFailed)
            },
            Reply::Timeout => Err(TransportError::Timeout),
            Reply::NoResponse => Err(TransportError::NoResponse),
        }
    }
}
