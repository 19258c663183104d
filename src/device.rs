// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{cfg::config::BootConfig, control_block::inquiry::Pdt, transport::UsbTransport};

/// Where the media detection machinery currently stands for a device.
///
/// Normal path is `Uninitialized -> Probing -> Ready`; a detected change
/// goes `Ready -> MediaChanged -> Probing`, and `Probing -> NotReady` when
/// the unit never becomes ready within the init-media retry budget.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaState {
    Uninitialized,
    Probing,
    Ready,
    MediaChanged,
    NotReady,
}

/// Per-LUN context of one attached mass-storage unit.
///
/// The cached geometry (`block_len`, `last_lba`) is valid only while
/// `media_present` is true; `get_params` and `detect_media` are the only
/// operations that repopulate it. One logical command is outstanding at a
/// time, so no interior locking.
#[derive(Debug)]
pub struct UsbMassDevice<T: UsbTransport> {
    pub(crate) transport: T,
    pub(crate) lun: u8,
    pub(crate) cfg: BootConfig,
    pub(crate) pdt: Option<Pdt>,
    pub(crate) removable: bool,
    pub(crate) block_len: u32,
    pub(crate) last_lba: u32,
    pub(crate) media_present: bool,
    pub(crate) state: MediaState,
}

impl<T: UsbTransport> UsbMassDevice<T> {
    /// Wrap a transport handle for the given LUN (0-7) with the standard
    /// bootability retry budgets.
    pub fn new(transport: T, lun: u8) -> Self {
        Self::with_config(transport, lun, BootConfig::default())
    }

    pub fn with_config(transport: T, lun: u8, cfg: BootConfig) -> Self {
        debug_assert!(lun <= 7, "LUN must be 0-7");
        Self {
            transport,
            lun,
            cfg,
            pdt: None,
            removable: false,
            block_len: 0,
            last_lba: 0,
            media_present: false,
            state: MediaState::Uninitialized,
        }
    }

    pub fn lun(&self) -> u8 {
        self.lun
    }

    /// Borrow the underlying transport handle.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Peripheral device type, known after a successful `get_params`.
    pub fn pdt(&self) -> Option<Pdt> {
        self.pdt
    }

    pub fn is_removable(&self) -> bool {
        self.removable
    }

    /// Block size in bytes. Only meaningful while `media_present`.
    pub fn block_len(&self) -> u32 {
        self.block_len
    }

    /// Last valid LBA. Only meaningful while `media_present`.
    pub fn last_lba(&self) -> u32 {
        self.last_lba
    }

    pub fn media_present(&self) -> bool {
        self.media_present
    }

    pub fn state(&self) -> MediaState {
        self.state
    }
}
