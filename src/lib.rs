//! Command layer for driving USB mass-storage devices with the USB Mass
//! Storage Bootability subset of the SCSI Transparent command set.
//!
//! The crate translates "get geometry", "is media present", "read/write N
//! blocks at LBA X" into fixed-layout CDBs, dispatches them over a caller
//! supplied bulk transport, and interprets status/sense data to decide
//! success, retry, or fatal failure. The transport itself (CBW/CSW framing,
//! raw USB scheduling) stays behind the [`transport::UsbTransport`] trait.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Chunked READ(10)/WRITE(10) block transfer.
mod block_io;
/// Configuration and logging.
pub mod cfg;
/// CDB fillers and response parsers for the bootability command subset.
pub mod control_block;
/// Per-LUN device context and media state.
pub mod device;
/// Error kinds surfaced by boot-layer operations.
pub mod error;
/// Timeout classification, sense-driven classification, bounded retry.
mod exec;
/// Media discovery and change detection.
mod media;
/// Bulk-transport collaborator boundary.
pub mod transport;

pub use cfg::config::BootConfig;
pub use device::{MediaState, UsbMassDevice};
pub use error::UsbBootError;
pub use transport::{DataPhase, TransportError, UsbTransport};
