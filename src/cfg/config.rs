// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Retry mass command times, set by experience.
pub const USB_BOOT_COMMAND_RETRY: u32 = 5;
pub const USB_BOOT_INIT_MEDIA_RETRY: u32 = 5;

/// Stall between TEST UNIT READY attempts.
pub const USB_BOOT_RETRY_UNIT_READY_STALL_MS: u64 = 500;

/// The USB 2.0 spec caps command completion at 5 s; floppy, CD-ROM and
/// media-player devices need most of it.
pub const USB_BOOT_GENERAL_CMD_TIMEOUT_MS: u64 = 5_000;

/// Max blocks carried by one READ(10)/WRITE(10): 512 B * 128 = 64 KB.
pub const USB_BOOT_IO_BLOCKS: u16 = 128;

/// Retry budgets, stall/timeout durations, and the transfer chunk size.
///
/// Defaults reproduce the fixed bootability constants, which keeps the
/// worst-case blocking time per call deterministic; a YAML file may
/// override them where tunability is wanted.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BootConfig {
    #[serde(default = "default_command_retry", rename = "CommandRetry")]
    /// Attempts per command for the general retry wrapper.
    pub command_retry: u32,

    #[serde(default = "default_init_media_retry", rename = "InitMediaRetry")]
    /// TEST UNIT READY attempts during readiness polling.
    pub init_media_retry: u32,

    #[serde(default = "default_unit_ready_stall", rename = "UnitReadyStallMs")]
    /// Blocking wait between failed unit-ready attempts, in milliseconds.
    pub unit_ready_stall_ms: u64,

    #[serde(default = "default_cmd_timeout", rename = "GeneralCmdTimeoutMs")]
    /// Deadline for Group-1 timeout commands, in milliseconds.
    pub general_cmd_timeout_ms: u64,

    #[serde(default = "default_io_blocks", rename = "IoBlocks")]
    /// Largest single READ(10)/WRITE(10) transfer, in blocks.
    pub io_blocks: u16,

    #[serde(default, rename = "Logger")]
    /// Optional logging setup consumed by `cfg::logger::init_logger`.
    pub logger: Option<LoggerConfig>,
}

/// Logging destination and verbosity.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoggerConfig {
    /// EnvFilter directive string, e.g. `"info"` or `"usb_boot_rs=debug"`.
    pub level: String,
    /// `stdout`, `stderr` or `file`.
    pub output: String,
    pub file: Option<LogFileConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFileConfig {
    pub path: String,
    /// `minutely`, `hourly`, `daily`; anything else means no rotation.
    pub rotation_frequency: Option<String>,
}

fn default_command_retry() -> u32 {
    USB_BOOT_COMMAND_RETRY
}

fn default_init_media_retry() -> u32 {
    USB_BOOT_INIT_MEDIA_RETRY
}

fn default_unit_ready_stall() -> u64 {
    USB_BOOT_RETRY_UNIT_READY_STALL_MS
}

fn default_cmd_timeout() -> u64 {
    USB_BOOT_GENERAL_CMD_TIMEOUT_MS
}

fn default_io_blocks() -> u16 {
    USB_BOOT_IO_BLOCKS
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            command_retry: USB_BOOT_COMMAND_RETRY,
            init_media_retry: USB_BOOT_INIT_MEDIA_RETRY,
            unit_ready_stall_ms: USB_BOOT_RETRY_UNIT_READY_STALL_MS,
            general_cmd_timeout_ms: USB_BOOT_GENERAL_CMD_TIMEOUT_MS,
            io_blocks: USB_BOOT_IO_BLOCKS,
            logger: None,
        }
    }
}

impl BootConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let cfg: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.command_retry >= 1, "CommandRetry must be at least 1");
        ensure!(
            self.init_media_retry >= 1,
            "InitMediaRetry must be at least 1"
        );
        ensure!(self.io_blocks >= 1, "IoBlocks must be at least 1");
        Ok(())
    }

    pub fn unit_ready_stall(&self) -> Duration {
        Duration::from_millis(self.unit_ready_stall_ms)
    }

    pub fn general_cmd_timeout(&self) -> Duration {
        Duration::from_millis(self.general_cmd_timeout_ms)
    }
}
