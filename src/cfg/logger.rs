// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use crate::cfg::config::LoggerConfig;

/// Install the global tracing subscriber described by `config`.
///
/// The returned guard must be kept alive for the duration of logging;
/// dropping it flushes and stops the non-blocking writer.
pub fn init_logger(config: &LoggerConfig) -> Result<WorkerGuard> {
    let (writer, guard) = match config.output.as_str() {
        "stdout" => tracing_appender::non_blocking(std::io::stdout()),
        "stderr" => tracing_appender::non_blocking(std::io::stderr()),
        "file" => {
            let file_cfg = config
                .file
                .as_ref()
                .context("logger output is 'file' but no file section given")?;

            let path = Path::new(&file_cfg.path);
            let directory = path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .to_path_buf();
            let file_name = path
                .file_name()
                .context("log file path has no file name")?
                .to_os_string();

            let rotation = match file_cfg.rotation_frequency.as_deref() {
                Some("minutely") => Rotation::MINUTELY,
                Some("hourly") => Rotation::HOURLY,
                Some("daily") => Rotation::DAILY,
                _ => Rotation::NEVER,
            };
            let appender = RollingFileAppender::new(rotation, directory, file_name);
            tracing_appender::non_blocking(appender)
        },
        other => {
            return Err(anyhow::anyhow!("invalid log output specified: {other}"));
        },
    };

    let env_filter = EnvFilter::try_new(&config.level)
        .context("failed to parse log level from config")?;

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false));

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set global default subscriber")?;

    Ok(guard)
}
