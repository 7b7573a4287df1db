//! File logging; the terminal itself belongs to the UI.
//!
//! A log file that cannot be opened never stops the app: events are dropped
//! instead and a warning goes to stderr before the UI takes over.

use anyhow::{anyhow, Context, Result};
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

/// Where log events end up after [`init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    File(PathBuf),
    Discarded,
}

pub fn init(filter: &str, path: &Path) -> Result<LogSink> {
    let filter =
        EnvFilter::try_new(filter).with_context(|| format!("invalid log filter `{filter}`"))?;

    let (writer, sink) = match open_log_file(path) {
        Ok(file) => (
            BoxMakeWriter::new(Mutex::new(file)),
            LogSink::File(path.to_path_buf()),
        ),
        Err(err) => {
            eprintln!("warning: {err:#}; continuing without a log file");
            (BoxMakeWriter::new(io::sink), LogSink::Discarded)
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;
    Ok(sink)
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
