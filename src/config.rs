use clap::Parser;
use std::{path::PathBuf, time::Duration};

pub const APP_NAME: &str = "tasklist";
const LOG_FILE_NAME: &str = "tasklist.log";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Single-screen terminal to-do list", long_about = None)]
pub struct Config {
    /// Directory holding the saved tasks
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Fade in/out duration in milliseconds (0 disables animation)
    #[arg(long, value_name = "MS", default_value_t = 300)]
    pub fade_ms: u64,

    /// Log filter, e.g. `info` or `tasklist=debug`
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,

    /// Log file; defaults to tasklist.log inside the data directory
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_NAME)
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join(LOG_FILE_NAME))
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}
