//! Logging backend for the `log` facade.
//!
//! Every record is formatted once into a [`LogLine`] and written to stderr.
//! When a log file is configured the same line is appended there as well.
//!
//! ```text
//! log::info!() ─> [LogCollector] ─┬─> stderr
//!                                 └─> <log file> (optional, append)
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};

/// A formatted log line with metadata
#[derive(Clone, Debug)]
pub struct LogLine {
    pub message: String,
    pub level: log::Level,
    /// Timestamp of when the log was created
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: log::Level, message: String) -> Self {
        LogLine {
            message,
            level,
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Logger writing to stderr and, optionally, a file
pub struct LogCollector {
    level: LevelFilter,
    file: Mutex<Option<File>>,
    log_path: Option<PathBuf>,
}

impl LogCollector {
    pub fn new(level: LevelFilter) -> Self {
        LogCollector {
            level,
            file: Mutex::new(None),
            log_path: None,
        }
    }

    /// Also append every line to `path`, creating parent directories as needed
    pub fn with_file(mut self, path: &Path) -> Result<Self, String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create log directory: {}", e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;

        self.file = Mutex::new(Some(file));
        self.log_path = Some(path.to_path_buf());
        Ok(self)
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    fn write_line(&self, line: &LogLine) {
        let rendered = line.render();
        eprintln!("{}", rendered);

        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = writeln!(file, "{}", rendered);
            }
        }
    }

    /// Register this collector as the global logger
    pub fn install(self) -> Result<(), String> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))
            .map(|()| log::set_max_level(level))
            .map_err(|e| format!("Failed to set global logger: {}", e))
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.write_line(&LogLine::new(record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}
