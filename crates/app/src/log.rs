use std::{
    collections::VecDeque,
    io::Write,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

pub const MAX_ENTRIES: usize = 100;

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

pub trait Repository: Send + Sync + 'static {
    /// Stored entries, newest first.
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

impl Entry {
    fn new(record: &Record) -> Self {
        Self {
            time: Local::now().format("%b %d %H:%M:%S").to_string(),
            level: record.level(),
            message: record.args().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Log entries stored as JSON array in a file.
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Repository for FileLog {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|err| Error::Unknown(err.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(VecDeque::new()),
            Err(err) => Err(Error::Unknown(err.to_string())),
        }
    }

    fn write_entry(&self, entry: Entry) -> Result<(), Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(MAX_ENTRIES);
        let content =
            serde_json::to_string(&entries).map_err(|err| Error::Unknown(err.to_string()))?;
        std::fs::write(&self.path, content).map_err(|err| Error::Unknown(err.to_string()))
    }
}

static LOGGER: Logger = Logger;

/// Install the logger, optionally keeping the entries in a repository.
///
/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(repository: Option<Arc<Mutex<dyn Repository>>>) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = repository;
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Trace))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.target().starts_with("gymtracker") {
            metadata.level() <= Level::Trace
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = Entry::new(record);
        let _ = writeln!(
            std::io::stderr(),
            "{} {:<5} {}",
            entry.time,
            entry.level,
            entry.message
        );

        if let Ok(log) = LOG.lock() {
            if let Some(repository) = log.as_ref() {
                if let Ok(repository) = repository.lock() {
                    let _ = repository.write_entry(entry);
                }
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
