//! Append-only CSV message log.
//!
//! The file starts with [`HEADER`] and then holds one row per [`Record`]. It is
//! created on first need and never rewritten afterwards. Writes go through a
//! single mutex so concurrent requests cannot interleave partial rows.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StoreError;
use crate::record::{HEADER, Record};

#[derive(Debug)]
pub struct LogStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and the file with its header row unless the
    /// file already exists. Returns `true` when the file was created by this call.
    ///
    /// ```
    /// use msglog_core::LogStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = LogStore::new(dir.path().join("db").join("messages.csv"));
    /// assert!(store.ensure_initialized().unwrap());
    /// assert!(!store.ensure_initialized().unwrap());
    /// ```
    pub fn ensure_initialized(&self) -> Result<bool, StoreError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.initialize_locked()
    }

    /// Appends one row for `record`, creating the file first if it is missing.
    pub fn append(&self, record: &Record) -> Result<(), StoreError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.initialize_locked()?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| self.open_error(source))?;
        let mut writer = csv_writer(file);
        writer
            .serialize(record)
            .map_err(|source| self.write_error(source))?;
        writer.flush().map_err(|source| self.flush_error(source))?;

        tracing::info!(
            message_id = %record.message_id,
            sender_id = %record.sender_id,
            path = %self.path.display(),
            "logged message from {}: {}",
            record.first_name,
            record.text
        );
        Ok(())
    }

    fn initialize_locked(&self) -> Result<bool, StoreError> {
        self.initialize_with(|path| OpenOptions::new().write(true).create_new(true).open(path))
    }

    /// Creates the log through `create` and writes the header. A file whose
    /// header could not be written is removed so the next call starts over.
    fn initialize_with<W, F>(&self, create: F) -> Result<bool, StoreError>
    where
        W: Write,
        F: FnOnce(&Path) -> io::Result<W>,
    {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = match create(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(err) => return Err(self.open_error(err)),
        };
        if let Err(err) = self.write_header(file) {
            if let Err(cleanup) = fs::remove_file(&self.path) {
                tracing::error!(
                    error = %cleanup,
                    path = %self.path.display(),
                    "failed to remove message log with incomplete header"
                );
            }
            return Err(err);
        }

        tracing::info!(path = %self.path.display(), "message log initialized");
        Ok(true)
    }

    fn write_header<W: Write>(&self, file: W) -> Result<(), StoreError> {
        let mut writer = csv_writer(file);
        writer
            .write_record(HEADER)
            .map_err(|source| self.write_error(source))?;
        writer.flush().map_err(|source| self.flush_error(source))
    }

    fn open_error(&self, source: io::Error) -> StoreError {
        StoreError::Open {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: csv::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn flush_error(&self, source: io::Error) -> StoreError {
        StoreError::Flush {
            path: self.path.clone(),
            source,
        }
    }
}

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}
