//! File writer implementation

use crate::core::{Destination, LoggerError, Result, Writer};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends to files on the local filesystem
///
/// Missing parent directories are created on open. Each open handle is
/// written with a single `write_all`, so one record never straddles two
/// handles' writes when the exclusive lock is requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileWriter;

impl FileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Writer for FileWriter {
    fn open(&self, destination: &Path, exclusive_lock: bool) -> Result<Box<dyn Destination>> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(destination)
            .map_err(|e| {
                LoggerError::io_operation(
                    "open log file",
                    format!("Failed to open '{}'", destination.display()),
                    e,
                )
            })?;

        if exclusive_lock {
            file.lock_exclusive()
                .map_err(|e| LoggerError::file_lock(destination.display().to_string(), e))?;
        }

        Ok(Box::new(FileDestination {
            file: Some(file),
            path: destination.to_path_buf(),
            locked: exclusive_lock,
        }))
    }

    fn name(&self) -> &str {
        "file"
    }
}

struct FileDestination {
    file: Option<File>,
    path: PathBuf,
    locked: bool,
}

impl FileDestination {
    fn release(&mut self) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };

        let flushed = file.flush().map_err(|e| {
            LoggerError::io_operation(
                "flush log file",
                format!("Failed to flush '{}'", self.path.display()),
                e,
            )
        });

        if self.locked {
            self.locked = false;
            if let Err(e) = FileExt::unlock(&file) {
                return flushed.and(Err(LoggerError::io_operation(
                    "unlock log file",
                    format!("Failed to release lock on '{}'", self.path.display()),
                    e,
                )));
            }
        }

        flushed
    }
}

impl Destination for FileDestination {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File destination already closed"))?;

        file.write_all(bytes).map_err(|e| {
            LoggerError::io_operation(
                "write log file",
                format!("Failed to append to '{}'", self.path.display()),
                e,
            )
        })
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        self.release()
    }
}

impl Drop for FileDestination {
    fn drop(&mut self) {
        // Release the lock even on early exit
        let _ = self.release();
    }
}
