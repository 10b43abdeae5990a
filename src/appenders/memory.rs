//! In-memory writer
//!
//! Keeps every destination's bytes in a shared map. Useful for tests and for
//! embedding the pipeline where records are forwarded elsewhere.

use crate::core::{Destination, LoggerError, Result, Writer};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Shared {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    writes: AtomicU64,
    fail_writes: AtomicBool,
}

/// Writer storing destinations in memory
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    shared: Arc<Shared>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.shared.fail_writes.store(failing, Ordering::SeqCst);
    }

    /// Number of write calls that reached this writer
    pub fn write_count(&self) -> u64 {
        self.shared.writes.load(Ordering::SeqCst)
    }

    /// Content written to `destination` so far
    pub fn contents(&self, destination: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.shared.files.lock().get(destination.as_ref()).cloned()
    }

    /// Content of `destination` as text, empty if never written
    pub fn text(&self, destination: impl AsRef<Path>) -> String {
        self.contents(destination)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }

    pub fn destinations(&self) -> Vec<PathBuf> {
        self.shared.files.lock().keys().cloned().collect()
    }
}

impl Writer for MemoryWriter {
    fn open(&self, destination: &Path, _exclusive_lock: bool) -> Result<Box<dyn Destination>> {
        Ok(Box::new(MemoryDestination {
            shared: Arc::clone(&self.shared),
            path: destination.to_path_buf(),
        }))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

struct MemoryDestination {
    shared: Arc<Shared>,
    path: PathBuf,
}

impl Destination for MemoryDestination {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        if self.shared.fail_writes.load(Ordering::SeqCst) {
            return Err(LoggerError::writer(format!(
                "simulated failure writing '{}'",
                self.path.display()
            )));
        }
        // One lock per write keeps each record contiguous
        self.shared
            .files
            .lock()
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(bytes);
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::writer::append;

    #[test]
    fn test_memory_writer_collects_bytes() {
        let writer = MemoryWriter::new();
        append(&writer, Path::new("a.log"), false, b"one\n").unwrap();
        append(&writer, Path::new("a.log"), true, b"two\n").unwrap();
        append(&writer, Path::new("b.log"), false, b"three\n").unwrap();

        assert_eq!(writer.text("a.log"), "one\ntwo\n");
        assert_eq!(writer.write_count(), 3);
        assert_eq!(writer.destinations().len(), 2);
    }

    #[test]
    fn test_memory_writer_failure_mode() {
        let writer = MemoryWriter::new();
        writer.set_failing(true);

        let err = append(&writer, Path::new("a.log"), false, b"x").unwrap_err();
        assert!(matches!(err, LoggerError::WriterError(_)));
        assert!(writer.contents("a.log").is_none());
    }
}
