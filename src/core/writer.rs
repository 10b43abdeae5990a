//! Writer trait for log destinations

use super::error::Result;
use std::path::Path;

/// Opens named destinations for appending
pub trait Writer: Send + Sync {
    /// Open `destination` for appending
    ///
    /// With `exclusive_lock` the returned handle holds an exclusive lock on
    /// the destination until it is closed or dropped.
    fn open(&self, destination: &Path, exclusive_lock: bool) -> Result<Box<dyn Destination>>;
    fn name(&self) -> &str;
}

/// An open destination
///
/// Dropping a destination releases it; [`Destination::close`] does the same
/// but reports any error encountered while releasing.
pub trait Destination: Send {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn close(self: Box<Self>) -> Result<()>;
}

/// Open, append and close in one step
///
/// The destination is closed even when the write fails; the write error is
/// reported in preference to the close error.
pub fn append(
    writer: &dyn Writer,
    destination: &Path,
    exclusive_lock: bool,
    bytes: &[u8],
) -> Result<()> {
    let mut handle = writer.open(destination, exclusive_lock)?;
    let written = handle.write(bytes);
    let closed = handle.close();
    written.and(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls {
        writes: AtomicUsize,
        closes: AtomicUsize,
    }

    struct Recording {
        calls: Arc<Calls>,
        fail_open: bool,
        fail_write: bool,
        fail_close: bool,
    }

    struct RecordingDestination {
        calls: Arc<Calls>,
        fail_write: bool,
        fail_close: bool,
    }

    impl Writer for Recording {
        fn open(
            &self,
            _destination: &Path,
            _exclusive_lock: bool,
        ) -> Result<Box<dyn Destination>> {
            if self.fail_open {
                return Err(LoggerError::writer("open refused"));
            }
            Ok(Box::new(RecordingDestination {
                calls: Arc::clone(&self.calls),
                fail_write: self.fail_write,
                fail_close: self.fail_close,
            }))
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    impl Destination for RecordingDestination {
        fn write(&mut self, _bytes: &[u8]) -> Result<()> {
            self.calls.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_write {
                return Err(LoggerError::writer("write refused"));
            }
            Ok(())
        }

        fn close(self: Box<Self>) -> Result<()> {
            self.calls.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                return Err(LoggerError::writer("close refused"));
            }
            Ok(())
        }
    }

    fn recording(fail_open: bool, fail_write: bool, fail_close: bool) -> (Recording, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let writer = Recording {
            calls: Arc::clone(&calls),
            fail_open,
            fail_write,
            fail_close,
        };
        (writer, calls)
    }

    fn message(err: LoggerError) -> String {
        match err {
            LoggerError::WriterError(message) => message,
            other => panic!("Expected writer error, got {:?}", other),
        }
    }

    #[test]
    fn test_append_closes_after_success() {
        let (writer, calls) = recording(false, false, false);
        append(&writer, Path::new("a.log"), true, b"x").unwrap();

        assert_eq!(calls.writes.load(Ordering::SeqCst), 1);
        assert_eq!(calls.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_append_closes_after_failed_write() {
        let (writer, calls) = recording(false, true, false);
        let err = append(&writer, Path::new("a.log"), false, b"x").unwrap_err();

        assert_eq!(message(err), "write refused");
        assert_eq!(calls.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_write_error_wins_over_close_error() {
        let (writer, calls) = recording(false, true, true);
        let err = append(&writer, Path::new("a.log"), false, b"x").unwrap_err();

        assert_eq!(message(err), "write refused");
        assert_eq!(calls.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_error_reported_after_good_write() {
        let (writer, calls) = recording(false, false, true);
        let err = append(&writer, Path::new("a.log"), false, b"x").unwrap_err();

        assert_eq!(message(err), "close refused");
        assert_eq!(calls.writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_open_skips_write_and_close() {
        let (writer, calls) = recording(true, false, false);
        let err = append(&writer, Path::new("a.log"), false, b"x").unwrap_err();

        assert_eq!(message(err), "open refused");
        assert_eq!(calls.writes.load(Ordering::SeqCst), 0);
        assert_eq!(calls.closes.load(Ordering::SeqCst), 0);
    }
}
