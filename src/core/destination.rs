//! Destination path resolution
//!
//! Without an explicit file, records go to `<root>/log/<YYYYMMDD>/<logType>.log`:
//! one file per calendar day per log type.

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPolicy {
    file: Option<PathBuf>,
    root: PathBuf,
}

impl DestinationPolicy {
    /// A blank `file` counts as unset
    pub fn new(root: impl Into<PathBuf>, file: Option<PathBuf>) -> Self {
        Self {
            file: file.filter(|path| !path.to_string_lossy().trim().is_empty()),
            root: root.into(),
        }
    }

    /// Path for a record of `log_type` written on `date`
    pub fn resolve(&self, log_type: &str, date: NaiveDate) -> PathBuf {
        match &self.file {
            Some(file) => file.clone(),
            None => self
                .root
                .join("log")
                .join(date.format("%Y%m%d").to_string())
                .join(format!("{}.log", log_type)),
        }
    }

    /// Path for a record of `log_type` written now, in local time
    pub fn resolve_today(&self, log_type: &str) -> PathBuf {
        self.resolve(log_type, Local::now().date_naive())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn explicit_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let policy = DestinationPolicy::new("/var/app", None);
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            policy.resolve("order", date),
            PathBuf::from("/var/app/log/20260307/order.log")
        );
    }

    #[test]
    fn test_explicit_file_wins() {
        let policy = DestinationPolicy::new("/var/app", Some(PathBuf::from("/tmp/all.log")));
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(policy.resolve("order", date), PathBuf::from("/tmp/all.log"));
        assert_eq!(policy.resolve("request", date), PathBuf::from("/tmp/all.log"));
    }

    #[test]
    fn test_blank_file_uses_dated_layout() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        for blank in ["", "   "] {
            let policy = DestinationPolicy::new("/var/app", Some(PathBuf::from(blank)));
            assert_eq!(policy.explicit_file(), None);
            assert_eq!(
                policy.resolve("order", date),
                PathBuf::from("/var/app/log/20260307/order.log")
            );
        }

        let policy = DestinationPolicy::new("/var/app", Some(PathBuf::from("/tmp/all.log")));
        assert_eq!(policy.explicit_file(), Some(Path::new("/tmp/all.log")));
        assert_eq!(policy.root(), Path::new("/var/app"));
    }

    #[test]
    fn test_relative_root() {
        let policy = DestinationPolicy::new(".", None);
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(
            policy.resolve("request", date),
            Path::new(".").join("log").join("20251231").join("request.log")
        );
    }
}
