//! Main logger implementation
//!
//! Every `log` call runs the same pipeline:
//! level gate, type check, required-field validation, enrichment with the
//! base fields, field filtering, formatting and a single append to the
//! destination. All steps but the last are pure.

use super::{
    config::LoggerConfig,
    destination::DestinationPolicy,
    error::{LoggerError, Result},
    filter::FieldFilter,
    formatter::{Formatter, FormatterRegistry},
    log_level::{LevelCheck, LevelTable},
    log_record::{LogRecord, LOG_TIME, LOG_TYPE, TRACE_ID},
    metrics::LoggerMetrics,
    schema::SchemaRegistry,
    writer::{self, Writer},
};
use crate::appenders::FileWriter;
use chrono::Utc;
use indexmap::IndexSet;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Status code shared by written and skipped records
pub const CODE_OK: &str = "0x000000";
/// Status code for a log type with no registered schema
pub const CODE_UNKNOWN_TYPE: &str = "0x000001";
/// Status code for an empty message or a missing required field
pub const CODE_MISSING_FIELD: &str = "0x000002";
/// Status code for a level name missing from the level table
pub const CODE_UNKNOWN_LEVEL: &str = "0x000003";
/// Status code for a record that could not be formatted or appended
pub const CODE_WRITE_FAILED: &str = "0x000004";

/// How a single `log` call ended
#[derive(Debug)]
pub enum LogOutcome {
    /// The record was appended to `destination`
    Written { destination: PathBuf },
    /// The level is below the configured minimum; nothing was written
    Skipped,
    /// No schema is registered under this type name
    UnknownType { log_type: String },
    /// The level name is not in the level table
    UnknownLevel { level: String },
    /// The message is empty (`field` is `None`) or lacks a required field
    MissingField { field: Option<String> },
    /// Formatting or appending failed
    WriteFailed {
        destination: PathBuf,
        error: LoggerError,
    },
}

impl LogOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            LogOutcome::Written { .. } | LogOutcome::Skipped => CODE_OK,
            LogOutcome::UnknownType { .. } => CODE_UNKNOWN_TYPE,
            LogOutcome::MissingField { .. } => CODE_MISSING_FIELD,
            LogOutcome::UnknownLevel { .. } => CODE_UNKNOWN_LEVEL,
            LogOutcome::WriteFailed { .. } => CODE_WRITE_FAILED,
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            LogOutcome::Written { .. } => None,
            LogOutcome::Skipped => Some("level below configured minimum".to_string()),
            LogOutcome::UnknownType { log_type } => {
                Some(format!("log type '{}' does not exist", log_type))
            }
            LogOutcome::UnknownLevel { level } => Some(format!("log level '{}' does not exist", level)),
            LogOutcome::MissingField { field: None } => Some("log message is empty".to_string()),
            LogOutcome::MissingField { field: Some(field) } => {
                Some(format!("required field '{}' is missing", field))
            }
            LogOutcome::WriteFailed { error, .. } => Some(error.to_string()),
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, LogOutcome::Written { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, LogOutcome::Skipped)
    }

    /// Expected rejection of the caller's input
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            LogOutcome::UnknownType { .. }
                | LogOutcome::UnknownLevel { .. }
                | LogOutcome::MissingField { .. }
        )
    }

    pub fn is_write_failure(&self) -> bool {
        matches!(self, LogOutcome::WriteFailed { .. })
    }

    pub fn destination(&self) -> Option<&Path> {
        match self {
            LogOutcome::Written { destination } | LogOutcome::WriteFailed { destination, .. } => {
                Some(destination)
            }
            _ => None,
        }
    }
}

impl fmt::Display for LogOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "[{}] {}", self.code(), message),
            None => write!(f, "[{}]", self.code()),
        }
    }
}

pub struct Logger {
    config: Arc<LoggerConfig>,
    levels: LevelTable,
    min_rank: i64,
    schemas: SchemaRegistry,
    filter: FieldFilter,
    formatter: Box<dyn Formatter>,
    writer: Arc<dyn Writer>,
    destinations: DestinationPolicy,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Build a file logger from an explicit configuration
    pub fn new(config: Arc<LoggerConfig>) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Build a file logger from the process-wide configuration
    ///
    /// Initializes the global configuration from `overrides` if nothing is
    /// installed yet; otherwise `overrides` is ignored.
    pub fn with_overrides(overrides: Map<String, Value>) -> Result<Self> {
        Self::new(LoggerConfig::init_global(overrides)?)
    }

    /// Create a builder for custom logger configuration
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Validate, enrich, filter, format and append one record
    pub fn log(&self, message: LogRecord, log_type: &str, level: &str) -> LogOutcome {
        let outcome = self.process(message, log_type, level);
        match &outcome {
            LogOutcome::Written { .. } => {
                self.metrics.record_written();
            }
            LogOutcome::Skipped => {
                self.metrics.record_skipped();
            }
            LogOutcome::WriteFailed { destination, error } => {
                self.metrics.record_write_failed();
                eprintln!(
                    "[LOGGER ERROR] Failed to write {} record to '{}': {}",
                    log_type,
                    destination.display(),
                    error
                );
            }
            _ => {
                self.metrics.record_rejected();
            }
        }
        outcome
    }

    fn process(&self, message: LogRecord, log_type: &str, level: &str) -> LogOutcome {
        match self.levels.check_rank(level, self.min_rank) {
            LevelCheck::Emit => {}
            LevelCheck::BelowThreshold => return LogOutcome::Skipped,
            LevelCheck::UnknownLevel => {
                return LogOutcome::UnknownLevel {
                    level: level.to_string(),
                }
            }
        }

        if !self.schemas.contains(log_type) {
            return LogOutcome::UnknownType {
                log_type: log_type.to_string(),
            };
        }

        if message.is_empty() {
            return LogOutcome::MissingField { field: None };
        }
        if let Some(field) = self
            .schemas
            .resolve_fields(log_type)
            .iter()
            .find(|field| !message.is_set(field))
        {
            return LogOutcome::MissingField {
                field: Some(field.clone()),
            };
        }

        let record = self.filter.apply(Self::enrich(message, log_type));
        let destination = self.destinations.resolve_today(log_type);

        let written = self.formatter.format(&record).and_then(|bytes| {
            writer::append(&*self.writer, &destination, self.config.lock_ex, &bytes)
        });

        match written {
            Ok(()) => LogOutcome::Written { destination },
            Err(error) => LogOutcome::WriteFailed { destination, error },
        }
    }

    /// Base fields first, caller fields over them
    fn enrich(message: LogRecord, log_type: &str) -> LogRecord {
        let log_time = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        let mut record = LogRecord::new()
            .with_field(LOG_TIME, log_time)
            .with_field(TRACE_ID, "")
            .with_field(LOG_TYPE, log_type);
        record.merge_from(message);
        record
    }

    /// Required fields of a log type, including inherited ones
    pub fn resolve_fields(&self, log_type: &str) -> Arc<IndexSet<String>> {
        self.schemas.resolve_fields(log_type)
    }

    pub fn debug(&self, message: LogRecord, log_type: &str) -> LogOutcome {
        self.log(message, log_type, "debug")
    }

    pub fn info(&self, message: LogRecord, log_type: &str) -> LogOutcome {
        self.log(message, log_type, "info")
    }

    pub fn notice(&self, message: LogRecord, log_type: &str) -> LogOutcome {
        self.log(message, log_type, "notice")
    }

    pub fn warning(&self, message: LogRecord, log_type: &str) -> LogOutcome {
        self.log(message, log_type, "warning")
    }

    pub fn error(&self, message: LogRecord, log_type: &str) -> LogOutcome {
        self.log(message, log_type, "error")
    }

    pub fn critical(&self, message: LogRecord, log_type: &str) -> LogOutcome {
        self.log(message, log_type, "critical")
    }

    pub fn config(&self) -> &Arc<LoggerConfig> {
        &self.config
    }

    pub fn level_table(&self) -> &LevelTable {
        &self.levels
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn formatter_name(&self) -> &str {
        self.formatter.name()
    }

    pub fn writer_name(&self) -> &str {
        self.writer.name()
    }

    /// Get logger metrics for observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Destination a record of `log_type` would be written to now
    pub fn destination_for(&self, log_type: &str) -> PathBuf {
        self.destinations.resolve_today(log_type)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.config.level)
            .field("types", &self.schemas.type_names().collect::<Vec<_>>())
            .field("formatter", &self.formatter.name())
            .field("writer", &self.writer.name())
            .finish()
    }
}

/// Builder for creating a Logger with custom configuration
///
/// # Example
///
/// ```
/// use typed_log_system::{fields, Logger, LoggerConfig, MemoryWriter};
///
/// let base = LoggerConfig::base_from_json_str(
///     r#"{"level": "info", "types": {"order": ["orderId", "amount"]}}"#,
/// ).unwrap();
/// let config = LoggerConfig::merge(&base, serde_json::Map::new()).unwrap();
///
/// let writer = MemoryWriter::new();
/// let logger = Logger::builder()
///     .config(config)
///     .writer(writer.clone())
///     .build()
///     .unwrap();
///
/// let outcome = logger.info(fields! { "orderId" => "A1", "amount" => 100 }, "order");
/// assert!(outcome.is_written());
/// ```
pub struct LoggerBuilder {
    config: Option<Arc<LoggerConfig>>,
    writer: Option<Arc<dyn Writer>>,
    formatters: FormatterRegistry,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            writer: None,
            formatters: FormatterRegistry::default(),
        }
    }

    /// Use this configuration instead of the process-wide one
    #[must_use]
    pub fn config(mut self, config: impl Into<Arc<LoggerConfig>>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Destination writer (defaults to [`FileWriter`])
    #[must_use]
    pub fn writer<W: Writer + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    #[must_use]
    pub fn shared_writer(mut self, writer: Arc<dyn Writer>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Replace the registry the configured formatter is looked up in
    #[must_use]
    pub fn formatter_registry(mut self, registry: FormatterRegistry) -> Self {
        self.formatters = registry;
        self
    }

    /// Register an extra formatter under `name`
    #[must_use]
    pub fn formatter<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Formatter> + Send + Sync + 'static,
    {
        self.formatters.register(name, factory);
        self
    }

    /// Resolve tables, filter and formatter
    ///
    /// Without an explicit configuration the process-wide one is used, or
    /// the built-in defaults when none is installed. Fails when the
    /// configured minimum level is unknown or the type table is invalid.
    pub fn build(self) -> Result<Logger> {
        let config = match self.config {
            Some(config) => config,
            None => LoggerConfig::global().unwrap_or_default(),
        };

        let levels = config.level_table()?;
        let min_rank = levels.validate_threshold(&config.level)?;
        let schemas = config.schema_registry()?;
        let formatter = self.formatters.resolve(config.formatter.as_deref());
        let writer = self.writer.unwrap_or_else(|| Arc::new(FileWriter::new()));

        Ok(Logger {
            filter: config.field_filter(),
            destinations: config.destination_policy(),
            config,
            levels,
            min_rank,
            schemas,
            formatter,
            writer,
            metrics: Arc::new(LoggerMetrics::new()),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
