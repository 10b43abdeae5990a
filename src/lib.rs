//! # Typed Log System
//!
//! Schema-validated structured logging. Callers submit a log type name and a
//! record of fields; the logger checks the level, validates the record
//! against the type's required fields, adds the base fields (`logTime`,
//! `traceId`, `logType`), applies field filters, formats the record and
//! appends it to a destination (by default `log/<YYYYMMDD>/<logType>.log`).
//!
//! ## Features
//!
//! - **Typed records**: per-type required fields, with schema composition
//! - **Field filtering**: drop, redact or truncate fields before output
//! - **Pluggable output**: formatter registry and writer trait
//! - **Observable failures**: every call returns a [`LogOutcome`]

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{FileWriter, MemoryWriter};
    pub use crate::core::{
        Destination, DestinationPolicy, FieldFilter, FieldValue, FilterAction, FilterRule,
        Formatter, FormatterRegistry, JsonFormatter, LevelCheck, LevelTable, LogOutcome,
        LogRecord, LogTypeSchema, LogfmtFormatter, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, Result, SchemaRegistry, TypeDefinition, Writer,
    };
    pub use crate::fields;
}

pub use appenders::{FileWriter, MemoryWriter};
pub use crate::core::{
    Destination, DestinationPolicy, FieldFilter, FieldValue, FilterAction, FilterRule, Formatter,
    FormatterRegistry, JsonFormatter, LevelCheck, LevelTable, LogOutcome, LogRecord,
    LogTypeSchema, LogfmtFormatter, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, Result, SchemaRegistry, TypeDefinition, Writer,
};
