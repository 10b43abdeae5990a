//! Core logger types and traits

pub mod config;
pub mod destination;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod schema;
pub mod writer;

pub use config::LoggerConfig;
pub use destination::DestinationPolicy;
pub use error::{LoggerError, Result};
pub use filter::{FieldFilter, FilterAction, FilterRule};
pub use formatter::{Formatter, FormatterRegistry, JsonFormatter, LogfmtFormatter};
pub use log_level::{LevelCheck, LevelTable};
pub use log_record::{FieldValue, LogRecord};
pub use logger::{LogOutcome, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use schema::{LogTypeSchema, SchemaRegistry, TypeDefinition};
pub use writer::{Destination, Writer};
