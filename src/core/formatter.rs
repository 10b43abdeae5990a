//! Record formatters and the registry that resolves them by name
//!
//! Provides:
//! - `Json`: one JSON object per line (default)
//! - `JsonPretty`: indented JSON, for human inspection
//! - `Logfmt`: key=value pairs, nested maps flattened with dotted keys

use super::error::{LoggerError, Result};
use super::log_record::{FieldValue, LogRecord};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of the formatter used when none (or an unknown one) is configured
pub const DEFAULT_FORMATTER: &str = "Json";

/// Serializes a record into the bytes appended to a destination
///
/// Implementations must be deterministic and free of side effects.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>>;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }

    /// Parse a record previously produced by [`Formatter::format`]
    pub fn parse(bytes: &[u8]) -> Result<LogRecord> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>> {
        let mut out = if self.pretty {
            serde_json::to_vec_pretty(record)?
        } else {
            serde_json::to_vec(record)?
        };
        out.push(b'\n');
        Ok(out)
    }

    fn name(&self) -> &str {
        if self.pretty {
            "JsonPretty"
        } else {
            "Json"
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogfmtFormatter;

impl LogfmtFormatter {
    fn push_field(parts: &mut Vec<String>, key: &str, value: &FieldValue) {
        match value {
            FieldValue::Map(map) => {
                for (nested_key, nested_value) in map {
                    Self::push_field(parts, &format!("{}.{}", key, nested_key), nested_value);
                }
            }
            FieldValue::String(s) => {
                parts.push(format!("{}={}", Self::escape_key(key), Self::quote_value(s)))
            }
            other => parts.push(format!("{}={}", Self::escape_key(key), other)),
        }
    }

    /// Bare keys stay as they are; anything else is quoted like a value
    fn escape_key(key: &str) -> String {
        let bare = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if bare {
            key.to_string()
        } else {
            Self::quote_value(key)
        }
    }

    fn quote_value(value: &str) -> String {
        format!(
            "\"{}\"",
            value
                .replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\n', "\\n")
                .replace('\r', "\\r")
        )
    }
}

impl Formatter for LogfmtFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>> {
        let mut parts = Vec::with_capacity(record.len());
        for (key, value) in record {
            Self::push_field(&mut parts, key, value);
        }
        let mut line = parts.join(" ");
        line.push('\n');
        Ok(line.into_bytes())
    }

    fn name(&self) -> &str {
        "Logfmt"
    }
}

/// Factory producing a formatter instance
pub type FormatterFactory = Arc<dyn Fn() -> Box<dyn Formatter> + Send + Sync>;

/// Maps formatter identifiers to factories
///
/// Identifiers are matched case-insensitively.
#[derive(Clone)]
pub struct FormatterRegistry {
    factories: HashMap<String, FormatterFactory>,
}

impl FormatterRegistry {
    /// Registry without any formatter, not even the default
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Formatter> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_lowercase(), Arc::new(factory));
    }

    #[must_use]
    pub fn with<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Formatter> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_lowercase())
    }

    /// Instantiate a formatter by identifier
    pub fn create(&self, name: &str) -> Result<Box<dyn Formatter>> {
        self.factories
            .get(&name.to_lowercase())
            .map(|factory| factory())
            .ok_or_else(|| LoggerError::formatter(name, "no formatter registered under this name"))
    }

    /// Resolve the configured formatter, falling back to JSON
    ///
    /// An unset identifier silently selects the default; an unknown one
    /// selects it with a warning.
    pub fn resolve(&self, name: Option<&str>) -> Box<dyn Formatter> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Box::new(JsonFormatter::new()),
            Some(name) => self.create(name).unwrap_or_else(|e| {
                eprintln!(
                    "[LOGGER WARNING] {}. Falling back to {} formatter.",
                    e, DEFAULT_FORMATTER
                );
                Box::new(JsonFormatter::new())
            }),
        }
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::empty()
            .with("Json", || Box::new(JsonFormatter::new()))
            .with("JsonPretty", || Box::new(JsonFormatter::new_pretty()))
            .with("Logfmt", || Box::new(LogfmtFormatter))
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("FormatterRegistry")
            .field("formatters", &names)
            .finish()
    }
}
