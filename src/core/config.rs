//! Logger configuration
//!
//! A configuration is a base JSON object merged with a caller override.
//! Override keys are accepted only when the base already has them, and the
//! `levels` and `types` tables can never be overridden: they define the
//! schema, not runtime options.

use super::destination::DestinationPolicy;
use super::error::{LoggerError, Result};
use super::filter::{FieldFilter, FilterRule};
use super::formatter::DEFAULT_FORMATTER;
use super::log_level::{LevelTable, DEFAULT_LEVELS};
use super::schema::{SchemaRegistry, TypeDefinition};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Keys that only the base configuration may define
pub const PROTECTED_KEYS: [&str; 2] = ["levels", "types"];

static GLOBAL: OnceLock<Arc<LoggerConfig>> = OnceLock::new();

fn default_level() -> String {
    "info".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_levels() -> IndexMap<String, i64> {
    DEFAULT_LEVELS
        .iter()
        .map(|(name, rank)| (name.to_string(), *rank))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Minimum level name to emit
    #[serde(default = "default_level")]
    pub level: String,
    /// Formatter identifier; unset or unknown selects JSON
    #[serde(default)]
    pub formatter: Option<String>,
    /// Hold an exclusive lock on the destination while writing
    #[serde(default)]
    pub lock_ex: bool,
    /// Single destination for every record, overriding the dated layout
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Directory the dated layout is relative to
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub filters: Vec<FilterRule>,
    #[serde(default = "default_levels")]
    pub levels: IndexMap<String, i64>,
    #[serde(default)]
    pub types: IndexMap<String, TypeDefinition>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let mut types = IndexMap::new();
        types.insert("info".to_string(), TypeDefinition::Fields(Vec::new()));
        Self {
            level: default_level(),
            formatter: Some(DEFAULT_FORMATTER.to_string()),
            lock_ex: false,
            file: None,
            root: default_root(),
            filters: Vec::new(),
            levels: default_levels(),
            types,
        }
    }
}

impl LoggerConfig {
    /// Built-in base configuration as a JSON object
    pub fn default_base() -> Map<String, Value> {
        let levels: Map<String, Value> = DEFAULT_LEVELS
            .iter()
            .map(|(name, rank)| (name.to_string(), json!(rank)))
            .collect();

        let base = json!({
            "level": default_level(),
            "formatter": DEFAULT_FORMATTER,
            "lockEx": false,
            "file": null,
            "root": ".",
            "filters": [],
            "levels": levels,
            "types": { "info": [] },
        });

        match base {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Parse a base configuration from JSON text
    pub fn base_from_json_str(json: &str) -> Result<Map<String, Value>> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(map),
            other => Err(LoggerError::config(
                "base",
                format!("expected a JSON object, found {}", json_kind(&other)),
            )),
        }
    }

    /// Read a base configuration from a JSON file
    pub fn base_from_file(path: impl AsRef<Path>) -> Result<Map<String, Value>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "read configuration",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::base_from_json_str(&text)
    }

    /// Merge `overrides` over `base` and validate the result
    pub fn merge(base: &Map<String, Value>, overrides: Map<String, Value>) -> Result<Self> {
        let (merged, dropped) = merge_maps(base, overrides);
        for key in &dropped {
            eprintln!(
                "[LOGGER WARNING] Ignoring configuration override '{}': not a runtime option.",
                key
            );
        }

        let config: LoggerConfig = serde_json::from_value(Value::Object(merged))
            .map_err(|e| LoggerError::config("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `overrides` over the built-in base
    pub fn from_override(overrides: Map<String, Value>) -> Result<Self> {
        Self::merge(&Self::default_base(), overrides)
    }

    /// Check that the level and type tables are usable
    ///
    /// Fails on an unknown configured level, ambiguous level ranks and
    /// cyclic type extension.
    pub fn validate(&self) -> Result<()> {
        self.level_table()?.validate_threshold(&self.level)?;
        self.schema_registry()?;
        Ok(())
    }

    pub fn level_table(&self) -> Result<LevelTable> {
        LevelTable::new(self.levels.iter().map(|(name, rank)| (name.as_str(), *rank)))
    }

    pub fn schema_registry(&self) -> Result<SchemaRegistry> {
        SchemaRegistry::from_definitions(&self.types)
    }

    pub fn field_filter(&self) -> FieldFilter {
        FieldFilter::new(self.filters.clone())
    }

    pub fn destination_policy(&self) -> DestinationPolicy {
        DestinationPolicy::new(self.root.clone(), self.file.clone())
    }

    /// Initialize the process-wide configuration
    ///
    /// The first successful call wins. Later calls return the installed
    /// configuration and ignore their overrides.
    pub fn init_global(overrides: Map<String, Value>) -> Result<Arc<LoggerConfig>> {
        if let Some(existing) = GLOBAL.get() {
            return Ok(Arc::clone(existing));
        }
        let config = Arc::new(Self::from_override(overrides)?);
        Ok(Arc::clone(GLOBAL.get_or_init(|| config)))
    }

    /// Install an already built configuration as the process-wide one
    ///
    /// Returns whichever configuration ends up installed.
    pub fn install_global(config: LoggerConfig) -> Result<Arc<LoggerConfig>> {
        if let Some(existing) = GLOBAL.get() {
            return Ok(Arc::clone(existing));
        }
        config.validate()?;
        Ok(Arc::clone(GLOBAL.get_or_init(|| Arc::new(config))))
    }

    pub fn global() -> Option<Arc<LoggerConfig>> {
        GLOBAL.get().cloned()
    }

    pub fn is_initialized() -> bool {
        GLOBAL.get().is_some()
    }
}

/// Shallow merge; returns the merged map and the rejected override keys
fn merge_maps(
    base: &Map<String, Value>,
    overrides: Map<String, Value>,
) -> (Map<String, Value>, Vec<String>) {
    let mut merged = base.clone();
    let mut dropped = Vec::new();

    for (key, value) in overrides {
        if PROTECTED_KEYS.contains(&key.as_str()) || !base.contains_key(&key) {
            dropped.push(key);
            continue;
        }
        merged.insert(key, value);
    }

    (merged, dropped)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
