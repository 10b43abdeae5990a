//! Log type schemas and their registry
//!
//! A log type names the fields a record of that type must carry. A type may
//! extend other types, in which case their required fields are merged in.

use super::error::{LoggerError, Result};
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Required-field definition for one log type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogTypeSchema {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extend_fields: Vec<String>,
}

impl LogTypeSchema {
    pub fn new<N, I, S>(name: N, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            extend_fields: Vec::new(),
        }
    }

    /// Merge the required fields of other types into this one
    #[must_use]
    pub fn extends<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend_fields.extend(types.into_iter().map(Into::into));
        self
    }
}

/// Type definition as written in configuration
///
/// Either a bare list of field names or an object with `fields` and
/// `extendFields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDefinition {
    Fields(Vec<String>),
    Schema(LogTypeSchema),
}

impl TypeDefinition {
    pub fn into_schema(self, name: impl Into<String>) -> LogTypeSchema {
        match self {
            TypeDefinition::Fields(fields) => LogTypeSchema::new(name, fields),
            TypeDefinition::Schema(mut schema) => {
                schema.name = name.into();
                schema
            }
        }
    }
}

/// Registry of log types with lazily cached field resolution
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, LogTypeSchema>,
    resolved: RwLock<HashMap<String, Arc<IndexSet<String>>>>,
}

impl SchemaRegistry {
    /// Register a fixed set of schemas
    ///
    /// Fails on duplicate type names and on cyclic extension graphs.
    /// Extension references to unknown types are allowed and ignored.
    pub fn new<I>(schemas: I) -> Result<Self>
    where
        I: IntoIterator<Item = LogTypeSchema>,
    {
        let mut map = IndexMap::new();
        for schema in schemas {
            if schema.name.is_empty() {
                return Err(LoggerError::config("types", "type name must not be empty"));
            }
            if map.contains_key(&schema.name) {
                return Err(LoggerError::config(
                    "types",
                    format!("type '{}' defined twice", schema.name),
                ));
            }
            map.insert(schema.name.clone(), schema);
        }

        let registry = Self {
            schemas: map,
            resolved: RwLock::new(HashMap::new()),
        };
        registry.check_acyclic()?;
        Ok(registry)
    }

    /// Build a registry from configured `name -> definition` pairs
    pub fn from_definitions(definitions: &IndexMap<String, TypeDefinition>) -> Result<Self> {
        Self::new(
            definitions
                .iter()
                .map(|(name, def)| def.clone().into_schema(name.clone())),
        )
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }

    pub fn get(&self, type_name: &str) -> Option<&LogTypeSchema> {
        self.schemas.get(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Required fields of a type, including everything it extends
    ///
    /// Unknown types resolve to an empty set; callers check [`contains`]
    /// first when "unknown" must be distinguished from "no requirements".
    ///
    /// [`contains`]: SchemaRegistry::contains
    pub fn resolve_fields(&self, type_name: &str) -> Arc<IndexSet<String>> {
        if let Some(hit) = self.resolved.read().get(type_name) {
            return Arc::clone(hit);
        }

        let Some(schema) = self.schemas.get(type_name) else {
            return Arc::new(IndexSet::new());
        };

        let mut fields: IndexSet<String> = schema.fields.iter().cloned().collect();
        for parent in &schema.extend_fields {
            if self.schemas.contains_key(parent) {
                fields.extend(self.resolve_fields(parent).iter().cloned());
            }
        }

        let mut cache = self.resolved.write();
        Arc::clone(
            cache
                .entry(type_name.to_string())
                .or_insert_with(|| Arc::new(fields)),
        )
    }

    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            registry: &'a SchemaRegistry,
            name: &'a str,
            marks: &mut HashMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> Result<()> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => {
                    path.push(name);
                    let start = path.iter().position(|n| *n == name).unwrap_or(0);
                    return Err(LoggerError::config(
                        "types",
                        format!("cyclic extension: {}", path[start..].join(" -> ")),
                    ));
                }
                None => {}
            }

            marks.insert(name, Mark::Visiting);
            path.push(name);
            if let Some(schema) = registry.schemas.get(name) {
                for parent in &schema.extend_fields {
                    if registry.schemas.contains_key(parent) {
                        visit(registry, parent, marks, path)?;
                    }
                }
            }
            path.pop();
            marks.insert(name, Mark::Done);
            Ok(())
        }

        let mut marks = HashMap::new();
        for name in self.schemas.keys() {
            let mut path = Vec::new();
            visit(self, name, &mut marks, &mut path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(fields: &IndexSet<String>) -> Vec<String> {
        let mut v: Vec<String> = fields.iter().cloned().collect();
        v.sort();
        v
    }

    #[test]
    fn test_resolve_own_fields() {
        let registry =
            SchemaRegistry::new([LogTypeSchema::new("order", ["orderId", "amount"])]).unwrap();

        let fields = registry.resolve_fields("order");
        assert_eq!(sorted(&fields), vec!["amount", "orderId"]);
    }

    #[test]
    fn test_unknown_type_resolves_empty() {
        let registry = SchemaRegistry::new([]).unwrap();
        assert!(registry.resolve_fields("bogus").is_empty());
        assert!(!registry.contains("bogus"));
    }

    #[test]
    fn test_extension_is_transitive() {
        let registry = SchemaRegistry::new([
            LogTypeSchema::new("base", ["host"]),
            LogTypeSchema::new("request", ["uri"]).extends(["base"]),
            LogTypeSchema::new("api", ["endpoint"]).extends(["request"]),
        ])
        .unwrap();

        assert_eq!(
            sorted(&registry.resolve_fields("api")),
            vec!["endpoint", "host", "uri"]
        );
    }

    #[test]
    fn test_unknown_extension_is_skipped() {
        let registry = SchemaRegistry::new([
            LogTypeSchema::new("order", ["orderId"]).extends(["ghost"]),
        ])
        .unwrap();

        assert_eq!(sorted(&registry.resolve_fields("order")), vec!["orderId"]);
    }

    #[test]
    fn test_cycle_rejected_at_registration() {
        let err = SchemaRegistry::new([
            LogTypeSchema::new("a", ["x"]).extends(["b"]),
            LogTypeSchema::new("b", ["y"]).extends(["c"]),
            LogTypeSchema::new("c", ["z"]).extends(["a"]),
        ])
        .unwrap_err();

        assert!(err.is_config());
        assert!(err.to_string().contains("cyclic extension"));
    }

    #[test]
    fn test_self_extension_rejected() {
        let err =
            SchemaRegistry::new([LogTypeSchema::new("a", ["x"]).extends(["a"])]).unwrap_err();
        assert!(err.to_string().contains("a -> a"));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let err = SchemaRegistry::new([
            LogTypeSchema::new("a", ["x"]),
            LogTypeSchema::new("a", ["y"]),
        ])
        .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_resolution_is_cached() {
        let registry =
            SchemaRegistry::new([LogTypeSchema::new("order", ["orderId"])]).unwrap();

        let first = registry.resolve_fields("order");
        let second = registry.resolve_fields("order");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_type_definition_forms() {
        let defs: IndexMap<String, TypeDefinition> = serde_json::from_str(
            r#"{
                "common": ["host", "pid"],
                "order": {"fields": ["orderId"], "extendFields": ["common"]}
            }"#,
        )
        .unwrap();

        let registry = SchemaRegistry::from_definitions(&defs).unwrap();
        assert_eq!(
            sorted(&registry.resolve_fields("order")),
            vec!["host", "orderId", "pid"]
        );
    }
}
