//! Field filtering applied to records before formatting
//!
//! Rules name a field (optionally a dotted path into nested maps) and what to
//! do with it. Rules that match nothing are no-ops, so filtering never fails.

use super::log_record::{FieldValue, LogRecord};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mask written in place of redacted values unless a rule sets its own
pub const DEFAULT_MASK: &str = "***";

fn default_mask() -> String {
    DEFAULT_MASK.to_string()
}

/// What a filter rule does to the field it names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FilterAction {
    /// Remove the field
    Drop,
    /// Replace the value with a mask
    Redact {
        #[serde(default = "default_mask")]
        mask: String,
    },
    /// Cap text values to `max_len` characters; other values pass through
    Truncate {
        #[serde(rename = "maxLen")]
        max_len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub field: String,
    #[serde(flatten)]
    pub action: FilterAction,
}

impl FilterRule {
    pub fn drop(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            action: FilterAction::Drop,
        }
    }

    pub fn redact(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            action: FilterAction::Redact {
                mask: default_mask(),
            },
        }
    }

    pub fn redact_with(field: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            action: FilterAction::Redact { mask: mask.into() },
        }
    }

    pub fn truncate(field: impl Into<String>, max_len: usize) -> Self {
        Self {
            field: field.into(),
            action: FilterAction::Truncate { max_len },
        }
    }
}

/// Ordered list of filter rules
#[derive(Debug, Clone, Default)]
pub struct FieldFilter {
    rules: Vec<FilterRule>,
}

impl FieldFilter {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order
    pub fn apply(&self, mut record: LogRecord) -> LogRecord {
        for rule in &self.rules {
            apply_rule(record.fields_mut(), &rule.field, &rule.action);
        }
        record
    }
}

/// An exact key match wins over a dotted path
fn apply_rule(fields: &mut IndexMap<String, FieldValue>, path: &str, action: &FilterAction) {
    if fields.contains_key(path) {
        apply_action(fields, path, action);
        return;
    }

    let Some((head, rest)) = path.split_once('.') else {
        return;
    };
    if let Some(FieldValue::Map(nested)) = fields.get_mut(head) {
        apply_rule(nested, rest, action);
    }
}

fn apply_action(fields: &mut IndexMap<String, FieldValue>, key: &str, action: &FilterAction) {
    match action {
        FilterAction::Drop => {
            fields.shift_remove(key);
        }
        FilterAction::Redact { mask } => {
            if let Some(value) = fields.get_mut(key) {
                *value = FieldValue::String(mask.clone());
            }
        }
        FilterAction::Truncate { max_len } => {
            if let Some(FieldValue::String(text)) = fields.get_mut(key) {
                if let Some((cut, _)) = text.char_indices().nth(*max_len) {
                    text.truncate(cut);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogRecord {
        LogRecord::new()
            .with_field("logTime", 1.0)
            .with_field("traceId", "")
            .with_field("user", "alice")
            .with_field("password", "hunter2")
            .with_field("body", "0123456789")
            .with_field(
                "card",
                LogRecord::new()
                    .with_field("number", "4111111111111111")
                    .with_field("holder", "ALICE"),
            )
    }

    #[test]
    fn test_drop_removes_field() {
        let filter = FieldFilter::new(vec![FilterRule::drop("password")]);
        let out = filter.apply(sample());
        assert!(!out.contains_key("password"));
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_redact_replaces_value() {
        let filter = FieldFilter::new(vec![FilterRule::redact("password")]);
        let out = filter.apply(sample());
        assert_eq!(out.get("password"), Some(&FieldValue::from("***")));
    }

    #[test]
    fn test_truncate_counts_characters() {
        let filter = FieldFilter::new(vec![FilterRule::truncate("body", 4)]);
        let out = filter.apply(sample());
        assert_eq!(out.get("body"), Some(&FieldValue::from("0123")));

        let record = LogRecord::new().with_field("name", "가나다라");
        let out = FieldFilter::new(vec![FilterRule::truncate("name", 2)]).apply(record);
        assert_eq!(out.get("name"), Some(&FieldValue::from("가나")));
    }

    #[test]
    fn test_truncate_ignores_non_text() {
        let record = LogRecord::new().with_field("amount", 123456);
        let out = FieldFilter::new(vec![FilterRule::truncate("amount", 2)]).apply(record);
        assert_eq!(out.get("amount"), Some(&FieldValue::Int(123456)));
    }

    #[test]
    fn test_nested_path() {
        let filter = FieldFilter::new(vec![
            FilterRule::redact_with("card.number", "####"),
            FilterRule::drop("card.holder"),
        ]);
        let out = filter.apply(sample());

        match out.get("card") {
            Some(FieldValue::Map(card)) => {
                assert_eq!(card.get("number"), Some(&FieldValue::from("####")));
                assert!(!card.contains_key("holder"));
            }
            other => panic!("Expected nested map, got {:?}", other),
        }
    }

    #[test]
    fn test_base_fields_are_filterable() {
        let filter = FieldFilter::new(vec![FilterRule::drop("traceId")]);
        let out = filter.apply(sample());
        assert!(!out.contains_key("traceId"));
    }

    #[test]
    fn test_unknown_field_is_noop() {
        let filter = FieldFilter::new(vec![
            FilterRule::drop("nope"),
            FilterRule::redact("card.missing.deeper"),
        ]);
        assert_eq!(filter.apply(sample()), sample());
    }

    #[test]
    fn test_rules_deserialize() {
        let rules: Vec<FilterRule> = serde_json::from_str(
            r#"[
                {"field": "password", "action": "redact"},
                {"field": "token", "action": "redact", "mask": "[hidden]"},
                {"field": "body", "action": "truncate", "maxLen": 64},
                {"field": "secret", "action": "drop"}
            ]"#,
        )
        .unwrap();

        assert_eq!(rules[0], FilterRule::redact("password"));
        assert_eq!(rules[1], FilterRule::redact_with("token", "[hidden]"));
        assert_eq!(rules[2], FilterRule::truncate("body", 64));
        assert_eq!(rules[3], FilterRule::drop("secret"));

        let filter = FieldFilter::new(rules.clone());
        assert_eq!(filter.rules(), rules.as_slice());
        assert!(!filter.is_empty());
        assert!(FieldFilter::default().is_empty());
    }
}
