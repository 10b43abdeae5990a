//! Log level definitions
//!
//! Levels are plain names mapped to integer ranks. The table is built once
//! from configuration and is read-only afterwards.

use super::error::{LoggerError, Result};
use indexmap::IndexMap;

/// Default severities, lowest first
pub const DEFAULT_LEVELS: [(&str, i64); 8] = [
    ("debug", 100),
    ("info", 200),
    ("notice", 250),
    ("warning", 300),
    ("error", 400),
    ("critical", 500),
    ("alert", 550),
    ("emergency", 600),
];

/// Result of comparing a record level against the configured minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCheck {
    Emit,
    BelowThreshold,
    UnknownLevel,
}

/// Mapping from level name to rank
#[derive(Debug, Clone)]
pub struct LevelTable {
    ranks: IndexMap<String, i64>,
}

impl LevelTable {
    /// Build a table from `(name, rank)` pairs
    ///
    /// Names are matched case-insensitively. Ranks must be distinct so the
    /// table defines a strict order.
    pub fn new<I, S>(levels: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut ranks: IndexMap<String, i64> = IndexMap::new();
        for (name, rank) in levels {
            let name = normalize(name.as_ref());
            if name.is_empty() {
                return Err(LoggerError::config("levels", "level name must not be empty"));
            }
            if let Some((other, _)) = ranks.iter().find(|(_, r)| **r == rank) {
                return Err(LoggerError::config(
                    "levels",
                    format!("levels '{}' and '{}' share rank {}", other, name, rank),
                ));
            }
            if ranks.insert(name.clone(), rank).is_some() {
                return Err(LoggerError::config(
                    "levels",
                    format!("level '{}' defined twice", name),
                ));
            }
        }
        if ranks.is_empty() {
            return Err(LoggerError::config("levels", "level table is empty"));
        }
        ranks.sort_by(|_, a, _, b| a.cmp(b));
        Ok(Self { ranks })
    }

    /// Rank of a level name, `None` if unknown
    ///
    /// `warn` resolves to `warning` when only the latter is defined.
    pub fn rank(&self, level: &str) -> Option<i64> {
        let name = normalize(level);
        self.ranks.get(&name).copied().or_else(|| {
            if name == "warn" {
                self.ranks.get("warning").copied()
            } else {
                None
            }
        })
    }

    pub fn contains(&self, level: &str) -> bool {
        self.rank(level).is_some()
    }

    /// Make sure the configured minimum level is usable
    pub fn validate_threshold(&self, configured_min: &str) -> Result<i64> {
        self.rank(configured_min)
            .ok_or_else(|| LoggerError::unknown_level(configured_min))
    }

    /// Compare a record level against the configured minimum
    ///
    /// An unknown configured minimum is a configuration error. An unknown
    /// record level is reported as [`LevelCheck::UnknownLevel`], never
    /// compared as if it had some default rank.
    pub fn check(&self, record_level: &str, configured_min: &str) -> Result<LevelCheck> {
        let threshold = self.validate_threshold(configured_min)?;
        Ok(self.check_rank(record_level, threshold))
    }

    /// Compare a record level against an already validated threshold rank
    pub fn check_rank(&self, record_level: &str, threshold: i64) -> LevelCheck {
        match self.rank(record_level) {
            None => LevelCheck::UnknownLevel,
            Some(rank) if rank >= threshold => LevelCheck::Emit,
            Some(_) => LevelCheck::BelowThreshold,
        }
    }

    pub fn is_emittable(&self, record_level: &str, configured_min: &str) -> Result<bool> {
        Ok(self.check(record_level, configured_min)? == LevelCheck::Emit)
    }

    /// Level names ordered by rank, lowest first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ranks.keys().map(String::as_str)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            ranks: DEFAULT_LEVELS
                .iter()
                .map(|(name, rank)| (name.to_string(), *rank))
                .collect(),
        }
    }
}

fn normalize(level: &str) -> String {
    level.trim().to_lowercase()
}
