//! Explicit registration of rules and their table dependencies.

use super::rule::{DynRecordRule, FileRule, RecordRule};
use crate::error::{GuardError, Result};
use crate::table::TableId;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Which of the two rule shapes a registered rule has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Runs once per pass over whole tables.
    WholeTable,
    /// Runs once per record of a single table.
    PerRecord,
}

#[derive(Clone)]
pub(crate) enum RuleShape {
    File(Arc<dyn FileRule>),
    Record(Arc<dyn DynRecordRule>),
}

/// One registered rule with its declared dependencies.
#[derive(Clone)]
pub struct RuleEntry {
    name: String,
    dependencies: Vec<TableId>,
    runs_on_unparsable_tables: bool,
    pub(crate) shape: RuleShape,
}

impl RuleEntry {
    /// Name of the rule.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tables the rule needs, in declaration order.
    pub fn dependencies(&self) -> &[TableId] {
        &self.dependencies
    }

    /// True if the rule is not skipped when a dependency failed to decode.
    pub fn runs_on_unparsable_tables(&self) -> bool {
        self.runs_on_unparsable_tables
    }

    /// Shape of the rule.
    pub fn kind(&self) -> RuleKind {
        match self.shape {
            RuleShape::File(_) => RuleKind::WholeTable,
            RuleShape::Record(_) => RuleKind::PerRecord,
        }
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// The rules a validation pass runs, in registration order.
///
/// The registry is assembled once by the host and handed to the engine; the
/// engine never discovers rules on its own.
///
/// # Examples
///
/// ```rust
/// use gtfs_guard::rules::{CalendarRangeRule, UnusedShapeRule};
/// use gtfs_guard::core::{RuleKind, RuleRegistry};
///
/// # fn main() -> gtfs_guard::error::Result<()> {
/// let registry = RuleRegistry::builder()
///     .record_rule(CalendarRangeRule)
///     .file_rule(UnusedShapeRule)
///     .build()?;
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.get("unused_shape").unwrap().kind(), RuleKind::WholeTable);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    entries: Vec<RuleEntry>,
}

impl RuleRegistry {
    /// Creates a new builder.
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// Registered rules in registration order.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// The rule registered as `name`.
    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Every table some rule depends on, without duplicates.
    pub fn required_tables(&self) -> Vec<TableId> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(|entry| entry.dependencies.iter().copied())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`RuleRegistry`].
#[derive(Default)]
pub struct RuleRegistryBuilder {
    entries: Vec<RuleEntry>,
}

impl RuleRegistryBuilder {
    /// Registers a whole-table rule.
    pub fn file_rule<V: FileRule + 'static>(mut self, rule: V) -> Self {
        let entry = RuleEntry {
            name: rule.name().to_string(),
            dependencies: rule.dependencies(),
            runs_on_unparsable_tables: rule.runs_on_unparsable_tables(),
            shape: RuleShape::File(Arc::new(rule)),
        };
        self.entries.push(entry);
        self
    }

    /// Registers a per-record rule.
    pub fn record_rule<V: RecordRule + 'static>(mut self, rule: V) -> Self {
        let entry = RuleEntry {
            name: RecordRule::name(&rule).to_string(),
            dependencies: vec![DynRecordRule::table(&rule)],
            runs_on_unparsable_tables: false,
            shape: RuleShape::Record(Arc::new(rule)),
        };
        self.entries.push(entry);
        self
    }

    /// Registers a whole-table rule built by `factory`.
    pub fn file_rule_with<V, F>(self, factory: F) -> Self
    where
        V: FileRule + 'static,
        F: FnOnce() -> V,
    {
        self.file_rule(factory())
    }

    /// Finishes the registry, rejecting empty or repeated rule names.
    pub fn build(self) -> Result<RuleRegistry> {
        let mut names = HashSet::new();
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(GuardError::configuration("rule names must not be empty"));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(GuardError::DuplicateRule {
                    name: entry.name.clone(),
                });
            }
        }
        Ok(RuleRegistry {
            entries: self.entries,
        })
    }
}
