//! What a validation pass hands back to its caller.

use super::registry::RuleKind;
use super::sink::CollectedNotices;
use super::{Notice, Severity};
use crate::error::Result;
use serde::Serialize;

/// Why a rule did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// A per-record rule's column gate returned false.
    GateClosed,
    /// A dependency table failed to decode.
    UnparsableTable {
        /// Filename of the table
        table: String,
    },
}

/// How one registered rule fared during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RuleOutcome {
    /// The rule ran to completion on every invocation.
    Executed {
        /// How many times `validate` was called
        invocations: usize,
        /// How many notices the rule emitted, capped ones included
        notices: usize,
    },
    /// The rule was deliberately not run.
    Skipped {
        /// Why it was skipped
        #[serde(flatten)]
        reason: SkipReason,
    },
    /// A declared table is not part of the snapshot.
    Unresolved {
        /// Filename of the first unresolved table
        table: String,
    },
    /// At least one invocation failed or panicked.
    Faulted {
        /// How many invocations faulted
        faults: usize,
    },
}

impl RuleOutcome {
    /// Returns true if the rule ran without faults.
    pub fn is_executed(&self) -> bool {
        matches!(self, RuleOutcome::Executed { .. })
    }
}

/// The outcome of one rule, tagged with the rule's name and shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleReport {
    /// Name of the rule
    pub rule_name: String,
    /// Shape of the rule
    pub kind: RuleKind,
    /// What happened
    pub outcome: RuleOutcome,
}

/// Counters collected during a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetrics {
    /// Number of registered rules
    pub rules_total: usize,
    /// Rules that ran without faults
    pub rules_executed: usize,
    /// Rules skipped by a gate or an undecodable table
    pub rules_skipped: usize,
    /// Rules with an unresolved dependency
    pub rules_unresolved: usize,
    /// Rules with at least one faulted invocation
    pub rules_faulted: usize,
    /// Total per-record `validate` calls
    pub record_invocations: usize,
    /// Wall-clock duration of the pass in milliseconds
    pub execution_time_ms: u64,
}

impl RunMetrics {
    pub(crate) fn record(&mut self, kind: RuleKind, outcome: &RuleOutcome) {
        self.rules_total += 1;
        match outcome {
            RuleOutcome::Executed { invocations, .. } => {
                self.rules_executed += 1;
                if kind == RuleKind::PerRecord {
                    self.record_invocations += invocations;
                }
            }
            RuleOutcome::Skipped { .. } => self.rules_skipped += 1,
            RuleOutcome::Unresolved { .. } => self.rules_unresolved += 1,
            RuleOutcome::Faulted { .. } => self.rules_faulted += 1,
        }
    }
}

/// The complete result of a validation pass.
///
/// Validation notices describe the feed; system errors describe rules that
/// could not run. A pass always produces a report, even when some rules
/// faulted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Time the pass finished (RFC 3339)
    pub timestamp: String,
    /// Pass counters
    pub metrics: RunMetrics,
    /// One entry per registered rule, in registration order
    pub rules: Vec<RuleReport>,
    /// Notices, system errors and per-code summary
    #[serde(flatten)]
    pub collected: CollectedNotices,
}

impl ValidationReport {
    pub(crate) fn new(
        metrics: RunMetrics,
        rules: Vec<RuleReport>,
        collected: CollectedNotices,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            metrics,
            rules,
            collected,
        }
    }

    /// Validation notices in merge order.
    pub fn notices(&self) -> &[Notice] {
        &self.collected.notices
    }

    /// Engine diagnostics in merge order.
    pub fn system_errors(&self) -> &[Notice] {
        &self.collected.system_errors
    }

    /// Validation notices with the given code.
    pub fn notices_of<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Notice> + 'a {
        self.collected.notices_of(code)
    }

    /// The outcome of the rule registered as `name`.
    pub fn outcome(&self, name: &str) -> Option<&RuleOutcome> {
        self.rules
            .iter()
            .find(|r| r.rule_name == name)
            .map(|r| &r.outcome)
    }

    /// Total notices emitted with `severity`, capped ones included.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.collected.count_by_severity(severity)
    }

    /// Returns true if any validation notice has error severity.
    pub fn has_errors(&self) -> bool {
        self.collected.has_errors()
    }

    /// Returns true if any rule could not run cleanly.
    pub fn has_system_errors(&self) -> bool {
        !self.collected.system_errors.is_empty()
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
