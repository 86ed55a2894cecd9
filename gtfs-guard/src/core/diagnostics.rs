//! Notice kinds the engine itself emits as system errors.
//!
//! These never describe the feed. They describe a rule that could not run or
//! a notice that could not be accepted, and they are kept apart from
//! validation notices in the sink.

use super::{NoticeKind, Severity};
use serde::Serialize;

/// Where in a rule's lifecycle a fault happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePhase {
    /// Looking up the rule's declared tables.
    Resolving,
    /// Evaluating a per-record rule's column gate.
    Gating,
    /// Running `validate`.
    Executing,
}

/// A rule invocation failed or panicked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleExecutionFault {
    pub rule_name: String,
    pub phase: RulePhase,
    pub fault_kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_row_number: Option<u64>,
}

impl NoticeKind for RuleExecutionFault {
    const CODE: &'static str = "rule_execution_fault";
    const SEVERITY: Severity = Severity::Error;
}

/// A rule declared a table the snapshot does not hold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedTableDependency {
    pub rule_name: String,
    pub filename: &'static str,
}

impl NoticeKind for UnresolvedTableDependency {
    const CODE: &'static str = "unresolved_table_dependency";
    const SEVERITY: Severity = Severity::Error;
}

/// A notice arrived with a severity other than the one its code already has.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeSeverityConflict {
    pub code: String,
    pub declared_severity: Severity,
    pub conflicting_severity: Severity,
}

impl NoticeKind for NoticeSeverityConflict {
    const CODE: &'static str = "notice_severity_conflict";
    const SEVERITY: Severity = Severity::Error;
}
