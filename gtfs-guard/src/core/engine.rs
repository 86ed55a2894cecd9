//! Orchestration of a validation pass.

use super::diagnostics::{RuleExecutionFault, RulePhase, UnresolvedTableDependency};
use super::registry::{RuleEntry, RuleRegistry, RuleShape};
use super::result::{RuleOutcome, RuleReport, RunMetrics, SkipReason, ValidationReport};
use super::rule::{guarded, DynRecordRule, FileRule, TableSet};
use super::{NoticeContainer, NoticeSink};
use crate::config::EngineConfig;
use crate::error::{GuardError, Result, RuleFault};
use crate::{log_rule, plan_debug};
use crate::logging::truncate_field;
use crate::table::{FeedSnapshot, TableId, TableStatus};
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{debug, error, info, instrument, warn};

/// Runs a registry of rules against a feed snapshot.
///
/// For every rule, in registration order, the engine resolves the declared
/// tables, evaluates the column gate of per-record rules once, and invokes
/// the rule: once for whole-table rules, once per row for per-record rules.
/// A rule that faults or panics is recorded as a system error and the pass
/// continues with the next rule.
///
/// Each work unit writes into its own [`NoticeContainer`]; the containers
/// are merged into one [`NoticeSink`] in (registration order, row order), so
/// [`run`](Self::run) and [`run_parallel`](Self::run_parallel) produce the
/// same notices in the same order.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use gtfs_guard::config::EngineConfig;
/// use gtfs_guard::core::{RuleRegistry, ValidationEngine};
/// use gtfs_guard::gtfs::CalendarRecord;
/// use gtfs_guard::rules::CalendarRangeRule;
/// use gtfs_guard::table::{FeedSnapshot, TableContainer};
///
/// # fn main() -> gtfs_guard::error::Result<()> {
/// let date = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let calendar = TableContainer::from_rows(
///     ["service_id", "start_date", "end_date"],
///     vec![CalendarRecord::new(2, "W").with_range(date(10), date(1))],
/// );
/// let snapshot = FeedSnapshot::builder().table(calendar)?.build();
///
/// let registry = RuleRegistry::builder().record_rule(CalendarRangeRule).build()?;
/// let engine = ValidationEngine::new(registry, EngineConfig::default())?;
/// let report = engine.run(&snapshot)?;
///
/// assert_eq!(report.notices().len(), 1);
/// assert_eq!(report.notices()[0].code(), "start_and_end_range_out_of_order");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: RuleRegistry,
    config: EngineConfig,
}

/// A piece of work the engine can run on any thread.
enum WorkUnit {
    File {
        rule: Arc<dyn FileRule>,
        dependencies: Vec<TableId>,
    },
    Shard {
        rule: Arc<dyn DynRecordRule>,
        table: TableId,
        rows: Range<usize>,
    },
}

/// What the engine decided for a rule before running it.
enum Plan {
    Finished {
        outcome: RuleOutcome,
        system_errors: NoticeContainer,
    },
    Run(Vec<WorkUnit>),
}

#[derive(Debug, Default)]
struct UnitOutput {
    notices: NoticeContainer,
    system_errors: NoticeContainer,
    invocations: usize,
    faults: usize,
}

/// Accumulates the unit outputs of one rule into the sink.
struct RuleTally {
    invocations: usize,
    notices: usize,
    faults: usize,
}

impl RuleTally {
    fn new() -> Self {
        Self {
            invocations: 0,
            notices: 0,
            faults: 0,
        }
    }

    fn absorb(&mut self, output: UnitOutput, sink: &NoticeSink) {
        self.invocations += output.invocations;
        self.notices += output.notices.len();
        self.faults += output.faults;
        sink.append(output.notices);
        sink.append_system_errors(output.system_errors);
    }

    fn outcome(&self) -> RuleOutcome {
        if self.faults > 0 {
            RuleOutcome::Faulted {
                faults: self.faults,
            }
        } else {
            RuleOutcome::Executed {
                invocations: self.invocations,
                notices: self.notices,
            }
        }
    }
}

impl ValidationEngine {
    /// Creates an engine, rejecting an invalid configuration.
    pub fn new(registry: RuleRegistry, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// The rules this engine runs.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a pass on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::EmptySnapshot`] if the snapshot holds no tables.
    /// Rule-level problems never surface here; they are reported as system
    /// errors in the returned report.
    #[instrument(skip(self, snapshot), fields(
        pass.rules = self.registry.len(),
        pass.tables = snapshot.len(),
        pass.parallel = false
    ))]
    pub fn run(&self, snapshot: &FeedSnapshot) -> Result<ValidationReport> {
        self.ensure_tables(snapshot)?;
        let start_time = Instant::now();
        let sink = self.new_sink();
        let max_field_length = self.config.log.max_field_length;
        let mut rules = Vec::with_capacity(self.registry.len());

        for entry in self.registry.entries() {
            let outcome = match self.plan(entry, snapshot, false) {
                Plan::Finished {
                    outcome,
                    system_errors,
                } => {
                    sink.append_system_errors(system_errors);
                    outcome
                }
                Plan::Run(units) => {
                    let mut tally = RuleTally::new();
                    for unit in &units {
                        tally.absorb(
                            execute_unit(unit, snapshot, entry.name(), max_field_length),
                            &sink,
                        );
                    }
                    tally.outcome()
                }
            };
            rules.push(self.report_rule(entry, outcome));
        }

        Ok(self.finish(rules, sink, start_time))
    }

    /// Runs a pass with work units spread over tokio's blocking thread pool.
    ///
    /// Whole-table rules are one unit each; per-record rules are split into
    /// shards of [`EngineConfig::shard_size`] rows. At most
    /// [`EngineConfig::effective_max_concurrency`] units run at once. The
    /// report is identical to the one [`run`](Self::run) produces, apart
    /// from timing.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::EmptySnapshot`] for a snapshot without tables.
    /// A worker task that cannot be joined faults its rule like a panic
    /// would; the remaining units still run.
    #[instrument(skip(self, snapshot), fields(
        pass.rules = self.registry.len(),
        pass.tables = snapshot.len(),
        pass.parallel = true
    ))]
    pub async fn run_parallel(&self, snapshot: Arc<FeedSnapshot>) -> Result<ValidationReport> {
        self.ensure_tables(&snapshot)?;
        let start_time = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.effective_max_concurrency()));
        let max_field_length = self.config.log.max_field_length;

        enum Pending {
            Finished {
                outcome: RuleOutcome,
                system_errors: NoticeContainer,
            },
            Running(Vec<tokio::task::JoinHandle<UnitOutput>>),
        }

        let mut pending = Vec::with_capacity(self.registry.len());
        for entry in self.registry.entries() {
            match self.plan(entry, &snapshot, true) {
                Plan::Finished {
                    outcome,
                    system_errors,
                } => pending.push(Pending::Finished {
                    outcome,
                    system_errors,
                }),
                Plan::Run(units) => {
                    let mut handles = Vec::with_capacity(units.len());
                    for unit in units {
                        let permit = Arc::clone(&semaphore)
                            .acquire_owned()
                            .await
                            .map_err(|e| {
                                GuardError::internal(format!("Worker pool closed: {e}"))
                            })?;
                        let snapshot = Arc::clone(&snapshot);
                        let rule_name = entry.name().to_string();
                        handles.push(tokio::task::spawn_blocking(move || {
                            let _permit = permit;
                            execute_unit(&unit, &snapshot, &rule_name, max_field_length)
                        }));
                    }
                    pending.push(Pending::Running(handles));
                }
            }
        }

        let sink = self.new_sink();
        let mut rules = Vec::with_capacity(pending.len());
        for (entry, item) in self.registry.entries().iter().zip(pending) {
            let outcome = match item {
                Pending::Finished {
                    outcome,
                    system_errors,
                } => {
                    sink.append_system_errors(system_errors);
                    outcome
                }
                Pending::Running(handles) => {
                    let mut tally = RuleTally::new();
                    for handle in handles {
                        let output = joined_output(handle.await, entry.name(), max_field_length);
                        tally.absorb(output, &sink);
                    }
                    tally.outcome()
                }
            };
            rules.push(self.report_rule(entry, outcome));
        }

        Ok(self.finish(rules, sink, start_time))
    }

    /// Runs a pass on the path selected by [`EngineConfig::parallel`].
    pub async fn validate(&self, snapshot: Arc<FeedSnapshot>) -> Result<ValidationReport> {
        if self.config.parallel {
            self.run_parallel(snapshot).await
        } else {
            self.run(&snapshot)
        }
    }

    fn ensure_tables(&self, snapshot: &FeedSnapshot) -> Result<()> {
        if snapshot.is_empty() {
            error!("Validation pass started on a snapshot without tables");
            return Err(GuardError::EmptySnapshot);
        }
        Ok(())
    }

    fn new_sink(&self) -> NoticeSink {
        NoticeSink::new().with_max_notices_per_kind(self.config.max_notices_per_kind)
    }

    /// Resolves, checks and gates a rule, and splits it into work units.
    /// Per-record rules are split into row shards only when `shard` is set.
    fn plan(&self, entry: &RuleEntry, snapshot: &FeedSnapshot, shard: bool) -> Plan {
        log_rule!(
            self.config.log,
            rule.name = %entry.name(),
            rule.kind = ?entry.kind(),
            "Resolving rule dependencies"
        );

        for &table in entry.dependencies() {
            let Some(container) = snapshot.get(table) else {
                warn!(
                    rule.name = %entry.name(),
                    table = %table,
                    "Rule depends on a table the snapshot does not hold"
                );
                let mut system_errors = NoticeContainer::new();
                system_errors.push(UnresolvedTableDependency {
                    rule_name: entry.name().to_string(),
                    filename: table.filename(),
                });
                return Plan::Finished {
                    outcome: RuleOutcome::Unresolved {
                        table: table.filename().to_string(),
                    },
                    system_errors,
                };
            };

            let status = container.status();
            if self.config.skip_rules_on_unparsable_tables
                && !entry.runs_on_unparsable_tables()
                && matches!(
                    status,
                    TableStatus::InvalidHeaders | TableStatus::UnparsableRows
                )
            {
                warn!(
                    rule.name = %entry.name(),
                    table = %table,
                    table.status = ?status,
                    "Skipping rule because a dependency failed to decode"
                );
                return Plan::Finished {
                    outcome: RuleOutcome::Skipped {
                        reason: SkipReason::UnparsableTable {
                            table: table.filename().to_string(),
                        },
                    },
                    system_errors: NoticeContainer::new(),
                };
            }
        }

        match &entry.shape {
            RuleShape::File(rule) => Plan::Run(vec![WorkUnit::File {
                rule: Arc::clone(rule),
                dependencies: entry.dependencies().to_vec(),
            }]),
            RuleShape::Record(rule) => self.plan_record_rule(entry, rule, snapshot, shard),
        }
    }

    fn plan_record_rule(
        &self,
        entry: &RuleEntry,
        rule: &Arc<dyn DynRecordRule>,
        snapshot: &FeedSnapshot,
        shard: bool,
    ) -> Plan {
        let table_id = rule.table();
        // Dependencies were resolved above.
        let Some(table) = snapshot.get(table_id) else {
            return Plan::Run(Vec::new());
        };

        match guarded(|| Ok(rule.gate(table))) {
            Ok(true) => {}
            Ok(false) => {
                debug!(
                    rule.name = %entry.name(),
                    table = %table_id,
                    "Gate closed, rule will not be invoked"
                );
                return Plan::Finished {
                    outcome: RuleOutcome::Skipped {
                        reason: SkipReason::GateClosed,
                    },
                    system_errors: NoticeContainer::new(),
                };
            }
            Err(fault) => {
                let mut system_errors = NoticeContainer::new();
                system_errors.push(self.fault_notice(
                    entry.name(),
                    RulePhase::Gating,
                    &fault,
                    Some(table_id.filename()),
                    None,
                ));
                return Plan::Finished {
                    outcome: RuleOutcome::Faulted { faults: 1 },
                    system_errors,
                };
            }
        }

        let row_count = table.row_count();
        let shard_size = if shard {
            self.config.shard_size
        } else {
            row_count.max(1)
        };
        let units = (0..row_count)
            .step_by(shard_size)
            .map(|start| WorkUnit::Shard {
                rule: Arc::clone(rule),
                table: table_id,
                rows: start..(start + shard_size).min(row_count),
            })
            .collect::<Vec<_>>();
        plan_debug!(
            self.config.log,
            rule.name = %entry.name(),
            table = %table_id,
            rows = row_count,
            shard_size,
            units = units.len(),
            "Split per-record rule into work units"
        );
        Plan::Run(units)
    }

    fn fault_notice(
        &self,
        rule_name: &str,
        phase: RulePhase,
        fault: &RuleFault,
        filename: Option<&'static str>,
        csv_row_number: Option<u64>,
    ) -> RuleExecutionFault {
        build_fault_notice(
            rule_name,
            phase,
            fault,
            filename,
            csv_row_number,
            self.config.log.max_field_length,
        )
    }

    fn report_rule(&self, entry: &RuleEntry, outcome: RuleOutcome) -> RuleReport {
        log_rule!(
            self.config.log,
            rule.name = %entry.name(),
            rule.outcome = ?outcome,
            "Rule finished"
        );
        RuleReport {
            rule_name: entry.name().to_string(),
            kind: entry.kind(),
            outcome,
        }
    }

    fn finish(
        &self,
        rules: Vec<RuleReport>,
        sink: NoticeSink,
        start_time: Instant,
    ) -> ValidationReport {
        let mut metrics = RunMetrics::default();
        for rule in &rules {
            metrics.record(rule.kind, &rule.outcome);
        }
        metrics.execution_time_ms = start_time.elapsed().as_millis() as u64;
        let collected = sink.finish();

        info!(
            metrics.rules = metrics.rules_total,
            metrics.executed = metrics.rules_executed,
            metrics.skipped = metrics.rules_skipped,
            metrics.unresolved = metrics.rules_unresolved,
            metrics.faulted = metrics.rules_faulted,
            notices = collected.notices.len(),
            system_errors = collected.system_errors.len(),
            duration_ms = metrics.execution_time_ms,
            "Validation pass completed"
        );

        ValidationReport::new(metrics, rules, collected)
    }
}

fn build_fault_notice(
    rule_name: &str,
    phase: RulePhase,
    fault: &RuleFault,
    filename: Option<&'static str>,
    csv_row_number: Option<u64>,
    max_field_length: usize,
) -> RuleExecutionFault {
    let message = fault.to_string();
    error!(
        rule.name = %rule_name,
        rule.phase = ?phase,
        fault.kind = fault.kind(),
        fault.message = %truncate_field(&message, max_field_length),
        csv_row_number = ?csv_row_number,
        "Rule invocation faulted"
    );
    RuleExecutionFault {
        rule_name: rule_name.to_string(),
        phase,
        fault_kind: fault.kind(),
        message,
        filename,
        csv_row_number,
    }
}

/// The output of a joined worker, or a single fault if it was lost.
fn joined_output(
    joined: std::result::Result<UnitOutput, JoinError>,
    rule_name: &str,
    max_field_length: usize,
) -> UnitOutput {
    match joined {
        Ok(output) => output,
        Err(e) => {
            let mut output = UnitOutput {
                faults: 1,
                ..UnitOutput::default()
            };
            output.system_errors.push(build_fault_notice(
                rule_name,
                RulePhase::Executing,
                &RuleFault::WorkerLost {
                    message: e.to_string(),
                },
                None,
                None,
                max_field_length,
            ));
            output
        }
    }
}

/// Runs one work unit against the snapshot. Never panics on behalf of a rule.
///
/// Fault messages in system errors keep their full length; only the log line
/// is truncated to `max_field_length`.
fn execute_unit(
    unit: &WorkUnit,
    snapshot: &FeedSnapshot,
    rule_name: &str,
    max_field_length: usize,
) -> UnitOutput {
    let mut output = UnitOutput::default();

    match unit {
        WorkUnit::File { rule, dependencies } => {
            let tables = TableSet::new(snapshot, dependencies);
            output.invocations = 1;
            if let Err(fault) = guarded(|| rule.validate(&tables, &mut output.notices)) {
                output.faults += 1;
                output.system_errors.push(build_fault_notice(
                    rule_name,
                    RulePhase::Executing,
                    &fault,
                    None,
                    None,
                    max_field_length,
                ));
            }
        }
        WorkUnit::Shard { rule, table, rows } => {
            let Some(container) = snapshot.get(*table) else {
                output.faults += 1;
                output.system_errors.push(build_fault_notice(
                    rule_name,
                    RulePhase::Resolving,
                    &RuleFault::UndeclaredTable {
                        table: table.filename().to_string(),
                    },
                    Some(table.filename()),
                    None,
                    max_field_length,
                ));
                return output;
            };
            let mut row_faults = Vec::new();
            output.invocations =
                rule.validate_range(container, rows.clone(), &mut output.notices, &mut row_faults);
            output.faults += row_faults.len();
            for row_fault in row_faults {
                output.system_errors.push(build_fault_notice(
                    rule_name,
                    RulePhase::Executing,
                    &row_fault.fault,
                    Some(table.filename()),
                    row_fault.csv_row_number,
                    max_field_length,
                ));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RecordRule;
    use crate::gtfs::{CalendarRecord, ShapeRecord, TripRecord};
    use crate::rules::{CalendarRangeRule, UnusedShapeRule};
    use crate::table::{ColumnInspector, Record, TableContainer};
    use crate::test_helpers::{calendar_table, date, shapes_table, trips_table};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRule {
        calls: Arc<AtomicUsize>,
        requires: &'static str,
    }

    impl RecordRule for CountingRule {
        type Record = CalendarRecord;

        fn name(&self) -> &str {
            "counting"
        }

        fn should_call_validate(&self, columns: &dyn ColumnInspector) -> bool {
            columns.has_column(self.requires)
        }

        fn validate(
            &self,
            _record: &CalendarRecord,
            _notices: &mut NoticeContainer,
        ) -> std::result::Result<(), RuleFault> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn snapshot() -> FeedSnapshot {
        FeedSnapshot::builder()
            .table(calendar_table(vec![
                CalendarRecord::new(2, "W").with_range(date(2024, 1, 10), date(2024, 1, 1)),
                CalendarRecord::new(3, "X").with_range(date(2024, 1, 1), date(2024, 1, 1)),
            ]))
            .unwrap()
            .table(shapes_table(&["A", "A", "B"]))
            .unwrap()
            .table(trips_table(&[Some("A")]))
            .unwrap()
            .build()
    }

    #[test]
    fn test_empty_snapshot_is_fatal() {
        let engine =
            ValidationEngine::new(RuleRegistry::default(), EngineConfig::default()).unwrap();
        let result = engine.run(&FeedSnapshot::builder().build());
        assert!(matches!(result, Err(GuardError::EmptySnapshot)));
    }

    #[test]
    fn test_gate_is_evaluated_once_and_blocks_invocations() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = RuleRegistry::builder()
            .record_rule(CountingRule {
                calls: Arc::clone(&calls),
                requires: "not_a_column",
            })
            .build()
            .unwrap();
        let engine = ValidationEngine::new(registry, EngineConfig::default()).unwrap();

        let report = engine.run(&snapshot()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            report.outcome("counting"),
            Some(&RuleOutcome::Skipped {
                reason: SkipReason::GateClosed
            })
        );
        assert_eq!(report.metrics.record_invocations, 0);
    }

    #[test]
    fn test_open_gate_invokes_once_per_row() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = RuleRegistry::builder()
            .record_rule(CountingRule {
                calls: Arc::clone(&calls),
                requires: "service_id",
            })
            .build()
            .unwrap();
        let engine = ValidationEngine::new(registry, EngineConfig::default()).unwrap();

        let report = engine.run(&snapshot()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(report.metrics.record_invocations, 2);
    }

    #[test]
    fn test_unresolved_dependency_does_not_abort_pass() {
        let snapshot = FeedSnapshot::builder()
            .table(calendar_table(vec![CalendarRecord::new(2, "W")
                .with_range(date(2024, 1, 10), date(2024, 1, 1))]))
            .unwrap()
            .table(TableContainer::<ShapeRecord>::missing())
            .unwrap()
            .build();
        let registry = RuleRegistry::builder()
            .file_rule(UnusedShapeRule)
            .record_rule(CalendarRangeRule)
            .build()
            .unwrap();
        let engine = ValidationEngine::new(registry, EngineConfig::default()).unwrap();

        let report = engine.run(&snapshot).unwrap();
        assert_eq!(
            report.outcome("unused_shape"),
            Some(&RuleOutcome::Unresolved {
                table: "trips.txt".to_string()
            })
        );
        assert_eq!(report.system_errors().len(), 1);
        assert_eq!(report.system_errors()[0].code(), "unresolved_table_dependency");
        assert_eq!(report.notices().len(), 1);
        assert!(report.outcome("calendar_range").unwrap().is_executed());
    }

    #[test]
    fn test_unparsable_dependency_skips_rule() {
        let snapshot = FeedSnapshot::builder()
            .table(TableContainer::<ShapeRecord>::unparsable_rows([
                "shape_id",
                "shape_pt_sequence",
            ]))
            .unwrap()
            .table(trips_table(&[Some("A")]))
            .unwrap()
            .build();
        let registry = RuleRegistry::builder()
            .file_rule(UnusedShapeRule)
            .build()
            .unwrap();

        let engine = ValidationEngine::new(registry.clone(), EngineConfig::default()).unwrap();
        let report = engine.run(&snapshot).unwrap();
        assert_eq!(
            report.outcome("unused_shape"),
            Some(&RuleOutcome::Skipped {
                reason: SkipReason::UnparsableTable {
                    table: "shapes.txt".to_string()
                }
            })
        );

        let config = EngineConfig::default().with_skip_rules_on_unparsable_tables(false);
        let engine = ValidationEngine::new(registry, config).unwrap();
        let report = engine.run(&snapshot).unwrap();
        assert!(report.outcome("unused_shape").unwrap().is_executed());
    }

    #[test]
    fn test_shards_cover_every_row_once() {
        let trips: Vec<Option<&str>> = vec![None; 25];
        let snapshot = FeedSnapshot::builder()
            .table(trips_table(&trips))
            .unwrap()
            .build();

        struct Rows;
        impl RecordRule for Rows {
            type Record = TripRecord;
            fn name(&self) -> &str {
                "rows"
            }
            fn validate(
                &self,
                record: &TripRecord,
                notices: &mut NoticeContainer,
            ) -> std::result::Result<(), RuleFault> {
                notices.push_notice(
                    crate::core::Notice::new("row", crate::core::Severity::Info)
                        .with_context("csvRowNumber", record.csv_row_number()),
                );
                Ok(())
            }
        }

        let registry = RuleRegistry::builder().record_rule(Rows).build().unwrap();
        let config = EngineConfig::default().with_parallel(true).with_shard_size(4);
        let engine = ValidationEngine::new(registry, config).unwrap();

        let RuleShape::Record(rule) = &engine.registry.entries()[0].shape else {
            panic!("expected a per-record rule");
        };
        let Plan::Run(units) =
            engine.plan_record_rule(&engine.registry.entries()[0], rule, &snapshot, true)
        else {
            panic!("expected work units");
        };
        assert_eq!(units.len(), 7);

        let report = engine.run(&snapshot).unwrap();
        let rows: Vec<u64> = report
            .notices()
            .iter()
            .map(|n| n.get("csvRowNumber").and_then(|v| v.as_u64()).unwrap())
            .collect();
        assert_eq!(rows, (2..27).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_lost_worker_faults_its_rule() {
        let lost = tokio::task::spawn_blocking(|| -> UnitOutput { panic!("worker died") })
            .await
            .unwrap_err();

        let output = joined_output(Err(lost), "counting", 256);
        assert_eq!(output.faults, 1);
        assert!(output.notices.is_empty());
        let fault = &output.system_errors.notices()[0];
        assert_eq!(fault.code(), "rule_execution_fault");
        assert_eq!(
            fault.get("faultKind"),
            Some(&serde_json::json!("worker_lost"))
        );

        let mut tally = RuleTally::new();
        let sink = NoticeSink::new();
        tally.absorb(output, &sink);
        tally.absorb(joined_output(Ok(UnitOutput::default()), "counting", 256), &sink);
        assert_eq!(tally.outcome(), RuleOutcome::Faulted { faults: 1 });
        assert_eq!(sink.system_error_count(), 1);
    }
}
