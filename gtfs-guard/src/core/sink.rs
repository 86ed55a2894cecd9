//! The accumulator every notice of a pass ends up in.

use super::diagnostics::NoticeSeverityConflict;
use super::{Notice, NoticeContainer, NoticeKind, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Totals for one notice code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeSummary {
    /// The notice code
    pub code: String,
    /// Severity shared by every notice of the code
    pub severity: Severity,
    /// How many notices of the code were emitted
    pub total_notices: usize,
    /// How many were kept; lower than the total when a per-kind cap applies
    pub stored_notices: usize,
}

#[derive(Debug)]
struct KindTally {
    severity: Severity,
    total: usize,
    stored: usize,
}

#[derive(Debug, Default)]
struct SinkState {
    notices: Vec<Notice>,
    system_errors: Vec<Notice>,
    kinds: BTreeMap<String, KindTally>,
}

/// Append-only, thread-safe collection of the notices of one pass.
///
/// Notices arrive in [`NoticeContainer`] batches. A batch is appended under a
/// single lock acquisition, so notices from one batch stay contiguous and in
/// emission order no matter how many threads append concurrently.
///
/// Validation notices and system errors (engine diagnostics) are kept in
/// separate lists. A per-kind cap limits how many validation notices of one
/// code are stored while the totals stay exact.
///
/// # Examples
///
/// ```rust
/// use gtfs_guard::core::{Notice, NoticeContainer, NoticeSink, Severity};
///
/// let sink = NoticeSink::new().with_max_notices_per_kind(Some(1));
/// let mut batch = NoticeContainer::new();
/// batch.push_notice(Notice::new("unused_shape", Severity::Warning));
/// batch.push_notice(Notice::new("unused_shape", Severity::Warning));
/// sink.append(batch);
///
/// let collected = sink.finish();
/// assert_eq!(collected.notices.len(), 1);
/// assert_eq!(collected.summary[0].total_notices, 2);
/// ```
#[derive(Debug, Default)]
pub struct NoticeSink {
    max_notices_per_kind: Option<usize>,
    state: Mutex<SinkState>,
}

impl NoticeSink {
    /// Creates an unbounded sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps how many notices of one code are stored.
    pub fn with_max_notices_per_kind(mut self, max: Option<usize>) -> Self {
        self.max_notices_per_kind = max;
        self
    }

    /// Appends a batch of validation notices.
    ///
    /// A notice whose severity disagrees with the severity already recorded
    /// for its code is dropped and replaced by a
    /// `notice_severity_conflict` system error.
    pub fn append(&self, batch: NoticeContainer) {
        if batch.is_empty() {
            return;
        }
        let mut guard = self.lock();
        let state = &mut *guard;
        for notice in batch.into_notices() {
            let tally = state
                .kinds
                .entry(notice.code().to_string())
                .or_insert(KindTally {
                    severity: notice.severity(),
                    total: 0,
                    stored: 0,
                });

            if tally.severity != notice.severity() {
                let conflict = NoticeSeverityConflict {
                    code: notice.code().to_string(),
                    declared_severity: tally.severity,
                    conflicting_severity: notice.severity(),
                };
                state.system_errors.push(Notice::from_kind(&conflict));
                continue;
            }

            tally.total += 1;
            let keep = self.max_notices_per_kind.map_or(true, |max| tally.stored < max);
            if keep {
                tally.stored += 1;
                state.notices.push(notice);
            }
        }
    }

    /// Appends a batch of system errors.
    pub fn append_system_errors(&self, batch: NoticeContainer) {
        if batch.is_empty() {
            return;
        }
        self.lock().system_errors.extend(batch.into_notices());
    }

    /// Emits a single typed validation notice.
    pub fn push<K: NoticeKind>(&self, kind: K) {
        let mut batch = NoticeContainer::new();
        batch.push(kind);
        self.append(batch);
    }

    /// Number of validation notices stored so far.
    pub fn len(&self) -> usize {
        self.lock().notices.len()
    }

    /// True if no validation notice is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().notices.is_empty()
    }

    /// Number of system errors recorded so far.
    pub fn system_error_count(&self) -> usize {
        self.lock().system_errors.len()
    }

    /// Ends the pass and hands the notices over read-only.
    pub fn finish(self) -> CollectedNotices {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut summary: Vec<NoticeSummary> = state
            .kinds
            .into_iter()
            .filter(|(_, tally)| tally.total > 0)
            .map(|(code, tally)| NoticeSummary {
                code,
                severity: tally.severity,
                total_notices: tally.total,
                stored_notices: tally.stored,
            })
            .collect();
        summary.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.code.cmp(&b.code)));

        CollectedNotices {
            notices: state.notices,
            system_errors: state.system_errors,
            summary,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The frozen contents of a [`NoticeSink`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedNotices {
    /// Validation notices in append order
    pub notices: Vec<Notice>,
    /// Engine diagnostics in append order
    pub system_errors: Vec<Notice>,
    /// Per-code totals, most severe first
    pub summary: Vec<NoticeSummary>,
}

impl CollectedNotices {
    /// Validation notices with the given code.
    pub fn notices_of<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Notice> + 'a {
        self.notices.iter().filter(move |n| n.code() == code)
    }

    /// Total validation notices emitted with `severity`, including capped ones.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.summary
            .iter()
            .filter(|s| s.severity == severity)
            .map(|s| s.total_notices)
            .sum()
    }

    /// Total notices emitted with `code`, including capped ones.
    pub fn count_by_code(&self, code: &str) -> usize {
        self.summary
            .iter()
            .find(|s| s.code == code)
            .map_or(0, |s| s.total_notices)
    }

    /// True if any validation notice has error severity.
    pub fn has_errors(&self) -> bool {
        self.count_by_severity(Severity::Error) > 0
    }
}
