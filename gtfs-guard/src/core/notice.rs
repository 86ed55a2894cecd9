//! Notices: the structured findings rules emit.

use super::Severity;
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::warn;

/// A kind of finding, with a fixed code and severity.
///
/// Implementors are plain `Serialize` structs whose fields form the notice's
/// context. Field names are conventionally camelCase in the output, so most
/// kinds carry `#[serde(rename_all = "camelCase")]`.
///
/// ```rust
/// use gtfs_guard::core::{Notice, NoticeKind, Severity};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct DuplicateKey {
///     csv_row_number: u64,
///     field_value: String,
/// }
///
/// impl NoticeKind for DuplicateKey {
///     const CODE: &'static str = "duplicate_key";
///     const SEVERITY: Severity = Severity::Error;
/// }
///
/// let notice = Notice::from_kind(&DuplicateKey { csv_row_number: 3, field_value: "t1".into() });
/// assert_eq!(notice.code(), "duplicate_key");
/// assert_eq!(notice.get("csvRowNumber"), Some(&serde_json::json!(3)));
/// ```
pub trait NoticeKind: Serialize {
    /// Stable identifier of the kind, e.g. `"unused_shape"`.
    const CODE: &'static str;

    /// Severity every notice of this kind carries.
    const SEVERITY: Severity;
}

/// One immutable finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    code: Cow<'static, str>,
    severity: Severity,
    context: Map<String, Value>,
}

impl Notice {
    /// Builds a notice from a typed kind.
    pub fn from_kind<K: NoticeKind>(kind: &K) -> Self {
        let context = match serde_json::to_value(kind) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
            Err(e) => {
                warn!(notice.code = K::CODE, error = %e, "Failed to serialize notice context");
                let mut map = Map::new();
                map.insert("serializationError".to_string(), Value::String(e.to_string()));
                map
            }
        };
        Self {
            code: Cow::Borrowed(K::CODE),
            severity: K::SEVERITY,
            context,
        }
    }

    /// Builds a notice without a typed kind.
    ///
    /// Prefer [`Notice::from_kind`]; the sink rejects a dynamically built
    /// notice whose severity disagrees with earlier notices of the same code.
    pub fn new(code: impl Into<Cow<'static, str>>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            severity,
            context: Map::new(),
        }
    }

    /// Adds a context field.
    pub fn with_context(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(field.into(), value.into());
        self
    }

    /// The kind's code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The kind's severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// All context fields.
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// One context field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.context.get(field)
    }
}

/// The buffer a single rule invocation writes its notices into.
///
/// Each work unit of a pass gets its own container, so rules never contend
/// on a lock while emitting. The engine appends the finished buffer to the
/// shared [`NoticeSink`](super::NoticeSink) in one step, which keeps the
/// order a rule emitted its notices in.
#[derive(Debug, Clone, Default)]
pub struct NoticeContainer {
    notices: Vec<Notice>,
}

impl NoticeContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a typed notice.
    pub fn push<K: NoticeKind>(&mut self, kind: K) {
        self.notices.push(Notice::from_kind(&kind));
    }

    /// Emits an already built notice.
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Notices emitted so far, in emission order.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Number of notices emitted so far.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// True if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Moves another container's notices to the end of this one.
    pub fn append(&mut self, other: &mut NoticeContainer) {
        self.notices.append(&mut other.notices);
    }

    /// Consumes the container.
    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }
}
