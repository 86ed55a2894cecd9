//! Error types for the gtfs-guard validation engine.
//!
//! Two layers of failure exist. [`GuardError`] is what the public API returns:
//! wiring mistakes caught while building a registry or a snapshot, and the few
//! conditions that make a whole validation pass impossible. [`RuleFault`] is
//! the error value a single rule invocation may produce; the engine recovers
//! from it and records a system-error notice instead of propagating it.

use thiserror::Error;

/// The main error type for gtfs-guard.
#[derive(Error, Debug)]
pub enum GuardError {
    /// A registry or engine was configured inconsistently.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Two rules were registered under the same name.
    #[error("Rule '{name}' is registered more than once")]
    DuplicateRule {
        /// Name shared by the conflicting rules
        name: String,
    },

    /// Two containers were inserted into a snapshot for the same table.
    #[error("Table '{table}' is present more than once in the snapshot")]
    DuplicateTable {
        /// Filename of the table
        table: String,
    },

    /// A validation pass was started on a snapshot holding no tables.
    #[error("Feed snapshot contains no tables")]
    EmptySnapshot,

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error when parsing a typed field value.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, GuardError>`.
pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            GuardError::Internal(inner) => GuardError::Internal(format!("{msg}: {inner}")),
            other => GuardError::Internal(format!("{msg}: {other}")),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                GuardError::Internal(inner) => GuardError::Internal(format!("{msg}: {inner}")),
                other => GuardError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

/// A failure raised while a single rule invocation was running.
///
/// Rule bodies return this from `validate` when they cannot finish evaluating
/// their predicate. Panics are converted into [`RuleFault::Panicked`] by the
/// engine, so a rule never needs to catch them itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleFault {
    /// The rule's predicate could not be evaluated on the data it was given.
    #[error("{message}")]
    Predicate {
        /// What went wrong
        message: String,
    },

    /// The rule asked for a table it did not declare as a dependency.
    #[error("table '{table}' was not declared as a dependency")]
    UndeclaredTable {
        /// Filename of the requested table
        table: String,
    },

    /// The snapshot holds the table but with a different record type.
    #[error("table '{table}' does not hold the requested record type")]
    TableTypeMismatch {
        /// Filename of the requested table
        table: String,
    },

    /// The rule panicked.
    #[error("rule panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text
        message: String,
    },

    /// The worker running the invocation could not be joined.
    #[error("worker lost: {message}")]
    WorkerLost {
        /// Why the worker could not be joined
        message: String,
    },
}

impl RuleFault {
    /// Creates a predicate fault.
    pub fn predicate(message: impl Into<String>) -> Self {
        Self::Predicate {
            message: message.into(),
        }
    }

    /// Builds a fault from a payload caught by `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked { message }
    }

    /// Short machine-readable label for the fault variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Predicate { .. } => "predicate",
            Self::UndeclaredTable { .. } => "undeclared_table",
            Self::TableTypeMismatch { .. } => "table_type_mismatch",
            Self::Panicked { .. } => "panicked",
            Self::WorkerLost { .. } => "worker_lost",
        }
    }
}
