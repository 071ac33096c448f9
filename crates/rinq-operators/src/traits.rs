//! Shared operator interfaces: evaluation context, aggregate trait, errors.

use std::fmt;

use rinq_core::config::Resolution;
use rinq_core::source::RowSource;
use rinq_core::types::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    #[error("unknown column '{name}' referenced in {clause}")]
    UnknownColumn { name: String, clause: &'static str },

    #[error("count target column '{0}' not found")]
    AggregateTargetNotFound(String),
}

impl From<OpError> for rinq_core::Error {
    fn from(e: OpError) -> Self {
        match e {
            OpError::UnknownColumn { name, clause } => {
                rinq_core::Error::UnknownColumn { name, clause }
            }
            OpError::AggregateTargetNotFound(name) => {
                rinq_core::Error::AggregateTargetNotFound(name)
            }
        }
    }
}

/// A column reference: every cell of the row, or one named column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRef {
    All,
    Named(String),
}

impl ColumnRef {
    pub fn named(name: impl Into<String>) -> Self {
        ColumnRef::Named(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ColumnRef::All => None,
            ColumnRef::Named(n) => Some(n),
        }
    }
}

/// `"*"` is the wildcard; any other text names a column.
impl From<&str> for ColumnRef {
    fn from(s: &str) -> Self {
        if s == "*" {
            ColumnRef::All
        } else {
            ColumnRef::Named(s.to_string())
        }
    }
}

impl From<String> for ColumnRef {
    fn from(s: String) -> Self {
        ColumnRef::from(s.as_str())
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::All => f.write_str("*"),
            ColumnRef::Named(n) => f.write_str(n),
        }
    }
}

/// Execution-scoped view of the active naming and resolution policy.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    source: &'a dyn RowSource,
    resolution: Resolution,
}

impl<'a> EvalContext<'a> {
    pub fn new(source: &'a dyn RowSource, resolution: Resolution) -> Self {
        Self { source, resolution }
    }

    pub fn lenient(source: &'a dyn RowSource) -> Self {
        Self::new(source, Resolution::Lenient)
    }

    pub fn source(&self) -> &'a dyn RowSource {
        self.source
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Raw lookup, independent of the policy.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.source.index_for_column_name(name)
    }

    /// Lookup that fails for unknown names under `Resolution::Strict`.
    pub fn resolve(&self, name: &str, clause: &'static str) -> Result<Option<usize>, OpError> {
        match self.lookup(name) {
            Some(i) => Ok(Some(i)),
            None if self.resolution.is_strict() => Err(OpError::UnknownColumn {
                name: name.to_string(),
                clause,
            }),
            None => Ok(None),
        }
    }
}

/// A projection term whose value depends on the whole row set.
pub trait Aggregate: Send + Sync + fmt::Debug {
    /// Header label, e.g. `count(*)`.
    fn label(&self) -> String;

    /// Evaluate once over every row handed to the projection.
    fn apply(&self, ctx: &EvalContext<'_>, rows: &[Value]) -> Result<Value, OpError>;

    /// Column names this aggregate reads, for validation at build time.
    fn referenced_columns(&self) -> Vec<&str> {
        Vec::new()
    }
}
