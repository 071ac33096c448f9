//! Filter operator: keeps the raw rows for which a predicate holds.
//!
//! The predicate reads columns by name through a `RowContext`, which is
//! created fresh for every row and dropped right after. The filter itself
//! holds no per-row state, so one `Filter` can be shared across queries and
//! threads.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use rinq_core::types::{Value, NULL};

use crate::traits::{EvalContext, OpError};

pub type PredicateFn = Arc<dyn Fn(&RowContext<'_>) -> bool + Send + Sync>;

/// One row's values, addressed by column name.
pub struct RowContext<'a> {
    row: &'a Value,
    ctx: EvalContext<'a>,
    missing: RefCell<Option<String>>,
}

impl<'a> RowContext<'a> {
    pub fn new(row: &'a Value, ctx: EvalContext<'a>) -> Self {
        Self {
            row,
            ctx,
            missing: RefCell::new(None),
        }
    }

    /// The raw row being evaluated.
    pub fn row(&self) -> &'a Value {
        self.row
    }

    /// Value of column `name` in this row; `null` when the name is unknown.
    pub fn get(&self, name: &str) -> &'a Value {
        match self.ctx.lookup(name) {
            Some(idx) => self.row.cell(idx),
            None => {
                let mut missing = self.missing.borrow_mut();
                if missing.is_none() {
                    *missing = Some(name.to_string());
                }
                &NULL
            }
        }
    }

    /// Like `get`, but reports unknown names regardless of the policy.
    pub fn try_get(&self, name: &str) -> Result<&'a Value, OpError> {
        self.ctx
            .lookup(name)
            .map(|idx| self.row.cell(idx))
            .ok_or_else(|| OpError::UnknownColumn {
                name: name.to_string(),
                clause: "filter",
            })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.ctx.lookup(name).is_some()
    }

    /// First unknown name looked up through `get`, if any.
    fn take_missing(&self) -> Option<String> {
        self.missing.borrow_mut().take()
    }
}

#[derive(Clone)]
pub struct Filter {
    predicate: PredicateFn,
    columns: Vec<String>,
}

impl Filter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&RowContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            columns: Vec::new(),
        }
    }

    /// Predicate returning a value; rows are kept when it is truthy.
    pub fn truthy<F>(predicate: F) -> Self
    where
        F: Fn(&RowContext<'_>) -> Value + Send + Sync + 'static,
    {
        Self::new(move |row| predicate(row).is_truthy())
    }

    /// Declare the columns the predicate reads so they can be validated
    /// when a strict query is built.
    pub fn reading<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn referenced_columns(&self) -> &[String] {
        &self.columns
    }

    /// Evaluate the predicate for a single row.
    pub fn matches(&self, ctx: &EvalContext<'_>, row: &Value) -> Result<bool, OpError> {
        let row_ctx = RowContext::new(row, *ctx);
        let keep = (self.predicate)(&row_ctx);
        if ctx.resolution().is_strict() {
            if let Some(name) = row_ctx.take_missing() {
                return Err(OpError::UnknownColumn {
                    name,
                    clause: "filter",
                });
            }
        }
        Ok(keep)
    }

    /// Rows of the context's source that satisfy the predicate, unprojected
    /// and in source order.
    pub fn apply(&self, ctx: &EvalContext<'_>) -> Result<Vec<Value>, OpError> {
        let rows = ctx.source().rows();
        let mut kept = Vec::new();
        for row in rows {
            if self.matches(ctx, row)? {
                kept.push(row.clone());
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(input = rows.len(), kept = kept.len(), "filtered rows");

        Ok(kept)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}
