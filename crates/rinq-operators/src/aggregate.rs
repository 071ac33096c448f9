//! `count(*)` / `count(column)` over the filtered row set.
//!
//! There is no grouping: the count covers every row handed to the projection
//! and the same value is repeated on each output row.

use rinq_core::types::Value;

use crate::traits::{Aggregate, ColumnRef, EvalContext, OpError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count {
    target: ColumnRef,
}

impl Count {
    pub fn new(target: impl Into<ColumnRef>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn all() -> Self {
        Self::new(ColumnRef::All)
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::new(ColumnRef::Named(name.into()))
    }

    pub fn target(&self) -> &ColumnRef {
        &self.target
    }
}

impl Aggregate for Count {
    fn label(&self) -> String {
        format!("count({})", self.target)
    }

    fn apply(&self, ctx: &EvalContext<'_>, rows: &[Value]) -> Result<Value, OpError> {
        let name = match &self.target {
            ColumnRef::All => return Ok(Value::from(rows.len())),
            ColumnRef::Named(name) => name,
        };

        let Some(idx) = ctx.lookup(name) else {
            if ctx.resolution().is_strict() {
                return Err(OpError::AggregateTargetNotFound(name.clone()));
            }
            return Ok(Value::I64(0));
        };

        let n = rows.iter().filter(|row| !row.cell(idx).is_null()).count();
        Ok(Value::from(n))
    }

    fn referenced_columns(&self) -> Vec<&str> {
        self.target.name().into_iter().collect()
    }
}
