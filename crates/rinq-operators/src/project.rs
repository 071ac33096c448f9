//! Projection: an ordered list of terms turning rows into header + data rows.
//!
//! Each term contributes zero or more cells to an output row:
//! - `*` spreads a list row (a scalar row becomes one cell)
//! - a named column reads one cell, spreading it when it is a list
//! - a computed value spreads a list result
//! - a literal is copied verbatim, never spread
//! - an aggregate is evaluated once and repeated on every row

use std::fmt;
use std::sync::Arc;

use rinq_core::types::{ResultSet, Value};

use crate::aggregate::Count;
use crate::traits::{Aggregate, ColumnRef, EvalContext, OpError};

/// Per-row computation for `Term::Computed`.
pub type ComputeFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Header label used for computed terms.
pub const COMPUTED_LABEL: &str = "lambda";

#[derive(Clone)]
pub enum Term {
    Column(ColumnRef),
    Literal(Value),
    Computed(ComputeFn),
    Aggregate(Arc<dyn Aggregate>),
}

impl Term {
    pub fn all() -> Self {
        Term::Column(ColumnRef::All)
    }

    /// Column reference; `"*"` is the wildcard.
    pub fn col(name: impl Into<ColumnRef>) -> Self {
        Term::Column(name.into())
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Term::Literal(value.into())
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Term::Computed(Arc::new(f))
    }

    pub fn count(target: impl Into<ColumnRef>) -> Self {
        Term::Aggregate(Arc::new(Count::new(target)))
    }

    pub fn aggregate(agg: impl Aggregate + 'static) -> Self {
        Term::Aggregate(Arc::new(agg))
    }

    pub fn label(&self) -> String {
        match self {
            Term::Column(c) => c.to_string(),
            Term::Literal(v) => v.to_string(),
            Term::Computed(_) => COMPUTED_LABEL.to_string(),
            Term::Aggregate(a) => a.label(),
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Column(c) => f.debug_tuple("Column").field(c).finish(),
            Term::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Term::Computed(_) => f.write_str("Computed(..)"),
            Term::Aggregate(a) => f.debug_tuple("Aggregate").field(a).finish(),
        }
    }
}

impl From<Count> for Term {
    fn from(c: Count) -> Self {
        Term::aggregate(c)
    }
}

/// Bare text is a column reference, so `"*"` selects every cell.
impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::col(name)
    }
}

impl From<ColumnRef> for Term {
    fn from(c: ColumnRef) -> Self {
        Term::Column(c)
    }
}

/// How one term fills its cells, resolved once per `apply`.
enum Step<'t> {
    Spread,
    Cell(Option<usize>),
    Computed(&'t ComputeFn),
    Literal(&'t Value),
    Fixed(Value),
}

#[derive(Debug, Clone, Default)]
pub struct Projection {
    terms: Vec<Term>,
}

impl Projection {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn header(&self) -> Vec<String> {
        self.terms.iter().map(Term::label).collect()
    }

    /// Named column references and aggregate targets, in term order.
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for term in &self.terms {
            match term {
                Term::Column(ColumnRef::Named(n)) => out.push(n.as_str()),
                Term::Aggregate(a) => out.extend(a.referenced_columns()),
                _ => {}
            }
        }
        out
    }

    /// Project `rows` (already filtered) into a result set.
    pub fn apply(&self, ctx: &EvalContext<'_>, rows: &[Value]) -> Result<ResultSet, OpError> {
        let mut steps = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            steps.push(match term {
                Term::Column(ColumnRef::All) => Step::Spread,
                Term::Column(ColumnRef::Named(name)) => Step::Cell(ctx.resolve(name, "projection")?),
                Term::Literal(v) => Step::Literal(v),
                Term::Computed(f) => Step::Computed(f),
                Term::Aggregate(a) => Step::Fixed(a.apply(ctx, rows)?),
            });
        }

        let mut result = ResultSet::new(self.header());
        result.rows.reserve(rows.len());
        let cap = ctx.source().width().max(steps.len());

        for row in rows {
            let mut cells = Vec::with_capacity(cap);
            for step in &steps {
                match step {
                    Step::Spread => row.clone().flatten_into(&mut cells),
                    Step::Cell(Some(idx)) => row.cell(*idx).clone().flatten_into(&mut cells),
                    Step::Cell(None) => cells.push(Value::Null),
                    Step::Computed(f) => f(row).flatten_into(&mut cells),
                    Step::Literal(v) => cells.push((*v).clone()),
                    Step::Fixed(v) => cells.push(v.clone()),
                }
            }
            result.rows.push(cells);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(terms = steps.len(), rows = result.rows.len(), "projected rows");

        Ok(result)
    }
}
