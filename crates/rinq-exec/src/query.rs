//! Query: a data source plus a fixed projection and optional filter.
//!
//! Execution:
//! - `exec` filters the stored source (when a filter is present) and projects
//!   the kept rows; `exec_on` does the same over transient rows.
//! - Projection and filter are shared behind `Arc`s, so `with_new_data` and
//!   `clone` never copy them.
//! - Rebinding rows keeps the current column naming; `with_source` /
//!   `set_source` swap the naming as well.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use rinq_core::config::QueryConfig;
use rinq_core::source::{IntoSource, RowSource, SharedSource};
use rinq_core::types::{ResultSet, Value};

use rinq_operators::traits::{ColumnRef, EvalContext, OpError};
use rinq_operators::{Filter, Projection, Term};

use crate::metrics::{record_exec, ExecStats};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("operator exec: {0}")]
    Operator(#[from] OpError),
    #[error(transparent)]
    Core(#[from] rinq_core::Error),
}

#[derive(Debug, Clone)]
pub struct Query {
    source: SharedSource,
    projection: Arc<Projection>,
    filter: Option<Arc<Filter>>,
    config: QueryConfig,
}

impl Query {
    /// Lenient query with the default configuration. Never fails to build.
    pub fn new(terms: Vec<Term>, source: impl IntoSource, filter: Option<Filter>) -> Self {
        Self::from_parts(
            source.into_source(),
            Projection::new(terms),
            filter,
            QueryConfig::default(),
        )
    }

    /// Query under `config`; strict configs validate every referenced column
    /// against the source naming here.
    pub fn with_config(
        terms: Vec<Term>,
        source: impl IntoSource,
        filter: Option<Filter>,
        config: QueryConfig,
    ) -> Result<Self, ExecError> {
        let query = Self::from_parts(source.into_source(), Projection::new(terms), filter, config);
        query.validate()?;
        Ok(query)
    }

    pub(crate) fn from_parts(
        source: SharedSource,
        projection: Projection,
        filter: Option<Filter>,
        config: QueryConfig,
    ) -> Self {
        Self {
            source,
            projection: Arc::new(projection),
            filter: filter.map(Arc::new),
            config,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ExecError> {
        if !self.config.resolution.is_strict() {
            return Ok(());
        }

        let known = |name: &str| self.source.index_for_column_name(name).is_some();

        for term in self.projection.terms() {
            match term {
                Term::Column(ColumnRef::Named(name)) if !known(name.as_str()) => {
                    return Err(OpError::UnknownColumn {
                        name: name.clone(),
                        clause: "projection",
                    }
                    .into());
                }
                Term::Aggregate(agg) => {
                    if let Some(name) = agg.referenced_columns().into_iter().find(|n| !known(*n)) {
                        return Err(OpError::AggregateTargetNotFound(name.to_string()).into());
                    }
                }
                _ => {}
            }
        }

        if let Some(filter) = &self.filter {
            if let Some(name) = filter.referenced_columns().iter().find(|n| !known(n.as_str())) {
                return Err(OpError::UnknownColumn {
                    name: name.clone(),
                    clause: "filter",
                }
                .into());
            }
        }

        Ok(())
    }

    /// Run against the stored data source.
    pub fn exec(&self) -> Result<ResultSet, ExecError> {
        self.run(&*self.source).map(|(result, _)| result)
    }

    /// Run against `rows` for this call only; the stored source is untouched.
    pub fn exec_on<T: Into<Value>>(&self, rows: Vec<T>) -> Result<ResultSet, ExecError> {
        let transient = self.source.rebind(into_values(rows));
        self.run(&*transient).map(|(result, _)| result)
    }

    pub fn exec_with_stats(&self) -> Result<(ResultSet, ExecStats), ExecError> {
        self.run(&*self.source)
    }

    /// Raw rows kept by the filter (all rows without one), unprojected.
    pub fn filtered_rows(&self) -> Result<Vec<Value>, ExecError> {
        let ctx = EvalContext::new(&*self.source, self.config.resolution);
        Ok(self.select_rows(&ctx)?.into_owned())
    }

    /// New query over `rows` sharing this projection and filter.
    pub fn with_new_data<T: Into<Value>>(&self, rows: Vec<T>) -> Query {
        self.with_source(self.source.rebind(into_values(rows)))
    }

    /// New query over `source`, replacing the naming too.
    pub fn with_source(&self, source: impl IntoSource) -> Query {
        Query {
            source: source.into_source(),
            projection: Arc::clone(&self.projection),
            filter: self.filter.clone(),
            config: self.config.clone(),
        }
    }

    /// Replace this query's rows in place, keeping the naming.
    pub fn set_data_source<T: Into<Value>>(&mut self, rows: Vec<T>) {
        let source = self.source.rebind(into_values(rows));
        self.set_source(source);
    }

    /// Replace this query's source (rows and naming) in place.
    pub fn set_source(&mut self, source: impl IntoSource) {
        self.source = source.into_source();

        #[cfg(feature = "tracing")]
        tracing::debug!(rows = self.source.len(), "rebound query data source");
    }

    pub fn data_source(&self) -> &dyn RowSource {
        &*self.source
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_deref()
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// True when both queries use the very same projection and filter.
    pub fn shares_plan_with(&self, other: &Query) -> bool {
        let same_filter = match (&self.filter, &other.filter) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        Arc::ptr_eq(&self.projection, &other.projection) && same_filter
    }

    fn select_rows<'s>(&self, ctx: &EvalContext<'s>) -> Result<Cow<'s, [Value]>, ExecError> {
        Ok(match &self.filter {
            Some(filter) => Cow::Owned(filter.apply(ctx)?),
            None => Cow::Borrowed(ctx.source().rows()),
        })
    }

    fn run(&self, source: &dyn RowSource) -> Result<(ResultSet, ExecStats), ExecError> {
        let started = Instant::now();
        let ctx = EvalContext::new(source, self.config.resolution);

        let rows = self.select_rows(&ctx)?;
        let result = self.projection.apply(&ctx, &rows)?;

        let stats = ExecStats {
            input_rows: source.len(),
            kept_rows: rows.len(),
            output_rows: result.len(),
            elapsed_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        record_exec(&stats);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            input = stats.input_rows,
            kept = stats.kept_rows,
            terms = self.projection.terms().len(),
            "executed query"
        );

        Ok((result, stats))
    }
}

fn into_values<T: Into<Value>>(rows: Vec<T>) -> Vec<Value> {
    rows.into_iter().map(Into::into).collect()
}
