//! Fluent builder producing a `Query`.
//!
//! `select(terms).from(rows).filter_by(|r| ...).build()` is the typed stand-in
//! for declarative query authoring. Malformed authoring surfaces as
//! `rinq_core::Error::Builder`.

use std::sync::Arc;

use rinq_core::config::QueryConfig;
use rinq_core::source::{IntoSource, NamedDataSource, SharedSource, ANONYMOUS_COLUMN};
use rinq_core::Error;

use rinq_operators::traits::ColumnRef;
use rinq_operators::{Filter, Projection, RowContext, Term};

use crate::query::{ExecError, Query};

/// Start a builder with the given projection terms.
pub fn select<I, T>(terms: I) -> QueryBuilder
where
    I: IntoIterator<Item = T>,
    T: Into<Term>,
{
    QueryBuilder::new().select(terms)
}

#[derive(Debug, Default)]
pub struct QueryBuilder {
    terms: Vec<Term>,
    source: Option<SharedSource>,
    filter: Option<Filter>,
    config: QueryConfig,
    /// First clause given more than once, reported by `build`.
    duplicate: Option<&'static str>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append projection terms.
    pub fn select<I, T>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        self.terms.extend(terms.into_iter().map(Into::into));
        self
    }

    pub fn term(mut self, term: impl Into<Term>) -> Self {
        self.terms.push(term.into());
        self
    }

    /// Set the data source. A second call is reported by `build`.
    pub fn from(mut self, source: impl IntoSource) -> Self {
        if self.source.is_some() {
            self.duplicate = self.duplicate.or(Some("from(...)"));
        }
        self.source = Some(source.into_source());
        self
    }

    /// Set the filter. A second call is reported by `build`.
    pub fn filter(mut self, filter: Filter) -> Self {
        if self.filter.is_some() {
            self.duplicate = self.duplicate.or(Some("filter(...)"));
        }
        self.filter = Some(filter);
        self
    }

    pub fn filter_by<F>(self, predicate: F) -> Self
    where
        F: Fn(&RowContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.filter(Filter::new(predicate))
    }

    pub fn config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Query, ExecError> {
        if let Some(clause) = self.duplicate {
            return Err(Error::Builder(format!("{clause} given twice")).into());
        }
        if self.terms.is_empty() {
            return Err(Error::Builder("select requires at least one term".into()).into());
        }
        let source = self
            .source
            .ok_or_else(|| Error::Builder("select has no data source; call from(...)".into()))?;
        if self.terms.iter().any(is_empty_column) {
            return Err(Error::Builder("column references need a non-empty name".into()).into());
        }

        let source = if self.config.infer_column_names {
            infer_column_names(source, &self.terms)
        } else {
            source
        };

        let query = Query::from_parts(source, Projection::new(self.terms), self.filter, self.config);
        query.validate()?;
        Ok(query)
    }
}

fn is_empty_column(term: &Term) -> bool {
    matches!(term, Term::Column(ColumnRef::Named(n)) if n.is_empty())
}

/// Name an unnamed source's columns after the terms, slot by slot. Terms that
/// are not named column references take an anonymous slot. Sources with an
/// explicit naming are left alone, including an explicitly empty one.
fn infer_column_names(source: SharedSource, terms: &[Term]) -> SharedSource {
    let has_named = terms
        .iter()
        .any(|t| matches!(t, Term::Column(ColumnRef::Named(_))));
    if source.is_named() || !has_named {
        return source;
    }

    let names: Vec<String> = terms
        .iter()
        .map(|t| match t {
            Term::Column(ColumnRef::Named(n)) => n.clone(),
            _ => ANONYMOUS_COLUMN.to_string(),
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::trace!(columns = ?names, "inferred column names from projection");

    Arc::new(NamedDataSource::with_columns(source.all_rows(), names))
}
