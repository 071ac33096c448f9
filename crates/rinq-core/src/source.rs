//! Data sources: an ordered row sequence plus (optionally) a column naming.
//!
//! Queries hold sources behind `Arc<dyn RowSource>` so rebinding data never
//! copies the projection or filter configuration.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::types::Value;

/// Shared, immutable handle to a data source.
pub type SharedSource = Arc<dyn RowSource>;

/// Name given to slots that no column reference can resolve to.
pub const ANONYMOUS_COLUMN: &str = "";

/// Row sequence with an inferred width and a name-to-index mapping.
pub trait RowSource: Send + Sync + fmt::Debug {
    fn rows(&self) -> &[Value];

    /// Maximum length among list rows; scalar-only sources report 0.
    fn width(&self) -> usize;

    /// Ordered column names, empty for an unnamed source.
    fn column_names(&self) -> &[String];

    /// True when the naming was given explicitly, even if it is empty.
    fn is_named(&self) -> bool {
        false
    }

    /// Position of `name` in the naming. `Some(0)` is a real column.
    fn index_for_column_name(&self, name: &str) -> Option<usize>;

    /// A fresh source of the same kind over `rows`, keeping this naming.
    fn rebind(&self, rows: Vec<Value>) -> SharedSource;

    fn len(&self) -> usize {
        self.rows().len()
    }

    fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    fn all_rows(&self) -> Vec<Value> {
        self.rows().to_vec()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSource {
    rows: Vec<Value>,
    width: usize,
}

impl DataSource {
    pub fn new(rows: Vec<Value>) -> Self {
        let width = rows.iter().map(Value::width).max().unwrap_or(0);
        Self { rows, width }
    }

    pub fn from_rows<I, T>(rows: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::new(rows.into_iter().map(Into::into).collect())
    }

    /// Parse a JSON array of rows, e.g. `[[1, 2], [3, 4]]` or `[1, 2, 3]`.
    pub fn from_json(text: &str) -> Result<Self> {
        let rows: Vec<Value> = serde_json::from_str(text)?;
        Ok(Self::new(rows))
    }

    pub fn into_rows(self) -> Vec<Value> {
        self.rows
    }
}

impl RowSource for DataSource {
    fn rows(&self) -> &[Value] {
        &self.rows
    }

    fn width(&self) -> usize {
        self.width
    }

    fn column_names(&self) -> &[String] {
        &[]
    }

    fn index_for_column_name(&self, _name: &str) -> Option<usize> {
        None
    }

    fn rebind(&self, rows: Vec<Value>) -> SharedSource {
        Arc::new(DataSource::new(rows))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedDataSource {
    inner: DataSource,
    column_names: Vec<String>,
}

impl NamedDataSource {
    pub fn with_columns<I, S>(rows: Vec<Value>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: DataSource::new(rows),
            column_names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json<I, S>(text: &str, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Value> = serde_json::from_str(text)?;
        Ok(Self::with_columns(rows, names))
    }
}

impl RowSource for NamedDataSource {
    fn rows(&self) -> &[Value] {
        self.inner.rows()
    }

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn is_named(&self) -> bool {
        true
    }

    fn index_for_column_name(&self, name: &str) -> Option<usize> {
        if name == ANONYMOUS_COLUMN {
            return None;
        }
        self.column_names.iter().position(|n| n == name)
    }

    fn rebind(&self, rows: Vec<Value>) -> SharedSource {
        Arc::new(NamedDataSource::with_columns(
            rows,
            self.column_names.iter().cloned(),
        ))
    }
}

/// Anything a query can read rows from.
pub trait IntoSource {
    fn into_source(self) -> SharedSource;
}

impl<T: Into<Value>> IntoSource for Vec<T> {
    fn into_source(self) -> SharedSource {
        Arc::new(DataSource::from_rows(self))
    }
}

impl IntoSource for DataSource {
    fn into_source(self) -> SharedSource {
        Arc::new(self)
    }
}

impl IntoSource for NamedDataSource {
    fn into_source(self) -> SharedSource {
        Arc::new(self)
    }
}

impl IntoSource for SharedSource {
    fn into_source(self) -> SharedSource {
        self
    }
}

/// Wrap rows or a source; wrapping an already shared source returns it as-is.
pub fn wrap(source: impl IntoSource) -> SharedSource {
    source.into_source()
}
