//! Row/cell values and the header + rows result shape.
//!
//! A row is itself a `Value`: either a scalar or a `List` of cells. Lists are
//! the only "sequence-like" values; projection flattens them, filters keep
//! them untouched.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A cell or a row.
///
/// `Display` gives the header label for literal terms: null is empty, floats
/// keep a `.0`, and lists render as `[1, "a", null]` with nested strings
/// quoted and nested nulls spelled `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Build a `List` from anything convertible into values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Parse a single JSON document into a value.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Everything except `Null` and `false` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(i) => Some(*i as f64),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Number of cells when this value is a row: list length, 0 for scalars.
    pub fn width(&self) -> usize {
        self.as_list().map_or(0, <[Value]>::len)
    }

    /// Cell at `index` when this value is used as a row.
    ///
    /// Lists yield their element (or `Null` past the end). A scalar row acts
    /// as a one-column row: index 0 is the scalar itself.
    pub fn cell(&self, index: usize) -> &Value {
        match self {
            Value::List(items) => items.get(index).unwrap_or(&NULL),
            scalar if index == 0 => scalar,
            _ => &NULL,
        }
    }

    /// Append `self` to `out`, spreading list elements into separate cells.
    pub fn flatten_into(self, out: &mut Vec<Value>) {
        match self {
            Value::List(items) => out.extend(items),
            other => out.push(other),
        }
    }
}

/// Shared null returned for absent cells and unresolved names.
pub static NULL: Value = Value::Null;

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (F64(a), F64(b)) => a == b,
            (I64(a), F64(b)) | (F64(b), I64(a)) => (*a as f64) == *b,
            (Str(a), Str(b)) => a == b,
            (List(a), List(b)) => a == b,
            _ => false,
        }
    }
}

/// Integers and floats compare numerically; any other mixed pair is unordered,
/// so every ordering operator involving `Null` and a non-null value is false.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Bool(a), Bool(b)) => a.partial_cmp(b),
            (I64(a), I64(b)) => a.partial_cmp(b),
            (F64(a), F64(b)) => a.partial_cmp(b),
            (I64(a), F64(b)) => (*a as f64).partial_cmp(b),
            (F64(a), I64(b)) => a.partial_cmp(&(*b as f64)),
            (Str(a), Str(b)) => a.partial_cmp(b),
            (List(a), List(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        *self == Value::I64(*other)
    }
}

impl PartialOrd<i64> for Value {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        self.partial_cmp(&Value::I64(*other))
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        *self == Value::I64((*other).into())
    }
}

impl PartialOrd<i32> for Value {
    fn partial_cmp(&self, other: &i32) -> Option<Ordering> {
        self.partial_cmp(&Value::I64((*other).into()))
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        *self == Value::F64(*other)
    }
}

impl PartialOrd<f64> for Value {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.partial_cmp(&Value::F64(*other))
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Value::Str(s) if s == other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::I64(i) => write!(f, "{i}"),
            Value::F64(v) => fmt_float(*v, f),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Value::Null => f.write_str("null")?,
                        Value::Str(s) => write!(f, "{s:?}")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}

fn fmt_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_finite() && v.fract() == 0.0 {
        write!(f, "{v:.1}")
    } else {
        write!(f, "{v}")
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I64(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::I64(v.into())
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::I64(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}

/// Output of a query: one text label per projection term, then data rows.
///
/// Data rows may be wider than the header because list cells are flattened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `[header, ...rows]` with header labels as `Value::Str`.
    pub fn to_rows(&self) -> Vec<Vec<Value>> {
        self.clone().into_rows()
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.header.into_iter().map(Value::Str).collect());
        out.extend(self.rows);
        out
    }

    /// Serialize the `[header, ...rows]` shape as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_rows())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_lookup_on_lists_and_scalars() {
        let row = Value::from(vec![1, 2, 3]);
        assert_eq!(row.cell(0), &Value::I64(1));
        assert_eq!(row.cell(2), &Value::I64(3));
        assert!(row.cell(3).is_null());

        let scalar = Value::from(7);
        assert_eq!(scalar.cell(0), &Value::I64(7));
        assert!(scalar.cell(1).is_null());
    }

    #[test]
    fn null_is_unordered_against_values() {
        assert!(!(Value::Null > 1));
        assert!(!(Value::Null < 1));
        assert!(Value::Null != 1);
        assert!(Value::from(4) > 1);
        assert!(Value::from(2.5) > 2);
        assert_eq!(Value::from(2), Value::from(2.0));
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::from(0).is_truthy());
        assert!(Value::from("").is_truthy());
    }

    #[test]
    fn display_renders_labels() {
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from(2.0).to_string(), "2.0");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::Null.to_string(), "");
        let mixed = Value::List(vec![Value::from(1), Value::from("a"), Value::Null]);
        assert_eq!(mixed.to_string(), "[1, \"a\", null]");
        let nested = Value::list([Value::Null, Value::from(vec![Value::Null])]);
        assert_eq!(nested.to_string(), "[null, [null]]");
    }

    #[test]
    fn parses_rows_from_json() {
        let v = Value::from_json(r#"[[1, 2.5, "x"], 4, null]"#).unwrap();
        let rows = v.as_list().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cell(1), &Value::F64(2.5));
        assert_eq!(rows[0].cell(2), &Value::from("x"));
        assert_eq!(rows[1], Value::I64(4));
        assert!(rows[2].is_null());
    }

    #[test]
    fn result_set_shape() {
        let mut rs = ResultSet::new(vec!["*".into()]);
        rs.rows.push(vec![Value::from(1), Value::from(2)]);
        assert_eq!(rs.len(), 1);
        assert_eq!(
            rs.to_rows(),
            vec![vec![Value::from("*")], vec![Value::from(1), Value::from(2)]]
        );
        assert_eq!(rs.to_json().unwrap(), r#"[["*"],[1,2]]"#);
    }
}
