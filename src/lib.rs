#![forbid(unsafe_code)]
//! rinq: SQL-like queries over in-memory rows.
//!
//! Facade over the workspace crates:
//! - `rinq-core`: values, result sets, data sources, configuration
//! - `rinq-operators`: projection, filter, count
//! - `rinq-exec`: `Query` and the `select(...)` builder
//!
//! ```
//! use rinq::prelude::*;
//!
//! let rows = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
//! let query = select(["x", "z"])
//!     .from(NamedDataSource::with_columns(rows.into_iter().map(Value::from).collect(), ["x", "y", "z"]))
//!     .filter_by(|r| *r.get("x") > 1)
//!     .build()
//!     .unwrap();
//! let out = query.exec().unwrap();
//! assert_eq!(out.header, vec!["x", "z"]);
//! assert_eq!(out.len(), 2);
//! ```

pub use rinq_core::{config, source, types, Error, Result};
pub use rinq_exec::{metrics, select, ExecError, ExecStats, Query, QueryBuilder};
pub use rinq_operators::{
    Aggregate, ColumnRef, Count, EvalContext, Filter, OpError, Projection, RowContext, Term,
};

pub mod prelude {
    pub use rinq_core::prelude::*;
    pub use rinq_exec::{select, ExecError, Query, QueryBuilder};
    pub use rinq_operators::{Count, Filter, RowContext, Term};
}
