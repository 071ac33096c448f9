#![forbid(unsafe_code)]
//! rinq-exec: query orchestration and the builder surface.
//!
//! A `Query` owns a replaceable data source and an immutable projection and
//! filter. `exec` runs filter then projection synchronously and returns the
//! header + rows result. The `builder` module is the explicit, typed way of
//! authoring queries.

pub mod builder;
pub mod metrics;
pub mod query;

pub use builder::{select, QueryBuilder};
pub use metrics::ExecStats;
pub use query::{ExecError, Query};
