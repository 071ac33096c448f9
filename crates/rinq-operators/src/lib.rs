#![forbid(unsafe_code)]
//! rinq-operators: projection, filter and aggregate evaluation.
//!
//! Design intent:
//! - Pure and synchronous; operators never mutate the sources they read.
//! - Name resolution always goes through an `EvalContext`, which carries the
//!   active column naming and the lenient/strict policy.
//! - Projection and filter values are immutable once built so a query can
//!   share them across data rebindings.

pub mod aggregate;
pub mod filter;
pub mod project;
pub mod traits;

pub use aggregate::Count;
pub use filter::{Filter, RowContext};
pub use project::{Projection, Term};
pub use traits::{Aggregate, ColumnRef, EvalContext, OpError};
