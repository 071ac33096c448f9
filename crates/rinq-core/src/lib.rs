#![forbid(unsafe_code)]
//! rinq-core: values, result sets, data sources and configuration.
//!
//! Pure data; no execution and no logging here. The operator crate evaluates
//! projections and filters over the `RowSource` trait defined in `source`.

pub mod config;
pub mod error;
pub mod prelude;
pub mod source;
pub mod types;

pub use error::{Error, Result};
