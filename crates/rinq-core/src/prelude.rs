//! Convenient re-exports for downstream crates.

pub use crate::config::{QueryConfig, Resolution};
pub use crate::error::{Error, Result};
pub use crate::source::{wrap, DataSource, IntoSource, NamedDataSource, RowSource, SharedSource};
pub use crate::types::{ResultSet, Value};
