//! Metrics/tracing hooks.
//!
//! Without the `tracing` feature every hook compiles to a no-op.

use serde::{Deserialize, Serialize};

/// Row counts and timing for one `exec` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecStats {
    /// Rows in the data source the call ran against.
    pub input_rows: usize,
    /// Rows left after the filter (equal to `input_rows` without one).
    pub kept_rows: usize,
    /// Data rows in the result (header excluded).
    pub output_rows: usize,
    pub elapsed_us: u64,
}

impl ExecStats {
    /// Fraction of input rows kept by the filter; 1.0 for an empty input.
    pub fn selectivity(&self) -> f64 {
        if self.input_rows == 0 {
            1.0
        } else {
            self.kept_rows as f64 / self.input_rows as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("rinq", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}

pub fn record_exec(stats: &ExecStats) {
    emit_span(
        "exec",
        &[
            ("input_rows", stats.input_rows.to_string()),
            ("kept_rows", stats.kept_rows.to_string()),
            ("output_rows", stats.output_rows.to_string()),
            ("elapsed_us", stats.elapsed_us.to_string()),
        ],
    );
}
