//! Display model implementations for table and JSON output
//!
//! Display models turn domain types into rows with CLI column names.

mod iteration;
mod metric;

pub use iteration::{FetchDisplay, IterationDisplay};
pub use metric::MetricDisplay;
