//! Statistics layer: edition-over-edition deltas and group aggregation.

pub mod aggregate;
pub mod delta;

pub use aggregate::{aggregate_by, summary_stats};
pub use delta::{compute_deltas, DeltaRecord, Trend};
