//! card-compare: credit-card comparison matrix and export engine.
//!
//! Raw per-card reward payloads are normalized, unified into a dense
//! attribute-by-card matrix, annotated with best-value highlights, filtered
//! for display and rendered into a branded PNG.

pub mod api;
pub mod core;
pub mod error;
pub mod export;
pub mod render;
pub mod telemetry;

pub use api::{ComparisonSession, ComparisonSource};
pub use error::{CompareError, CompareResult};
