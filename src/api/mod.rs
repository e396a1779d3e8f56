mod session;
mod source;

pub use session::{ComparisonSession, LoadSummary};
pub use source::{ComparisonSource, StaticComparisonSource};

#[cfg(feature = "http-source")]
pub use source::HttpComparisonSource;
