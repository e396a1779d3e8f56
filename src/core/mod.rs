pub mod highlight;
pub mod matrix;
pub mod record;
pub mod schema;
pub mod view;

pub use highlight::{highlight_matrix, highlight_row, parse_magnitude};
pub use matrix::{
    ADDITIONAL_INFO_KEY, ANNUAL_FEE_KEY, AttributeRow, CardColumn, Cell, CellValue,
    ComparisonMatrix, JOINING_FEE_KEY, LOUNGE_SPEND_KEY, LOUNGE_VISITS_KEY, MatrixBuildOptions,
    RowKind, UNAVAILABLE_MARKER, build_comparison_matrix, build_matrix, format_amount,
    humanize_key,
};
pub use record::{ComparisonRecord, NormalizedBatch, normalize_batch, normalize_record};
pub use schema::{UnifiedSchema, unify_keys};
pub use view::{
    FilterOptions, FilterState, SortDirection, SortKey, apply_view, visible_columns,
};
