use approx::assert_relative_eq;
use card_compare::export::{ColumnLayout, ExportConfig, TextMetrics};
use proptest::prelude::*;

proptest! {
    #[test]
    fn card_columns_fill_the_space_beside_the_label_column(
        card_count in 1usize..24,
        canvas in 800.0f64..2400.0,
        label in 120.0f64..320.0,
        padding in 0.0f64..80.0,
    ) {
        let config = ExportConfig {
            canvas_width_px: canvas,
            label_column_width_px: label,
            horizontal_padding_px: padding,
            ..ExportConfig::default()
        };
        let layout = ColumnLayout::compute(&config, card_count);

        assert_relative_eq!(
            layout.column_width * card_count as f64,
            canvas - label - padding,
            max_relative = 1e-9
        );
        assert_relative_eq!(layout.table_right(), canvas - padding / 2.0, max_relative = 1e-9);
        for index in 1..card_count {
            prop_assert!(layout.column_left(index) > layout.column_left(index - 1));
        }
    }

    #[test]
    fn wrapped_lines_respect_the_line_budget_and_width(
        words in prop::collection::vec("[a-z]{1,18}", 1..30),
        max_width in 40.0f64..300.0,
        max_lines in 1usize..6,
    ) {
        let metrics = TextMetrics::from_config(&ExportConfig::default());
        let text = words.join(" ");
        let lines = metrics.wrap(&text, max_width, 14.0, max_lines);

        prop_assert!(!lines.is_empty());
        prop_assert!(lines.len() <= max_lines);
        for line in &lines {
            prop_assert!(metrics.text_width(line, 14.0) <= max_width + 1e-9);
        }
    }
}

#[test]
fn empty_column_set_keeps_the_label_column_only() {
    let config = ExportConfig::default();
    let layout = ColumnLayout::compute(&config, 0);
    assert_eq!(layout.column_width, 0.0);
    assert_relative_eq!(layout.table_width(), config.label_column_width_px);
}
