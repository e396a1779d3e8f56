use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::matrix::{AttributeRow, ComparisonMatrix};

// The number must start at the beginning of the text or after a character
// that cannot be part of a number, so `-5%`, `1,5%` and `1.2.5%` never
// yield a partial match.
static PERCENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d.,\-])(\d*\.?\d+)%").expect("percent pattern is a valid regex")
});

/// Extracts the first `<decimal>%` magnitude from a cell's display string.
///
/// Currency amounts and point multipliers are not recognized. Signed or
/// comma-grouped numbers are rejected rather than read in part.
#[must_use]
pub fn parse_magnitude(display: &str) -> Option<Decimal> {
    let captures = PERCENT_PATTERN.captures(display)?;
    let number = captures.get(1)?.as_str();
    if number.starts_with('.') {
        Decimal::from_str(&format!("0{number}")).ok()
    } else {
        Decimal::from_str(number).ok()
    }
}

/// Returns `row` with per-cell magnitudes and highlight marks recomputed.
///
/// Pure in the row's cell values: previous marks are ignored, so running it
/// twice yields the same result. Non-reward rows come back with no
/// magnitudes and no marks. Every cell equal to the largest positive
/// magnitude is marked, ties included.
#[must_use]
pub fn highlight_row(row: &AttributeRow) -> AttributeRow {
    let highlightable = row.kind.is_highlightable();
    let mut cells = row.cells.clone();
    for cell in &mut cells {
        cell.parsed_magnitude = if highlightable && cell.value.is_available() {
            parse_magnitude(cell.raw_display())
        } else {
            None
        };
        cell.is_highlighted = false;
    }

    let best = cells
        .iter()
        .filter_map(|cell| cell.parsed_magnitude)
        .filter(|magnitude| *magnitude > Decimal::ZERO)
        .max();

    if let Some(best) = best {
        for cell in &mut cells {
            cell.is_highlighted = cell.parsed_magnitude == Some(best);
        }
    }

    AttributeRow {
        kind: row.kind,
        key: row.key.clone(),
        label: row.label.clone(),
        cells,
    }
}

/// Applies `highlight_row` to every row, producing a fresh matrix.
#[must_use]
pub fn highlight_matrix(matrix: &ComparisonMatrix) -> ComparisonMatrix {
    ComparisonMatrix {
        columns: matrix.columns.clone(),
        rows: matrix.rows.iter().map(highlight_row).collect(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{highlight_row, parse_magnitude};
    use crate::core::matrix::{AttributeRow, Cell, CellValue, RowKind};

    fn row(kind: RowKind, values: &[Option<&str>]) -> AttributeRow {
        AttributeRow {
            kind,
            key: "k".to_owned(),
            label: "K".to_owned(),
            cells: values
                .iter()
                .enumerate()
                .map(|(index, value)| Cell {
                    row_key: "k".to_owned(),
                    card_id: format!("card-{index}"),
                    value: value.map_or(CellValue::Unavailable, |text| {
                        CellValue::Text(text.to_owned())
                    }),
                    parsed_magnitude: None,
                    is_highlighted: false,
                })
                .collect(),
        }
    }

    #[test]
    fn parses_percent_magnitudes_only() {
        assert_eq!(parse_magnitude("5.0%"), Some(Decimal::new(50, 1)));
        assert_eq!(parse_magnitude("Up to 10% back"), Some(Decimal::from(10)));
        assert_eq!(parse_magnitude("₹500"), None);
        assert_eq!(parse_magnitude("5x points"), None);
        assert_eq!(parse_magnitude("5 %"), None);
    }

    #[test]
    fn number_fragments_are_not_read_as_magnitudes() {
        assert_eq!(parse_magnitude(".5%"), Some(Decimal::new(5, 1)));
        assert_eq!(parse_magnitude("Earn .75% back"), Some(Decimal::new(75, 2)));
        assert_eq!(parse_magnitude("-5%"), None);
        assert_eq!(parse_magnitude("1,5%"), None);
        assert_eq!(parse_magnitude("1.2.5%"), None);
        assert_eq!(parse_magnitude("1,5% or 3%"), Some(Decimal::from(3)));
        assert_eq!(parse_magnitude("(2.5%)"), Some(Decimal::new(25, 1)));
    }

    #[test]
    fn leading_decimal_point_does_not_outrank_larger_value() {
        let marked = highlight_row(&row(RowKind::Category, &[Some(".5%"), Some("2%")]));
        assert_eq!(marked.cells[0].parsed_magnitude, Some(Decimal::new(5, 1)));
        assert_eq!(marked.highlighted_card_ids(), vec!["card-1"]);
    }

    #[test]
    fn highest_value_is_highlighted() {
        let marked = highlight_row(&row(RowKind::Category, &[Some("5.0%"), Some("3.0%")]));
        assert_eq!(marked.highlighted_card_ids(), vec!["card-0"]);
    }

    #[test]
    fn ties_are_all_highlighted() {
        let marked = highlight_row(&row(RowKind::Category, &[Some("4.0%"), Some("4%")]));
        assert_eq!(marked.highlighted_card_ids(), vec!["card-0", "card-1"]);
    }

    #[test]
    fn unavailable_cells_are_excluded() {
        let marked = highlight_row(&row(RowKind::Merchant, &[None, Some("2.5%")]));
        assert_eq!(marked.cells[0].parsed_magnitude, None);
        assert_eq!(marked.highlighted_card_ids(), vec!["card-1"]);
    }

    #[test]
    fn zero_and_non_numeric_rows_have_no_highlight() {
        let zero = highlight_row(&row(RowKind::Category, &[Some("0%"), Some("0.0%")]));
        assert!(zero.highlighted_card_ids().is_empty());

        let text = highlight_row(&row(RowKind::Merchant, &[Some("Lounge"), None]));
        assert!(text.highlighted_card_ids().is_empty());
    }

    #[test]
    fn fee_rows_are_never_highlighted() {
        let marked = highlight_row(&row(RowKind::Fee, &[Some("10%"), Some("1%")]));
        assert!(marked.highlighted_card_ids().is_empty());
        assert!(marked.cells.iter().all(|cell| cell.parsed_magnitude.is_none()));
    }

    #[test]
    fn stale_marks_are_cleared() {
        let mut input = row(RowKind::Category, &[Some("1%"), Some("2%")]);
        input.cells[0].is_highlighted = true;
        let marked = highlight_row(&input);
        assert_eq!(marked.highlighted_card_ids(), vec!["card-1"]);
        assert_eq!(highlight_row(&marked), marked);
    }
}
