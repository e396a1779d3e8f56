use card_compare::core::{AttributeRow, Cell, CellValue, RowKind, highlight_row};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// A cell display string paired with the magnitude it should parse to.
fn cell_value() -> impl Strategy<Value = (Option<String>, Option<Decimal>)> {
    prop_oneof![
        Just((None, None)),
        (0u32..200u32, 0u32..10u32).prop_map(|(whole, tenth)| (
            Some(format!("{whole}.{tenth}%")),
            Some(Decimal::new(i64::from(whole * 10 + tenth), 1)),
        )),
        (0u32..50u32).prop_map(|whole| (
            Some(format!("Up to {whole}% back")),
            Some(Decimal::from(whole)),
        )),
        (1u32..10u32).prop_map(|digit| (
            Some(format!(".{digit}%")),
            Some(Decimal::new(i64::from(digit), 1)),
        )),
        (1u32..50u32).prop_map(|whole| (Some(format!("-{whole}%")), None)),
        (1u32..9u32, 1u32..9u32)
            .prop_map(|(left, right)| (Some(format!("{left},{right}%")), None)),
        Just((Some("Lounge access".to_owned()), None)),
        (0u32..5000u32).prop_map(|amount| (Some(format!("₹{amount}")), None)),
    ]
}

fn reward_row(kind: RowKind, values: Vec<Option<String>>) -> AttributeRow {
    AttributeRow {
        kind,
        key: "reward".to_owned(),
        label: "Reward".to_owned(),
        cells: values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Cell {
                row_key: "reward".to_owned(),
                card_id: format!("card-{index}"),
                value: value.map_or(CellValue::Unavailable, CellValue::Text),
                parsed_magnitude: None,
                is_highlighted: false,
            })
            .collect(),
    }
}

proptest! {
    #[test]
    fn highlighted_set_equals_cells_at_positive_maximum(
        cases in prop::collection::vec(cell_value(), 1..12),
        merchant in any::<bool>(),
    ) {
        let kind = if merchant { RowKind::Merchant } else { RowKind::Category };
        let (values, magnitudes): (Vec<_>, Vec<_>) = cases.into_iter().unzip();
        let row = highlight_row(&reward_row(kind, values));

        let best = magnitudes
            .iter()
            .flatten()
            .copied()
            .filter(|magnitude| *magnitude > Decimal::ZERO)
            .max();

        for (cell, magnitude) in row.cells.iter().zip(&magnitudes) {
            let expected = best.is_some() && *magnitude == best;
            prop_assert_eq!(cell.is_highlighted, expected);
            prop_assert_eq!(cell.parsed_magnitude, *magnitude);
        }
    }

    #[test]
    fn highlighting_is_idempotent(cases in prop::collection::vec(cell_value(), 0..12)) {
        let values = cases.into_iter().map(|(value, _)| value).collect();
        let once = highlight_row(&reward_row(RowKind::Category, values));
        let twice = highlight_row(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn non_reward_rows_are_never_highlighted(
        cases in prop::collection::vec(cell_value(), 0..12),
        kind in prop_oneof![Just(RowKind::Fee), Just(RowKind::Lounge), Just(RowKind::FreeText)],
    ) {
        let values = cases.into_iter().map(|(value, _)| value).collect();
        let row = highlight_row(&reward_row(kind, values));
        prop_assert!(row.cells.iter().all(|cell| !cell.is_highlighted));
    }
}
