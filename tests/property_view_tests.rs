use card_compare::core::{
    ComparisonRecord, FilterState, MatrixBuildOptions, RowKind, SortDirection, SortKey, apply_view,
    build_comparison_matrix,
};
use proptest::prelude::*;

const BANKS: [&str; 3] = ["HDFC", "SBI", "Axis"];
const CATEGORIES: [&str; 4] = ["dining", "fuel", "travel", "online"];

#[derive(Debug, Clone)]
struct CardFixture {
    bank: usize,
    categories: Vec<(usize, u32)>,
    annual_fee: Option<u32>,
}

fn card_fixture() -> impl Strategy<Value = CardFixture> {
    (
        0..BANKS.len(),
        prop::collection::vec((0..CATEGORIES.len(), 0u32..12), 0..4),
        prop::option::of(0u32..5000),
    )
        .prop_map(|(bank, categories, annual_fee)| CardFixture {
            bank,
            categories,
            annual_fee,
        })
}

fn records(cards: &[CardFixture]) -> Vec<ComparisonRecord> {
    cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let mut record = ComparisonRecord::new(
                format!("card-{index}"),
                BANKS[card.bank],
                format!("Card {index}"),
            );
            for (category, percent) in &card.categories {
                record = record.with_category(CATEGORIES[*category], format!("{percent}%"));
            }
            if let Some(fee) = card.annual_fee {
                record = record.with_fees("Nil", format!("₹{fee}"));
            }
            record
        })
        .collect()
}

fn sort_direction(descending: bool) -> SortDirection {
    if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

proptest! {
    #[test]
    fn bank_filter_keeps_exactly_that_banks_cards(
        cards in prop::collection::vec(card_fixture(), 0..10),
        bank in 0..BANKS.len(),
    ) {
        let matrix = build_comparison_matrix(&records(&cards), &MatrixBuildOptions::default());
        let view = apply_view(&matrix, &FilterState::default().with_bank(BANKS[bank]));

        let expected: Vec<String> = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.bank == bank)
            .map(|(index, _)| format!("card-{index}"))
            .collect();
        prop_assert_eq!(view.card_ids(), expected.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(view.rows.len(), matrix.rows.len());
    }

    #[test]
    fn category_filter_keeps_cards_with_a_value_for_that_key(
        cards in prop::collection::vec(card_fixture(), 0..10),
        category in 0..CATEGORIES.len(),
    ) {
        let matrix = build_comparison_matrix(&records(&cards), &MatrixBuildOptions::default());
        let key = CATEGORIES[category];
        let view = apply_view(&matrix, &FilterState::default().with_category(key));

        let expected: Vec<String> = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.categories.iter().any(|(c, _)| *c == category))
            .map(|(index, _)| format!("card-{index}"))
            .collect();
        prop_assert_eq!(view.card_ids(), expected.iter().map(String::as_str).collect::<Vec<_>>());
        if let Some(row) = view.row(RowKind::Category, key) {
            prop_assert!(row.cells.iter().all(|cell| cell.value.is_available()));
        }
    }

    #[test]
    fn every_row_keeps_one_cell_per_visible_card(
        cards in prop::collection::vec(card_fixture(), 0..10),
        bank in 0..BANKS.len(),
        descending in any::<bool>(),
    ) {
        let matrix = build_comparison_matrix(&records(&cards), &MatrixBuildOptions::default());
        let direction = sort_direction(descending);
        let filter = FilterState::default()
            .with_bank(BANKS[bank])
            .sorted_by(SortKey::AnnualFee, direction);
        let view = apply_view(&matrix, &filter);

        for row in &view.rows {
            let ids: Vec<&str> = row.cells.iter().map(|cell| cell.card_id.as_str()).collect();
            prop_assert_eq!(&ids, &view.card_ids());
        }
    }

    #[test]
    fn cards_without_a_parsable_fee_sort_last(
        cards in prop::collection::vec(card_fixture(), 0..10),
        descending in any::<bool>(),
    ) {
        let matrix = build_comparison_matrix(&records(&cards), &MatrixBuildOptions::default());
        let filter =
            FilterState::default().sorted_by(SortKey::AnnualFee, sort_direction(descending));
        let view = apply_view(&matrix, &filter);

        let has_fee: Vec<bool> = view
            .card_ids()
            .iter()
            .map(|id| {
                let index: usize = id.trim_start_matches("card-").parse().unwrap();
                cards[index].annual_fee.is_some()
            })
            .collect();
        prop_assert!(has_fee.windows(2).all(|pair| pair[0] || !pair[1]));
    }
}

#[test]
fn reward_key_missing_everywhere_yields_no_columns() {
    let matrix = build_comparison_matrix(
        &[ComparisonRecord::new("a", "HDFC", "Regalia").with_category("dining", "5%")],
        &MatrixBuildOptions::default(),
    );
    let view = apply_view(&matrix, &FilterState::default().with_category("groceries"));
    assert_eq!(view.column_count(), 0);
}
