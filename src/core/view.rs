use std::cmp::Ordering;

use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::highlight::highlight_matrix;
use super::matrix::{ANNUAL_FEE_KEY, CardColumn, ComparisonMatrix, RowKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Keeps the order in which the data source returned the cards.
    #[default]
    Source,
    DisplayName,
    BankName,
    AnnualFee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Explicit filter/sort input for `apply_view`.
///
/// Active filters compose with AND. `user_cards_only` is a data-fetch
/// parameter; it is carried here so a session can detect when it changes,
/// but `apply_view` does not filter on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub search: String,
    pub bank: Option<String>,
    pub category: Option<String>,
    pub tier: Option<String>,
    pub user_cards_only: bool,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl FilterState {
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_bank(mut self, bank: impl Into<String>) -> Self {
        self.bank = Some(bank.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, key: impl Into<String>) -> Self {
        self.category = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    #[must_use]
    pub fn with_user_cards_only(mut self, user_cards_only: bool) -> Self {
        self.user_cards_only = user_cards_only;
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.sort_direction = direction;
        self
    }
}

/// Distinct values available to the select controls, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub banks: Vec<String>,
    pub tiers: Vec<String>,
    pub reward_keys: Vec<String>,
}

impl FilterOptions {
    #[must_use]
    pub fn from_matrix(matrix: &ComparisonMatrix) -> Self {
        let banks: IndexSet<&str> = matrix
            .columns
            .iter()
            .map(|column| column.bank_name.as_str())
            .filter(|bank| !bank.is_empty())
            .collect();
        let tiers: IndexSet<&str> = matrix
            .columns
            .iter()
            .filter_map(|column| column.tier.as_deref())
            .collect();
        let reward_keys: IndexSet<&str> = matrix
            .rows
            .iter()
            .filter(|row| row.kind.is_highlightable())
            .map(|row| row.key.as_str())
            .collect();

        Self {
            banks: banks.into_iter().map(str::to_owned).collect(),
            tiers: tiers.into_iter().map(str::to_owned).collect(),
            reward_keys: reward_keys.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// Selects and orders the visible card columns for `filter`.
///
/// Rows are kept as they are; only columns are hidden. Highlight marks are
/// recomputed over the visible columns, so the result is a fresh matrix.
#[must_use]
pub fn apply_view(matrix: &ComparisonMatrix, filter: &FilterState) -> ComparisonMatrix {
    let visible = visible_indices(matrix, filter);
    debug!(
        total = matrix.columns.len(),
        visible = visible.len(),
        sort_key = ?filter.sort_key,
        "applied comparison view"
    );
    highlight_matrix(&matrix.select_columns(&visible))
}

/// Source indices of the matching columns, in display order.
fn visible_indices(matrix: &ComparisonMatrix, filter: &FilterState) -> Vec<usize> {
    let search = filter.search.trim().to_lowercase();
    let mut visible: Vec<usize> = (0..matrix.columns.len())
        .filter(|&index| column_matches(matrix, index, filter, &search))
        .collect();
    sort_columns(matrix, &mut visible, filter.sort_key, filter.sort_direction);
    visible
}

fn column_matches(
    matrix: &ComparisonMatrix,
    index: usize,
    filter: &FilterState,
    search: &str,
) -> bool {
    let column = &matrix.columns[index];

    if !search.is_empty()
        && !column.display_name.to_lowercase().contains(search)
        && !column.bank_name.to_lowercase().contains(search)
    {
        return false;
    }

    if let Some(bank) = filter.bank.as_deref().filter(|bank| !bank.is_empty()) {
        if column.bank_name != bank {
            return false;
        }
    }

    if let Some(tier) = filter.tier.as_deref().filter(|tier| !tier.is_empty()) {
        let matches = column
            .tier
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(tier));
        if !matches {
            return false;
        }
    }

    if let Some(key) = filter.category.as_deref().filter(|key| !key.is_empty()) {
        let present = matrix.rows.iter().any(|row| {
            row.kind.is_highlightable()
                && row.key == key
                && row.cells[index].value.is_available()
        });
        if !present {
            return false;
        }
    }

    true
}

fn sort_columns(
    matrix: &ComparisonMatrix,
    visible: &mut [usize],
    key: SortKey,
    direction: SortDirection,
) {
    match key {
        SortKey::Source => {}
        SortKey::DisplayName => visible.sort_by(|&a, &b| {
            directed(
                compare_text(&matrix.columns[a].display_name, &matrix.columns[b].display_name),
                direction,
            )
        }),
        SortKey::BankName => visible.sort_by(|&a, &b| {
            directed(
                compare_text(&matrix.columns[a].bank_name, &matrix.columns[b].bank_name),
                direction,
            )
        }),
        SortKey::AnnualFee => {
            let fee_row = matrix.row(RowKind::Fee, ANNUAL_FEE_KEY);
            let fees: Vec<Option<OrderedFloat<f64>>> = match fee_row {
                Some(row) => row
                    .cells
                    .iter()
                    .map(|cell| parse_fee_amount(cell.raw_display()).map(OrderedFloat))
                    .collect(),
                None => vec![None; matrix.columns.len()],
            };
            visible.sort_by(|&a, &b| match (fees[a], fees[b]) {
                (Some(left), Some(right)) => directed(left.cmp(&right), direction),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

/// Reads a fee display string as a number: `"₹1,499 + GST"` -> 1499,
/// `"Free"`/`"Nil"` -> 0. Unparsable fees sort last in either direction.
fn parse_fee_amount(display: &str) -> Option<f64> {
    let lowered = display.trim().to_lowercase();
    if ["free", "nil", "lifetime free"].iter().any(|prefix| lowered.starts_with(prefix)) {
        return Some(0.0);
    }

    let digits: String = display
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();
    digits.parse::<f64>().ok()
}

/// Columns in `matrix` that `apply_view` would show, in the same order,
/// without building the filtered matrix. Used by list views that only need the card identities.
#[must_use]
pub fn visible_columns<'a>(
    matrix: &'a ComparisonMatrix,
    filter: &FilterState,
) -> Vec<&'a CardColumn> {
    visible_indices(matrix, filter)
        .into_iter()
        .map(|index| &matrix.columns[index])
        .collect()
}
