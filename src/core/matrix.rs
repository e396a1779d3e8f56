use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::highlight::highlight_matrix;
use super::schema::{UnifiedSchema, unify_keys};
use super::ComparisonRecord;

/// Placeholder shown when a card lacks an attribute; distinct from zero.
pub const UNAVAILABLE_MARKER: &str = "-";

pub const JOINING_FEE_KEY: &str = "joining_fee";
pub const ANNUAL_FEE_KEY: &str = "annual_fee";
pub const LOUNGE_VISITS_KEY: &str = "lounge_visits";
pub const LOUNGE_SPEND_KEY: &str = "lounge_spend";
pub const ADDITIONAL_INFO_KEY: &str = "additional_info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    Fee,
    Lounge,
    Category,
    Merchant,
    FreeText,
}

impl RowKind {
    /// Only reward rows take part in best-value highlighting.
    #[must_use]
    pub fn is_highlightable(self) -> bool {
        matches!(self, Self::Category | Self::Merchant)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "text")]
pub enum CellValue {
    Unavailable,
    Text(String),
}

impl CellValue {
    fn from_option(value: Option<String>) -> Self {
        value.map_or(Self::Unavailable, Self::Text)
    }

    #[must_use]
    pub fn display(&self) -> &str {
        match self {
            Self::Unavailable => UNAVAILABLE_MARKER,
            Self::Text(text) => text,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub row_key: String,
    pub card_id: String,
    pub value: CellValue,
    pub parsed_magnitude: Option<Decimal>,
    pub is_highlighted: bool,
}

impl Cell {
    #[must_use]
    pub fn raw_display(&self) -> &str {
        self.value.display()
    }
}

/// One horizontal line of the comparison table; one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRow {
    pub kind: RowKind,
    pub key: String,
    pub label: String,
    pub cells: Vec<Cell>,
}

impl AttributeRow {
    #[must_use]
    pub fn cell_for(&self, card_id: &str) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.card_id == card_id)
    }

    #[must_use]
    pub fn highlighted_card_ids(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|cell| cell.is_highlighted)
            .map(|cell| cell.card_id.as_str())
            .collect()
    }
}

/// Identity of one card column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardColumn {
    pub id: String,
    pub display_name: String,
    pub bank_name: String,
    pub tier: Option<String>,
}

/// Dense comparison table: rows are attributes, columns are cards.
///
/// Never mutated in place: filtering, sorting and highlighting each return a
/// fresh matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMatrix {
    pub columns: Vec<CardColumn>,
    pub rows: Vec<AttributeRow>,
}

impl ComparisonMatrix {
    #[must_use]
    pub fn card_ids(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.id.as_str()).collect()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn row(&self, kind: RowKind, key: &str) -> Option<&AttributeRow> {
        self.rows
            .iter()
            .find(|row| row.kind == kind && row.key == key)
    }

    pub fn rows_of_kind(&self, kind: RowKind) -> impl Iterator<Item = &AttributeRow> {
        self.rows.iter().filter(move |row| row.kind == kind)
    }

    /// Returns a new matrix holding only the columns at `indices`, in that order.
    ///
    /// Row set and row order are preserved; highlight marks are copied as-is.
    #[must_use]
    pub fn select_columns(&self, indices: &[usize]) -> Self {
        let columns = indices
            .iter()
            .filter_map(|&index| self.columns.get(index).cloned())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| AttributeRow {
                kind: row.kind,
                key: row.key.clone(),
                label: row.label.clone(),
                cells: indices
                    .iter()
                    .filter_map(|&index| row.cells.get(index).cloned())
                    .collect(),
            })
            .collect();
        Self { columns, rows }
    }
}

/// Host-tunable presentation of the fixed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixBuildOptions {
    pub currency_symbol: String,
    pub joining_fee_label: String,
    pub annual_fee_label: String,
    pub lounge_visits_label: String,
    pub lounge_spend_label: String,
    pub additional_info_label: String,
}

impl Default for MatrixBuildOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_owned(),
            joining_fee_label: "Joining Fee".to_owned(),
            annual_fee_label: "Annual Fee".to_owned(),
            lounge_visits_label: "Lounge Visits".to_owned(),
            lounge_spend_label: "Lounge Spend Threshold".to_owned(),
            additional_info_label: "Additional Info".to_owned(),
        }
    }
}

/// Assembles the matrix without highlight marks.
///
/// Row order is fixed: joining fee, annual fee, lounge visits, lounge spend,
/// one row per category key, one row per merchant key, free text last.
#[must_use]
pub fn build_matrix(
    records: &[ComparisonRecord],
    schema: &UnifiedSchema,
    options: &MatrixBuildOptions,
) -> ComparisonMatrix {
    let columns = records
        .iter()
        .map(|record| CardColumn {
            id: record.id.clone(),
            display_name: record.display_name.clone(),
            bank_name: record.bank_name.clone(),
            tier: record.tier.clone(),
        })
        .collect();

    let mut rows = Vec::with_capacity(5 + schema.category_keys.len() + schema.merchant_keys.len());
    rows.push(build_row(
        records,
        RowKind::Fee,
        JOINING_FEE_KEY,
        &options.joining_fee_label,
        |record| record.joining_fee.clone(),
    ));
    rows.push(build_row(
        records,
        RowKind::Fee,
        ANNUAL_FEE_KEY,
        &options.annual_fee_label,
        annual_fee_display,
    ));
    rows.push(build_row(
        records,
        RowKind::Lounge,
        LOUNGE_VISITS_KEY,
        &options.lounge_visits_label,
        |record| record.lounge_visits.map(|visits| visits.to_string()),
    ));
    rows.push(build_row(
        records,
        RowKind::Lounge,
        LOUNGE_SPEND_KEY,
        &options.lounge_spend_label,
        |record| {
            record
                .lounge_spend_threshold
                .map(|amount| format_amount(amount, &options.currency_symbol))
        },
    ));
    for key in &schema.category_keys {
        rows.push(build_row(
            records,
            RowKind::Category,
            key,
            &humanize_key(key),
            |record| record.categories.get(key).cloned(),
        ));
    }
    for key in &schema.merchant_keys {
        rows.push(build_row(
            records,
            RowKind::Merchant,
            key,
            &humanize_key(key),
            |record| record.merchants.get(key).cloned(),
        ));
    }
    rows.push(build_row(
        records,
        RowKind::FreeText,
        ADDITIONAL_INFO_KEY,
        &options.additional_info_label,
        |record| record.additional_info.clone(),
    ));

    debug!(
        columns = records.len(),
        rows = rows.len(),
        categories = schema.category_keys.len(),
        merchants = schema.merchant_keys.len(),
        "built comparison matrix"
    );
    ComparisonMatrix { columns, rows }
}

/// Unifies keys, builds the matrix and applies highlight marks.
#[must_use]
pub fn build_comparison_matrix(
    records: &[ComparisonRecord],
    options: &MatrixBuildOptions,
) -> ComparisonMatrix {
    let schema = unify_keys(records);
    highlight_matrix(&build_matrix(records, &schema, options))
}

fn build_row(
    records: &[ComparisonRecord],
    kind: RowKind,
    key: &str,
    label: &str,
    value_of: impl Fn(&ComparisonRecord) -> Option<String>,
) -> AttributeRow {
    AttributeRow {
        kind,
        key: key.to_owned(),
        label: label.to_owned(),
        cells: records
            .iter()
            .map(|record| Cell {
                row_key: key.to_owned(),
                card_id: record.id.clone(),
                value: CellValue::from_option(value_of(record)),
                parsed_magnitude: None,
                is_highlighted: false,
            })
            .collect(),
    }
}

fn annual_fee_display(record: &ComparisonRecord) -> Option<String> {
    match (&record.annual_fee, &record.annual_fee_waiver) {
        (Some(fee), Some(waiver)) => Some(format!("{fee} ({waiver})")),
        (Some(fee), None) => Some(fee.clone()),
        (None, _) => None,
    }
}

/// Formats a non-negative amount with thousands separators, e.g. `₹100,000`.
#[must_use]
pub fn format_amount(amount: Decimal, currency_symbol: &str) -> String {
    let text = amount.normalize().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (position, digit) in whole.chars().enumerate() {
        if position > 0 && (whole.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{currency_symbol}{grouped}.{fraction}"),
        None => format!("{currency_symbol}{grouped}"),
    }
}

/// Turns a reward key into a row label: `online_shopping` -> `Online Shopping`.
#[must_use]
pub fn humanize_key(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
