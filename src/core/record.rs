use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{CompareError, CompareResult};

/// Canonical per-card data used to build the comparison matrix.
///
/// Optional numeric lounge terms stay `None` when the card does not offer
/// them, so `Some(0)` and "not offered" remain distinguishable. Reward maps
/// are keyed by unconstrained strings and iterate in key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub id: String,
    pub bank_name: String,
    pub display_name: String,
    pub joining_fee: Option<String>,
    pub annual_fee: Option<String>,
    pub annual_fee_waiver: Option<String>,
    pub lounge_visits: Option<u32>,
    pub lounge_spend_threshold: Option<Decimal>,
    pub tier: Option<String>,
    pub categories: BTreeMap<String, String>,
    pub merchants: BTreeMap<String, String>,
    pub additional_info: Option<String>,
}

impl ComparisonRecord {
    /// Minimal record with identity fields only; used by hosts and tests.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        bank_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            bank_name: bank_name.into(),
            display_name: display_name.into(),
            joining_fee: None,
            annual_fee: None,
            annual_fee_waiver: None,
            lounge_visits: None,
            lounge_spend_threshold: None,
            tier: None,
            categories: BTreeMap::new(),
            merchants: BTreeMap::new(),
            additional_info: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.categories.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_merchant(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.merchants.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_fees(
        mut self,
        joining_fee: impl Into<String>,
        annual_fee: impl Into<String>,
    ) -> Self {
        self.joining_fee = Some(joining_fee.into());
        self.annual_fee = Some(annual_fee.into());
        self
    }

    #[must_use]
    pub fn with_lounge(mut self, visits: Option<u32>, spend_threshold: Option<Decimal>) -> Self {
        self.lounge_visits = visits;
        self.lounge_spend_threshold = spend_threshold;
        self
    }

    #[must_use]
    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    #[must_use]
    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }
}

/// Wire shape accepted from the comparison endpoint.
///
/// Every field is optional here; required identity fields are checked in
/// `normalize_record` so a missing one is reported by name.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCardRecord {
    #[serde(alias = "_id", alias = "card_id", alias = "cardId")]
    id: Option<Value>,
    #[serde(alias = "bank_name", alias = "bank")]
    bank_name: Option<String>,
    #[serde(alias = "display_name", alias = "cardName", alias = "card_name")]
    display_name: Option<String>,
    #[serde(alias = "joining_fee")]
    joining_fee: Option<Value>,
    #[serde(alias = "annual_fee")]
    annual_fee: Option<Value>,
    #[serde(alias = "annual_fee_waiver")]
    annual_fee_waiver: Option<Value>,
    #[serde(alias = "lounge_visits")]
    lounge_visits: Option<Value>,
    #[serde(alias = "lounge_spend_threshold", alias = "loungeSpend")]
    lounge_spend_threshold: Option<Value>,
    #[serde(alias = "card_tier")]
    tier: Option<String>,
    #[serde(alias = "categoryRewards", alias = "category_rewards")]
    categories: Option<Map<String, Value>>,
    #[serde(alias = "merchantRewards", alias = "merchant_rewards")]
    merchants: Option<Map<String, Value>>,
    #[serde(alias = "additional_info")]
    additional_info: Option<String>,
}

/// Result of normalizing one fetched batch.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<ComparisonRecord>,
    pub rejected: Vec<CompareError>,
}

/// Validates and shapes one raw payload into a `ComparisonRecord`.
///
/// Fails with `MalformedRecord` when `id` or `displayName` is absent or blank,
/// and with `InvalidData` when the payload has the wrong shape.
pub fn normalize_record(index: usize, raw: &Value) -> CompareResult<ComparisonRecord> {
    if !raw.is_object() {
        return Err(CompareError::InvalidData(format!(
            "record at index {index} is not a JSON object"
        )));
    }
    let raw = RawCardRecord::deserialize(raw).map_err(|err| {
        CompareError::InvalidData(format!("record at index {index} has unexpected shape: {err}"))
    })?;

    let id = raw
        .id
        .as_ref()
        .and_then(scalar_text)
        .ok_or(CompareError::MalformedRecord { index, field: "id" })?;
    let display_name = raw
        .display_name
        .as_deref()
        .and_then(non_blank)
        .ok_or(CompareError::MalformedRecord {
            index,
            field: "displayName",
        })?;

    Ok(ComparisonRecord {
        id,
        bank_name: raw
            .bank_name
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_default(),
        display_name,
        joining_fee: raw.joining_fee.as_ref().and_then(scalar_text),
        annual_fee: raw.annual_fee.as_ref().and_then(scalar_text),
        annual_fee_waiver: raw.annual_fee_waiver.as_ref().and_then(scalar_text),
        lounge_visits: raw
            .lounge_visits
            .as_ref()
            .and_then(|value| parse_visit_count(index, value)),
        lounge_spend_threshold: raw
            .lounge_spend_threshold
            .as_ref()
            .and_then(|value| parse_amount(index, value)),
        tier: raw.tier.as_deref().and_then(non_blank),
        categories: reward_map(raw.categories),
        merchants: reward_map(raw.merchants),
        additional_info: raw.additional_info.as_deref().and_then(non_blank),
    })
}

/// Normalizes a fetched batch, dropping malformed records with a warning.
///
/// Records repeating an already accepted `id` are dropped too, since card ids
/// identify matrix columns.
#[must_use]
pub fn normalize_batch(raw_records: &[Value]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    let mut seen_ids = HashSet::new();

    for (index, raw) in raw_records.iter().enumerate() {
        match normalize_record(index, raw) {
            Ok(record) if !seen_ids.insert(record.id.clone()) => {
                warn!(index, id = %record.id, "dropping record with duplicate card id");
                batch.rejected.push(CompareError::InvalidData(format!(
                    "record at index {index} repeats card id `{}`",
                    record.id
                )));
            }
            Ok(record) => batch.records.push(record),
            Err(err) => {
                warn!(index, error = %err, "dropping malformed comparison record");
                batch.rejected.push(err);
            }
        }
    }

    debug!(
        raw_count = raw_records.len(),
        accepted = batch.records.len(),
        rejected = batch.rejected.len(),
        "normalized comparison batch"
    );
    batch
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_blank(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn reward_map(raw: Option<Map<String, Value>>) -> BTreeMap<String, String> {
    raw.into_iter()
        .flatten()
        .filter_map(|(key, value)| {
            let key = non_blank(&key)?;
            let value = scalar_text(&value)?;
            Some((key, value))
        })
        .collect()
}

fn parse_visit_count(index: usize, value: &Value) -> Option<u32> {
    let parsed = match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    };
    if parsed.is_none() && !value.is_null() {
        debug!(index, %value, "lounge visit count is not a non-negative integer");
    }
    parsed
}

fn parse_amount(index: usize, value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        Value::String(text) => {
            // Currency prefixes such as `₹` or `Rs.` are skipped; a minus
            // sign anywhere before the digits marks a negative amount.
            let text = text.trim();
            match text.find(|c: char| c.is_ascii_digit()) {
                Some(start) if !text[..start].contains('-') => {
                    let cleaned: String = text[start..]
                        .chars()
                        .filter(|c| *c != ',' && !c.is_whitespace())
                        .collect();
                    Decimal::from_str(&cleaned).ok()
                }
                _ => None,
            }
        }
        _ => None,
    };
    let parsed = parsed.filter(|amount| !amount.is_sign_negative());
    if parsed.is_none() && !value.is_null() {
        debug!(index, %value, "lounge spend threshold is not a non-negative amount");
    }
    parsed
}
