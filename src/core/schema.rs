use indexmap::IndexSet;
use serde::Serialize;

use super::ComparisonRecord;

/// Row axis of the comparison matrix: every category and merchant key seen
/// in the loaded records, each exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UnifiedSchema {
    pub category_keys: Vec<String>,
    pub merchant_keys: Vec<String>,
}

impl UnifiedSchema {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category_keys.is_empty() && self.merchant_keys.is_empty()
    }
}

/// Computes the key union across `records`.
///
/// Keys are ordered by the index of the first record that carries them; keys
/// first seen in the same record follow that record's key order, which is
/// lexicographic, so payload property order never leaks into the result.
#[must_use]
pub fn unify_keys(records: &[ComparisonRecord]) -> UnifiedSchema {
    let mut category_keys = IndexSet::new();
    let mut merchant_keys = IndexSet::new();

    for record in records {
        for key in record.categories.keys() {
            if !category_keys.contains(key.as_str()) {
                category_keys.insert(key.clone());
            }
        }
        for key in record.merchants.keys() {
            if !merchant_keys.contains(key.as_str()) {
                merchant_keys.insert(key.clone());
            }
        }
    }

    UnifiedSchema {
        category_keys: category_keys.into_iter().collect(),
        merchant_keys: merchant_keys.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::unify_keys;
    use crate::core::ComparisonRecord;

    #[test]
    fn keys_follow_first_occurrence_across_records() {
        let records = vec![
            ComparisonRecord::new("a", "Bank A", "Alpha")
                .with_category("travel", "2%")
                .with_merchant("amazon", "5%"),
            ComparisonRecord::new("b", "Bank B", "Beta")
                .with_category("dining", "3%")
                .with_category("travel", "1%")
                .with_merchant("swiggy", "10%")
                .with_merchant("amazon", "1%"),
        ];

        let schema = unify_keys(&records);
        assert_eq!(schema.category_keys, vec!["travel", "dining"]);
        assert_eq!(schema.merchant_keys, vec!["amazon", "swiggy"]);
    }

    #[test]
    fn empty_input_yields_empty_axes() {
        assert!(unify_keys(&[]).is_empty());
    }
}
