use serde_json::Value;

use crate::error::{CompareError, CompareResult};

/// External data-fetch call returning raw per-card comparison payloads.
///
/// The shape of each element is checked later by the record normalizer.
pub trait ComparisonSource {
    fn fetch_comparison(&mut self, user_cards_only: bool) -> CompareResult<Vec<Value>>;
}

/// In-memory source; `user_cards_only` selects the second record set.
#[derive(Debug, Clone, Default)]
pub struct StaticComparisonSource {
    all_cards: Vec<Value>,
    user_cards: Vec<Value>,
    pub fetch_count: usize,
}

impl StaticComparisonSource {
    #[must_use]
    pub fn new(all_cards: Vec<Value>) -> Self {
        Self {
            user_cards: all_cards.clone(),
            all_cards,
            fetch_count: 0,
        }
    }

    #[must_use]
    pub fn with_user_cards(mut self, user_cards: Vec<Value>) -> Self {
        self.user_cards = user_cards;
        self
    }

    /// Parses a JSON array, or an object wrapping one under `data` or `cards`.
    pub fn from_json_str(input: &str) -> CompareResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| CompareError::Fetch(format!("failed to parse comparison json: {e}")))?;
        Ok(Self::new(unwrap_payload(value)?))
    }
}

impl ComparisonSource for StaticComparisonSource {
    fn fetch_comparison(&mut self, user_cards_only: bool) -> CompareResult<Vec<Value>> {
        self.fetch_count += 1;
        Ok(if user_cards_only {
            self.user_cards.clone()
        } else {
            self.all_cards.clone()
        })
    }
}

pub(crate) fn unwrap_payload(value: Value) -> CompareResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => match object
            .remove("data")
            .or_else(|| object.remove("cards"))
        {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(CompareError::Fetch(
                "comparison payload object has no `data` or `cards` array".to_owned(),
            )),
        },
        _ => Err(CompareError::Fetch("comparison payload must be a JSON array".to_owned())),
    }
}

#[cfg(feature = "http-source")]
mod http {
    use reqwest::blocking::Client;
    use serde_json::Value;
    use tracing::debug;

    use super::{ComparisonSource, unwrap_payload};
    use crate::error::{CompareError, CompareResult};

    /// Fetches comparison records from an HTTP endpoint as
    /// `GET {endpoint}?userCardsOnly=<bool>`.
    #[derive(Debug, Clone)]
    pub struct HttpComparisonSource {
        client: Client,
        endpoint: String,
        bearer_token: Option<String>,
    }

    impl HttpComparisonSource {
        #[must_use]
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                client: Client::new(),
                endpoint: endpoint.into(),
                bearer_token: None,
            }
        }

        #[must_use]
        pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
            self.bearer_token = Some(token.into());
            self
        }
    }

    impl ComparisonSource for HttpComparisonSource {
        fn fetch_comparison(&mut self, user_cards_only: bool) -> CompareResult<Vec<Value>> {
            let mut request = self
                .client
                .get(&self.endpoint)
                .query(&[("userCardsOnly", user_cards_only)]);
            if let Some(token) = &self.bearer_token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(|err| CompareError::Fetch(err.to_string()))?;
            let payload: Value = response
                .json()
                .map_err(|err| CompareError::Fetch(format!("invalid json body: {err}")))?;
            let records = unwrap_payload(payload)?;
            debug!(count = records.len(), user_cards_only, "fetched comparison records");
            Ok(records)
        }
    }
}

#[cfg(feature = "http-source")]
pub use http::HttpComparisonSource;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ComparisonSource, StaticComparisonSource};
    use crate::error::CompareError;

    #[test]
    fn accepts_wrapped_payloads() {
        let mut source =
            StaticComparisonSource::from_json_str(r#"{"data": [{"id": "a"}]}"#).expect("source");
        assert_eq!(source.fetch_comparison(false).expect("fetch").len(), 1);

        let err = StaticComparisonSource::from_json_str(r#"{"items": []}"#).expect_err("no array");
        assert!(matches!(err, CompareError::Fetch(_)));
    }

    #[test]
    fn user_cards_flag_selects_record_set() {
        let mut source = StaticComparisonSource::new(vec![json!({"id": "a"}), json!({"id": "b"})])
            .with_user_cards(vec![json!({"id": "b"})]);
        assert_eq!(source.fetch_comparison(true).expect("fetch").len(), 1);
        assert_eq!(source.fetch_comparison(false).expect("fetch").len(), 2);
        assert_eq!(source.fetch_count, 2);
    }
}
