use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::database::PriceStore;

/// Served with every non-empty series; caching is left to the HTTP layer and CDNs.
pub const CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate";

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceSeriesResult {
    /// Raw rows as stored, ascending by date.
    Data(Vec<Value>),
    /// Feature disabled, no rows, or no parseable rows.
    Empty,
}

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Missing required parameters")]
    BadRequest,
    #[error("price store query failed: {0}")]
    Store(#[from] sqlx::Error),
}

pub struct HistoricPriceGateway {
    store: Option<Arc<dyn PriceStore>>,
}

impl HistoricPriceGateway {
    pub fn new(store: Option<Arc<dyn PriceStore>>) -> Self {
        HistoricPriceGateway { store }
    }

    pub async fn historic_series(
        &self,
        symbol: &str,
        field: &str,
    ) -> Result<PriceSeriesResult, PriceError> {
        let (symbol, field) = (symbol.trim(), field.trim());
        if symbol.is_empty() || field.is_empty() {
            return Err(PriceError::BadRequest);
        }

        let Some(store) = &self.store else {
            debug!(symbol, field, "price store not configured, serving empty series");
            return Ok(PriceSeriesResult::Empty);
        };

        let rows = store.historic_rows(symbol, field).await.map_err(|e| {
            error!(symbol, field, error = %e, "historic price query failed");
            PriceError::Store(e)
        })?;

        let valid = parse_price_points(&rows, field).len();
        debug!(symbol, field, rows = rows.len(), valid, "historic price rows");
        if valid == 0 {
            return Ok(PriceSeriesResult::Empty);
        }

        Ok(PriceSeriesResult::Data(rows))
    }
}

/// Parses rows into price points, dropping rows with an unusable date or value.
pub fn parse_price_points(rows: &[Value], field: &str) -> Vec<PricePoint> {
    rows.iter()
        .filter_map(|row| {
            let date = parse_date(row.get("date")?)?;
            let price = parse_price(row.get(field)?)?;
            Some(PricePoint { date, price })
        })
        .collect()
}

fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(date) = DateTime::parse_from_rfc3339(s) {
                return Some(date.with_timezone(&Utc));
            }
            if let Ok(date) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(date.and_utc());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
                .map(|date| date.and_utc())
        }
        Value::Number(n) => DateTime::from_timestamp(n.as_i64()?, 0),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    pub enum FakeStore {
        Rows(Vec<Value>),
        Failing,
    }

    pub struct CountingStore {
        pub inner: FakeStore,
        pub queries: AtomicUsize,
    }

    impl CountingStore {
        pub fn new(inner: FakeStore) -> Arc<Self> {
            Arc::new(CountingStore {
                inner,
                queries: AtomicUsize::new(0),
            })
        }

        pub fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceStore for CountingStore {
        async fn historic_rows(&self, _symbol: &str, _field: &str) -> sqlx::Result<Vec<Value>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            match &self.inner {
                FakeStore::Rows(rows) => Ok(rows.clone()),
                FakeStore::Failing => Err(sqlx::Error::PoolTimedOut),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        testing::{CountingStore, FakeStore},
        *,
    };

    fn gateway(store: &Arc<CountingStore>) -> HistoricPriceGateway {
        HistoricPriceGateway::new(Some(store.clone() as Arc<dyn PriceStore>))
    }

    #[tokio::test]
    async fn unconfigured_store_is_empty_not_an_error() {
        let gateway = HistoricPriceGateway::new(None);

        let result = gateway.historic_series("HEX", "priceUSD").await.unwrap();

        assert_eq!(result, PriceSeriesResult::Empty);
    }

    #[tokio::test]
    async fn missing_parameters_never_reach_the_store() {
        let store = CountingStore::new(FakeStore::Rows(vec![]));
        let gateway = gateway(&store);

        for (symbol, field) in [("", "priceUSD"), ("HEX", ""), ("  ", "priceUSD")] {
            let err = gateway.historic_series(symbol, field).await.unwrap_err();
            assert!(matches!(err, PriceError::BadRequest));
        }
        assert_eq!(store.queries(), 0);
    }

    #[tokio::test]
    async fn all_invalid_rows_collapse_to_empty() {
        let store = CountingStore::new(FakeStore::Rows(vec![
            json!({"date": "2024-01-01", "priceUSD": "n/a"}),
            json!({"date": "2024-01-02", "priceUSD": "NaN"}),
            json!({"date": "2024-01-03", "priceUSD": true}),
        ]));

        let result = gateway(&store)
            .historic_series("HEX", "priceUSD")
            .await
            .unwrap();

        assert_eq!(result, PriceSeriesResult::Empty);
    }

    #[tokio::test]
    async fn no_rows_is_empty() {
        let store = CountingStore::new(FakeStore::Rows(vec![]));

        let result = gateway(&store)
            .historic_series("HEX", "priceUSD")
            .await
            .unwrap();

        assert_eq!(result, PriceSeriesResult::Empty);
    }

    #[tokio::test]
    async fn serves_raw_rows_when_any_row_parses() {
        let rows = vec![
            json!({"date": "2024-01-01", "priceUSD": "garbage"}),
            json!({"date": "2024-01-02T00:00:00+00:00", "priceUSD": 0.0042}),
            json!({"date": "2024-01-03T00:00:00", "priceUSD": "0.0051"}),
        ];
        let store = CountingStore::new(FakeStore::Rows(rows.clone()));

        let result = gateway(&store)
            .historic_series("HEX", "priceUSD")
            .await
            .unwrap();

        assert_eq!(result, PriceSeriesResult::Data(rows));
        assert_eq!(store.queries(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_an_error() {
        let store = CountingStore::new(FakeStore::Failing);

        let err = gateway(&store)
            .historic_series("HEX", "priceUSD")
            .await
            .unwrap_err();

        assert!(matches!(err, PriceError::Store(_)));
    }

    #[test]
    fn parses_numbers_strings_and_dates() {
        let rows = vec![
            json!({"date": "2024-01-01", "priceUSD": 1.5}),
            json!({"date": "2024-01-02T12:00:00Z", "priceUSD": " 2.25 "}),
            json!({"date": 1704240000, "priceUSD": 3}),
            json!({"date": "yesterday", "priceUSD": 4}),
            json!({"date": "2024-01-05", "priceUSD": "inf"}),
            json!({"date": "2024-01-06"}),
        ];

        let points = parse_price_points(&rows, "priceUSD");

        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.5, 2.25, 3.0]);
        assert_eq!(points[0].date.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(points[2].date.to_rfc3339(), "2024-01-03T00:00:00+00:00");
    }
}
