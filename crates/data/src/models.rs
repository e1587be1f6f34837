use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of market data for a monitored symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    /// Trading date, when the source carries one.
    pub date: Option<NaiveDate>,
    /// Annualized borrow rate in percent.
    pub borrow_rate: f64,
    /// Closing price.
    pub close: f64,
}

/// Aligned daily series, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSeries {
    pub rows: Vec<MarketRow>,
}

impl MarketSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow-rate column in series order.
    #[must_use]
    pub fn borrow_rates(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.borrow_rate).collect()
    }

    /// Close-price column in series order.
    #[must_use]
    pub fn prices(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    /// Date for a day index, when the source carried dates.
    #[must_use]
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        self.rows.get(index).and_then(|r| r.date)
    }
}
