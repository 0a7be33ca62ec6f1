//! OHLCV bars, instruments and validated price series.

use crate::domain::error::ScreenerError;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// A tradable instrument as resolved by the market-data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub exchange: String,
    pub token: String,
    pub name: String,
}

/// Bar granularity requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Minute,
    Daily,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Minute => write!(f, "1"),
            Interval::Daily => write!(f, "D"),
        }
    }
}

/// Bars ascending by date with no duplicate dates and positive prices.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, ScreenerError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ScreenerError::InvalidSeries {
                    reason: format!(
                        "dates not strictly ascending: {} then {}",
                        pair[0].date, pair[1].date
                    ),
                });
            }
        }

        if let Some(bar) = bars
            .iter()
            .find(|b| b.open <= 0.0 || b.high <= 0.0 || b.low <= 0.0 || b.close <= 0.0)
        {
            return Err(ScreenerError::InvalidSeries {
                reason: format!("non-positive price on {}", bar.date),
            });
        }

        if let Some(bar) = bars.iter().find(|b| b.volume < 0) {
            return Err(ScreenerError::InvalidSeries {
                reason: format!("negative volume on {}", bar.date),
            });
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn accepts_ascending_series() {
        let series = PriceSeries::new(vec![bar(1, 100.0), bar(2, 101.0), bar(3, 99.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.0, 101.0, 99.0]);
        assert_eq!(series.last().unwrap().close, 99.0);
    }

    #[test]
    fn accepts_empty_series() {
        let series = PriceSeries::new(vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn rejects_duplicate_dates() {
        let result = PriceSeries::new(vec![bar(1, 100.0), bar(1, 101.0)]);
        assert!(matches!(result, Err(ScreenerError::InvalidSeries { .. })));
    }

    #[test]
    fn rejects_descending_dates() {
        let result = PriceSeries::new(vec![bar(2, 100.0), bar(1, 101.0)]);
        assert!(matches!(result, Err(ScreenerError::InvalidSeries { .. })));
    }

    #[test]
    fn rejects_non_positive_close() {
        let mut bad = bar(2, 100.0);
        bad.close = 0.0;
        let result = PriceSeries::new(vec![bar(1, 100.0), bad]);
        assert!(matches!(result, Err(ScreenerError::InvalidSeries { .. })));
    }

    #[test]
    fn rejects_negative_volume() {
        let mut bad = bar(2, 100.0);
        bad.volume = -5;
        let result = PriceSeries::new(vec![bar(1, 100.0), bad]);
        assert!(matches!(result, Err(ScreenerError::InvalidSeries { .. })));
    }

    #[test]
    fn interval_display() {
        assert_eq!(Interval::Daily.to_string(), "D");
        assert_eq!(Interval::Minute.to_string(), "1");
    }
}
