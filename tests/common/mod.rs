#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use trendscan::domain::error::ScreenerError;
pub use trendscan::domain::ohlcv::{Bar, Instrument, Interval};
use trendscan::ports::data_port::MarketDataPort;

pub struct MockMarketData {
    pub names: HashMap<String, String>,
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
    pub unavailable: Option<String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            data: HashMap::new(),
            errors: HashMap::new(),
            unavailable: None,
        }
    }

    /// Register `token` under `name` with the given bars.
    pub fn with_bars(mut self, token: &str, name: &str, bars: Vec<Bar>) -> Self {
        self.names.insert(token.to_string(), name.to_string());
        self.data.insert(token.to_string(), bars);
        self
    }

    /// Register `token` so that fetching its bars fails.
    pub fn with_error(mut self, token: &str, reason: &str) -> Self {
        self.names.insert(token.to_string(), format!("ERR{token}"));
        self.errors.insert(token.to_string(), reason.to_string());
        self
    }

    pub fn unavailable(mut self, reason: &str) -> Self {
        self.unavailable = Some(reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn resolve_instrument(
        &self,
        exchange: &str,
        token: &str,
    ) -> Result<Instrument, ScreenerError> {
        self.names
            .get(token)
            .map(|name| Instrument {
                exchange: exchange.to_string(),
                token: token.to_string(),
                name: name.clone(),
            })
            .ok_or_else(|| ScreenerError::UnknownInstrument {
                exchange: exchange.to_string(),
                token: token.to_string(),
            })
    }

    fn fetch_bars(
        &self,
        instrument: &Instrument,
        from_date: NaiveDate,
        to_date: NaiveDate,
        _interval: Interval,
    ) -> Result<Vec<Bar>, ScreenerError> {
        if let Some(reason) = self.errors.get(&instrument.token) {
            return Err(ScreenerError::DataUnavailable {
                token: instrument.token.clone(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(&instrument.token)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= from_date && b.date <= to_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn check_available(&self) -> Result<(), ScreenerError> {
        match &self.unavailable {
            Some(reason) => Err(ScreenerError::ProviderUnavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn as_of() -> NaiveDate {
    date(2024, 6, 28)
}

/// One bar per calendar day, the last one dated `end`, volume 1000.
pub fn daily_bars(closes: &[f64], end: NaiveDate) -> Vec<Bar> {
    let start = end - Duration::days(closes.len() as i64 - 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

/// 400 closes: a long climb, a 10-bar pullback to 254.5 at index 359, a slow
/// recovery and a choppy finish at 271.0.
///
/// Matches the trend-support screen with support 254.5, strength 1,
/// RSI 100 - 100/2.2 and distance ~6.48%.
pub fn trend_support_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = Vec::with_capacity(400);
    for i in 0..400usize {
        let close = if i < 350 {
            100.0 + 0.5 * i as f64
        } else if i < 360 {
            274.5 - 2.0 * (i - 349) as f64
        } else if i < 386 {
            254.5 + 0.5 * (i - 359) as f64
        } else if (i - 386) % 2 == 0 {
            closes[i - 1] + 3.0
        } else {
            closes[i - 1] - 2.5
        };
        closes.push(close);
    }
    closes
}

/// `trend_support_closes` with an extra dip bottoming at 238.5 on index 300,
/// close enough to 254.5 to form one cluster with two touches.
pub fn double_touch_closes() -> Vec<f64> {
    let mut closes = trend_support_closes();
    for (i, close) in closes.iter_mut().enumerate().take(311).skip(290) {
        let offset = (i as f64 - 300.0).abs();
        *close -= 11.5 * (1.0 - offset / 11.0);
    }
    closes
}

/// `trend_support_closes` with the final close replaced by `prev + bump`.
pub fn trend_support_closes_ending(bump: f64) -> Vec<f64> {
    let mut closes = trend_support_closes();
    let n = closes.len();
    closes[n - 1] = closes[n - 2] + bump;
    closes
}

/// A 250-bar plateau at 400, a slide to 240 at index 329, then the same
/// recovery and choppy finish as `trend_support_closes`, ending at 271.5.
///
/// Support (240) and RSI (100 - 100/2.2) both pass; EMA50 ~266 sits below
/// EMA200 ~304.
pub fn fading_trend_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = Vec::with_capacity(400);
    for i in 0..400usize {
        let close = if i < 250 {
            400.0
        } else if i < 330 {
            400.0 - 2.0 * (i - 249) as f64
        } else if i < 386 {
            240.0 + 0.5 * (i - 329) as f64
        } else if (i - 386) % 2 == 0 {
            closes[i - 1] + 3.0
        } else {
            closes[i - 1] - 2.5
        };
        closes.push(close);
    }
    closes
}

/// Steady decline, so the fast EMA stays below the slow EMA.
pub fn declining_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 500.0 - 0.5 * i as f64).collect()
}

/// Flat series with one final move from 100.0 to `last`.
pub fn last_move_closes(last: f64) -> Vec<f64> {
    vec![100.0, 100.0, 100.0, 100.0, last]
}
