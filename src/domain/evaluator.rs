//! Signal evaluators.
//!
//! An evaluator turns one instrument's price history into at most one
//! [`Signal`]. Evaluators are stateless and shared across fan-out workers.

use crate::domain::error::ScreenerError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::ema::latest_ema;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ohlcv::{Instrument, Interval, PriceSeries};
use crate::domain::signal::{PercentMoveSignal, Signal, TrendLabel, TrendSupportSignal};
use crate::domain::support::{SupportParams, detect_support};
use crate::ports::data_port::MarketDataPort;
use chrono::{NaiveDate, TimeDelta};
use tracing::debug;

pub trait Evaluator: Send + Sync {
    /// Calendar days of history to request, ending at the as-of date.
    fn lookback_days(&self) -> i64;

    fn evaluate(&self, instrument: &Instrument, series: &PriceSeries) -> Option<Signal>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Matches a last-bar close-to-close move inside a percentage band.
///
/// For `Down` the band is mirrored: `[min_pct, max_pct] = [3, 5]` matches
/// moves in `[-5, -3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentMoveEvaluator {
    pub direction: MoveDirection,
    pub min_pct: f64,
    pub max_pct: f64,
    pub lookback_days: i64,
}

impl PercentMoveEvaluator {
    pub fn up() -> Self {
        Self {
            direction: MoveDirection::Up,
            min_pct: 3.0,
            max_pct: 5.0,
            lookback_days: 5,
        }
    }

    pub fn down() -> Self {
        Self {
            direction: MoveDirection::Down,
            ..Self::up()
        }
    }

    fn in_band(&self, pct_change: f64) -> bool {
        match self.direction {
            MoveDirection::Up => pct_change >= self.min_pct && pct_change <= self.max_pct,
            MoveDirection::Down => pct_change >= -self.max_pct && pct_change <= -self.min_pct,
        }
    }
}

/// Percentage change of the last close against the previous close.
pub fn last_percent_change(series: &PriceSeries) -> Option<f64> {
    let bars = series.bars();
    if bars.len() < 2 {
        return None;
    }
    let prev = bars[bars.len() - 2].close;
    let last = bars[bars.len() - 1].close;
    if prev <= 0.0 {
        return None;
    }
    Some((last - prev) / prev * 100.0)
}

impl Evaluator for PercentMoveEvaluator {
    fn lookback_days(&self) -> i64 {
        self.lookback_days
    }

    fn evaluate(&self, instrument: &Instrument, series: &PriceSeries) -> Option<Signal> {
        let Some(pct_change) = last_percent_change(series) else {
            debug!(token = %instrument.token, bars = series.len(), "not enough bars for a percent move");
            return None;
        };

        if !self.in_band(pct_change) {
            return None;
        }

        let close_price = series.last()?.close;
        Some(Signal::PercentMove(PercentMoveSignal {
            name: instrument.name.clone(),
            token: instrument.token.clone(),
            close_price,
            percent_change: pct_change,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSupportParams {
    pub min_bars: usize,
    pub fast_ema: usize,
    pub slow_ema: usize,
    pub rsi_window: usize,
    pub rsi_max: f64,
    pub lookback_days: i64,
    pub support: SupportParams,
}

impl Default for TrendSupportParams {
    fn default() -> Self {
        Self {
            min_bars: 100,
            fast_ema: 50,
            slow_ema: 200,
            rsi_window: 14,
            rsi_max: 65.0,
            lookback_days: 730,
            support: SupportParams::default(),
        }
    }
}

/// Uptrend (fast EMA at or above slow EMA), not overbought, and trading a
/// bounded distance above a detected support cluster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSupportEvaluator {
    pub params: TrendSupportParams,
}

impl TrendSupportEvaluator {
    pub fn new(params: TrendSupportParams) -> Self {
        Self { params }
    }
}

impl Evaluator for TrendSupportEvaluator {
    fn lookback_days(&self) -> i64 {
        self.params.lookback_days
    }

    fn evaluate(&self, instrument: &Instrument, series: &PriceSeries) -> Option<Signal> {
        let p = &self.params;
        if series.len() < p.min_bars {
            debug!(
                token = %instrument.token,
                bars = series.len(),
                minimum = p.min_bars,
                "insufficient history"
            );
            return None;
        }

        let closes = series.closes();
        let fast = latest_ema(&closes, p.fast_ema)?;
        let slow = latest_ema(&closes, p.slow_ema)?;
        if fast < slow {
            debug!(
                token = %instrument.token,
                "{} {:.2} below {} {:.2}",
                IndicatorType::Ema(p.fast_ema),
                fast,
                IndicatorType::Ema(p.slow_ema),
                slow
            );
            return None;
        }

        let rsi = calculate_rsi(&closes, p.rsi_window)?;
        if rsi > p.rsi_max {
            debug!(token = %instrument.token, "{} {:.1} overbought", IndicatorType::Rsi(p.rsi_window), rsi);
            return None;
        }

        let Some(cluster) = detect_support(series, &p.support) else {
            debug!(token = %instrument.token, "no support zone");
            return None;
        };

        let price = series.last()?.close;
        let distance_pct = (price / cluster.representative_price - 1.0) * 100.0;

        Some(Signal::TrendSupport(TrendSupportSignal {
            name: instrument.name.clone(),
            token: instrument.token.clone(),
            price,
            support_price: cluster.representative_price,
            strength: cluster.touch_count,
            distance_pct,
            rsi,
            trend_label: TrendLabel::from_emas(fast, slow),
        }))
    }
}

/// First date of a `lookback_days` window ending at `as_of`, or `None` when
/// it falls outside the representable calendar.
pub fn window_start(as_of: NaiveDate, lookback_days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(lookback_days).and_then(|span| as_of.checked_sub_signed(span))
}

/// Resolve, fetch and evaluate one token.
///
/// Provider errors come back as `Err`; a valid series that does not match
/// comes back as `Ok(None)`.
pub fn evaluate_token(
    port: &dyn MarketDataPort,
    evaluator: &dyn Evaluator,
    exchange: &str,
    token: &str,
    as_of: NaiveDate,
) -> Result<Option<Signal>, ScreenerError> {
    let instrument = port.resolve_instrument(exchange, token)?;
    let from_date = window_start(as_of, evaluator.lookback_days()).ok_or_else(|| {
        ScreenerError::DataUnavailable {
            token: token.to_string(),
            reason: format!(
                "lookback of {} days before {} is out of range",
                evaluator.lookback_days(),
                as_of
            ),
        }
    })?;
    let bars = port.fetch_bars(&instrument, from_date, as_of, Interval::Daily)?;
    let series = PriceSeries::new(bars)?;
    Ok(evaluator.evaluate(&instrument, &series))
}
