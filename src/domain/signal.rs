//! Signal records produced by the evaluators.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct PercentMoveSignal {
    pub name: String,
    pub token: String,
    pub close_price: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLabel {
    Bullish,
    Bearish,
}

impl TrendLabel {
    /// Bullish when the fast EMA is at or above the slow EMA.
    pub fn from_emas(fast: f64, slow: f64) -> Self {
        if fast >= slow {
            TrendLabel::Bullish
        } else {
            TrendLabel::Bearish
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::Bullish => write!(f, "Bullish"),
            TrendLabel::Bearish => write!(f, "Bearish"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSupportSignal {
    pub name: String,
    pub token: String,
    pub price: f64,
    pub support_price: f64,
    /// Touch count of the selected support cluster.
    pub strength: usize,
    pub distance_pct: f64,
    pub rsi: f64,
    pub trend_label: TrendLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    PercentMove(PercentMoveSignal),
    TrendSupport(TrendSupportSignal),
}

impl Signal {
    pub fn name(&self) -> &str {
        match self {
            Signal::PercentMove(s) => &s.name,
            Signal::TrendSupport(s) => &s.name,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Signal::PercentMove(s) => &s.token,
            Signal::TrendSupport(s) => &s.token,
        }
    }

    pub fn into_trend_support(self) -> Option<TrendSupportSignal> {
        match self {
            Signal::TrendSupport(s) => Some(s),
            Signal::PercentMove(_) => None,
        }
    }
}

/// Keep signals whose name contains `query`, ignoring case. An empty or
/// blank query keeps everything.
pub fn filter_by_name(signals: Vec<Signal>, query: &str) -> Vec<Signal> {
    let needle = query.trim().to_uppercase();
    if needle.is_empty() {
        return signals;
    }
    signals
        .into_iter()
        .filter(|s| s.name().to_uppercase().contains(&needle))
        .collect()
}
