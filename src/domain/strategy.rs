//! Screening strategies and the settings that parameterize them.

use crate::domain::error::ScreenerError;
use crate::domain::evaluator::{
    Evaluator, MoveDirection, PercentMoveEvaluator, TrendSupportEvaluator, TrendSupportParams,
};
use crate::domain::fanout::DEFAULT_MAX_CONCURRENCY;
use crate::domain::ranker::DEFAULT_TOP_N;
use crate::ports::config_port::ConfigPort;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Gainers,
    Losers,
    TrendSupport,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Gainers, Strategy::Losers, Strategy::TrendSupport];

    /// Short name accepted on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Gainers => "gainers",
            Strategy::Losers => "losers",
            Strategy::TrendSupport => "trend-support",
        }
    }

    pub fn evaluator(&self, config: &ScreenConfig) -> Box<dyn Evaluator> {
        match self {
            Strategy::Gainers => Box::new(config.percent_move(MoveDirection::Up)),
            Strategy::Losers => Box::new(config.percent_move(MoveDirection::Down)),
            Strategy::TrendSupport => Box::new(TrendSupportEvaluator::new(config.trend.clone())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Gainers => write!(f, "3-5% Gainers"),
            Strategy::Losers => write!(f, "3-5% Losers"),
            Strategy::TrendSupport => write!(f, "EMA, RSI & Support Zone"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|st| {
                st.key().eq_ignore_ascii_case(wanted) || st.to_string().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ScreenerError::UnknownStrategy {
                name: wanted.to_string(),
            })
    }
}

/// Settings for one screening run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    pub exchange: String,
    pub max_concurrency: usize,
    pub top_n: usize,
    pub percent_lookback_days: i64,
    pub percent_min: f64,
    pub percent_max: f64,
    pub trend: TrendSupportParams,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            exchange: "NSE".to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            top_n: DEFAULT_TOP_N,
            percent_lookback_days: 5,
            percent_min: 3.0,
            percent_max: 5.0,
            trend: TrendSupportParams::default(),
        }
    }
}

impl ScreenConfig {
    /// `[screen] exchange`, trimmed and uppercased. Blank or missing falls
    /// back to the default exchange.
    pub fn exchange_from(config: &dyn ConfigPort) -> String {
        config
            .get_string("screen", "exchange")
            .map(|e| e.trim().to_uppercase())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| Self::default().exchange)
    }

    fn percent_move(&self, direction: MoveDirection) -> PercentMoveEvaluator {
        PercentMoveEvaluator {
            direction,
            min_pct: self.percent_min,
            max_pct: self.percent_max,
            lookback_days: self.percent_lookback_days,
        }
    }
}
