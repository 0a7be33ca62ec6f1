//! Technical indicator implementations.
//!
//! Every indicator is a pure function over a slice of closing prices:
//! - [`ema::calculate_ema`]: exponential moving average, one value per close
//! - [`rsi::calculate_rsi`]: latest Relative Strength Index value
//! - [`stddev::sample_stddev`]: sample standard deviation
//! - [`extrema::local_minima`]: relative minima over a min-max normalized window
//!
//! `IndicatorType` names an indicator and its parameters for diagnostics.

pub mod ema;
pub mod extrema;
pub mod rsi;
pub mod stddev;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Stddev,
    LocalMinima(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(window) => write!(f, "RSI({})", window),
            IndicatorType::Stddev => write!(f, "STDDEV"),
            IndicatorType::LocalMinima(order) => write!(f, "MINIMA({})", order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Ema(50).to_string(), "EMA(50)");
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
        assert_eq!(IndicatorType::Stddev.to_string(), "STDDEV");
        assert_eq!(IndicatorType::LocalMinima(15).to_string(), "MINIMA(15)");
    }
}
