//! Exponential Moving Average.
//!
//! k = 2/(span+1), seeded with the first close, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). No warmup: every output is usable.

pub fn calculate_ema(closes: &[f64], span: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(closes.len());
    let Some(&first) = closes.first() else {
        return values;
    };

    let k = 2.0 / (span as f64 + 1.0);
    let mut ema = first;
    values.push(ema);

    for &close in &closes[1..] {
        ema = close * k + ema * (1.0 - k);
        values.push(ema);
    }

    values
}

/// Last EMA value, or `None` for an empty input.
pub fn latest_ema(closes: &[f64], span: usize) -> Option<f64> {
    calculate_ema(closes, span).last().copied()
}
