//! RSI (Relative Strength Index), latest value only.
//!
//! Average gain/loss are simple means over the last `window` price changes
//! (rolling mean, not Wilder's smoothing).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, including a completely flat window.

/// Returns `None` when `window` is zero or there are fewer than `window + 1` closes.
pub fn calculate_rsi(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window + 1 {
        return None;
    }

    let recent = &closes[closes.len() - (window + 1)..];
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;

    for pair in recent.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
        } else if change < 0.0 {
            loss_sum += -change;
        }
    }

    let avg_gain = gain_sum / window as f64;
    let avg_loss = loss_sum / window as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
}
