//! Ranking of trend-support signals.
//!
//! Strongest support first (highest touch count), then closest to support
//! (lowest distance). The sort is stable, so fully tied signals keep the
//! order in which the fan-out runner collected them. That order depends on
//! task completion and is not deterministic across runs.

use crate::domain::signal::TrendSupportSignal;
use std::cmp::Ordering;

pub const DEFAULT_TOP_N: usize = 10;

fn rank_order(a: &TrendSupportSignal, b: &TrendSupportSignal) -> Ordering {
    b.strength
        .cmp(&a.strength)
        .then_with(|| a.distance_pct.total_cmp(&b.distance_pct))
}

pub fn top_n(mut signals: Vec<TrendSupportSignal>, n: usize) -> Vec<TrendSupportSignal> {
    signals.sort_by(rank_order);
    signals.truncate(n);
    signals
}
