//! Support-zone detection.
//!
//! Local minima of the normalized closes become support candidates when the
//! current price sits a meaningful but bounded distance above them and volume
//! has held up. Candidates are clustered by price proximity and the cluster
//! with the most touches is the support level.

use crate::domain::indicator::extrema::{extrema_order, local_minima, min_max_normalize};
use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct SupportParams {
    /// Only minima within this many most recent bars are considered.
    pub lookback_bars: usize,
    pub min_ratio: f64,
    pub max_ratio: f64,
    /// Current volume must exceed this fraction of the volume at the minimum.
    pub volume_factor: f64,
    /// Cluster tolerance as a multiple of the closes' standard deviation.
    pub tolerance_factor: f64,
}

impl Default for SupportParams {
    fn default() -> Self {
        Self {
            lookback_bars: 126,
            min_ratio: 1.05,
            max_ratio: 1.20,
            volume_factor: 0.8,
            tolerance_factor: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupportCandidate {
    pub price: f64,
    pub index: usize,
    pub date: NaiveDate,
    pub touches: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupportCluster {
    pub representative_price: f64,
    pub touch_count: usize,
    pub member_dates: Vec<NaiveDate>,
}

/// Filter minima down to valid support candidates, preserving index order.
pub fn find_candidates(
    series: &PriceSeries,
    minima: &[usize],
    params: &SupportParams,
) -> Vec<SupportCandidate> {
    let bars = series.bars();
    let Some(last) = bars.last() else {
        return Vec::new();
    };
    let current_price = last.close;
    let current_volume = last.volume as f64;
    let window_start = bars.len().saturating_sub(params.lookback_bars);

    minima
        .iter()
        .filter(|&&m| m >= window_start && m < bars.len())
        .filter_map(|&m| {
            let bar = &bars[m];
            let ratio = current_price / bar.close;
            let in_band = ratio >= params.min_ratio && ratio <= params.max_ratio;
            let liquid = current_volume > params.volume_factor * bar.volume as f64;
            (in_band && liquid).then(|| SupportCandidate {
                price: bar.close,
                index: m,
                date: bar.date,
                touches: 1,
            })
        })
        .collect()
}

/// Greedy single pass: each candidate joins the first cluster whose
/// representative price is within `tolerance`, otherwise founds a new one.
pub fn cluster_candidates(candidates: &[SupportCandidate], tolerance: f64) -> Vec<SupportCluster> {
    let mut clusters: Vec<SupportCluster> = Vec::new();

    for candidate in candidates {
        match clusters
            .iter_mut()
            .find(|c| (candidate.price - c.representative_price).abs() <= tolerance)
        {
            Some(cluster) => {
                cluster.touch_count += candidate.touches;
                cluster.member_dates.push(candidate.date);
            }
            None => clusters.push(SupportCluster {
                representative_price: candidate.price,
                touch_count: candidate.touches,
                member_dates: vec![candidate.date],
            }),
        }
    }

    clusters
}

/// Highest touch count wins; on a tie the earliest cluster is kept.
pub fn strongest_cluster(clusters: Vec<SupportCluster>) -> Option<SupportCluster> {
    let mut best: Option<SupportCluster> = None;
    for cluster in clusters {
        match &best {
            Some(b) if cluster.touch_count <= b.touch_count => {}
            _ => best = Some(cluster),
        }
    }
    best
}

/// Full detection pipeline over one series.
pub fn detect_support(series: &PriceSeries, params: &SupportParams) -> Option<SupportCluster> {
    let closes = series.closes();
    let normalized = min_max_normalize(&closes);
    let minima = local_minima(&normalized, extrema_order(closes.len()));

    let candidates = find_candidates(series, &minima, params);
    if candidates.is_empty() {
        return None;
    }

    let tolerance = params.tolerance_factor * sample_stddev(&closes);
    strongest_cluster(cluster_candidates(&candidates, tolerance))
}
