//! Local-extrema detection over min-max normalized prices.
//!
//! A point `i` is a local minimum when every neighbor within `order`
//! positions on either side is greater than or equal to it. Neighbors past
//! either end of the series are ignored, so the first and last points can
//! qualify.

/// Scale values to [0, 1]. A flat window (max == min) maps to all zeros.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if values.is_empty() || range <= 0.0 {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - min) / range).collect()
}

/// Neighborhood size used for support detection: `max(round(0.05 * len), 5)`.
pub fn extrema_order(len: usize) -> usize {
    ((len as f64 * 0.05).round() as usize).max(5)
}

pub fn local_minima(values: &[f64], order: usize) -> Vec<usize> {
    let n = values.len();
    (0..n)
        .filter(|&i| {
            let lo = i.saturating_sub(order);
            let hi = (i + order).min(n.saturating_sub(1));
            (lo..=hi).all(|j| j == i || values[i] <= values[j])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_scales_to_unit_range() {
        let normalized = min_max_normalize(&[10.0, 20.0, 15.0, 30.0]);
        assert_eq!(normalized, vec![0.0, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn normalize_flat_is_zero() {
        assert_eq!(min_max_normalize(&[7.0, 7.0, 7.0]), vec![0.0, 0.0, 0.0]);
        assert!(min_max_normalize(&[]).is_empty());
    }

    #[test]
    fn order_has_floor_of_five() {
        assert_eq!(extrema_order(20), 5);
        assert_eq!(extrema_order(100), 5);
        assert_eq!(extrema_order(300), 15);
        assert_eq!(extrema_order(730), 37);
    }

    #[test]
    fn single_valley() {
        let values = [5.0, 4.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(local_minima(&values, 2), vec![4]);
    }

    #[test]
    fn edges_qualify() {
        let values = [1.0, 2.0, 3.0, 2.0, 1.0];
        assert_eq!(local_minima(&values, 2), vec![0, 4]);
    }

    #[test]
    fn ties_qualify() {
        let values = [3.0, 1.0, 1.0, 3.0];
        assert_eq!(local_minima(&values, 1), vec![1, 2]);
    }

    #[test]
    fn shallow_dip_inside_order_is_rejected() {
        // index 2 is a dip but index 5 (within order 3) is lower
        let values = [5.0, 4.0, 3.0, 3.5, 2.5, 1.0, 4.0];
        assert_eq!(local_minima(&values, 3), vec![5]);
    }

    #[test]
    fn empty_input() {
        assert!(local_minima(&[], 5).is_empty());
    }
}
