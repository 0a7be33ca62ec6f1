//! Standard deviation of closing prices over the whole analysis window.
//!
//! Sample standard deviation (n - 1 denominator).
//! STDDEV = sqrt(sum((C[i] - mean)^2) / (n - 1))
//! Fewer than two values yields 0.0.

pub fn sample_stddev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;

    variance.sqrt()
}
