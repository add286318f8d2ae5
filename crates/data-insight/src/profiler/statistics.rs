//! Statistical helpers over plain `f64` slices.
//!
//! Every function returns `None` when the statistic is undefined (too few
//! values, zero variance) instead of producing NaN.

use std::cmp::Ordering;

/// Sort a copy of the values in ascending order.
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Quantile of already sorted values using linear interpolation.
///
/// The position is `q * (n - 1)`; the result interpolates between the two
/// neighbouring order statistics.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Median of unsorted values.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    quantile_sorted(&sorted(values), 0.5)
}

/// Arithmetic mean.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Adjusted Fisher-Pearson sample skewness (bias corrected).
///
/// `G1 = sqrt(n(n-1)) / (n-2) * m3 / m2^1.5` with `m2`, `m3` the central
/// moments. Undefined below three values or for zero variance.
pub(crate) fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }

    let mean = mean(values)?;
    let n_f = n as f64;
    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n_f;
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n_f;

    // Rounding noise on a constant column is not variance.
    if m2 <= (f64::EPSILON * mean).powi(2) {
        return None;
    }

    let g1 = m3 / m2.powf(1.5);
    let adjusted = (n_f * (n_f - 1.0)).sqrt() / (n_f - 2.0) * g1;
    adjusted.is_finite().then_some(adjusted)
}

/// Pearson correlation over pairwise-complete observations.
///
/// Pairs where either side is missing are skipped. Undefined with fewer than
/// two complete pairs or when either side has zero variance.
pub(crate) fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    r.is_finite().then_some(r)
}

/// Tukey fences `(Q1 - k*IQR, Q3 + k*IQR)` of sorted values.
pub(crate) fn tukey_fences(sorted: &[f64], q_low: f64, q_high: f64, k: f64) -> Option<(f64, f64)> {
    let q1 = quantile_sorted(sorted, q_low)?;
    let q3 = quantile_sorted(sorted, q_high)?;
    let iqr = q3 - q1;
    Some((q1 - k * iqr, q3 + k * iqr))
}
