/// Percentile with linear interpolation between closest ranks.
///
/// Non-finite values are ignored. Returns `None` when no finite value is
/// left; a single distinct value is its own percentile.
#[must_use]
pub fn percentile(values: impl IntoIterator<Item = f64>, percentile: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let p = percentile.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let lower = sorted[lo];
    let upper = sorted[hi];
    Some(lower + (upper - lower) * (rank - lo as f64))
}

/// Smallest finite value.
#[must_use]
pub fn finite_min(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .min_by(f64::total_cmp)
}
