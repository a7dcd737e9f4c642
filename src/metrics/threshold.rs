// schismrs-mld/src/metrics/threshold.rs

use crate::profile::Series;

/// First pressure whose value departs from the shallowest sample by more
/// than `threshold`. No interpolation and no extrapolation past the cast.
pub fn threshold_depth(series: &Series, threshold: f64) -> Option<f64> {
    let reference = *series.values.first()?;
    series
        .values
        .iter()
        .zip(series.pressure.iter())
        .find(|(&value, _)| (value - reference).abs() > threshold)
        .map(|(_, &pressure)| pressure)
}
