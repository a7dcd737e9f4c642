// schismrs-mld/src/metrics/extrema.rs

use super::Extremum;
use crate::profile::Series;
use ndarray_stats::QuantileExt;

/// Pressure of the warmest (or freshest/lightest) sample. Shallowest wins ties.
///
/// Misplaces the mixed layer base when it is not where the extremum sits, for
/// example under a temperature inversion.
pub fn extrema_depth(series: &Series, extremum: Extremum) -> Option<f64> {
    let index = match extremum {
        Extremum::Maximum => series.values.argmax(),
        Extremum::Minimum => series.values.argmin(),
    };
    index.ok().map(|i| series.pressure[i])
}
