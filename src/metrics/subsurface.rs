// schismrs-mld/src/metrics/subsurface.rs

use super::extrema::extrema_depth;
use super::gradient::max_gradient_depth;
use super::Extremum;
use crate::profile::Series;

/// Shallower of the gradient maximum and the extremum, when they lie within
/// `separation` of each other.
///
/// A warm or fresh layer left at the base of the mixed layer by recent mixing
/// puts both features at nearly the same pressure.
pub fn subsurface_depth(series: &Series, extremum: Extremum, separation: f64) -> Option<f64> {
    let gradient = max_gradient_depth(series)?;
    let extreme = extrema_depth(series, extremum)?;
    if (gradient - extreme).abs() <= separation {
        Some(gradient.min(extreme))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn intrusion() -> (Array1<f64>, Array1<f64>) {
        // cool surface water over a warm intrusion at 80 dbar
        let pressure = Array1::range(10., 301., 10.);
        let temperature = pressure.mapv(|p| {
            if p < 80. {
                10.
            } else if p <= 90. {
                11.
            } else {
                11. - (p - 90.) * 0.02
            }
        });
        (pressure, temperature)
    }

    #[test]
    fn test_subsurface_maximum_near_gradient() {
        let (pressure, temperature) = intrusion();
        let series = Series {
            pressure: pressure.view(),
            values: temperature.view(),
        };
        assert_eq!(max_gradient_depth(&series), Some(70.));
        assert_eq!(extrema_depth(&series, Extremum::Maximum), Some(80.));
        assert_eq!(subsurface_depth(&series, Extremum::Maximum, 100.), Some(70.));
    }

    #[test]
    fn test_subsurface_too_far_apart() {
        let (pressure, temperature) = intrusion();
        let series = Series {
            pressure: pressure.view(),
            values: temperature.view(),
        };
        assert_eq!(subsurface_depth(&series, Extremum::Maximum, 5.), None);
    }
}
