// schismrs-mld/src/metrics/gradient.rs

use crate::profile::Series;
use ndarray::{s, Array1};
use ndarray_stats::QuantileExt;

/// Forward differences `dv/dp` between consecutive samples. Element `i`
/// belongs to the pair `(i, i + 1)`.
pub fn gradient(series: &Series) -> Array1<f64> {
    if series.len() < 2 {
        return Array1::zeros(0);
    }
    let dv = &series.values.slice(s![1..]) - &series.values.slice(s![..-1]);
    let dp = &series.pressure.slice(s![1..]) - &series.pressure.slice(s![..-1]);
    dv / dp
}

/// Index of the pair with the largest |gradient|, shallowest on ties.
pub fn max_gradient_index(series: &Series) -> Option<usize> {
    gradient(series).mapv(f64::abs).argmax().ok()
}

pub fn max_gradient_depth(series: &Series) -> Option<f64> {
    max_gradient_index(series).map(|i| series.pressure[i])
}

/// First pressure whose |gradient| exceeds `threshold`, falling back to the
/// max-gradient pressure. Without a threshold only the fallback is used.
pub fn gradient_depth(series: &Series, threshold: Option<f64>) -> Option<f64> {
    let grad = gradient(series);
    if let Some(threshold) = threshold {
        if let Some(i) = grad.iter().position(|g| g.abs() > threshold) {
            return Some(series.pressure[i]);
        }
    }
    grad.mapv(f64::abs)
        .argmax()
        .ok()
        .map(|i| series.pressure[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_on_irregular_grid() {
        let pressure = Array1::from(vec![10., 15., 35.]);
        let values = Array1::from(vec![10., 9., 8.]);
        let series = Series {
            pressure: pressure.view(),
            values: values.view(),
        };
        let grad = gradient(&series);
        assert_eq!(grad.len(), 2);
        assert!((grad[0] + 0.2).abs() < 1e-12);
        assert!((grad[1] + 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_step_change() {
        let pressure = Array1::range(10., 201., 10.);
        let temperature = pressure.mapv(|p| if p < 100. { 20. } else { 12. });
        let series = Series {
            pressure: pressure.view(),
            values: temperature.view(),
        };
        let depth = gradient_depth(&series, Some(0.005)).unwrap();
        assert!((depth - 100.).abs() <= 10.);
        assert_eq!(max_gradient_depth(&series), Some(90.));
    }

    #[test]
    fn test_fallback_to_max_gradient() {
        let pressure = Array1::from(vec![10., 20., 30., 40., 50.]);
        let values = Array1::from(vec![20., 19.99, 19.97, 19.96, 19.955]);
        let series = Series {
            pressure: pressure.view(),
            values: values.view(),
        };
        assert_eq!(gradient_depth(&series, Some(0.005)), Some(20.));
        assert_eq!(gradient_depth(&series, None), Some(20.));
    }

    #[test]
    fn test_single_sample_has_no_gradient() {
        let pressure = Array1::from(vec![10.]);
        let values = Array1::from(vec![20.]);
        let series = Series {
            pressure: pressure.view(),
            values: values.view(),
        };
        assert!(gradient(&series).is_empty());
        assert_eq!(gradient_depth(&series, Some(0.1)), None);
    }

    #[test]
    fn test_tied_gradients_resolve_to_shallowest_pair() {
        let pressure = Array1::from(vec![10., 20., 30., 40., 50.]);
        let values = Array1::from(vec![10., 10., 9., 9., 8.]);
        let series = Series {
            pressure: pressure.view(),
            values: values.view(),
        };
        let grad = gradient(&series);
        assert_eq!(grad[1], grad[3]);
        assert_eq!(max_gradient_index(&series), Some(1));
        assert_eq!(max_gradient_depth(&series), Some(20.));
        assert_eq!(gradient_depth(&series, None), Some(20.));
    }
}
