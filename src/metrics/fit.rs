// schismrs-mld/src/metrics/fit.rs

use super::gradient::max_gradient_index;
use crate::profile::Series;
use log::trace;
use ndarray::{s, ArrayView1};

/// Slopes closer than this are treated as parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// `value = slope * pressure + intercept`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// Least-squares line through `(x, y)`. Needs two distinct abscissae.
    pub fn fit(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Option<Line> {
        if x.len() < 2 || x.len() != y.len() {
            return None;
        }
        let x_mean = x.mean()?;
        let y_mean = y.mean()?;
        let dx = x.mapv(|xi| xi - x_mean);
        let sxx = dx.dot(&dx);
        if sxx <= 0. {
            return None;
        }
        let sxy = dx.dot(&y.mapv(|yi| yi - y_mean));
        let slope = sxy / sxx;
        Some(Line {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    pub fn eval(&self, pressure: f64) -> f64 {
        self.slope * pressure + self.intercept
    }

    pub fn sum_squared_residuals(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        x.iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| (yi - self.eval(xi)).powi(2))
            .sum()
    }

    /// Pressure where the two lines cross, `None` when they are parallel.
    pub fn intersect(&self, other: &Line) -> Option<f64> {
        let dslope = self.slope - other.slope;
        if dslope.abs() < PARALLEL_EPS {
            return None;
        }
        Some((other.intercept - self.intercept) / dslope)
    }
}

/// Line through the top of the cast, grown downward while the normalized
/// residual stays below `error_tolerance`.
///
/// Residuals of every top subset `[0..=j]`, `j >= 2`, are normalized by their
/// sum. Least-squares residuals never shrink when a point is added, so the
/// deepest qualifying subset is also the last one reached by growing.
pub fn mixed_layer_line(series: &Series, error_tolerance: f64) -> Option<Line> {
    let n = series.len();
    if n < 3 {
        return None;
    }
    let errors: Vec<f64> = (2..n)
        .map(|j| {
            let x = series.pressure.slice(s![..=j]);
            let y = series.values.slice(s![..=j]);
            Line::fit(x, y).map_or(f64::INFINITY, |line| line.sum_squared_residuals(x, y))
        })
        .collect();
    let total: f64 = errors.iter().sum();
    let deepest = if total == 0. {
        n - 1
    } else {
        errors
            .iter()
            .take_while(|&&error| error / total < error_tolerance)
            .count()
            + 1
    };
    trace!("Mixed layer fit spans samples 0..={}", deepest);
    Line::fit(
        series.pressure.slice(s![..=deepest]),
        series.values.slice(s![..=deepest]),
    )
}

/// Line through the samples around the steepest pair.
pub fn transition_line(series: &Series) -> Option<Line> {
    let i = max_gradient_index(series)?;
    let lo = i.saturating_sub(1);
    let hi = (i + 1).min(series.len() - 1);
    Line::fit(
        series.pressure.slice(s![lo..=hi]),
        series.values.slice(s![lo..=hi]),
    )
}

/// Intersection of the mixed layer and transition lines.
pub fn fit_depth(series: &Series, error_tolerance: f64) -> Option<f64> {
    let mixed = mixed_layer_line(series, error_tolerance)?;
    let transition = transition_line(series)?;
    let depth = mixed.intersect(&transition)?;
    let (top, bottom) = (series.pressure[0], series.pressure[series.len() - 1]);
    if !(top..=bottom).contains(&depth) {
        trace!(
            "Fit intersection {} outside of [{}, {}]",
            depth,
            top,
            bottom
        );
        return None;
    }
    Some(depth.max(0.))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_line_fit_exact() {
        let x = Array1::from(vec![0., 1., 2., 3.]);
        let y = x.mapv(|v| 2. * v - 1.);
        let line = Line::fit(x.view(), y.view()).unwrap();
        assert!((line.slope - 2.).abs() < 1e-12);
        assert!((line.intercept + 1.).abs() < 1e-12);
        assert!(line.sum_squared_residuals(x.view(), y.view()) < 1e-20);
    }

    #[test]
    fn test_line_fit_degenerate() {
        let x = Array1::from(vec![5., 5.]);
        let y = Array1::from(vec![1., 2.]);
        assert_eq!(Line::fit(x.view(), y.view()), None);
        let a = Line {
            slope: 0.5,
            intercept: 1.,
        };
        assert_eq!(a.intersect(&a), None);
    }

    #[test]
    fn test_fit_thermocline() {
        let pressure = Array1::range(10., 501., 10.);
        let temperature = pressure.mapv(|p| {
            if p <= 200. {
                15.
            } else {
                15. - 10. * (p - 200.) / 300.
            }
        });
        let series = Series {
            pressure: pressure.view(),
            values: temperature.view(),
        };
        let mixed = mixed_layer_line(&series, 1e-10).unwrap();
        assert!(mixed.slope.abs() < 1e-12);
        let depth = fit_depth(&series, 1e-10).unwrap();
        assert!((depth - 200.).abs() <= 10., "depth {}", depth);
        // same inputs, same bits
        assert_eq!(fit_depth(&series, 1e-10), Some(depth));
    }

    #[test]
    fn test_fit_linear_profile_has_no_intersection() {
        let pressure = Array1::range(10., 101., 10.);
        let temperature = pressure.mapv(|p| 20. - 0.01 * p);
        let series = Series {
            pressure: pressure.view(),
            values: temperature.view(),
        };
        assert_eq!(fit_depth(&series, 1e-10), None);
    }

    #[test]
    fn test_fit_needs_three_samples() {
        let pressure = Array1::from(vec![10., 20.]);
        let values = Array1::from(vec![15., 14.]);
        let series = Series {
            pressure: pressure.view(),
            values: values.view(),
        };
        assert_eq!(fit_depth(&series, 1e-10), None);
    }
}
