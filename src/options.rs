// schismrs-mld/src/options.rs

use crate::errors::MldOptionsError;
use crate::metrics::Metric;

/// Tunables of the estimator. Every field has a documented default; see
/// `MldOptionsBuilder` for a validating way to construct one.
#[derive(Clone, Debug, PartialEq)]
pub struct MldOptions {
    /// Samples shallower than this (dbar) are ignored.
    pub reference_pressure: f64,
    /// Temperature difference from the reference sample (deg C).
    pub temperature_threshold: f64,
    /// Density difference from the reference sample (kg/m^3).
    pub density_threshold: f64,
    /// Temperature gradient cutoff (deg C/dbar).
    pub temperature_gradient: f64,
    /// Density gradient cutoff (kg/m^3/dbar).
    pub density_gradient: f64,
    /// Normalized residual allowed while growing the mixed-layer fit.
    pub error_tolerance: f64,
    /// Maximum separation (dbar) of candidates treated as one cluster.
    pub range: f64,
    /// Maximum separation (dbar) of gradient maximum and extremum for the
    /// subsurface metric.
    pub subsurface_separation: f64,
    pub tcutoff_lower: f64,
    pub tcutoff_upper: f64,
    pub dcutoff: f64,
    /// Thickness (dbar) of the band used to classify the profile.
    pub classification_band: f64,
    pub metrics: Vec<Metric>,
}

impl Default for MldOptions {
    fn default() -> Self {
        Self {
            reference_pressure: 10.,
            temperature_threshold: 0.2,
            density_threshold: 0.03,
            temperature_gradient: 0.005,
            density_gradient: 0.0005,
            error_tolerance: 1e-10,
            range: 25.,
            subsurface_separation: 100.,
            tcutoff_lower: -0.25,
            tcutoff_upper: 0.5,
            dcutoff: -0.06,
            classification_band: 100.,
            metrics: Metric::ALL.to_vec(),
        }
    }
}

impl MldOptions {
    pub fn validate(&self) -> Result<(), MldOptionsError> {
        if !self.reference_pressure.is_finite() {
            return Err(MldOptionsError::InvalidReferencePressure(
                self.reference_pressure,
            ));
        }
        for (name, value) in [
            ("temperature_threshold", self.temperature_threshold),
            ("density_threshold", self.density_threshold),
            ("temperature_gradient", self.temperature_gradient),
            ("density_gradient", self.density_gradient),
            ("range", self.range),
            ("subsurface_separation", self.subsurface_separation),
            ("classification_band", self.classification_band),
        ] {
            Self::validate_threshold(name, value)?;
        }
        Self::validate_error_tolerance(&self.error_tolerance)?;
        Self::validate_temperature_cutoffs(&self.tcutoff_lower, &self.tcutoff_upper)?;
        if !self.dcutoff.is_finite() {
            return Err(MldOptionsError::InvalidDensityCutoff(self.dcutoff));
        }
        if self.metrics.is_empty() {
            return Err(MldOptionsError::NoMetrics);
        }
        Ok(())
    }

    pub fn runs(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    fn validate_threshold(name: &'static str, value: f64) -> Result<(), MldOptionsError> {
        if !value.is_finite() || value < 0. {
            return Err(MldOptionsError::InvalidThreshold(name, value));
        }
        Ok(())
    }

    fn validate_error_tolerance(error_tolerance: &f64) -> Result<(), MldOptionsError> {
        if !error_tolerance.is_finite() || *error_tolerance <= 0. {
            return Err(MldOptionsError::InvalidErrorTolerance(*error_tolerance));
        }
        Ok(())
    }

    fn validate_temperature_cutoffs(lower: &f64, upper: &f64) -> Result<(), MldOptionsError> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(MldOptionsError::InvalidTemperatureCutoffs(*lower, *upper));
        }
        Ok(())
    }
}

/// Starts from the defaults and overrides only what was set.
#[derive(Default)]
pub struct MldOptionsBuilder {
    reference_pressure: Option<f64>,
    temperature_threshold: Option<f64>,
    density_threshold: Option<f64>,
    temperature_gradient: Option<f64>,
    density_gradient: Option<f64>,
    error_tolerance: Option<f64>,
    range: Option<f64>,
    subsurface_separation: Option<f64>,
    tcutoff_lower: Option<f64>,
    tcutoff_upper: Option<f64>,
    dcutoff: Option<f64>,
    classification_band: Option<f64>,
    metrics: Option<Vec<Metric>>,
}

impl MldOptionsBuilder {
    pub fn build(&self) -> Result<MldOptions, MldOptionsError> {
        let defaults = MldOptions::default();
        let options = MldOptions {
            reference_pressure: self.reference_pressure.unwrap_or(defaults.reference_pressure),
            temperature_threshold: self
                .temperature_threshold
                .unwrap_or(defaults.temperature_threshold),
            density_threshold: self.density_threshold.unwrap_or(defaults.density_threshold),
            temperature_gradient: self
                .temperature_gradient
                .unwrap_or(defaults.temperature_gradient),
            density_gradient: self.density_gradient.unwrap_or(defaults.density_gradient),
            error_tolerance: self.error_tolerance.unwrap_or(defaults.error_tolerance),
            range: self.range.unwrap_or(defaults.range),
            subsurface_separation: self
                .subsurface_separation
                .unwrap_or(defaults.subsurface_separation),
            tcutoff_lower: self.tcutoff_lower.unwrap_or(defaults.tcutoff_lower),
            tcutoff_upper: self.tcutoff_upper.unwrap_or(defaults.tcutoff_upper),
            dcutoff: self.dcutoff.unwrap_or(defaults.dcutoff),
            classification_band: self
                .classification_band
                .unwrap_or(defaults.classification_band),
            metrics: self.metrics.clone().unwrap_or(defaults.metrics),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn reference_pressure(&mut self, reference_pressure: f64) -> &mut Self {
        self.reference_pressure = Some(reference_pressure);
        self
    }
    pub fn temperature_threshold(&mut self, temperature_threshold: f64) -> &mut Self {
        self.temperature_threshold = Some(temperature_threshold);
        self
    }
    pub fn density_threshold(&mut self, density_threshold: f64) -> &mut Self {
        self.density_threshold = Some(density_threshold);
        self
    }
    pub fn temperature_gradient(&mut self, temperature_gradient: f64) -> &mut Self {
        self.temperature_gradient = Some(temperature_gradient);
        self
    }
    pub fn density_gradient(&mut self, density_gradient: f64) -> &mut Self {
        self.density_gradient = Some(density_gradient);
        self
    }
    pub fn error_tolerance(&mut self, error_tolerance: f64) -> &mut Self {
        self.error_tolerance = Some(error_tolerance);
        self
    }
    pub fn range(&mut self, range: f64) -> &mut Self {
        self.range = Some(range);
        self
    }
    pub fn subsurface_separation(&mut self, subsurface_separation: f64) -> &mut Self {
        self.subsurface_separation = Some(subsurface_separation);
        self
    }
    pub fn tcutoff_lower(&mut self, tcutoff_lower: f64) -> &mut Self {
        self.tcutoff_lower = Some(tcutoff_lower);
        self
    }
    pub fn tcutoff_upper(&mut self, tcutoff_upper: f64) -> &mut Self {
        self.tcutoff_upper = Some(tcutoff_upper);
        self
    }
    pub fn dcutoff(&mut self, dcutoff: f64) -> &mut Self {
        self.dcutoff = Some(dcutoff);
        self
    }
    pub fn classification_band(&mut self, classification_band: f64) -> &mut Self {
        self.classification_band = Some(classification_band);
        self
    }
    pub fn metrics(&mut self, metrics: Vec<Metric>) -> &mut Self {
        self.metrics = Some(metrics);
        self
    }
}
