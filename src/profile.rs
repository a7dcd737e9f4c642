// schismrs-mld/src/profile.rs

use crate::errors::ProfileError;
use log::{debug, trace};
use ndarray::{Array1, ArrayView1};
use std::fmt;

/// Property measured along a cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Temperature,
    Salinity,
    Density,
}

impl Variable {
    pub const ALL: [Variable; 3] = [Variable::Temperature, Variable::Salinity, Variable::Density];

    pub fn name(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            Variable::Salinity => "salinity",
            Variable::Density => "density",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Source of potential density when only salinity and temperature were measured.
pub trait EquationOfState: Sync {
    fn potential_density(&self, salinity: f64, temperature: f64, pressure: f64) -> f64;
}

/// Linearized equation of state around a reference water mass.
///
/// Good enough to rank stratification inside a single cast; use a full TEOS-10
/// implementation when absolute densities matter.
#[derive(Clone, Debug)]
pub struct LinearEos {
    pub rho0: f64,
    pub t0: f64,
    pub s0: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl Default for LinearEos {
    fn default() -> Self {
        Self {
            rho0: 1027.,
            t0: 10.,
            s0: 35.,
            alpha: 1.7e-4,
            beta: 7.6e-4,
        }
    }
}

impl EquationOfState for LinearEos {
    fn potential_density(&self, salinity: f64, temperature: f64, _pressure: f64) -> f64 {
        self.rho0 * (1. - self.alpha * (temperature - self.t0) + self.beta * (salinity - self.s0))
    }
}

/// Raw cast as handed over by the caller. Samples may be unsorted or contain NaNs.
#[derive(Clone, Debug)]
pub struct Profile {
    pressure: Array1<f64>,
    temperature: Array1<f64>,
    salinity: Option<Array1<f64>>,
    density: Option<Array1<f64>>,
}

impl Profile {
    pub fn pressure(&self) -> &Array1<f64> {
        &self.pressure
    }

    pub fn temperature(&self) -> &Array1<f64> {
        &self.temperature
    }

    pub fn salinity(&self) -> Option<&Array1<f64>> {
        self.salinity.as_ref()
    }

    pub fn density(&self) -> Option<&Array1<f64>> {
        self.density.as_ref()
    }

    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Sorts by pressure, drops non-finite samples and everything shallower
    /// than `reference_pressure`.
    ///
    /// Density is taken from the profile when present, otherwise derived from
    /// salinity through `eos`. A sample is kept only when every channel that
    /// exists for this cast is finite at that sample.
    pub fn preprocess(
        &self,
        reference_pressure: f64,
        eos: &dyn EquationOfState,
    ) -> Preprocessed {
        let density = match (&self.density, &self.salinity) {
            (Some(density), _) => Some(density.clone()),
            (None, Some(salinity)) => Some(
                (0..self.len())
                    .map(|i| {
                        eos.potential_density(salinity[i], self.temperature[i], self.pressure[i])
                    })
                    .collect::<Array1<f64>>(),
            ),
            (None, None) => None,
        };

        let mut keep: Vec<usize> = (0..self.len())
            .filter(|&i| {
                let p = self.pressure[i];
                p.is_finite()
                    && p >= reference_pressure
                    && self.temperature[i].is_finite()
                    && self.salinity.as_ref().map_or(true, |s| s[i].is_finite())
                    && density.as_ref().map_or(true, |d| d[i].is_finite())
            })
            .collect();
        keep.sort_by(|&a, &b| self.pressure[a].total_cmp(&self.pressure[b]));
        // repeated pressures would make the gradient undefined; first one wins
        keep.dedup_by(|b, a| self.pressure[*a] == self.pressure[*b]);

        trace!(
            "Retained {} of {} samples at or below {} dbar",
            keep.len(),
            self.len(),
            reference_pressure
        );

        if keep.len() < 2 {
            debug!(
                "Insufficient data: {} usable samples below {} dbar",
                keep.len(),
                reference_pressure
            );
            return Preprocessed::InsufficientData {
                retained: keep.len(),
            };
        }

        let select = |values: &Array1<f64>| {
            keep.iter()
                .map(|&i| values[i])
                .collect::<Array1<f64>>()
        };
        Preprocessed::Ready(CleanProfile {
            pressure: select(&self.pressure),
            temperature: select(&self.temperature),
            salinity: self.salinity.as_ref().map(select),
            density: density.as_ref().map(select),
        })
    }
}

#[derive(Clone, Debug)]
pub enum Preprocessed {
    Ready(CleanProfile),
    InsufficientData { retained: usize },
}

/// Cast restricted to finite samples below the reference pressure, with
/// strictly increasing pressure.
#[derive(Clone, Debug)]
pub struct CleanProfile {
    pressure: Array1<f64>,
    temperature: Array1<f64>,
    salinity: Option<Array1<f64>>,
    density: Option<Array1<f64>>,
}

impl CleanProfile {
    pub fn pressure(&self) -> &Array1<f64> {
        &self.pressure
    }

    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    pub fn min_pressure(&self) -> f64 {
        self.pressure[0]
    }

    pub fn max_pressure(&self) -> f64 {
        self.pressure[self.pressure.len() - 1]
    }

    pub fn values(&self, variable: Variable) -> Option<&Array1<f64>> {
        match variable {
            Variable::Temperature => Some(&self.temperature),
            Variable::Salinity => self.salinity.as_ref(),
            Variable::Density => self.density.as_ref(),
        }
    }

    pub fn series(&self, variable: Variable) -> Option<Series<'_>> {
        self.values(variable).map(|values| Series {
            pressure: self.pressure.view(),
            values: values.view(),
        })
    }

    /// Variables that carry data for this cast, in `Variable::ALL` order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        Variable::ALL
            .into_iter()
            .filter(move |&variable| self.values(variable).is_some())
    }
}

/// One property against pressure, the unit every metric works on.
#[derive(Clone, Copy, Debug)]
pub struct Series<'a> {
    pub pressure: ArrayView1<'a, f64>,
    pub values: ArrayView1<'a, f64>,
}

impl<'a> Series<'a> {
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }
}

#[derive(Default)]
pub struct ProfileBuilder<'a> {
    pressure: Option<&'a [f64]>,
    temperature: Option<&'a [f64]>,
    salinity: Option<&'a [f64]>,
    density: Option<&'a [f64]>,
}

impl<'a> ProfileBuilder<'a> {
    pub fn build(&self) -> Result<Profile, ProfileError> {
        let pressure = self
            .pressure
            .ok_or_else(|| ProfileError::UninitializedFieldError("pressure".to_string()))?;
        let temperature = self
            .temperature
            .ok_or_else(|| ProfileError::UninitializedFieldError("temperature".to_string()))?;
        Self::validate_length(pressure, temperature, "temperature")?;
        if let Some(salinity) = self.salinity {
            Self::validate_length(pressure, salinity, "salinity")?;
        }
        if let Some(density) = self.density {
            Self::validate_length(pressure, density, "density")?;
        }
        Ok(Profile {
            pressure: Array1::from(pressure.to_vec()),
            temperature: Array1::from(temperature.to_vec()),
            salinity: self.salinity.map(|s| Array1::from(s.to_vec())),
            density: self.density.map(|d| Array1::from(d.to_vec())),
        })
    }

    fn validate_length(
        pressure: &[f64],
        other: &[f64],
        name: &'static str,
    ) -> Result<(), ProfileError> {
        if pressure.len() != other.len() {
            return Err(ProfileError::LengthMismatch(pressure.len(), name, other.len()));
        }
        Ok(())
    }

    pub fn pressure(&mut self, pressure: &'a [f64]) -> &mut Self {
        self.pressure = Some(pressure);
        self
    }
    pub fn temperature(&mut self, temperature: &'a [f64]) -> &mut Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn salinity(&mut self, salinity: &'a [f64]) -> &mut Self {
        self.salinity = Some(salinity);
        self
    }
    pub fn density(&mut self, density: &'a [f64]) -> &mut Self {
        self.density = Some(density);
        self
    }
}
