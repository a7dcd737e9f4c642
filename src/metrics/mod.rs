// schismrs-mld/src/metrics/mod.rs

pub mod extrema;
pub mod fit;
pub mod gradient;
pub mod subsurface;
pub mod threshold;

use crate::options::MldOptions;
use crate::profile::{CleanProfile, Series, Variable};
use log::trace;
use std::fmt;
use std::str::FromStr;

/// Candidate-depth calculators. Each one is a pure function of a series and
/// the options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Threshold,
    Gradient,
    Fit,
    Extrema,
    Subsurface,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Threshold,
        Metric::Gradient,
        Metric::Fit,
        Metric::Extrema,
        Metric::Subsurface,
    ];

    /// Higher wins when several metrics agree on a depth.
    pub fn precedence(&self) -> u8 {
        match self {
            Metric::Fit => 4,
            Metric::Threshold => 3,
            Metric::Gradient => 2,
            Metric::Subsurface => 1,
            Metric::Extrema => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Threshold => "threshold",
            Metric::Gradient => "gradient",
            Metric::Fit => "fit",
            Metric::Extrema => "extrema",
            Metric::Subsurface => "subsurface",
        }
    }

    /// Runs the metric on one series.
    ///
    /// Returns `None` both when nothing was found and when the metric does not
    /// apply to the variable; use `Capabilities::supports` to tell them apart.
    pub fn estimate(
        &self,
        series: &Series,
        variable: Variable,
        options: &MldOptions,
    ) -> Option<f64> {
        let capabilities = Capabilities::of(variable);
        if !capabilities.supports(*self) {
            return None;
        }
        match self {
            Metric::Threshold => {
                let threshold = capabilities.threshold.map(|tunable| tunable(options))?;
                threshold::threshold_depth(series, threshold)
            }
            Metric::Gradient => {
                let threshold = capabilities.gradient_threshold.map(|tunable| tunable(options));
                gradient::gradient_depth(series, threshold)
            }
            Metric::Fit => fit::fit_depth(series, options.error_tolerance),
            Metric::Extrema => extrema::extrema_depth(series, capabilities.extremum),
            Metric::Subsurface => subsurface::subsurface_depth(
                series,
                capabilities.extremum,
                options.subsurface_separation,
            ),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown metric {:?}, expected one of: threshold, gradient, fit, extrema, subsurface",
                    s
                )
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extremum {
    Maximum,
    Minimum,
}

type Tunable = fn(&MldOptions) -> f64;

/// What each metric is allowed to do with a given variable.
pub struct Capabilities {
    pub variable: Variable,
    pub extremum: Extremum,
    /// `None` when the threshold metric does not apply.
    pub threshold: Option<Tunable>,
    /// `None` when only the max-gradient fallback is defined.
    pub gradient_threshold: Option<Tunable>,
    pub subsurface: bool,
}

fn temperature_threshold(options: &MldOptions) -> f64 {
    options.temperature_threshold
}

fn temperature_gradient(options: &MldOptions) -> f64 {
    options.temperature_gradient
}

fn density_threshold(options: &MldOptions) -> f64 {
    options.density_threshold
}

fn density_gradient(options: &MldOptions) -> f64 {
    options.density_gradient
}

// salinity has no agreed threshold, and its extremum is the freshest sample
static CAPABILITIES: [Capabilities; 3] = [
    Capabilities {
        variable: Variable::Temperature,
        extremum: Extremum::Maximum,
        threshold: Some(temperature_threshold),
        gradient_threshold: Some(temperature_gradient),
        subsurface: true,
    },
    Capabilities {
        variable: Variable::Salinity,
        extremum: Extremum::Minimum,
        threshold: None,
        gradient_threshold: None,
        subsurface: true,
    },
    Capabilities {
        variable: Variable::Density,
        extremum: Extremum::Minimum,
        threshold: Some(density_threshold),
        gradient_threshold: Some(density_gradient),
        subsurface: false,
    },
];

impl Capabilities {
    pub fn of(variable: Variable) -> &'static Capabilities {
        match variable {
            Variable::Temperature => &CAPABILITIES[0],
            Variable::Salinity => &CAPABILITIES[1],
            Variable::Density => &CAPABILITIES[2],
        }
    }

    pub fn supports(&self, metric: Metric) -> bool {
        match metric {
            Metric::Threshold => self.threshold.is_some(),
            Metric::Subsurface => self.subsurface,
            Metric::Gradient | Metric::Fit | Metric::Extrema => true,
        }
    }
}

/// One proposed mixed layer depth. `depth` is `None` when the metric found
/// nothing usable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub metric: Metric,
    pub variable: Variable,
    pub depth: Option<f64>,
}

/// Every applicable (metric, variable) result for one profile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateTable {
    candidates: Vec<Candidate>,
}

impl CandidateTable {
    pub fn compute(profile: &CleanProfile, options: &MldOptions) -> Self {
        let mut candidates = Vec::new();
        for variable in profile.variables() {
            let series = match profile.series(variable) {
                Some(series) => series,
                None => continue,
            };
            let capabilities = Capabilities::of(variable);
            for metric in Metric::ALL {
                if !options.runs(metric) || !capabilities.supports(metric) {
                    continue;
                }
                let depth = metric.estimate(&series, variable, options);
                trace!("{} {} candidate: {:?}", variable, metric, depth);
                candidates.push(Candidate {
                    metric,
                    variable,
                    depth,
                });
            }
        }
        Self { candidates }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// `None` when the pair was never evaluated, `Some(None)` when it was
    /// evaluated without result.
    pub fn get(&self, metric: Metric, variable: Variable) -> Option<Option<f64>> {
        self.candidates
            .iter()
            .find(|c| c.metric == metric && c.variable == variable)
            .map(|c| c.depth)
    }

    pub fn for_variable(&self, variable: Variable) -> impl Iterator<Item = &Candidate> {
        self.candidates
            .iter()
            .filter(move |c| c.variable == variable)
    }
}

impl From<Vec<Candidate>> for CandidateTable {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl fmt::Display for CandidateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} {:<11} {:>10}", "variable", "metric", "depth")?;
        for candidate in &self.candidates {
            match candidate.depth {
                Some(depth) => writeln!(
                    f,
                    "{:<12} {:<11} {:>10.2}",
                    candidate.variable.name(),
                    candidate.metric.name(),
                    depth
                )?,
                None => writeln!(
                    f,
                    "{:<12} {:<11} {:>10}",
                    candidate.variable.name(),
                    candidate.metric.name(),
                    "-"
                )?,
            }
        }
        Ok(())
    }
}
