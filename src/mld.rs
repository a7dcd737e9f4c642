// schismrs-mld/src/mld.rs

use crate::errors::MldError;
use crate::metrics::{Candidate, CandidateTable, Capabilities, Metric};
use crate::options::MldOptions;
use crate::profile::{
    EquationOfState, LinearEos, Preprocessed, Profile, ProfileBuilder, Variable,
};
use crate::selector::{select, summarize, Classification, DecisionStep};
use log::debug;

/// Mixed layer depth of one cast together with how it was reached.
#[derive(Clone, Debug, PartialEq)]
pub struct MldResult {
    /// `None` when no metric produced anything usable.
    pub depth: Option<f64>,
    pub variable: Option<Variable>,
    pub metric: Option<Metric>,
    /// `None` when the cast was too short to classify.
    pub classification: Option<Classification>,
    pub candidates: CandidateTable,
    pub pathway: Vec<DecisionStep>,
}

impl MldResult {
    pub fn is_determined(&self) -> bool {
        self.depth.is_some()
    }

    /// Maps "undetermined" onto a scalar for interfaces that need one,
    /// e.g. `NaN` for arrays or `0.` for legacy consumers.
    pub fn depth_or(&self, sentinel: f64) -> f64 {
        self.depth.unwrap_or(sentinel)
    }

    pub fn pathway_summary(&self) -> String {
        summarize(&self.pathway)
    }
}

/// Estimates the mixed layer depth of `profile`, deriving density from
/// salinity with `LinearEos` when no density was supplied.
pub fn find_mld(profile: &Profile, options: &MldOptions) -> Result<MldResult, MldError> {
    find_mld_with_eos(profile, options, &LinearEos::default())
}

pub fn find_mld_with_eos(
    profile: &Profile,
    options: &MldOptions,
    eos: &dyn EquationOfState,
) -> Result<MldResult, MldError> {
    options.validate()?;

    let clean = match profile.preprocess(options.reference_pressure, eos) {
        Preprocessed::Ready(clean) => clean,
        Preprocessed::InsufficientData { retained } => {
            return Ok(MldResult {
                depth: None,
                variable: None,
                metric: None,
                classification: None,
                candidates: unresolved_candidates(profile, options),
                pathway: vec![DecisionStep::InsufficientData { retained }],
            });
        }
    };

    debug!(
        "{} samples between {} and {} dbar",
        clean.len(),
        clean.min_pressure(),
        clean.max_pressure()
    );
    let candidates = CandidateTable::compute(&clean, options);
    debug!("Candidates:\n{}", candidates);
    let selection = select(&clean, &candidates, options);
    let result = MldResult {
        depth: selection.consensus.as_ref().map(|c| c.depth),
        variable: selection.consensus.as_ref().map(|c| c.variable),
        metric: selection.consensus.as_ref().map(|c| c.metric),
        classification: Some(selection.classification),
        candidates,
        pathway: selection.pathway,
    };
    debug!(
        "MLD {:?} from {:?}/{:?} ({})",
        result.depth,
        result.variable,
        result.metric,
        result.pathway_summary()
    );
    Ok(result)
}

/// Builds the cast from raw columns and estimates its mixed layer depth.
/// Columns of different lengths are reported as `MldError::ProfileError`.
pub fn find_mld_from_arrays(
    pressure: &[f64],
    temperature: &[f64],
    salinity: Option<&[f64]>,
    options: &MldOptions,
) -> Result<MldResult, MldError> {
    let mut builder = ProfileBuilder::default();
    builder.pressure(pressure).temperature(temperature);
    if let Some(salinity) = salinity {
        builder.salinity(salinity);
    }
    let profile = builder.build()?;
    find_mld(&profile, options)
}

/// Candidate table of a cast with no usable samples: every applicable pair,
/// each without a depth.
fn unresolved_candidates(profile: &Profile, options: &MldOptions) -> CandidateTable {
    let variables = Variable::ALL.into_iter().filter(|variable| match variable {
        Variable::Temperature => true,
        Variable::Salinity => profile.salinity().is_some(),
        Variable::Density => profile.density().is_some() || profile.salinity().is_some(),
    });
    let mut candidates = Vec::new();
    for variable in variables {
        let capabilities = Capabilities::of(variable);
        for metric in Metric::ALL {
            if options.runs(metric) && capabilities.supports(metric) {
                candidates.push(Candidate {
                    metric,
                    variable,
                    depth: None,
                });
            }
        }
    }
    CandidateTable::from(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProfileError;
    use crate::options::MldOptionsBuilder;
    use crate::selector::Reconciliation;

    fn pressure() -> Vec<f64> {
        (1..=50).map(|i| i as f64 * 10.).collect()
    }

    fn thermocline_temperature(pressure: &[f64]) -> Vec<f64> {
        pressure
            .iter()
            .map(|&p| {
                if p <= 200. {
                    15.
                } else {
                    15. - 10. * (p - 200.) / 300.
                }
            })
            .collect()
    }

    #[test]
    fn test_thermocline_scenario() {
        crate::_setup_pretty_env_logger_default();
        let pressure = pressure();
        let temperature = thermocline_temperature(&pressure);
        let profile = ProfileBuilder::default()
            .pressure(&pressure)
            .temperature(&temperature)
            .build()
            .unwrap();
        let result = find_mld(&profile, &MldOptions::default()).unwrap();
        assert_eq!(
            result.candidates.get(Metric::Threshold, Variable::Temperature),
            Some(Some(210.))
        );
        let depth = result.depth.unwrap();
        assert!((depth - 200.).abs() <= 10., "depth {}", depth);
        assert_eq!(result.variable, Some(Variable::Temperature));
        assert_eq!(result.metric, Some(Metric::Fit));
        assert_eq!(result.classification, Some(Classification::NotWinterLike));
    }

    #[test]
    fn test_all_samples_non_finite_below_reference() {
        let pressure = pressure();
        let temperature: Vec<f64> = pressure
            .iter()
            .map(|&p| if p < 10. { 20. } else { f64::NAN })
            .collect();
        let salinity = vec![35.; pressure.len()];
        let profile = ProfileBuilder::default()
            .pressure(&pressure)
            .temperature(&temperature)
            .salinity(&salinity)
            .build()
            .unwrap();
        let result = find_mld(&profile, &MldOptions::default()).unwrap();
        assert!(!result.is_determined());
        assert!(result.depth_or(f64::NAN).is_nan());
        assert_eq!(result.depth_or(0.), 0.);
        assert!(!result.candidates.is_empty());
        assert!(result.candidates.iter().all(|c| c.depth.is_none()));
        assert_eq!(
            result.pathway,
            vec![DecisionStep::InsufficientData { retained: 0 }]
        );
        assert_eq!(result.pathway_summary(), "insufficient-data");
    }

    #[test]
    fn test_temperature_and_density_agree_not_winter() {
        let pressure = pressure();
        // shallow mixed layer, so the surface band is stratified
        let temperature: Vec<f64> = pressure
            .iter()
            .map(|&p| if p <= 60. { 15. } else { 15. - 0.02 * (p - 60.) })
            .collect();
        let salinity = vec![35.; pressure.len()];
        let profile = ProfileBuilder::default()
            .pressure(&pressure)
            .temperature(&temperature)
            .salinity(&salinity)
            .build()
            .unwrap();
        let result = find_mld(&profile, &MldOptions::default()).unwrap();
        assert_eq!(result.classification, Some(Classification::NotWinterLike));
        assert_eq!(result.variable, Some(Variable::Temperature));
        let depth = result.depth.unwrap();
        assert!((depth - 60.).abs() <= 10., "depth {}", depth);
        let reconciled = result
            .pathway
            .iter()
            .find_map(|step| match step {
                DecisionStep::Reconciled { reconciliation, .. } => Some(*reconciliation),
                _ => None,
            })
            .unwrap();
        assert_eq!(reconciled, Reconciliation::Agreement);
    }

    #[test]
    fn test_result_within_profile_bounds() {
        let pressure = pressure();
        let casts: Vec<Vec<f64>> = vec![
            thermocline_temperature(&pressure),
            pressure.iter().map(|&p| 20. - 0.01 * p).collect(),
            pressure.iter().map(|&p| 10. + (p / 50.).sin()).collect(),
            pressure
                .iter()
                .map(|&p| if p < 120. { 8. } else if p < 150. { 9. } else { 4. })
                .collect(),
        ];
        let options = MldOptionsBuilder::default()
            .reference_pressure(25.)
            .build()
            .unwrap();
        for temperature in casts {
            let profile = ProfileBuilder::default()
                .pressure(&pressure)
                .temperature(&temperature)
                .build()
                .unwrap();
            let result = find_mld(&profile, &options).unwrap();
            if let Some(depth) = result.depth {
                assert!(depth >= 25. && depth <= 500., "depth {}", depth);
            }
        }
    }

    #[test]
    fn test_disabled_metrics_are_not_run() {
        let pressure = pressure();
        let temperature = thermocline_temperature(&pressure);
        let profile = ProfileBuilder::default()
            .pressure(&pressure)
            .temperature(&temperature)
            .build()
            .unwrap();
        let options = MldOptionsBuilder::default()
            .metrics(vec![Metric::Threshold])
            .build()
            .unwrap();
        let result = find_mld(&profile, &options).unwrap();
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.depth, Some(210.));
        assert_eq!(result.metric, Some(Metric::Threshold));
    }

    #[test]
    fn test_invalid_options_are_errors() {
        let pressure = pressure();
        let temperature = thermocline_temperature(&pressure);
        let profile = ProfileBuilder::default()
            .pressure(&pressure)
            .temperature(&temperature)
            .build()
            .unwrap();
        let mut options = MldOptions::default();
        options.error_tolerance = -1.;
        assert!(matches!(
            find_mld(&profile, &options),
            Err(MldError::MldOptionsError(_))
        ));
    }

    #[test]
    fn test_linear_cast_without_fit_candidate_is_undetermined() {
        let pressure = pressure();
        let temperature: Vec<f64> = pressure.iter().map(|&p| 20. - 0.01 * p).collect();
        let profile = ProfileBuilder::default()
            .pressure(&pressure)
            .temperature(&temperature)
            .build()
            .unwrap();
        let options = MldOptionsBuilder::default()
            .metrics(vec![Metric::Fit])
            .build()
            .unwrap();
        let result = find_mld(&profile, &options).unwrap();
        assert_eq!(result.depth, None);
        assert!(!result.is_determined());
        assert_eq!(result.variable, None);
        assert_eq!(result.metric, None);
        assert_eq!(
            result.candidates.get(Metric::Fit, Variable::Temperature),
            Some(None)
        );
        assert!(result.pathway.contains(&DecisionStep::NoConsensus {
            variable: Variable::Temperature
        }));
        assert_eq!(result.pathway.last(), Some(&DecisionStep::Undetermined));
        assert_eq!(
            result.pathway_summary(),
            "classified:not-winter-like>pruned:0/1>no-consensus:temperature>undetermined"
        );
    }

    #[test]
    fn test_deep_winter_mixed_layer_prefers_density() {
        let pressure = pressure();
        let temperature: Vec<f64> = pressure
            .iter()
            .map(|&p| if p <= 300. { 15. } else { 15. - 0.02 * (p - 300.) })
            .collect();
        let salinity = vec![35.; pressure.len()];
        let profile = ProfileBuilder::default()
            .pressure(&pressure)
            .temperature(&temperature)
            .salinity(&salinity)
            .build()
            .unwrap();
        let result = find_mld(&profile, &MldOptions::default()).unwrap();
        assert_eq!(result.classification, Some(Classification::WinterLike));
        assert_eq!(result.variable, Some(Variable::Density));
        let depth = result.depth.unwrap();
        assert!(depth > 270. && depth <= 310., "depth {}", depth);
        assert!(result.pathway.iter().any(|step| matches!(
            step,
            DecisionStep::Reconciled {
                variable: Variable::Density,
                ..
            }
        )));
        assert!(result.pathway_summary().contains("reconciled:density:"));
    }

    #[test]
    fn test_from_arrays_reports_mismatched_columns() {
        let pressure = pressure();
        let temperature = thermocline_temperature(&pressure);
        let salinity = vec![35.; pressure.len() - 1];
        let result = find_mld_from_arrays(
            &pressure,
            &temperature,
            Some(&salinity),
            &MldOptions::default(),
        );
        assert!(matches!(
            result,
            Err(MldError::ProfileError(ProfileError::LengthMismatch(
                50,
                "salinity",
                49
            )))
        ));
        let result =
            find_mld_from_arrays(&pressure, &temperature, None, &MldOptions::default()).unwrap();
        assert_eq!(result.variable, Some(Variable::Temperature));
    }
}
