// schismrs-mld/src/selector/classify.rs

use crate::options::MldOptions;
use crate::profile::{CleanProfile, Variable};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    WinterLike,
    NotWinterLike,
}

impl Classification {
    pub fn name(&self) -> &'static str {
        match self {
            Classification::WinterLike => "winter-like",
            Classification::NotWinterLike => "not-winter-like",
        }
    }

    pub fn is_winter_like(&self) -> bool {
        matches!(self, Classification::WinterLike)
    }

    /// Variable whose consensus is trusted first.
    pub fn preferred(&self) -> Variable {
        match self {
            Classification::WinterLike => Variable::Density,
            Classification::NotWinterLike => Variable::Temperature,
        }
    }
}

/// Deepest sample within `classification_band` of the reference sample, but
/// never the reference sample itself.
fn band_index(profile: &CleanProfile, band: f64) -> usize {
    let top = profile.min_pressure();
    let within = profile
        .pressure()
        .iter()
        .take_while(|&&p| p - top <= band)
        .count();
    within.saturating_sub(1).max(1)
}

/// Change of `variable` from the reference sample to the bottom of the band.
pub fn band_change(profile: &CleanProfile, variable: Variable, band: f64) -> Option<f64> {
    let values = profile.values(variable)?;
    Some(values[0] - values[band_index(profile, band)])
}

/// Winter-like when both temperature and density barely change across the
/// surface band. Casts without density are never winter-like.
pub fn classify(
    profile: &CleanProfile,
    options: &MldOptions,
) -> (Classification, Option<f64>, Option<f64>) {
    let tdiff = band_change(profile, Variable::Temperature, options.classification_band);
    let ddiff = band_change(profile, Variable::Density, options.classification_band);
    let classification = match (tdiff, ddiff) {
        (Some(tdiff), Some(ddiff))
            if tdiff > options.tcutoff_lower
                && tdiff < options.tcutoff_upper
                && ddiff > options.dcutoff =>
        {
            Classification::WinterLike
        }
        _ => Classification::NotWinterLike,
    };
    (classification, tdiff, ddiff)
}
