// schismrs-mld/src/batch.rs

use crate::errors::MldError;
use crate::mld::{find_mld_with_eos, MldResult};
use crate::options::MldOptions;
use crate::profile::{EquationOfState, Profile};
use humantime::format_duration;
use log::{debug, info};
use rayon::prelude::*;
use std::time::Instant;

/// Runs the estimator over many casts in parallel.
///
/// Casts are independent, so the output is simply in input order.
pub fn estimate_batch(
    profiles: &[Profile],
    options: &MldOptions,
    eos: &dyn EquationOfState,
) -> Vec<Result<MldResult, MldError>> {
    info!("Begin estimating mixed layer depth for {} profiles", profiles.len());
    let now = Instant::now();
    let results: Vec<Result<MldResult, MldError>> = profiles
        .par_iter()
        .map(|profile| find_mld_with_eos(profile, options, eos))
        .collect();
    let determined = results
        .iter()
        .filter(|result| matches!(result, Ok(mld) if mld.is_determined()))
        .count();
    debug!(
        "{} of {} profiles have a mixed layer depth",
        determined,
        results.len()
    );
    info!(
        "Took {} to estimate {} profiles.",
        format_duration(now.elapsed()),
        profiles.len()
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mld::find_mld;
    use crate::profile::{LinearEos, ProfileBuilder};

    fn cast(mixed_layer: f64) -> Profile {
        let pressure: Vec<f64> = (1..=60).map(|i| i as f64 * 5.).collect();
        let temperature: Vec<f64> = pressure
            .iter()
            .map(|&p| {
                if p <= mixed_layer {
                    18.
                } else {
                    18. - 0.04 * (p - mixed_layer)
                }
            })
            .collect();
        ProfileBuilder::default()
            .pressure(&pressure)
            .temperature(&temperature)
            .build()
            .unwrap()
    }

    #[test]
    fn test_batch_matches_sequential() {
        let profiles: Vec<Profile> = [30., 55., 80., 120., 200.]
            .iter()
            .map(|&d| cast(d))
            .collect();
        let options = MldOptions::default();
        let batch = estimate_batch(&profiles, &options, &LinearEos::default());
        assert_eq!(batch.len(), profiles.len());
        for (profile, result) in profiles.iter().zip(batch) {
            let sequential = find_mld(profile, &options).unwrap();
            assert_eq!(result.unwrap(), sequential);
        }
    }

    #[test]
    fn test_batch_empty() {
        let batch = estimate_batch(&[], &MldOptions::default(), &LinearEos::default());
        assert!(batch.is_empty());
    }
}
