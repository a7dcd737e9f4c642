// schismrs-mld/src/selector/mod.rs

mod classify;
mod cluster;
mod pathway;

pub use classify::{band_change, classify, Classification};
pub use cluster::{consensus, Consensus};
pub use pathway::{summarize, DecisionStep, Reconciliation};

use crate::metrics::{Candidate, CandidateTable};
use crate::options::MldOptions;
use crate::profile::{CleanProfile, Variable};
use log::debug;

/// Outcome of the selector for one profile.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub classification: Classification,
    pub consensus: Option<Consensus>,
    pub pathway: Vec<DecisionStep>,
}

/// Picks the final depth from a complete candidate table.
///
/// Steps run in a fixed order and each one appends what it decided to the
/// pathway: classification, pruning, per-variable clustering, then
/// reconciliation across variables.
pub fn select(profile: &CleanProfile, table: &CandidateTable, options: &MldOptions) -> Selection {
    let mut pathway = Vec::new();

    let (classification, tdiff, ddiff) = classify(profile, options);
    pathway.push(DecisionStep::Classified {
        classification,
        tdiff,
        ddiff,
    });

    let found: Vec<Candidate> = table.iter().filter(|c| c.depth.is_some()).copied().collect();
    pathway.push(DecisionStep::Pruned {
        kept: found.len(),
        discarded: table.len() - found.len(),
    });

    let mut per_variable: Vec<Consensus> = Vec::with_capacity(Variable::ALL.len());
    for variable in profile.variables() {
        match consensus(&found, variable, options.range) {
            Some(agreed) => {
                pathway.push(DecisionStep::Clustered {
                    variable,
                    members: agreed.members.clone(),
                    chosen: agreed.metric,
                    depth: agreed.depth,
                });
                per_variable.push(agreed);
            }
            None => pathway.push(DecisionStep::NoConsensus { variable }),
        }
    }

    let chosen = match reconcile(classification, &per_variable, options.range) {
        Some((agreed, reconciliation)) => {
            pathway.push(DecisionStep::Reconciled {
                variable: agreed.variable,
                reconciliation,
                depth: agreed.depth,
            });
            Some(agreed)
        }
        None => {
            pathway.push(DecisionStep::Undetermined);
            None
        }
    };
    debug!("Selector pathway: {}", summarize(&pathway));

    Selection {
        classification,
        consensus: chosen,
        pathway,
    }
}

/// Chooses between the per-variable consensus estimates.
///
/// The classification names the preferred variable. When it has no estimate
/// the other of temperature and density is used, then salinity.
pub fn reconcile(
    classification: Classification,
    per_variable: &[Consensus],
    range: f64,
) -> Option<(Consensus, Reconciliation)> {
    let lookup = |variable: Variable| per_variable.iter().find(|c| c.variable == variable);
    let preferred = classification.preferred();
    let other = match preferred {
        Variable::Density => Variable::Temperature,
        _ => Variable::Density,
    };

    match (lookup(preferred), lookup(other)) {
        (Some(chosen), Some(alternative)) => {
            let reconciliation = if (chosen.depth - alternative.depth).abs() <= range {
                Reconciliation::Agreement
            } else {
                Reconciliation::Preferred
            };
            Some((chosen.clone(), reconciliation))
        }
        (Some(chosen), None) => Some((chosen.clone(), Reconciliation::Preferred)),
        (None, Some(alternative)) => Some((alternative.clone(), Reconciliation::Fallback)),
        (None, None) => lookup(Variable::Salinity)
            .map(|salinity| (salinity.clone(), Reconciliation::Fallback)),
    }
}
