// schismrs-mld/src/selector/pathway.rs

use super::classify::Classification;
use crate::metrics::Metric;
use crate::profile::Variable;
use std::fmt;

/// Why the reconciled variable was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// Temperature and density agree within `range`; the preferred one is used.
    Agreement,
    /// Both exist but disagree; the classification decides.
    Preferred,
    /// The preferred variable has no consensus.
    Fallback,
}

impl Reconciliation {
    pub fn name(&self) -> &'static str {
        match self {
            Reconciliation::Agreement => "agreement",
            Reconciliation::Preferred => "preferred",
            Reconciliation::Fallback => "fallback",
        }
    }
}

/// One branch taken by the selector, in the order it was taken.
#[derive(Clone, Debug, PartialEq)]
pub enum DecisionStep {
    InsufficientData {
        retained: usize,
    },
    Classified {
        classification: Classification,
        tdiff: Option<f64>,
        ddiff: Option<f64>,
    },
    Pruned {
        kept: usize,
        discarded: usize,
    },
    Clustered {
        variable: Variable,
        members: Vec<Metric>,
        chosen: Metric,
        depth: f64,
    },
    NoConsensus {
        variable: Variable,
    },
    Reconciled {
        variable: Variable,
        reconciliation: Reconciliation,
        depth: f64,
    },
    Undetermined,
}

impl fmt::Display for DecisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionStep::InsufficientData { .. } => write!(f, "insufficient-data"),
            DecisionStep::Classified { classification, .. } => {
                write!(f, "classified:{}", classification.name())
            }
            DecisionStep::Pruned { kept, discarded } => {
                write!(f, "pruned:{}/{}", kept, kept + discarded)
            }
            DecisionStep::Clustered {
                variable,
                members,
                chosen,
                ..
            } => write!(f, "clustered:{}:{}x{}", variable, chosen, members.len()),
            DecisionStep::NoConsensus { variable } => write!(f, "no-consensus:{}", variable),
            DecisionStep::Reconciled {
                variable,
                reconciliation,
                ..
            } => write!(f, "reconciled:{}:{}", variable, reconciliation.name()),
            DecisionStep::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// Compact one-line rendering of a whole trace, e.g. for CSV output.
pub fn summarize(pathway: &[DecisionStep]) -> String {
    pathway
        .iter()
        .map(|step| step.to_string())
        .collect::<Vec<_>>()
        .join(">")
}
