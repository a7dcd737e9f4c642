// schismrs-mld/src/selector/cluster.rs

use crate::metrics::{Candidate, Metric};
use crate::profile::Variable;
use log::trace;

/// Single depth agreed on by the metrics of one variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Consensus {
    pub variable: Variable,
    pub metric: Metric,
    pub depth: f64,
    /// Metrics whose candidates fell into the winning cluster.
    pub members: Vec<Metric>,
}

/// Groups the found candidates of `variable` and resolves them to one depth.
///
/// Every candidate anchors a neighbourhood of the candidates within `range`
/// of it. The most populated neighbourhood wins, the anchor's precedence
/// breaking ties, and its highest-precedence member gives the depth.
pub fn consensus(candidates: &[Candidate], variable: Variable, range: f64) -> Option<Consensus> {
    let found: Vec<(Metric, f64)> = candidates
        .iter()
        .filter(|c| c.variable == variable)
        .filter_map(|c| c.depth.map(|depth| (c.metric, depth)))
        .collect();

    let neighbourhood = |anchor: f64| -> Vec<(Metric, f64)> {
        found
            .iter()
            .copied()
            .filter(|&(_, depth)| (depth - anchor).abs() <= range)
            .collect()
    };

    let (_, members) = found
        .iter()
        .map(|&(metric, depth)| (metric, neighbourhood(depth)))
        .max_by(|(a_metric, a), (b_metric, b)| {
            a.len()
                .cmp(&b.len())
                .then(a_metric.precedence().cmp(&b_metric.precedence()))
        })?;

    let &(metric, depth) = members
        .iter()
        .max_by_key(|(metric, _)| metric.precedence())?;

    trace!(
        "{} consensus {} at {} from {} of {} candidates",
        variable,
        metric,
        depth,
        members.len(),
        found.len()
    );
    Some(Consensus {
        variable,
        metric,
        depth,
        members: members.iter().map(|&(metric, _)| metric).collect(),
    })
}
