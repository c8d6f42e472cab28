//! Outcome Projector: endpoint extraction, monetization and stratification.

use std::collections::BTreeMap;

use cascade_bank::MechanismBank;
use cascade_core::models::{GeographicContext, ProjectionResult, UncertaintySummary};
use cascade_solver::SimulationRun;

use crate::propagator::Propagation;
use crate::summary::summarize;

/// Endpoint projections plus the per-endpoint uncertainty summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub projections: Vec<ProjectionResult>,
    pub uncertainty: BTreeMap<String, UncertaintySummary>,
}

pub struct OutcomeProjector<'a> {
    bank: &'a MechanismBank,
    ci_level: f64,
}

impl<'a> OutcomeProjector<'a> {
    pub fn new(bank: &'a MechanismBank, ci_level: f64) -> Self {
        Self { bank, ci_level }
    }

    /// Project every crisis endpoint of the point-estimate `run`. Without a
    /// propagation the interval collapses onto the point estimate.
    pub fn project(
        &self,
        run: &SimulationRun,
        propagation: Option<&Propagation>,
        ctx: &GeographicContext,
    ) -> Projection {
        let mut projections = Vec::new();
        let mut uncertainty = BTreeMap::new();

        for j in self.bank.endpoints() {
            let node = self.bank.node(j);
            let trajectory = run.series(j);
            let baseline = trajectory.first().copied().unwrap_or_default();
            let final_value = trajectory.last().copied().unwrap_or(baseline);
            let change = final_value - baseline;

            let posterior_samples = propagation
                .map(|p| p.node_samples(j))
                .unwrap_or_default();
            let (median, ci_95) = match summarize(&posterior_samples, self.ci_level) {
                Some(summary) => {
                    let out = (summary.median, summary.ci_95);
                    uncertainty.insert(node.id.clone(), summary);
                    out
                }
                None => (final_value, (final_value, final_value)),
            };

            projections.push(ProjectionResult {
                node_id: node.id.clone(),
                trajectory,
                posterior_samples,
                median,
                ci_95,
                baseline,
                change_from_baseline: change,
                monetized_change: node.unit_value.map(|v| change * v),
                stratified: stratify(change, &ctx.demographics),
            });
        }

        Projection {
            projections,
            uncertainty,
        }
    }
}

/// Split `change` across population groups in proportion to their weights.
/// Non-positive or non-finite weights are ignored.
pub fn stratify(change: f64, weights: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let usable = || {
        weights
            .iter()
            .filter(|(_, w)| w.is_finite() && **w > 0.0)
    };
    let total: f64 = usable().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return BTreeMap::new();
    }
    usable()
        .map(|(group, w)| (group.clone(), change * w / total))
        .collect()
}
