//! Cascade Calculator: stock vector in, flow vector out.
//!
//! Each free node `j` has an implied level `L_j = r_j + Σ contribution_m(S)`
//! over its incoming mechanisms, and moves `rate_j × (L_j − S_j)` per step.
//! Nodes with a linear inflow have that move capped at the smallest
//! `max_step_fraction` of their range. Structural nodes never move.

use cascade_bank::MechanismBank;
use cascade_core::errors::{CascadeResult, SimulationError};
use cascade_core::models::FunctionalForm;

use crate::flow::flow;

/// Flow evaluator for one set of adjusted effects and residuals.
#[derive(Debug, Clone)]
pub struct CascadeCalculator<'a> {
    bank: &'a MechanismBank,
    effects: &'a [f64],
    residuals: &'a [f64],
    /// Per-node absolute step cap from linear inflows.
    step_limits: Vec<Option<f64>>,
}

impl<'a> CascadeCalculator<'a> {
    pub fn new(
        bank: &'a MechanismBank,
        effects: &'a [f64],
        residuals: &'a [f64],
    ) -> CascadeResult<Self> {
        if effects.len() != bank.mechanism_count() {
            return Err(SimulationError::DimensionMismatch {
                expected: bank.mechanism_count(),
                actual: effects.len(),
            }
            .into());
        }
        if residuals.len() != bank.node_count() {
            return Err(SimulationError::DimensionMismatch {
                expected: bank.node_count(),
                actual: residuals.len(),
            }
            .into());
        }
        let step_limits = (0..bank.node_count())
            .map(|j| {
                let width = bank.node(j).valid_range.width();
                bank.incoming(j)
                    .iter()
                    .filter_map(|&m| match bank.mechanism(m).functional_form {
                        FunctionalForm::Linear { max_step_fraction } => Some(max_step_fraction),
                        _ => None,
                    })
                    .reduce(f64::min)
                    .map(|fraction| fraction * width)
            })
            .collect();
        Ok(Self {
            bank,
            effects,
            residuals,
            step_limits,
        })
    }

    pub fn bank(&self) -> &'a MechanismBank {
        self.bank
    }

    pub fn check_state(&self, state: &[f64]) -> CascadeResult<()> {
        if state.len() != self.bank.node_count() {
            return Err(SimulationError::DimensionMismatch {
                expected: self.bank.node_count(),
                actual: state.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Contribution of mechanism `m` at `state`.
    pub fn contribution(&self, m: usize, state: &[f64]) -> f64 {
        let mechanism = self.bank.mechanism(m);
        let (from, to) = self.bank.edge(m);
        flow(
            &mechanism.functional_form,
            state[from],
            state[to],
            self.effects[m],
            self.bank.node(from).valid_range.max,
            self.bank.node(to).valid_range.width(),
        )
    }

    /// Every mechanism's contribution, dense.
    pub fn contributions(&self, state: &[f64]) -> Vec<f64> {
        (0..self.bank.mechanism_count())
            .map(|m| self.contribution(m, state))
            .collect()
    }

    /// Sum of incoming contributions into `node`, without the residual.
    pub fn inflow(&self, node: usize, contributions: &[f64]) -> f64 {
        self.bank
            .incoming(node)
            .iter()
            .map(|&m| contributions[m])
            .sum()
    }

    /// Implied level `r_j + Σ contributions` of a node.
    pub fn implied_level(&self, node: usize, contributions: &[f64]) -> f64 {
        self.residuals[node] + self.inflow(node, contributions)
    }

    /// Net flow vector from precomputed contributions.
    pub fn net_flows(&self, state: &[f64], contributions: &[f64]) -> Vec<f64> {
        (0..self.bank.node_count())
            .map(|j| {
                let node = self.bank.node(j);
                if node.is_fixed() {
                    return 0.0;
                }
                let gap = self.implied_level(j, contributions) - state[j];
                let delta = node.adjustment_rate * gap;
                match self.step_limits[j] {
                    Some(limit) => delta.clamp(-limit, limit),
                    None => delta,
                }
            })
            .collect()
    }

    /// Dense flow evaluation.
    pub fn flows(&self, state: &[f64]) -> Vec<f64> {
        let contributions = self.contributions(state);
        self.net_flows(state, &contributions)
    }
}

/// Residuals that make `state` an exact steady state under `effects`:
/// `r_j = S_j − Σ contribution` for free nodes, zero for structural ones.
pub fn derive_residuals(
    bank: &MechanismBank,
    effects: &[f64],
    state: &[f64],
) -> CascadeResult<Vec<f64>> {
    let zeros = vec![0.0; bank.node_count()];
    let calculator = CascadeCalculator::new(bank, effects, &zeros)?;
    calculator.check_state(state)?;
    let contributions = calculator.contributions(state);
    Ok((0..bank.node_count())
        .map(|j| {
            if bank.node(j).is_fixed() {
                0.0
            } else {
                state[j] - calculator.inflow(j, &contributions)
            }
        })
        .collect())
}

/// Sparse evaluation state for one run: contributions are recomputed only
/// for mechanisms whose inputs changed since the previous call.
#[derive(Debug, Clone)]
pub struct FlowCache {
    contributions: Vec<f64>,
    previous: Option<Vec<f64>>,
    recomputed: usize,
}

impl FlowCache {
    pub fn new(mechanism_count: usize) -> Self {
        Self {
            contributions: vec![0.0; mechanism_count],
            previous: None,
            recomputed: 0,
        }
    }

    /// Flows at `state`, identical to [`CascadeCalculator::flows`].
    pub fn flows(&mut self, calculator: &CascadeCalculator<'_>, state: &[f64]) -> Vec<f64> {
        let bank = calculator.bank();
        self.recomputed = 0;
        match self.previous.as_mut() {
            None => {
                for m in 0..bank.mechanism_count() {
                    self.contributions[m] = calculator.contribution(m, state);
                }
                self.recomputed = bank.mechanism_count();
                self.previous = Some(state.to_vec());
            }
            Some(previous) => {
                for m in 0..bank.mechanism_count() {
                    let (from, to) = bank.edge(m);
                    let stale = previous[from] != state[from]
                        || (bank.mechanism(m).functional_form.reads_target()
                            && previous[to] != state[to]);
                    if stale {
                        self.contributions[m] = calculator.contribution(m, state);
                        self.recomputed += 1;
                    }
                }
                previous.copy_from_slice(state);
            }
        }
        calculator.net_flows(state, &self.contributions)
    }

    /// Mechanisms recomputed by the last call.
    pub fn last_recomputed(&self) -> usize {
        self.recomputed
    }
}
