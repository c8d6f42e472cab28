//! Linearized calibration step in node-normalized coordinates.

use nalgebra::{DMatrix, DVector};

use cascade_core::errors::CalibrationError;

use crate::calculator::CascadeCalculator;

/// Endpoint gaps, their Jacobian w.r.t. the free nodes, and each free node's
/// pull toward its mechanism-implied level. All normalized by range width.
#[derive(Debug, Clone)]
pub struct Linearization {
    pub gaps: DVector<f64>,
    pub jacobian: DMatrix<f64>,
    pub pulls: DVector<f64>,
}

impl Linearization {
    pub fn gap_norm(&self) -> f64 {
        inf_norm(&self.gaps)
    }
}

/// Max-abs norm; zero for an empty vector.
pub fn inf_norm(v: &DVector<f64>) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

/// Evaluate endpoint predictions (zero residuals, so pure mechanism inflow).
fn predictions(calculator: &CascadeCalculator<'_>, endpoints: &[usize], state: &[f64]) -> Vec<f64> {
    let contributions = calculator.contributions(state);
    endpoints
        .iter()
        .map(|&e| calculator.inflow(e, &contributions))
        .collect()
}

/// Build the linearization at `state` with forward differences of
/// `step × width` per free node (backward at the upper bound).
pub fn linearize(
    calculator: &CascadeCalculator<'_>,
    free: &[usize],
    endpoints: &[usize],
    state: &[f64],
    step: f64,
) -> Linearization {
    let bank = calculator.bank();
    let contributions = calculator.contributions(state);

    let gaps = DVector::from_iterator(
        endpoints.len(),
        endpoints.iter().map(|&e| {
            let node = bank.node(e);
            (state[e] - calculator.inflow(e, &contributions)) / node.valid_range.width()
        }),
    );
    let pulls = DVector::from_iterator(
        free.len(),
        free.iter().map(|&j| {
            let range = bank.node(j).valid_range;
            let implied = range.clamp(calculator.inflow(j, &contributions));
            (implied - state[j]) / range.width()
        }),
    );

    let base = predictions(calculator, endpoints, state);
    let mut jacobian = DMatrix::zeros(endpoints.len(), free.len());
    let mut shifted_state = state.to_vec();
    for (col, &j) in free.iter().enumerate() {
        let range = bank.node(j).valid_range;
        let mut delta = step * range.width();
        if state[j] + delta > range.max {
            delta = -delta;
        }
        shifted_state[j] = state[j] + delta;
        let shifted = predictions(calculator, endpoints, &shifted_state);
        shifted_state[j] = state[j];
        for (row, &e) in endpoints.iter().enumerate() {
            let derivative = (shifted[row] - base[row]) / delta;
            jacobian[(row, col)] =
                derivative * range.width() / bank.node(e).valid_range.width();
        }
    }

    Linearization {
        gaps,
        jacobian,
        pulls,
    }
}

/// Gauss–Newton step `J⁺g + (I − J⁺J)·pull`, plus the norm of the
/// null-space component.
pub fn gauss_newton_step(
    lin: &Linearization,
    epsilon: f64,
) -> Result<(DVector<f64>, f64), CalibrationError> {
    let free = lin.pulls.len();
    if lin.gaps.is_empty() {
        return Ok((lin.pulls.clone(), inf_norm(&lin.pulls)));
    }
    let pinv = lin
        .jacobian
        .clone()
        .pseudo_inverse(epsilon)
        .map_err(|reason| CalibrationError::LinearSolve {
            reason: reason.to_string(),
        })?;
    let projector = DMatrix::<f64>::identity(free, free) - &pinv * &lin.jacobian;
    let null_component = projector * &lin.pulls;
    let step = &pinv * &lin.gaps + &null_component;
    let null_norm = inf_norm(&null_component);
    Ok((step, null_norm))
}
