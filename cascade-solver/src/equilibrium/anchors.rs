//! Fixed values calibration is anchored to.

use cascade_bank::MechanismBank;
use cascade_core::errors::{CascadeResult, ContextError};
use cascade_core::models::{GeographicContext, NodeKind};

/// Initial stock vector: structural and endpoint nodes carry their measured
/// values, intermediates sit at their range midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchors {
    pub values: Vec<f64>,
}

impl Anchors {
    /// Resolve every fixed value from the context. Structural nodes fall back
    /// to the node's own `baseline_value`; endpoints must be observed.
    pub fn from_context(bank: &MechanismBank, ctx: &GeographicContext) -> CascadeResult<Self> {
        Self::resolve(bank, ctx, None)
    }

    /// Like [`from_context`](Self::from_context), with the intervention
    /// target anchored at its starting level. The target needs no context
    /// value or node baseline of its own.
    pub fn for_intervention(
        bank: &MechanismBank,
        ctx: &GeographicContext,
        target: usize,
        from_value: f64,
    ) -> CascadeResult<Self> {
        Self::resolve(bank, ctx, Some((target, from_value)))
    }

    fn resolve(
        bank: &MechanismBank,
        ctx: &GeographicContext,
        pinned: Option<(usize, f64)>,
    ) -> CascadeResult<Self> {
        let mut values = Vec::with_capacity(bank.node_count());
        for (i, node) in bank.nodes().iter().enumerate() {
            let value = match node.kind {
                NodeKind::Structural => pinned
                    .filter(|&(target, _)| target == i)
                    .map(|(_, value)| value)
                    .or_else(|| ctx.structural_values.get(&node.id).copied())
                    .or(node.baseline_value)
                    .ok_or_else(|| ContextError::MissingBaselineData {
                        node_id: node.id.clone(),
                        kind: "structural",
                    })?,
                NodeKind::CrisisEndpoint => ctx
                    .baseline_observed_endpoints
                    .get(&node.id)
                    .copied()
                    .ok_or_else(|| ContextError::MissingBaselineData {
                        node_id: node.id.clone(),
                        kind: "crisis_endpoint",
                    })?,
                NodeKind::Intermediate => node.valid_range.midpoint(),
            };
            if !value.is_finite() || !node.valid_range.contains(value) {
                return Err(ContextError::ValueOutOfRange {
                    node_id: node.id.clone(),
                    value,
                    min: node.valid_range.min,
                    max: node.valid_range.max,
                }
                .into());
            }
            values.push(value);
        }
        Ok(Self { values })
    }
}
