//! Structural checks run once at load time, before any computation.

use std::collections::{HashMap, HashSet};

use cascade_core::errors::BankError;
use cascade_core::models::{FunctionalForm, Mechanism, Node};

/// Validate nodes: unique ids, usable ranges, sane optional fields.
/// Returns the id → position index.
pub fn validate_nodes(nodes: &[Node]) -> Result<HashMap<String, usize>, BankError> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id.clone(), i).is_some() {
            return Err(BankError::DuplicateNode {
                node_id: node.id.clone(),
            });
        }
        if !node.valid_range.is_valid() {
            return Err(BankError::InvalidRange {
                node_id: node.id.clone(),
                min: node.valid_range.min,
                max: node.valid_range.max,
            });
        }
        if !(node.adjustment_rate > 0.0 && node.adjustment_rate <= 1.0) {
            return Err(BankError::InvalidNode {
                node_id: node.id.clone(),
                reason: format!("adjustment_rate {} is outside (0, 1]", node.adjustment_rate),
            });
        }
        if let Some(value) = node.baseline_value {
            if !node.valid_range.contains(value) {
                return Err(BankError::InvalidNode {
                    node_id: node.id.clone(),
                    reason: format!("baseline_value {value} is outside the valid range"),
                });
            }
        }
        if node.unit_value.is_some_and(|v| !v.is_finite()) {
            return Err(BankError::InvalidNode {
                node_id: node.id.clone(),
                reason: "unit_value must be finite".to_string(),
            });
        }
    }
    Ok(index)
}

/// Validate mechanisms against the node index. Node references are checked
/// first so a dangling edge always surfaces as `UnknownNodeReference`.
/// Returns the resolved `(from, to)` positions per mechanism.
pub fn validate_mechanisms(
    mechanisms: &[Mechanism],
    node_index: &HashMap<String, usize>,
) -> Result<Vec<(usize, usize)>, BankError> {
    let mut resolved = Vec::with_capacity(mechanisms.len());
    for mechanism in mechanisms {
        let from = resolve(node_index, mechanism, &mechanism.from_node, "from_node")?;
        let to = resolve(node_index, mechanism, &mechanism.to_node, "to_node")?;
        resolved.push((from, to));
    }

    let mut seen = HashSet::with_capacity(mechanisms.len());
    for mechanism in mechanisms {
        if !seen.insert(mechanism.id.as_str()) {
            return Err(BankError::DuplicateMechanism {
                mechanism_id: mechanism.id.clone(),
            });
        }
        validate_effect(mechanism)?;
    }
    Ok(resolved)
}

fn resolve(
    node_index: &HashMap<String, usize>,
    mechanism: &Mechanism,
    node_id: &str,
    endpoint: &'static str,
) -> Result<usize, BankError> {
    node_index
        .get(node_id)
        .copied()
        .ok_or_else(|| BankError::UnknownNodeReference {
            mechanism_id: mechanism.id.clone(),
            node_id: node_id.to_string(),
            endpoint,
        })
}

fn validate_effect(mechanism: &Mechanism) -> Result<(), BankError> {
    let invalid = |reason: String| BankError::InvalidEffect {
        mechanism_id: mechanism.id.clone(),
        reason,
    };
    let effect = &mechanism.base_effect;

    if !(effect.point.is_finite() && effect.ci_lower.is_finite() && effect.ci_upper.is_finite())
    {
        return Err(invalid("effect and CI bounds must be finite".to_string()));
    }
    if effect.ci_lower > effect.ci_upper {
        return Err(invalid(format!(
            "CI lower {} exceeds upper {}",
            effect.ci_lower, effect.ci_upper
        )));
    }
    if effect.point < effect.ci_lower || effect.point > effect.ci_upper {
        return Err(invalid(format!(
            "point {} lies outside its CI [{}, {}]",
            effect.point, effect.ci_lower, effect.ci_upper
        )));
    }
    if let FunctionalForm::Linear { max_step_fraction } = mechanism.functional_form {
        if !(max_step_fraction > 0.0 && max_step_fraction <= 1.0) {
            return Err(invalid(format!(
                "max_step_fraction {max_step_fraction} is outside (0, 1]"
            )));
        }
    }
    if let FunctionalForm::Threshold { threshold, .. } = mechanism.functional_form {
        if !threshold.is_finite() {
            return Err(invalid("threshold must be finite".to_string()));
        }
    }
    if let Some(samples) = &mechanism.posterior_samples {
        if samples.is_empty() {
            return Err(invalid("posterior sample set is empty".to_string()));
        }
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(invalid("posterior samples must be finite".to_string()));
        }
    }
    for moderator in &mechanism.moderators {
        if !moderator.adjustment.is_finite() {
            return Err(invalid(format!(
                "moderator '{}' has a non-finite adjustment",
                moderator.factor
            )));
        }
    }
    Ok(())
}
