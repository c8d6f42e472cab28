//! Context lookup and condition evaluation for single moderators.

use cascade_core::models::{GeographicContext, Moderator, ModeratorCondition, ModeratorKind};

/// Numeric value of a moderator's factor in `ctx`, if the context carries it.
///
/// Policy factors come from the policy environment (flags read as 0/1),
/// demographic factors from the demographic proportions, geographic and
/// implementation factors from the characteristics table.
pub fn lookup(moderator: &Moderator, ctx: &GeographicContext) -> Option<f64> {
    let factor = moderator.factor.as_str();
    match moderator.kind {
        ModeratorKind::Policy => ctx.policy_environment.get(factor).map(|v| v.as_number()),
        ModeratorKind::Demographic => ctx.demographics.get(factor).copied(),
        ModeratorKind::Geographic | ModeratorKind::Implementation => {
            ctx.characteristics.get(factor).copied()
        }
    }
}

/// Whether `moderator` fires in `ctx`. A missing factor only satisfies `Absent`.
pub fn is_satisfied(moderator: &Moderator, ctx: &GeographicContext) -> bool {
    let value = lookup(moderator, ctx);
    match moderator.condition {
        ModeratorCondition::Present => value.is_some_and(|v| v != 0.0),
        ModeratorCondition::Absent => value.map_or(true, |v| v == 0.0),
        ModeratorCondition::Above { threshold } => value.is_some_and(|v| v > threshold),
        ModeratorCondition::Below { threshold } => value.is_some_and(|v| v < threshold),
    }
}

/// Adjustments of every satisfied moderator, in declaration order.
pub fn satisfied_adjustments<'a>(
    moderators: &'a [Moderator],
    ctx: &'a GeographicContext,
) -> impl Iterator<Item = f64> + 'a {
    moderators
        .iter()
        .filter(move |m| is_satisfied(m, ctx))
        .map(|m| m.adjustment)
}
