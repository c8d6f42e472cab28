//! # cascade-moderation
//!
//! Adjusts each mechanism's base effect for the geography being simulated.
//! Moderators read the context, combine under the configured policy, and the
//! result is bounded by a multiple of the effect's confidence interval.

pub mod conditions;
pub mod engine;
pub mod policy;

pub use engine::{AdjustedEffect, ModeratedEffects, ModeratorEngine};
