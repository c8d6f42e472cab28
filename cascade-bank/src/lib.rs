//! # cascade-bank
//!
//! The Node and Mechanism registries. A bank document is validated once
//! (references, ranges, effects, feedback loops) and frozen into an
//! immutable arena that every run shares behind an `Arc`.

pub mod bank;
pub mod document;
pub mod graph;
pub mod validation;

pub use bank::{MechanismBank, SharedBank};
pub use document::BankDocument;
pub use graph::FeedbackLoop;
