//! Signal scoring for stockseer.
//!
//! Turns the latest two indicator snapshots plus a sentiment scalar into a
//! discrete recommendation with the reasons that produced it.

pub mod rules;
pub mod scorer;
pub mod types;

pub use rules::{Contribution, RuleArm, RuleGroup, ScoreInput, BASE_RULES, ENHANCED_RULES};
pub use scorer::{classify, SignalScorer};
pub use types::{Side, Signal, SignalKind};
