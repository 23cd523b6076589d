use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::visa::domain::TravelPurpose;

/// Policy dials for the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Purposes that turn a visa-free short stay into a visa requirement.
    #[serde(default)]
    pub escalated_purposes: BTreeSet<TravelPurpose>,
    /// Allow the curated strong-passport lists to answer destinations without a rule.
    #[serde(default = "default_true")]
    pub strong_passport_heuristic: bool,
}

impl EvaluationConfig {
    pub fn escalates(&self, purpose: TravelPurpose) -> bool {
        self.escalated_purposes.contains(&purpose)
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            escalated_purposes: BTreeSet::new(),
            strong_passport_heuristic: true,
        }
    }
}

fn default_true() -> bool {
    true
}
